use std::{fmt, str::FromStr};
use thiserror::Error;

/// A position in decimal degrees (WGS 84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
    pub const LNG_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

    pub fn try_from_lat_lng_deg(lat: f64, lng: f64) -> Option<Self> {
        (Self::LAT_RANGE.contains(&lat) && Self::LNG_RANGE.contains(&lng))
            .then_some(Self { lat, lng })
    }

    pub const fn lat(&self) -> f64 {
        self.lat
    }

    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Longitude first, as expected by services working in `x,y` order.
    pub fn to_lng_lat_string(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinateParseError {
    #[error("Expected a coordinate in the form 'lat,lon'")]
    Format,
    #[error("Invalid number: {0}")]
    Number(String),
    #[error("Coordinate out of range")]
    Range,
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s.split_once(',').ok_or(CoordinateParseError::Format)?;
        let parse = |s: &str| {
            let s = s.trim();
            s.parse::<f64>()
                .map_err(|_| CoordinateParseError::Number(s.to_owned()))
        };
        Self::try_from_lat_lng_deg(parse(lat)?, parse(lng)?).ok_or(CoordinateParseError::Range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lat_lng() {
        let pos: Coordinate = "37.5665, 126.978".parse().unwrap();
        assert_eq!(pos.lat(), 37.5665);
        assert_eq!(pos.lng(), 126.978);
        assert_eq!(pos.to_string(), "37.5665,126.978");
        assert_eq!(pos.to_lng_lat_string(), "126.978,37.5665");
    }

    #[test]
    fn reject_invalid_coordinates() {
        assert_eq!(
            "37.5".parse::<Coordinate>(),
            Err(CoordinateParseError::Format)
        );
        assert_eq!(
            "north,126.9".parse::<Coordinate>(),
            Err(CoordinateParseError::Number("north".into()))
        );
        assert_eq!(
            "91.0,126.9".parse::<Coordinate>(),
            Err(CoordinateParseError::Range)
        );
    }
}
