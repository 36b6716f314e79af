use crate::entities::{Coordinate, GeocodeResponse};
use thiserror::Error;

pub trait ReverseGeocodingGateway {
    fn reverse_geocode(&self, pos: &Coordinate) -> Result<GeocodeResponse, GeocodingError>;
}

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("Geocoding request failed: {0}")]
    Transport(String),
    #[error("Malformed geocoding response: {0}")]
    Payload(String),
}
