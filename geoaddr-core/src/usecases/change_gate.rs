use super::prelude::*;

/// Decides whether a new lookup is worth a request to the geocoding service.
///
/// The gate remembers the zone and the coordinate of the last request
/// and lets a new request pass only if the entity moved.
#[derive(Debug, Clone, Default)]
pub struct ChangeGate {
    last_zone: Option<ZoneState>,
    last_coordinate: Option<String>,
}

impl ChangeGate {
    pub fn should_query(&self, zone: Option<&ZoneState>, coordinate: Option<&Coordinate>) -> bool {
        let zone_already_queried = zone.is_some_and(|zone| {
            !zone.is_not_present() && self.last_zone.as_ref() == Some(zone)
        });
        if zone_already_queried {
            return false;
        }
        let Some(coordinate) = coordinate else {
            return false;
        };
        self.last_coordinate.as_deref() != Some(coordinate.to_string().as_str())
    }

    /// Remembers a request that has been answered by the service.
    pub fn record_query(&mut self, zone: Option<&ZoneState>, coordinate: &Coordinate) {
        self.last_zone = zone.cloned();
        self.last_coordinate = Some(coordinate.to_string());
    }
}
