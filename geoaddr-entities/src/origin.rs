use crate::geo::{Coordinate, CoordinateParseError};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Entity domains that report a location.
pub const TRACKABLE_DOMAINS: [&str; 3] = ["device_tracker", "sensor", "person"];

/// Identifier of an entity in the home-automation platform, e.g. `person.jane`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn domain(&self) -> &str {
        self.0.split_once('.').map_or("", |(domain, _)| domain)
    }

    pub fn is_trackable(&self) -> bool {
        TRACKABLE_DOMAINS.contains(&self.domain())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a sensor takes its position from.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    Static(Coordinate),
    Entity(EntityId),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(pos) => fmt::Display::fmt(pos, f),
            Self::Entity(id) => fmt::Display::fmt(id, f),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Origin is neither a trackable entity nor a coordinate: {0}")]
pub struct OriginParseError(#[source] pub CoordinateParseError);

impl FromStr for Origin {
    type Err = OriginParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let entity_id = EntityId(s.to_owned());
        if entity_id.is_trackable() {
            return Ok(Self::Entity(entity_id));
        }
        s.parse().map(Self::Static).map_err(OriginParseError)
    }
}
