use crate::address::AddressRecord;
use itertools::Itertools;
use serde::Serialize;
use strum::{Display, EnumString};
use time::OffsetDateTime;

pub const ATTRIBUTION: &str = "Data provided by www.vworld.kr";

/// The state of a sensor that has not resolved anything yet.
pub const AWAITING_UPDATE: &str = "Awaiting Update";

/// Placeholder shown when a lookup succeeded without a usable street.
pub const AWAY: &str = "away";

/// Whether the zone name replaces the address while the entity is in a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DisplayZone {
    #[default]
    Display,
    Hide,
}

/// Which candidate wins if a response contains several of the preferred type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CandidateSelection {
    #[default]
    LastMatch,
    FirstMatch,
}

/// Everything a sensor exposes to the outside world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub name: String,
    pub state: String,
    pub attributes: AddressRecord,
    pub attribution: &'static str,
    pub picture: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
}

impl SensorSnapshot {
    /// A slug of the sensor name, e.g. `vworld_geocode`.
    pub fn object_id(&self) -> String {
        self.name
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .join("_")
    }
}
