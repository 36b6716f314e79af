use crate::entities::{Coordinate, EntityId, ZoneState};
use thiserror::Error;

/// The current state of a tracked entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub zone: ZoneState,
    /// `None` if the entity does not report a position.
    pub coordinate: Option<Coordinate>,
}

pub trait LocationSource {
    /// Returns `None` if the entity does not exist.
    fn resolve(&self, id: &EntityId) -> Result<Option<EntityState>, LocationError>;
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location source is unreachable: {0}")]
    Unreachable(String),
    #[error("Malformed entity state: {0}")]
    Payload(String),
}
