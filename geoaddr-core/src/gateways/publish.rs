use crate::entities::SensorSnapshot;
use thiserror::Error;

pub trait SensorSink {
    fn publish(&self, snapshot: &SensorSnapshot) -> Result<(), PublishError>;
}

#[derive(Debug, Error)]
#[error("Unable to publish sensor state: {0}")]
pub struct PublishError(pub String);
