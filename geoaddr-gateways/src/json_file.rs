use geoaddr_core::{
    entities::*,
    gateways::publish::{PublishError, SensorSink},
};
use jfs::Store;
use serde::{Deserialize, Serialize};
use std::{io, path::Path};
use time::OffsetDateTime;

/// Keeps the latest state of every sensor in a JSON file.
pub struct SaveToJsonFile {
    json_store: Store,
}

impl SaveToJsonFile {
    pub fn try_new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let json_store = Store::new(directory)?;
        Ok(Self { json_store })
    }
    pub fn path(&self) -> &Path {
        self.json_store.path()
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct JsonSensor {
    name: String,
    state: String,
    attributes: AddressRecord,
    attribution: String,
    picture: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    last_updated: Option<OffsetDateTime>,
}

impl From<&SensorSnapshot> for JsonSensor {
    fn from(from: &SensorSnapshot) -> Self {
        Self {
            name: from.name.clone(),
            state: from.state.clone(),
            attributes: from.attributes.clone(),
            attribution: from.attribution.to_owned(),
            picture: from.picture.clone(),
            last_updated: from.last_updated,
        }
    }
}

impl SensorSink for SaveToJsonFile {
    fn publish(&self, snapshot: &SensorSnapshot) -> Result<(), PublishError> {
        let id = snapshot.object_id();
        self.json_store
            .save_with_id(&JsonSensor::from(snapshot), &id)
            .map_err(|err| PublishError(err.to_string()))?;
        Ok(())
    }
}
