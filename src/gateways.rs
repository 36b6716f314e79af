use crate::config;
use anyhow::{Context, Result};
use geoaddr_core::{
    entities::*,
    gateways::{
        location::{EntityState, LocationError, LocationSource},
        publish::{PublishError, SensorSink},
    },
};
use geoaddr_gateways::{home_assistant::HomeAssistant, json_file::SaveToJsonFile, vworld::VWorld};
use std::fs;

pub fn geocoding_gateway(cfg: &config::VWorld, api_key: &str) -> Result<VWorld> {
    VWorld::try_new(cfg.base_url.clone(), api_key.to_owned(), cfg.timeout)
        .context("Unable to create the VWorld client")
}

pub fn home_assistant(cfg: &config::HomeAssistant) -> Result<HomeAssistant> {
    HomeAssistant::try_new(cfg.base_url.clone(), cfg.token.clone(), cfg.timeout)
        .context("Unable to create the Home Assistant client")
}

pub fn location_source(cfg: Option<&config::HomeAssistant>) -> Result<LocationGw> {
    let Some(cfg) = cfg else {
        log::debug!("No Home Assistant connection configured");
        return Ok(LocationGw::new(DummyLocationGw));
    };
    log::info!("Track entities of Home Assistant at {}", cfg.base_url);
    Ok(LocationGw::new(home_assistant(cfg)?))
}

pub fn sensor_sink(
    cfg: &config::Publish,
    home_assistant_cfg: Option<&config::HomeAssistant>,
) -> Result<SinkGw> {
    match cfg {
        config::Publish::Log => {
            log::info!("Publish sensor states to the log");
            Ok(SinkGw::new(LogSink))
        }
        config::Publish::JsonFile { dir } => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Unable to create directory {}", dir.display()))?;
            let gw = SaveToJsonFile::try_new(dir)
                .with_context(|| format!("Unable to open JSON store {}", dir.display()))?;
            log::info!("Publish sensor states to {}", gw.path().display());
            Ok(SinkGw::new(gw))
        }
        config::Publish::HomeAssistant => {
            let cfg = home_assistant_cfg.context("Missing Home Assistant connection")?;
            log::info!("Publish sensor states to Home Assistant at {}", cfg.base_url);
            Ok(SinkGw::new(home_assistant(cfg)?))
        }
    }
}

struct DummyLocationGw;

impl LocationSource for DummyLocationGw {
    fn resolve(&self, id: &EntityId) -> Result<Option<EntityState>, LocationError> {
        Err(LocationError::Unreachable(format!(
            "Cannot resolve {id} because no Home Assistant connection was configured"
        )))
    }
}

struct LogSink;

impl SensorSink for LogSink {
    fn publish(&self, snapshot: &SensorSnapshot) -> Result<(), PublishError> {
        log::info!("{}: {}", snapshot.name, snapshot.state);
        Ok(())
    }
}

pub struct LocationGw(Box<dyn LocationSource>);

impl LocationGw {
    pub fn new<G>(gw: G) -> Self
    where
        G: LocationSource + 'static,
    {
        Self(Box::new(gw))
    }
}

impl LocationSource for LocationGw {
    fn resolve(&self, id: &EntityId) -> Result<Option<EntityState>, LocationError> {
        self.0.resolve(id)
    }
}

pub struct SinkGw(Box<dyn SensorSink>);

impl SinkGw {
    pub fn new<G>(gw: G) -> Self
    where
        G: SensorSink + 'static,
    {
        Self(Box::new(gw))
    }
}

impl SensorSink for SinkGw {
    fn publish(&self, snapshot: &SensorSnapshot) -> Result<(), PublishError> {
        self.0.publish(snapshot)
    }
}
