use crate::{
    config::{self, Config},
    gateways,
    recurring_update::{self, ScheduledSensor},
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use geoaddr_core::{
    entities::*,
    usecases::{format_address, lookup_address, AddressResolver},
};
use geoaddr_gateways::vworld::VWorld;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long, env = "GEOADDR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Keep all configured sensors up to date (default).
    Run,

    /// Update every sensor once and print its state.
    Once,

    /// Resolve the address of a single position.
    Lookup {
        /// Position as "latitude,longitude".
        #[arg(allow_hyphen_values = true)]
        point: Coordinate,

        /// Address fields of the display string.
        #[arg(long, default_value = FieldSelection::DEFAULT)]
        options: FieldSelection,

        /// Use the first instead of the last candidate of the preferred type.
        #[arg(long)]
        first_match: bool,

        /// Overrides the API key of the configuration.
        #[arg(long, env = "VWORLD_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Validate the configuration and exit.
    CheckConfig,
}

pub fn run() -> Result<()> {
    let Cli { config, command } = Cli::parse();
    let cfg = Config::try_load_from_file_or_default(config)?;
    match command.unwrap_or(Command::Run) {
        Command::Run => run_sensors(cfg),
        Command::Once => update_once(cfg),
        Command::Lookup {
            point,
            options,
            first_match,
            api_key,
        } => {
            let api_key = api_key
                .or_else(|| cfg.vworld.api_key.clone())
                .context("Missing VWorld API key")?;
            let selection = if first_match {
                CandidateSelection::FirstMatch
            } else {
                CandidateSelection::LastMatch
            };
            let geocoder = gateways::geocoding_gateway(&cfg.vworld, &api_key)?;
            let record = lookup_address(&geocoder, &point, selection)
                .with_context(|| format!("Unable to resolve the address of {point}"))?;
            println!("{}", format_address(&record, &options));
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Command::CheckConfig => {
            log::info!("Configuration is valid: {} sensor(s)", cfg.sensors.len());
            for sensor in &cfg.sensors {
                let settings = &sensor.settings;
                println!(
                    "{}: {} [{}] every {:?}",
                    settings.name, settings.origin, settings.options, sensor.scan_interval
                );
            }
            Ok(())
        }
    }
}

fn scheduled_sensors(cfg: &Config) -> Result<Vec<ScheduledSensor<VWorld>>> {
    if cfg.sensors.is_empty() {
        bail!("No sensors configured");
    }
    cfg.sensors
        .iter()
        .map(|sensor| {
            let config::Sensor {
                settings,
                api_key,
                scan_interval,
            } = sensor;
            let geocoder = gateways::geocoding_gateway(&cfg.vworld, api_key)?;
            let resolver = AddressResolver::new(settings.clone());
            Ok(ScheduledSensor::new(resolver, geocoder, *scan_interval))
        })
        .collect()
}

fn run_sensors(cfg: Config) -> Result<()> {
    let sensors = scheduled_sensors(&cfg)?;
    let locations = gateways::location_source(cfg.home_assistant.as_ref())?;
    let sink = gateways::sensor_sink(&cfg.publish, cfg.home_assistant.as_ref())?;
    recurring_update::run(sensors, &locations, &sink);
    Ok(())
}

fn update_once(cfg: Config) -> Result<()> {
    let mut sensors = scheduled_sensors(&cfg)?;
    let locations = gateways::location_source(cfg.home_assistant.as_ref())?;
    let sink = gateways::sensor_sink(&cfg.publish, cfg.home_assistant.as_ref())?;
    for sensor in &mut sensors {
        let outcome = sensor.update_and_publish(&locations, &sink);
        log::debug!("{}: {outcome:?}", sensor.resolver().name());
        let snapshot = sensor.resolver().snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}
