use anyhow::{anyhow, bail, Context, Result};
use geoaddr_core::{entities::*, usecases::ResolverSettings};
use geoaddr_gateways::vworld::DEFAULT_BASE_URL as DEFAULT_VWORLD_BASE_URL;
use std::{
    collections::HashSet,
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "geoaddr.toml";

const ENV_NAME_VWORLD_API_KEY: &str = "VWORLD_API_KEY";
const ENV_NAME_HASS_URL: &str = "HASS_URL";
const ENV_NAME_HASS_TOKEN: &str = "HASS_TOKEN";

const DEFAULT_SENSOR_NAME: &str = "Vworld Geocode";
const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Config {
    pub vworld: VWorld,
    pub home_assistant: Option<HomeAssistant>,
    pub publish: Publish,
    pub sensors: Vec<Sensor>,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let mut raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)
                .with_context(|| format!("Invalid configuration file {}", file_path.display()))?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        apply_env_overrides(&mut raw_config);
        Self::try_from(raw_config)
    }
}

fn apply_env_overrides(cfg: &mut raw::Config) {
    if let Ok(api_key) = env::var(ENV_NAME_VWORLD_API_KEY) {
        cfg.vworld.get_or_insert_with(Default::default).api_key = Some(api_key);
    }
    if let Ok(url) = env::var(ENV_NAME_HASS_URL) {
        cfg.home_assistant
            .get_or_insert_with(Default::default)
            .base_url = Some(url);
    }
    if let Ok(token) = env::var(ENV_NAME_HASS_TOKEN) {
        cfg.home_assistant.get_or_insert_with(Default::default).token = Some(token);
    }
}

pub struct VWorld {
    /// Fallback for sensors without their own key.
    pub api_key: Option<String>,
    pub base_url: Url,
    pub timeout: Duration,
}

pub struct HomeAssistant {
    pub base_url: Url,
    pub token: String,
    pub timeout: Duration,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Publish {
    Log,
    /// For local testing purposes
    JsonFile {
        /// File system directory for the sensor states.
        dir: PathBuf,
    },
    HomeAssistant,
}

pub struct Sensor {
    pub settings: ResolverSettings,
    pub api_key: String,
    pub scan_interval: Duration,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            vworld,
            home_assistant,
            publish,
            sensors,
        } = from;

        let raw::VWorld {
            api_key,
            base_url,
            timeout,
        } = vworld.unwrap_or_default();
        let base_url = base_url
            .as_deref()
            .unwrap_or(DEFAULT_VWORLD_BASE_URL)
            .parse::<Url>()
            .context("Invalid VWorld base URL")?;
        let vworld = VWorld {
            api_key,
            base_url,
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        };

        let home_assistant = match home_assistant {
            Some(raw::HomeAssistant {
                base_url: Some(base_url),
                token: Some(token),
                timeout,
            }) => Some(HomeAssistant {
                base_url: base_url
                    .parse::<Url>()
                    .context("Invalid Home Assistant base URL")?,
                token,
                timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            }),
            Some(raw::HomeAssistant {
                base_url: None,
                token: None,
                ..
            })
            | None => None,
            Some(_) => bail!("Home Assistant requires both a base URL and an access token"),
        };

        let raw::Publish { sink, dir } = publish.unwrap_or_default();
        let publish = match sink.unwrap_or(raw::Sink::Log) {
            raw::Sink::Log => Publish::Log,
            raw::Sink::JsonFile => {
                let dir = dir.ok_or_else(|| anyhow!("Missing 'dir' of the JSON file sink"))?;
                log::info!("Use JSON file sink ({})", dir.display());
                Publish::JsonFile { dir }
            }
            raw::Sink::HomeAssistant => {
                if home_assistant.is_none() {
                    bail!("Publishing to Home Assistant requires a Home Assistant connection");
                }
                Publish::HomeAssistant
            }
        };

        let sensors = sensors
            .into_iter()
            .map(|sensor| {
                let fallback_key = vworld.api_key.as_deref();
                sensor_from_raw(sensor, fallback_key, home_assistant.is_some())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut names = HashSet::new();
        if let Some(sensor) = sensors
            .iter()
            .find(|sensor| !names.insert(sensor.settings.name.to_lowercase()))
        {
            bail!("Duplicate sensor name '{}'", sensor.settings.name);
        }

        Ok(Self {
            vworld,
            home_assistant,
            publish,
            sensors,
        })
    }
}

fn sensor_from_raw(
    from: raw::Sensor,
    fallback_api_key: Option<&str>,
    has_location_source: bool,
) -> Result<Sensor> {
    let raw::Sensor {
        name,
        origin,
        api_key,
        options,
        display_zone,
        gravatar,
        scan_interval,
        candidate_selection,
    } = from;
    let name = name.unwrap_or_else(|| DEFAULT_SENSOR_NAME.to_owned());

    let origin: Origin = origin
        .parse()
        .with_context(|| format!("Invalid origin of sensor '{name}'"))?;
    if matches!(origin, Origin::Entity(_)) && !has_location_source {
        bail!("Sensor '{name}' tracks an entity but no Home Assistant connection is configured");
    }
    let api_key = api_key
        .or_else(|| fallback_api_key.map(ToOwned::to_owned))
        .ok_or_else(|| anyhow!("Missing VWorld API key for sensor '{name}'"))?;
    let options = options
        .as_deref()
        .unwrap_or(FieldSelection::DEFAULT)
        .parse::<FieldSelection>()
        .with_context(|| format!("Invalid options of sensor '{name}'"))?;
    let display_zone = display_zone
        .map(|s| s.parse::<DisplayZone>())
        .transpose()
        .map_err(|_| anyhow!("Invalid display zone of sensor '{name}'"))?
        .unwrap_or_default();
    let candidate_selection = candidate_selection
        .map(|s| s.parse::<CandidateSelection>())
        .transpose()
        .map_err(|_| anyhow!("Invalid candidate selection of sensor '{name}'"))?
        .unwrap_or_default();

    let scan_interval = scan_interval.unwrap_or(DEFAULT_SCAN_INTERVAL);
    if scan_interval.is_zero() {
        bail!("Scan interval of sensor '{name}' must be greater than zero");
    }

    Ok(Sensor {
        settings: ResolverSettings {
            name,
            origin,
            options,
            display_zone,
            candidate_selection,
            gravatar,
        },
        api_key,
        scan_interval,
    })
}
