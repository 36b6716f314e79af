use duration_str::deserialize_option_duration;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

const DEFAULT_CONFIG_FILE: &str = include_str!("geoaddr.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub vworld: Option<VWorld>,
    pub home_assistant: Option<HomeAssistant>,
    pub publish: Option<Publish>,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VWorld {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HomeAssistant {
    pub base_url: Option<String>,
    pub token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Publish {
    pub sink: Option<Sink>,
    pub dir: Option<PathBuf>,
}

impl Default for Publish {
    fn default() -> Self {
        Config::default().publish.expect("Publish configuration")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sink {
    Log,
    JsonFile,
    HomeAssistant,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Sensor {
    pub name: Option<String>,
    pub origin: String,
    pub api_key: Option<String>,
    pub options: Option<String>,
    pub display_zone: Option<String>,
    pub gravatar: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub scan_interval: Option<Duration>,
    pub candidate_selection: Option<String>,
}
