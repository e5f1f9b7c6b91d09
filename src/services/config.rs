use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_STORE_SOURCE: &str = "./store";

fn default_interval() -> u64 {
    3
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub track: TrackSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreSection {
    pub source: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackSection {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl Default for TrackSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

pub fn load_config() -> anyhow::Result<ConfigFile> {
    let home = std::env::var("HOME")?;
    let path = PathBuf::from(home).join(".config/bustrack/config.toml");
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// CLI flag wins, then BUSTRACK_STORE, then the config file, then the
/// development default.
pub fn resolve_store_source(flag: Option<&str>, config: &ConfigFile) -> String {
    if let Some(source) = flag {
        return source.to_string();
    }
    if let Ok(source) = std::env::var("BUSTRACK_STORE") {
        if !source.is_empty() {
            return source;
        }
    }
    config
        .store
        .source
        .clone()
        .unwrap_or_else(|| DEFAULT_STORE_SOURCE.to_string())
}

pub fn resolve_api_key(config: &ConfigFile) -> Option<String> {
    std::env::var("BUSTRACK_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .or_else(|| config.store.api_key.clone())
}
