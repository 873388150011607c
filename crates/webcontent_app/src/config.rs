use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use webcontent_core::SessionConfig;
use webcontent_engine::FetchSettings;

pub const DEFAULT_CONFIG_FILENAME: &str = "webcontent.ron";

/// Settings read from a RON file. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub word_counter_url: String,
    pub every_nth_url: String,
    pub nth: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        let fetch = FetchSettings::default();
        Self {
            word_counter_url: session.word_counter_url,
            every_nth_url: session.every_nth_url,
            nth: session.nth,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            redirect_limit: fetch.redirect_limit,
            max_bytes: fetch.max_bytes,
            allowed_content_types: fetch.allowed_content_types,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            word_counter_url: self.word_counter_url.clone(),
            every_nth_url: self.every_nth_url.clone(),
            nth: self.nth,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            allowed_content_types: self.allowed_content_types.clone(),
        }
    }

    pub fn log_level(&self) -> anyhow::Result<LevelFilter> {
        self.log_level
            .parse()
            .with_context(|| format!("invalid log_level {:?}", self.log_level))
    }
}

/// Reads the config file at `path`, or `webcontent.ron` in the working
/// directory when no path is given. `Ok(None)` means there was no file.
pub fn load(path: Option<&Path>) -> anyhow::Result<Option<(PathBuf, AppConfig)>> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {}", path.display()))
        }
    };
    let config: AppConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(Some((path, config)))
}
