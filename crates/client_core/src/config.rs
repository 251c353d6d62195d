use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::api::DEFAULT_API_URL;

pub const SETTINGS_FILE: &str = "blog_client.toml";
const DATA_DIR_NAME: &str = "blog_client";

/// Settings as read from file and environment, before the data dir is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            data_dir: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_url: Option<String>,
    data_dir: Option<PathBuf>,
}

/// Fully resolved settings the client runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
    pub data_dir: PathBuf,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the TOML file at `path` if it parses, then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_url {
                    settings.api_url = v;
                }
                if let Some(v) = file_cfg.data_dir {
                    settings.data_dir = Some(v);
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}")
            }
        }
    }

    let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("BLOG_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = non_empty("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = non_empty("BLOG_DATA_DIR") {
        settings.data_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = non_empty("APP__DATA_DIR") {
        settings.data_dir = Some(PathBuf::from(v));
    }

    settings
}

impl Settings {
    pub fn with_overrides(mut self, api_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Some(v) = api_url {
            self.api_url = v;
        }
        if let Some(v) = data_dir {
            self.data_dir = Some(v);
        }
        self
    }

    /// Picks the per-user data directory when none was configured.
    pub fn resolve(self) -> anyhow::Result<ClientSettings> {
        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => dirs::data_local_dir()
                .ok_or_else(|| anyhow!("unable to resolve local app data dir"))?
                .join(DATA_DIR_NAME),
        };
        fs::create_dir_all(&data_dir).with_context(|| {
            format!("failed to create data directory '{}'", data_dir.display())
        })?;
        Ok(ClientSettings {
            api_url: self.api_url,
            data_dir,
        })
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
