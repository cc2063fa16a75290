use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{ContextCompat, Result, WrapErr};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const SERVER_URL_ENV: &str = "MELOS_SERVER_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogDestination {
    Console,
    File,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub enable: bool,
    pub destination: LogDestination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_url: String,
    /// Initial volume in percent.
    pub volume: u8,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:6969".into(),
            volume: 100,
            log: LogConfig {
                enable: true,
                destination: LogDestination::File,
            },
        }
    }
}

impl Config {
    /// Reads the config file, creating it with defaults on first run.
    /// `MELOS_SERVER_URL` overrides the file's server address.
    pub fn load() -> Result<Self> {
        let path = default_path()?;
        let mut config = Self::read(&path)?;

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            config.server_url = url;
        }
        config.server_url = config.server_url.trim_end_matches('/').into();

        Ok(config)
    }

    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.write(path)?;
            return Ok(config);
        }

        let bytes = fs::read(path)
            .wrap_err_with(|| format!("could not open {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .wrap_err_with(|| format!("could not parse {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json)
            .wrap_err_with(|| format!("could not write {}", path.display()))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "melos")
        .context("could not resolve a home directory")
}

fn default_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn log_file_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("melos.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::read(&path).unwrap();
        assert_eq!(config.server_url, "http://localhost:6969");
        assert_eq!(config.volume, 100);
        assert!(path.exists());

        // Second read parses the file that was just written.
        let reread = Config::read(&path).unwrap();
        assert_eq!(reread.server_url, config.server_url);
        assert_eq!(reread.log.destination, LogDestination::File);
    }

    #[test]
    fn round_trips_custom_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            server_url: "http://music.local:8080".into(),
            volume: 40,
            log: LogConfig {
                enable: false,
                destination: LogDestination::Both,
            },
        };
        config.write(&path).unwrap();

        let reread = Config::read(&path).unwrap();
        assert_eq!(reread.server_url, "http://music.local:8080");
        assert_eq!(reread.volume, 40);
        assert!(!reread.log.enable);
        assert_eq!(reread.log.destination, LogDestination::Both);
    }

    #[test]
    fn rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(Config::read(&path).is_err());
    }
}
