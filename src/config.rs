//! Configuration for the dashboards and the exporter.
//!
//! Every setting has a default, so the program runs from a checkout with no configuration at
//! all. An optional JSON file can override any of them. Relative paths in that file are resolved
//! against the directory the file lives in; the defaults are relative to the working directory.

use crate::error::{ErrorType, IntoResult, Re};
use crate::model::SystemType;
use crate::utils;
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const NATIONAL_CSV: &str = "data/acap/solar_waste_aus.csv";
const STATE_CSV: &str = "data/acap/solar_waste_by_state.csv";
const EXPORT_HTML: &str = "output/solar_waste_combo.html";
const BIND: &str = "127.0.0.1:8050";
const DEFAULT_REGION: &str = "Australia";
const CONFIG_VERSION: u8 = 1;

/// The resolved settings for one run of the program.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    national_csv: PathBuf,
    state_csv: PathBuf,
    export_path: PathBuf,
    bind: SocketAddr,
    default_region: String,
    default_system: SystemType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            national_csv: PathBuf::from(NATIONAL_CSV),
            state_csv: PathBuf::from(STATE_CSV),
            export_path: PathBuf::from(EXPORT_HTML),
            bind: default_bind(),
            default_region: DEFAULT_REGION.to_string(),
            default_system: SystemType::SmallScale,
        }
    }
}

impl Config {
    /// Loads `path` when given, otherwise returns the defaults.
    ///
    /// # Errors
    /// `ErrorType::Config` if the file is missing, unreadable or holds an invalid value.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_inner(path).await.pub_result(ErrorType::Config)
    }

    async fn load_inner(path: Option<&Path>) -> Re<Self> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                if !path.is_file() {
                    bail!("The config file is missing '{}'", path.display())
                }
                let config_file: ConfigFile = utils::deserialize(path).await?;
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                Self::from_file(config_file, base)
            }
        }
    }

    fn from_file(file: ConfigFile, base: &Path) -> Re<Self> {
        if let Some(version) = file.config_version {
            if version != CONFIG_VERSION {
                bail!("Unsupported config_version {version}, expected {CONFIG_VERSION}");
            }
        }
        let defaults = Self::default();
        let resolve = |p: Option<PathBuf>, default: PathBuf| match p {
            Some(p) if p.is_relative() => base.join(p),
            Some(p) => p,
            None => default,
        };
        let bind = match file.bind {
            Some(s) => s
                .parse()
                .with_context(|| format!("Invalid bind address '{s}' in config file"))?,
            None => defaults.bind,
        };
        Ok(Self {
            national_csv: resolve(file.national_csv, defaults.national_csv),
            state_csv: resolve(file.state_csv, defaults.state_csv),
            export_path: resolve(file.export_path, defaults.export_path),
            bind,
            default_region: file.default_region.unwrap_or(defaults.default_region),
            default_system: file.default_system.unwrap_or(defaults.default_system),
        })
    }

    pub fn national_csv(&self) -> &Path {
        &self.national_csv
    }

    pub fn state_csv(&self) -> &Path {
        &self.state_csv
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub fn bind(&self) -> SocketAddr {
        self.bind
    }

    /// The region selected when a page first loads.
    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    /// The system type selected when a page first loads.
    pub fn default_system(&self) -> SystemType {
        self.default_system
    }

    pub fn with_national_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.national_csv = path.into();
        self
    }

    pub fn with_state_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_csv = path.into();
        self
    }

    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }
}

fn default_bind() -> SocketAddr {
    BIND.parse().unwrap_or_else(|_| ([127, 0, 0, 1], 8050).into())
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "config_version": 1,
///   "national_csv": "data/acap/solar_waste_aus.csv",
///   "state_csv": "data/acap/solar_waste_by_state.csv",
///   "export_path": "output/solar_waste_combo.html",
///   "bind": "0.0.0.0:8050",
///   "default_region": "Australia",
///   "default_system": "Small-Scale"
/// }
/// ```
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config_version: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    national_csv: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state_csv: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    export_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_system: Option<SystemType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_defaults() {
        let config = Config::load(None).await.unwrap();
        assert_eq!(config.national_csv(), Path::new(NATIONAL_CSV));
        assert_eq!(config.state_csv(), Path::new(STATE_CSV));
        assert_eq!(config.export_path(), Path::new(EXPORT_HTML));
        assert_eq!(config.bind().port(), 8050);
        assert_eq!(config.default_region(), "Australia");
        assert_eq!(config.default_system(), SystemType::SmallScale);
    }

    #[tokio::test]
    async fn test_load_file_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "config_version": 1,
                "national_csv": "in/national.csv",
                "state_csv": "/abs/states.csv",
                "bind": "0.0.0.0:9000",
                "default_system": "Large-Scale"
            }"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).await.unwrap();
        assert_eq!(config.national_csv(), dir.path().join("in/national.csv"));
        assert_eq!(config.state_csv(), Path::new("/abs/states.csv"));
        assert_eq!(config.export_path(), Path::new(EXPORT_HTML));
        assert_eq!(config.bind(), "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.default_region(), "Australia");
        assert_eq!(config.default_system(), SystemType::LargeScale);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.json")))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("missing"), "{err}");
    }

    #[tokio::test]
    async fn test_load_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{ "bind": "localhost" }"#).unwrap();
        assert!(Config::load(Some(&path)).await.is_err());

        std::fs::write(&path, r#"{ "config_version": 7 }"#).unwrap();
        assert!(Config::load(Some(&path)).await.is_err());

        std::fs::write(&path, r#"{ "colour": "blue" }"#).unwrap();
        assert!(Config::load(Some(&path)).await.is_err());
    }
}
