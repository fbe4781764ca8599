use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use types::{default_version, GameVersion};

use crate::error::StatsError;

/// Read-layer settings. `highscore_results` has no default: deployments must
/// choose how many top race times a map reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    pub database_url: Option<String>,
    pub highscore_results: usize,
    pub request_timeout_ms: Option<u64>,
    pub game_version: Option<String>,
}

/// The YAML layout, where every key may be left to the command line.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    database_url: Option<String>,
    highscore_results: Option<usize>,
    request_timeout_ms: Option<u64>,
    game_version: Option<String>,
}

impl StatsConfig {
    pub fn new(highscore_results: usize) -> Self {
        Self {
            database_url: None,
            highscore_results,
            request_timeout_ms: None,
            game_version: None,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, StatsError> {
        Self::from_cli_or_yaml(None, Some(yaml))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, StatsError> {
        Self::from_cli_or_yaml_file(None, Some(path))
    }

    /// A command-line `highscore_results` wins over the YAML value; one of
    /// the two must supply it.
    pub fn from_cli_or_yaml(
        highscore_results: Option<usize>,
        yaml: Option<&str>,
    ) -> Result<Self, StatsError> {
        let file: ConfigFile = match yaml {
            Some(yaml) => serde_yaml::from_str(yaml)?,
            None => ConfigFile::default(),
        };
        let highscore_results = highscore_results
            .or(file.highscore_results)
            .ok_or_else(|| {
                StatsError::Config(
                    "highscore_results must be set in the config file or with --highscore-results"
                        .to_string(),
                )
            })?;
        Ok(Self {
            database_url: file.database_url,
            highscore_results,
            request_timeout_ms: file.request_timeout_ms,
            game_version: file.game_version,
        })
    }

    pub fn from_cli_or_yaml_file(
        highscore_results: Option<usize>,
        path: Option<&Path>,
    ) -> Result<Self, StatsError> {
        let contents = path.map(std::fs::read_to_string).transpose()?;
        Self::from_cli_or_yaml(highscore_results, contents.as_deref())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn game_version(&self) -> Result<&'static GameVersion, StatsError> {
        match &self.game_version {
            None => Ok(default_version()),
            Some(name) => GameVersion::by_name(name)
                .ok_or_else(|| StatsError::Config(format!("unknown game version {name:?}"))),
        }
    }
}
