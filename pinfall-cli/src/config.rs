use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Overwrites the fields of `$config` with the parsed values of the given environment
/// variables. Variables that are unset or fail to parse are ignored.
macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    match value.parse() {
                        Ok(value) => $config.$name = value,
                        Err(_) => log::warn!("Ignoring invalid value for {}: {}", $key, value),
                    }
                }
            }
        )*
    }};
}

/// The file loaded when no config file is given explicitly.
pub const DEFAULT_PATH: &str = "pinfall.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The directory all league records are stored in.
    pub data_dir: PathBuf,
    pub loglevel: LevelFilter,
    /// The number of lanes used when assigning lanes.
    pub default_lanes: u32,
    /// The length of a single match when generating a schedule.
    pub match_minutes: u32,
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read_to_string(path)?;

        Self::from_toml(&buf)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads the config at `path`. Without an explicit `path` the [`DEFAULT_PATH`] is used if
    /// it exists and the default config otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_PATH).exists() => Self::from_file(DEFAULT_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn with_environment(mut self) -> Self {
        from_environment!(
            self,
            "PINFALL_DATA_DIR",
            data_dir,
            "PINFALL_LOGLEVEL",
            loglevel,
            "PINFALL_LANES",
            default_lanes,
            "PINFALL_MATCH_MINUTES",
            match_minutes,
        );

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("pinfall-data"),
            loglevel: LevelFilter::Info,
            default_lanes: 8,
            match_minutes: 45,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}
