//! Configuration file for tree construction.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::policy::Collision;

/// Struct for deserializing from a config TOML
#[derive(Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct TreeConfig {
    /// What happens to the stored values when a key is inserted again.
    pub collision: Collision,
}

impl TreeConfig {
    /// Read a config TOML and generate a [`TreeConfig`] struct
    pub fn read_toml(path: &Path) -> Result<TreeConfig, Error> {
        let mut file = File::open(path)?;
        let mut config_toml = String::new();
        file.read_to_string(&mut config_toml)?;
        let config = TreeConfig::from_toml_str(&config_toml)?;
        debug!(path = %path.display(), collision = ?config.collision, "loaded tree config");
        Ok(config)
    }

    /// Parse a [`TreeConfig`] from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(config_toml: &str) -> Result<TreeConfig, Error> {
        Ok(toml::from_str(config_toml)?)
    }
}

/// Config parse error
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Toml(toml::de::Error),
}

impl Error {
    pub fn line_col(&self) -> Option<(u32, u16)> {
        match self {
            Error::Io(_) => None,
            Error::Toml(toml) => toml.line_col().map(|(l, c)| (l as u32 + 1, c as u16 + 1)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "could not read config: {}", err),
            Error::Toml(err) => write!(f, "invalid config: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Toml(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Error {
        Error::Toml(err)
    }
}
