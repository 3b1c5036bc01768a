use std::path::Path;

use config_file::{ConfigFileError, FromConfigFile};
use serde::Deserialize;

use crate::Error;

pub const CONFIG_PATH: &str = "./work_config.toml";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: "172.29.94.203".into(),
            port: 20023,
        }
    }
}

impl ClientConfig {
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SinkConfig {
    pub bind: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            bind: "0.0.0.0:20023".into(),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub sink: SinkConfig,
}

impl Config {
    /// Loads `path`, falling back to the built-in target when the file is absent.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        match Config::from_config_file(path.as_ref()) {
            Ok(v) => Ok(v),
            Err(ConfigFileError::FileAccess(e)) => {
                tracing::info!(
                    "no config at {} ({e}), using the built-in target",
                    path.as_ref().display()
                );
                Ok(Config::default())
            }
            Err(e) => Err(Error::Config(e)),
        }
    }
}
