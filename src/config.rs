use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{Error, Result};

/// Where the config file is looked up when none is given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/birdstat.toml";

/// File in [Config::bird_directory] mapping protocol names to display names
pub const PROTOCOL_NAMES_FILE: &str = "protocols.json";

struct Defaults {}

impl Defaults {
    fn bird_socket() -> PathBuf {
        PathBuf::from("/run/bird/bird.ctl")
    }

    fn bird_directory() -> PathBuf {
        PathBuf::from("/etc/bird")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// bird control socket
    #[serde(default = "Defaults::bird_socket")]
    pub bird_socket: PathBuf,
    /// Directory holding bird's config, along with `protocols.json`
    #[serde(default = "Defaults::bird_directory")]
    pub bird_directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bird_socket: Defaults::bird_socket(),
            bird_directory: Defaults::bird_directory(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| config_error(path, e))?;
        let config = Self::from_toml(&contents).map_err(|e| config_error(path, e))?;
        log::debug!("Using config: {:?}", config);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Config, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Loads the config from `path`, or from [DEFAULT_CONFIG_PATH] if no
    /// path is given. A missing file at the default path isn't an error, and
    /// gives the default config.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::from_file(DEFAULT_CONFIG_PATH) {
                Err(Error::ConfigError { ref path, .. }) if !path.exists() => {
                    log::debug!("no config at {}, using defaults", DEFAULT_CONFIG_PATH);
                    Ok(Config::default())
                }
                result => result,
            },
        }
    }

    /// Path of the protocol names map
    pub fn protocol_names_path(&self) -> PathBuf {
        self.bird_directory.join(PROTOCOL_NAMES_FILE)
    }
}

fn config_error<E: ToString>(path: &Path, err: E) -> Error {
    Error::ConfigError {
        path: path.to_owned(),
        reason: err.to_string(),
    }
}
