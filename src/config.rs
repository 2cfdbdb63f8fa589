use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::host::HostError;
use crate::model::Address;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "Voting.toml";

/// Application configuration, loaded from a TOML file such as `Voting.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    admin: Address,
    #[serde(default = "default_state_path")]
    state_path: PathBuf,
    #[serde(default = "default_log_config")]
    log_config: PathBuf,
}

impl Config {
    /// Read and parse the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Identity that deploys a fresh registry, and so becomes its owner.
    /// Ignored once a snapshot exists, since the owner never changes.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Where the registry snapshot is persisted.
    /// Configured via `state_path`, default `voting-state.json`.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// The log4rs configuration file.
    /// Configured via `log_config`, default `log4rs.yaml`.
    pub fn log_config(&self) -> &Path {
        &self.log_config
    }
}

fn default_state_path() -> PathBuf {
    PathBuf::from("voting-state.json")
}

fn default_log_config() -> PathBuf {
    PathBuf::from("log4rs.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let admin = Address::derive("owner");
        let config: Config = toml::from_str(&format!("admin = \"{admin}\"")).unwrap();
        assert_eq!(config.admin(), admin);
        assert_eq!(config.state_path(), Path::new("voting-state.json"));
        assert_eq!(config.log_config(), Path::new("log4rs.yaml"));
    }

    #[test]
    fn explicit_values() {
        let text = "admin = \"0x0000000000000000000000000000000000000001\"\n\
                    state_path = \"/var/lib/voting/state.json\"\n\
                    log_config = \"/etc/voting/log4rs.yaml\"\n";
        let config: Config = toml::from_str(text).unwrap();
        let mut bytes = [0; 20];
        bytes[19] = 1;
        assert_eq!(config.admin(), Address::new(bytes));
        assert_eq!(config.state_path(), Path::new("/var/lib/voting/state.json"));
        assert_eq!(config.log_config(), Path::new("/etc/voting/log4rs.yaml"));
    }

    #[test]
    fn rejects_bad_config() {
        // Missing admin.
        toml::from_str::<Config>("state_path = \"x.json\"").unwrap_err();
        // Malformed admin.
        toml::from_str::<Config>("admin = \"0x12\"").unwrap_err();
        // Typo in a key.
        let admin = Address::derive("owner");
        toml::from_str::<Config>(&format!("admin = \"{admin}\"\nstate_pth = \"x\"")).unwrap_err();
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Config::load("definitely/not/here.toml"),
            Err(HostError::Io(_))
        ));
    }
}
