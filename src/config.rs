use crate::store::DEFAULT_STORAGE_KEY;
use crate::views::DEFAULT_RECENT_LIMIT;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User settings, read from `config.yml`. Every field is optional in the file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the snapshot; overrides project/global lookup.
    pub data_dir: Option<PathBuf>,
    /// Key the whole state is stored under.
    pub storage_key: String,
    /// How many notes the recent list shows.
    pub recent_limit: usize,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            log_level: None,
        }
    }
}

impl Config {
    /// Loads `path` if given, else the per-user config file. A missing file
    /// yields defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
        Config::parse(&data).with_context(|| format!("parsing config {:?}", path))
    }

    pub fn parse(data: &str) -> Result<Config> {
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(data)?;
        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "notefold").map(|dirs| dirs.config_dir().join("config.yml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempdir().unwrap();
        let config = Config::load(Some(&tmp.path().join("nope.yml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage_key, "notes-app-state");
        assert_eq!(config.recent_limit, 5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::parse("recent_limit: 3\ndata_dir: /tmp/notes\n").unwrap();
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/notes")));
        assert_eq!(config.storage_key, "notes-app-state");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yml");
        fs::write(&path, "recent_limit: [not, a, number]").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing config"));
    }
}
