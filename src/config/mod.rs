use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Overrides the configuration directory (tests, containers).
pub const HOME_ENV: &str = "GEOATTEND_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_radius")]
    pub default_radius_m: i64,
    #[serde(default = "default_link_ttl_hours")]
    pub link_ttl_hours: i64,
    #[serde(default = "default_storage_timeout_ms")]
    pub storage_timeout_ms: u64,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_radius() -> i64 {
    50
}
fn default_link_ttl_hours() -> i64 {
    24
}
fn default_storage_timeout_ms() -> u64 {
    5000
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            default_radius_m: default_radius(),
            link_ttl_hours: default_link_ttl_hours(),
            storage_timeout_ms: default_storage_timeout_ms(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Return the configuration directory (`$GEOATTEND_HOME`, else `~/.geoattend`)
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(HOME_ENV)
            && !dir.trim().is_empty()
        {
            return PathBuf::from(dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".geoattend")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("geoattend.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("geoattend.sqlite")
    }

    /// Load configuration from the default file, or defaults if it does not exist
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize the configuration directory, config file and database path.
    ///
    /// In test mode the config file is left untouched.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided (relative to the config dir) or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = Config::parse("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.default_radius_m, 50);
        assert_eq!(cfg.link_ttl_hours, 24);
        assert_eq!(cfg.storage_timeout_ms, 5000);
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            Config::parse("default_radius_m: [oops"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn absent_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.conf")).unwrap();
        assert_eq!(cfg.default_radius_m, 50);
    }

    #[test]
    fn yaml_round_trip() {
        let cfg = Config {
            database: "/data/att.sqlite".into(),
            default_radius_m: 120,
            link_ttl_hours: 6,
            storage_timeout_ms: 2500,
            log_filter: "debug".into(),
        };
        let back = Config::parse(&cfg.to_yaml().unwrap()).unwrap();
        assert_eq!(back.default_radius_m, 120);
        assert_eq!(back.link_ttl_hours, 6);
        assert_eq!(back.database, "/data/att.sqlite");
    }
}
