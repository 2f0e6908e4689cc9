use crate::device::{DEFAULT_PRODUCT_ID, DEFAULT_VENDOR_ID};
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    #[serde(default = "default_product_id")]
    pub product_id: u16,
    /// Readings below this many pounds are never recorded.
    #[serde(default = "default_min_weight_lb")]
    pub min_weight_lb: f64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default = "default_weigh_timeout_secs")]
    pub weigh_timeout_secs: u64,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_vendor_id() -> u16 {
    DEFAULT_VENDOR_ID
}
fn default_product_id() -> u16 {
    DEFAULT_PRODUCT_ID
}
fn default_min_weight_lb() -> f64 {
    0.11
}
fn default_poll_interval_ms() -> u64 {
    200
}
fn default_channel_capacity() -> usize {
    64
}
fn default_weigh_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
            min_weight_lb: default_min_weight_lb(),
            poll_interval_ms: default_poll_interval_ms(),
            channel_capacity: default_channel_capacity(),
            weigh_timeout_secs: default_weigh_timeout_secs(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.scalelog`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".scalelog")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("scalelog.conf")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("scalelog.sqlite")
    }

    /// Resolve a `--db` argument: `~/` is expanded and relative names live in
    /// the config directory.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Parse a YAML document; missing fields fall back to defaults.
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let mut cfg: Config = serde_yaml::from_str(content)?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_yaml(&content)
        } else {
            Ok(Config::default())
        }
    }

    /// Create the config directory, the config file (unless `is_test`) and an
    /// empty database file. Returns the resolved database path.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => Self::resolve_db_path(name),
            None => Self::database_file(),
        };

        if !is_test {
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(self.min_weight_lb.is_finite() && self.min_weight_lb >= 0.0) {
            return Err(AppError::Config(format!(
                "min_weight_lb must be a non-negative number, got {}",
                self.min_weight_lb
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(AppError::Config("poll_interval_ms must be > 0".into()));
        }
        if self.channel_capacity == 0 {
            return Err(AppError::Config("channel_capacity must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = Config::from_yaml("{}").unwrap();
        assert_eq!(cfg.vendor_id, 0x0922);
        assert_eq!(cfg.product_id, 0x8009);
        assert_eq!(cfg.min_weight_lb, 0.11);
        assert_eq!(cfg.poll_interval_ms, 200);
        assert_eq!(cfg.channel_capacity, 64);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_given_fields() {
        let cfg = Config::from_yaml("database: /tmp/pantry.sqlite\nmin_weight_lb: 0.5\n").unwrap();
        assert_eq!(cfg.database, "/tmp/pantry.sqlite");
        assert_eq!(cfg.min_weight_lb, 0.5);
        assert_eq!(cfg.weigh_timeout_secs, 10);
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let cfg = Config {
            poll_interval_ms: 0,
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            Config::from_yaml("vendor_id: [not, a, number]"),
            Err(AppError::ConfigParse(_))
        ));
    }
}
