//! # Preferences Files
//!
//! A preferences file stores a complete set of connection parameters so a user
//! does not have to pass them (or type a password) on every run:
//!
//! ```toml
//! host = "db.internal"
//! port = 1717
//! username = "admin"
//! password = "admin"
//! environment = ""
//! ```
//!
//! Missing keys fall back to the flag defaults. A file given with `--prefs`
//! replaces every flag value. Tooling may also look for the conventional
//! per-user file returned by [`Preferences::home_path`].

use crate::config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_USERNAME};
use crate::error::{GatehouseError, Result};
use crate::secret::Secret;
use directories::BaseDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Preferences {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: Option<Secret>,
    pub environment: String,
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<Secret>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(Secret::from))
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: DEFAULT_USERNAME.to_string(),
            password: None,
            environment: String::new(),
        }
    }
}

impl Preferences {
    /// Load a preferences file. A missing or malformed file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| GatehouseError::Preferences {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|message| GatehouseError::Preferences {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.message().to_string())
    }

    /// `~/<app>_client.prefs`, if a home directory can be determined.
    pub fn home_path(app: &str) -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(format!("{}_client.prefs", app)))
    }

    /// Load the per-user file when it exists. Unlike [`Preferences::load`], a
    /// missing file is not an error.
    pub fn load_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_full_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "client.prefs",
            "host = \"db.internal\"\nport = 2828\nusername = \"ops\"\npassword = \"pw\"\nenvironment = \"staging\"\n",
        );

        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.host, "db.internal");
        assert_eq!(prefs.port, 2828);
        assert_eq!(prefs.username, "ops");
        assert_eq!(prefs.password, Some(Secret::new("pw")));
        assert_eq!(prefs.environment, "staging");
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "client.prefs", "port = 1818\n");

        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.host, "localhost");
        assert_eq!(prefs.port, 1818);
        assert_eq!(prefs.username, "admin");
        assert!(prefs.password.is_none());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Preferences::load(dir.path().join("nope.prefs")).unwrap_err();
        assert!(matches!(err, GatehouseError::Preferences { .. }));
        assert!(err.to_string().contains("nope.prefs"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.prefs", "port = \"not a number\"\n");
        let err = Preferences::load(&path).unwrap_err();
        assert!(matches!(err, GatehouseError::Preferences { .. }));
    }

    #[test]
    fn test_unknown_key_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "typo.prefs", "hots = \"x\"\n");
        assert!(Preferences::load(&path).is_err());
    }

    #[test]
    fn test_load_if_exists_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Preferences::load_if_exists(dir.path().join("absent.prefs")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_home_path_file_name() {
        if let Some(path) = Preferences::home_path("gatehouse") {
            assert!(path.ends_with("gatehouse_client.prefs"));
        }
    }
}
