//! # Configuration
//!
//! The connection parameters every task accepts, parsed by clap from the task's
//! own argument list.
//!
//! | Flag | Alias | Default |
//! |------|-------|---------|
//! | `--help` | | off |
//! | `--host` | `-h` | `localhost` |
//! | `--port` | `-p` | `1717` |
//! | `--username` | `-u` | `admin` |
//! | `--password` | | none (prompted) |
//! | `--environment` | `-e` | empty |
//! | `--prefs` | | none |
//!
//! `-h` is taken by `--host`, so the command that flattens these flags must
//! disable clap's generated help flag (see [`crate::resolve::parse_args`]).
//!
//! A `Configuration` is built once per process, then changed only by the
//! credential resolver and by the login retry loop overwriting the password.

use crate::prefs::Preferences;
use crate::secret::Secret;
use crate::session::ConnectParams;
use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1717;
pub const DEFAULT_USERNAME: &str = "admin";

/// Login attempts a task gets unless it asks for something else.
pub const DEFAULT_LOGIN_ATTEMPTS: u32 = 3;

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    #[arg(long = "help", hide = true)]
    pub help: bool,

    /// The hostname where the service is located
    #[arg(short = 'h', long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// The port on which the service is listening
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The username with which to connect
    #[arg(short, long, default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// The password
    #[arg(long, hide = true)]
    pub password: Option<Secret>,

    /// The environment of the service to use
    #[arg(short, long, default_value_t)]
    pub environment: String,

    /// Path to a client preferences file
    #[arg(long = "prefs", value_name = "PATH")]
    pub prefs: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            help: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: DEFAULT_USERNAME.to_string(),
            password: None,
            environment: String::new(),
            prefs: None,
        }
    }
}

impl Configuration {
    /// Overwrite every connection parameter with the values from `prefs`,
    /// including ones given explicitly as flags.
    pub fn apply_preferences(&mut self, prefs: &Preferences) {
        self.host = prefs.host.clone();
        self.port = prefs.port;
        self.username = prefs.username.clone();
        self.password = prefs.password.clone();
        self.environment = prefs.environment.clone();
    }

    pub fn has_password(&self) -> bool {
        self.password.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn params(&self) -> ConnectParams<'_> {
        ConnectParams {
            host: &self.host,
            port: self.port,
            username: &self.username,
            password: self.password.as_ref().map(Secret::expose).unwrap_or(""),
            environment: &self.environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Preferences {
        Preferences {
            host: "db.internal".to_string(),
            port: 2828,
            username: "ops".to_string(),
            password: Some(Secret::new("s3cret")),
            environment: "staging".to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1717);
        assert_eq!(config.username, "admin");
        assert!(config.password.is_none());
        assert_eq!(config.environment, "");
        assert!(!config.help);
    }

    #[test]
    fn test_apply_preferences_overwrites_everything() {
        let mut config = Configuration {
            host: "flag-host".to_string(),
            port: 9999,
            username: "flag-user".to_string(),
            password: Some(Secret::new("flag-pass")),
            environment: "flag-env".to_string(),
            ..Configuration::default()
        };
        config.apply_preferences(&prefs());

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 2828);
        assert_eq!(config.username, "ops");
        assert_eq!(config.password, Some(Secret::new("s3cret")));
        assert_eq!(config.environment, "staging");
    }

    #[test]
    fn test_empty_password_counts_as_missing() {
        let config = Configuration {
            password: Some(Secret::new("")),
            ..Configuration::default()
        };
        assert!(!config.has_password());
    }

    #[test]
    fn test_params_borrow_current_values() {
        let config = Configuration {
            password: Some(Secret::new("admin")),
            ..Configuration::default()
        };
        let params = config.params();
        assert_eq!(params.host, "localhost");
        assert_eq!(params.port, 1717);
        assert_eq!(params.password, "admin");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Configuration {
            password: Some(Secret::new("topsecret")),
            ..Configuration::default()
        };
        assert!(!format!("{:?}", config).contains("topsecret"));
    }
}
