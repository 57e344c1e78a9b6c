//! Server configuration.
//!
//! Everything has a default; environment variables override:
//!
//! | Variable              | Default                  |
//! |-----------------------|--------------------------|
//! | `SHOWTIME_BIND`       | `127.0.0.1:3000`         |
//! | `SHOWTIME_DATA`       | `showtime_library.json`  |
//! | `SHOWTIME_KEY`        | `showtime-planner`       |
//! | `SHOWTIME_STATIC_DIR` | `static`                 |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::library::{DEFAULT_KEY, StoreConfig};
use crate::planner::PlannerSettings;

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Upper bounds applied to settings that arrive over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_results: usize,
    pub max_beam_width: usize,
    /// Largest showtime count the server will plan over.
    pub max_events: usize,
    pub max_leeway_mins: u32,
    pub max_travel_mins: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_results: 100,
            max_beam_width: 1000,
            max_events: 2000,
            max_leeway_mins: 60,
            max_travel_mins: 240,
        }
    }
}

impl Limits {
    /// Bound `settings` to these limits.
    pub fn clamp(&self, settings: PlannerSettings) -> PlannerSettings {
        PlannerSettings {
            trailer_leeway_mins: settings.trailer_leeway_mins.min(self.max_leeway_mins),
            travel_mins: settings.travel_mins.min(self.max_travel_mins),
            max_results: settings.max_results.min(self.max_results),
            beam_width: settings.beam_width.min(self.max_beam_width),
            transition_rule: settings.transition_rule,
        }
    }
}

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub store: StoreConfig,
    pub static_dir: PathBuf,
    pub limits: Limits,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("SHOWTIME_BIND") {
            config.bind = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "SHOWTIME_BIND",
                value,
            })?;
        }
        if let Some(path) = lookup("SHOWTIME_DATA") {
            config.store.path = PathBuf::from(path);
        }
        if let Some(key) = lookup("SHOWTIME_KEY").filter(|k| !k.trim().is_empty()) {
            config.store.key = key;
        }
        if let Some(dir) = lookup("SHOWTIME_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            store: StoreConfig::default().with_key(DEFAULT_KEY),
            static_dir: PathBuf::from("static"),
            limits: Limits::default(),
        }
    }
}
