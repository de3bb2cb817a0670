//! Application configuration. Backend URL, credentials, paths, tick period.

use serde::Deserialize;

/// Default reminder tick period in seconds: one wall-clock minute, matching
/// the alert granularity (dose times are `HH:MM`).
pub const DEFAULT_TICK_SECS: u64 = 60;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Backend base URL (e.g. `http://localhost:5000`). When unset, the
    /// in-memory mock backend is used. Read from MEDTRACK_BASE_URL.
    pub base_url: Option<String>,

    /// Login email for the backend session. Read from MEDTRACK_EMAIL.
    #[serde(default)]
    pub email: Option<String>,

    /// Login password. Read from MEDTRACK_PASSWORD.
    #[serde(default)]
    pub password: Option<String>,

    /// Data directory for local state (notification permission). Read from
    /// MEDTRACK_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Reminder tick period in seconds (default 60). Read from
    /// MEDTRACK_TICK_SECS.
    #[serde(default)]
    pub tick_secs: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("MEDTRACK"));
        if let Ok(path) = std::env::var("MEDTRACK_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the tick period in seconds. Defaults to 60 if unset or zero.
    pub fn tick_secs_or_default(&self) -> u64 {
        match self.tick_secs {
            Some(0) | None => DEFAULT_TICK_SECS,
            Some(n) => n,
        }
    }

    /// Returns the data directory. Defaults to `./data`.
    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    /// Returns true when login credentials are fully configured.
    pub fn is_login_configured(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_defaults_and_rejects_zero() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.tick_secs_or_default(), 60);

        let cfg = AppConfig {
            tick_secs: Some(0),
            ..AppConfig::default()
        };
        assert_eq!(cfg.tick_secs_or_default(), 60);

        let cfg = AppConfig {
            tick_secs: Some(5),
            ..AppConfig::default()
        };
        assert_eq!(cfg.tick_secs_or_default(), 5);
    }
}
