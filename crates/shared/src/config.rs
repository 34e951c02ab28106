//! Application configuration management.

use serde::Deserialize;

use crate::types::Amount;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Guardian dispute-sweep configuration.
    #[serde(default)]
    pub guardian: GuardianConfig,
}

/// Configuration for the Guardian dispute sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct GuardianConfig {
    /// Whether the sweep runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Seconds between sweep ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    /// Disputed orders with a total strictly below this are auto-refunded.
    #[serde(default = "default_auto_resolve_threshold")]
    pub auto_resolve_threshold: Amount,
    /// Open disputes older than this many days are escalated.
    #[serde(default = "default_escalation_window")]
    pub escalation_window_days: i64,
}

fn default_enabled() -> bool {
    true
}

fn default_tick_interval() -> u64 {
    30
}

fn default_auto_resolve_threshold() -> Amount {
    50_000
}

fn default_escalation_window() -> i64 {
    7
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            tick_interval_secs: default_tick_interval(),
            auto_resolve_threshold: default_auto_resolve_threshold(),
            escalation_window_days: default_escalation_window(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources are layered: `config/default`, then `config/{RUN_MODE}`,
    /// then `DOMPET__`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DOMPET").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
