//! Expired refresh token sweep configuration

use serde::{Deserialize, Serialize};

/// Configuration for the periodic expired-token sweep
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SweepConfig {
    /// Whether the background sweep runs at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Cron-like schedule: `@hourly`, `@daily`, `@midnight`, `@weekly`,
    /// `@every 30m`, or `M H * * *`
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            schedule: default_schedule(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_schedule() -> String {
    String::from("@daily")
}
