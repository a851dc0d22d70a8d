//! Server configuration: an optional JSON file plus environment overrides.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use broadside_core::constants::TICK_RATE;
use broadside_sim::SimConfig;

/// Names a JSON config file.
pub const CONFIG_ENV: &str = "BROADSIDE_CONFIG";
/// Overrides `sim.seed`.
pub const SEED_ENV: &str = "BROADSIDE_SEED";
/// Overrides `tick_rate`.
pub const TICK_RATE_ENV: &str = "BROADSIDE_TICK_RATE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Nominal ticks per second.
    pub tick_rate: u32,
    pub sim: SimConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            sim: SimConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        let file = std::env::var_os(CONFIG_ENV);
        let seed = std::env::var(SEED_ENV).ok();
        let tick_rate = std::env::var(TICK_RATE_ENV).ok();
        Self::from_sources(file.as_deref().map(Path::new), seed.as_deref(), tick_rate.as_deref())
    }

    /// Defaults, then the file (if any), then the string overrides.
    pub fn from_sources(file: Option<&Path>, seed: Option<&str>, tick_rate: Option<&str>) -> Result<Self> {
        let mut config = match file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Some(seed) = seed {
            config.sim.seed = seed
                .trim()
                .parse()
                .with_context(|| format!("{SEED_ENV}={seed:?} is not an unsigned integer"))?;
        }
        if let Some(rate) = tick_rate {
            config.tick_rate = rate
                .trim()
                .parse()
                .with_context(|| format!("{TICK_RATE_ENV}={rate:?} is not an unsigned integer"))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.tick_rate > 0, "tick_rate must be positive");
        ensure!(
            self.sim.max_frame_scale.is_finite() && self.sim.max_frame_scale > 0.0,
            "sim.max_frame_scale must be a positive number"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_sources() {
        let config = ServerConfig::from_sources(None, None, None).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.tick_rate, 30);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ServerConfig::from_json(r#"{"sim":{"seed":9,"bot_count_max":6}}"#).unwrap();
        assert_eq!(config.sim.seed, 9);
        assert_eq!(config.sim.bot_count_max, 6);
        assert_eq!(config.sim.bot_count_min, SimConfig::default().bot_count_min);
        assert_eq!(config.tick_rate, TICK_RATE);
    }

    #[test]
    fn env_strings_override() {
        let config = ServerConfig::from_sources(None, Some("1234"), Some(" 60 ")).unwrap();
        assert_eq!(config.sim.seed, 1234);
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(ServerConfig::from_sources(None, Some("abc"), None).is_err());
        assert!(ServerConfig::from_sources(None, None, Some("0")).is_err());
        let err = ServerConfig::from_sources(Some(Path::new("/nonexistent/broadside.json")), None, None)
            .unwrap_err();
        assert!(format!("{err:#}").contains("reading config file"));
    }
}
