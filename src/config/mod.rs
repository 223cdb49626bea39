// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Log level
    pub log_level: String,

    /// Camera location labels, indexed by camera number.
    /// Index 0 is the primary feed; any other index maps to the secondary.
    pub locations: Vec<String>,

    /// Simulator configuration
    pub simulator: SimulatorConfig,

    /// Live feed configuration
    pub feed: FeedConfig,

    /// Incident reporting configuration
    pub incident: IncidentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "RiverGuard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            locations: vec![
                "Yamuna River, Delhi".to_string(),
                "Hooghly River, Kolkata".to_string(),
            ],
            simulator: SimulatorConfig::default(),
            feed: FeedConfig::default(),
            incident: IncidentConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            // Create parent directories
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("riverguard"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Detection simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Maximum detections per on-demand call
    pub max_per_call: u32,

    /// Maximum detections per frame for the frame-based detector
    pub max_per_frame: u32,

    /// Confidence floor
    pub confidence_floor: f64,

    /// Confidence span above the floor (exclusive upper bound)
    pub confidence_span: f64,

    /// Simulated model warm-up time in milliseconds
    pub model_warmup_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_per_call: 2,
            max_per_frame: 4,
            confidence_floor: 0.70,
            confidence_span: 0.29,
            model_warmup_ms: 2000,
        }
    }
}

/// Live feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Tick period for periodic detection in milliseconds
    pub tick_interval_ms: u64,

    /// Tick period for active (frame-based) detection in milliseconds
    pub active_tick_interval_ms: u64,

    /// Probability that a tick actually invokes the simulator
    pub tick_probability: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 3000,
            active_tick_interval_ms: 1000,
            tick_probability: 0.30,
        }
    }
}

/// Incident reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentConfig {
    /// Artificial submission delay in milliseconds
    pub submit_delay_ms: u64,
}

impl Default for IncidentConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 1500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let config = Config::default();

        assert_eq!(config.simulator.max_per_call, 2);
        assert_eq!(config.simulator.max_per_frame, 4);
        assert!((config.simulator.confidence_floor - 0.70).abs() < f64::EPSILON);
        assert!((config.simulator.confidence_span - 0.29).abs() < f64::EPSILON);
        assert_eq!(config.feed.tick_interval_ms, 3000);
        assert_eq!(config.feed.active_tick_interval_ms, 1000);
        assert_eq!(config.locations[0], "Yamuna River, Delhi");
        assert_eq!(config.locations[1], "Hooghly River, Kolkata");
    }

    #[test]
    fn toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.app_name, config.app_name);
        assert_eq!(parsed.locations, config.locations);
        assert_eq!(parsed.feed.tick_interval_ms, config.feed.tick_interval_ms);
    }
}
