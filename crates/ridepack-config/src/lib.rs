use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Simple configuration for ridepack
///
/// Every packing policy number lives here so call sites never carry inline
/// literals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// ± band around a requested playlist duration, in percent.
    #[serde(default = "default_tolerance_pct")]
    pub tolerance_pct: u8,

    /// Slack above remaining time the recommender may overbook, in percent.
    #[serde(default = "default_overbook_pct")]
    pub overbook_pct: u8,

    #[serde(default)]
    pub mastery: MasteryConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Watch-count thresholds for difficulty bumping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryConfig {
    #[serde(default = "default_first_bump_at")]
    pub first_bump_at: u32,

    #[serde(default = "default_second_bump_at")]
    pub second_bump_at: u32,
}

/// Accepted playlist request durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_min_request_sec")]
    pub min_request_sec: i64,

    #[serde(default = "default_max_request_sec")]
    pub max_request_sec: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance_pct: default_tolerance_pct(),
            overbook_pct: default_overbook_pct(),
            mastery: MasteryConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            first_bump_at: default_first_bump_at(),
            second_bump_at: default_second_bump_at(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_request_sec: default_min_request_sec(),
            max_request_sec: default_max_request_sec(),
        }
    }
}

fn default_tolerance_pct() -> u8 {
    7
}

fn default_overbook_pct() -> u8 {
    3
}

fn default_first_bump_at() -> u32 {
    3
}

fn default_second_bump_at() -> u32 {
    8
}

fn default_min_request_sec() -> i64 {
    300
}

fn default_max_request_sec() -> i64 {
    3600
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "ridepack", "ridepack") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.ridepack/config.toml")
        }
    }
}
