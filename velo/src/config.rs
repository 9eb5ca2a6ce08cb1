//! Настройки из TOML-файла; флаги командной строки имеют приоритет.
//!
//! ```toml
//! [pricing]
//! mode = "per-participant"   # auto | per-group | per-participant
//!
//! [analytics]
//! period_months = 3
//! occupancy_days = 30
//! ```

use anyhow::Context;
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use velolib::PricingMode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PricingChoice {
    /// По наличию секции `clients` в снимке.
    #[default]
    Auto,
    PerGroup,
    PerParticipant,
}

impl PricingChoice {
    /// `None` - оставить режим, выведенный при загрузке.
    pub fn mode(self) -> Option<PricingMode> {
        match self {
            PricingChoice::Auto => None,
            PricingChoice::PerGroup => Some(PricingMode::PerGroup),
            PricingChoice::PerParticipant => Some(PricingMode::PerParticipant),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub mode: PricingChoice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_period_months")]
    pub period_months: u32,
    #[serde(default = "default_occupancy_days")]
    pub occupancy_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            period_months: default_period_months(),
            occupancy_days: default_occupancy_days(),
        }
    }
}

fn default_period_months() -> u32 {
    1
}

fn default_occupancy_days() -> u32 {
    30
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Без пути - значения по умолчанию.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}
