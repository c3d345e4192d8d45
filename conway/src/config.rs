// config.rs - File-backed simulation settings

use std::fs;
use std::num::NonZeroU32;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Palette;
use crate::driver::{InitialCondition, SimOptions};
use crate::error::{ConfigError, EngineError};
use crate::patterns::Pattern;
use crate::rules::RuleTable;
use crate::seed;
use crate::share;

/// Settings as written by hand in a JSON file. Missing fields fall back to
/// their defaults; everything is validated by [`SimConfig::to_options`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width        : usize,
    pub height       : usize,
    pub fill_percent : f64,
    pub delay        : u32,
    pub seed         : Option<u64>,
    pub rules        : RuleTable,        // nine base-4 digits
    pub colors       : Option<String>,   // share hex, young/old/trail/dead
    pub pattern      : Option<String>,   // overrides the random fill
    pub start_paused : bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            fill_percent: 50.0,
            delay: 1,
            seed: None,
            rules: RuleTable::conway(),
            colors: None,
            pattern: None,
            start_paused: false,
        }
    }
}

impl SimConfig {
    pub fn load_from_disk(path: &Path) -> Result<Self, EngineError> {
        let data = fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        log::info!("loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn to_options(&self) -> Result<SimOptions, ConfigError> {
        let palette = match &self.colors {
            Some(hex) => share::decode_palette(hex)?,
            None => Palette::default(),
        };
        let delay = NonZeroU32::new(self.delay).ok_or(ConfigError::ZeroDelay)?;
        let initial = match &self.pattern {
            Some(name) => InitialCondition::Pattern(Pattern::find(name)?),
            None => InitialCondition::Random {
                probability: seed::fill_probability(self.fill_percent)?,
            },
        };

        Ok(SimOptions {
            width: self.width,
            height: self.height,
            rules: self.rules,
            palette,
            delay,
            initial,
            seed: self.seed,
            start_paused: self.start_paused,
        })
    }
}
