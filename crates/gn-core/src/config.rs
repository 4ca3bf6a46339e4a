//! Session configuration, read from TOML.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! num_choices = 5
//! decay_factor = 0.85
//!
//! [phrases]
//! go = "geh"
//! left = "links"
//! # ...every phrase key is required once the table is present
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    DECAY_FACTOR, DELAY_NUMERATOR_MS, SHAKE_THRESHOLD, STOP_THRESHOLD, UPDATE_FREQUENCY_MS,
};
use crate::direction::ChoiceCount;
use crate::error::{GravError, Result};
use crate::phrase::Phrasebook;
use crate::scheduler::{DecayScheduler, SchedulerTuning};
use crate::shake::ShakeDetector;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GravConfig {
    pub num_choices: ChoiceCount,
    pub shake_threshold: f64,
    pub stop_threshold: f64,
    pub decay_factor: f64,
    pub update_frequency_ms: u64,
    pub delay_numerator_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrases: Option<Phrasebook>,
}

impl Default for GravConfig {
    fn default() -> Self {
        Self {
            num_choices: ChoiceCount::default(),
            shake_threshold: SHAKE_THRESHOLD,
            stop_threshold: STOP_THRESHOLD,
            decay_factor: DECAY_FACTOR,
            update_frequency_ms: UPDATE_FREQUENCY_MS,
            delay_numerator_ms: DELAY_NUMERATOR_MS,
            phrases: None,
        }
    }
}

impl GravConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| GravError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| GravError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("shake_threshold", self.shake_threshold),
            ("stop_threshold", self.stop_threshold),
            ("delay_numerator_ms", self.delay_numerator_ms),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GravError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(GravError::Config(format!(
                "decay_factor must be in (0, 1), got {}",
                self.decay_factor
            )));
        }

        // A fresh shake has to start above the stop threshold, or the first
        // tick would stop immediately.
        if self.stop_threshold >= self.shake_threshold {
            return Err(GravError::Config(format!(
                "stop_threshold ({}) must be below shake_threshold ({})",
                self.stop_threshold, self.shake_threshold
            )));
        }

        if let Some(phrases) = &self.phrases {
            phrases.validate()?;
        }
        Ok(())
    }

    pub fn tuning(&self) -> SchedulerTuning {
        SchedulerTuning {
            stop_threshold: self.stop_threshold,
            decay_factor: self.decay_factor,
            delay_numerator_ms: self.delay_numerator_ms,
        }
    }

    pub fn phrasebook(&self) -> Phrasebook {
        self.phrases.clone().unwrap_or_default()
    }

    pub fn detector(&self) -> ShakeDetector {
        ShakeDetector::new(self.shake_threshold, self.update_frequency_ms)
    }

    pub fn scheduler(&self) -> DecayScheduler<Phrasebook> {
        DecayScheduler::with_phrases(self.num_choices, self.tuning(), self.phrasebook())
    }
}
