//! Tunable constants for the distance model and the solver.
//!
//! Loaded from a JSON file; every field falls back to its default, so a
//! config only needs to name what it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "SORAMIMI_ALIGN_CONFIG";

/// Half-width of the candidate-length window tried for each segment.
pub const DEFAULT_WINDOW: usize = 5;

/// Weighting of the vowel/consonant edit-distance model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceConfig {
    /// Multiplier on the vowel-sequence edit distance
    pub vowel_weight: f64,
    /// Multiplier on the consonant-sequence edit distance
    pub consonant_weight: f64,
    /// Subtracted when both sequences are non-empty and identical
    pub exact_match_bonus: f64,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            vowel_weight: 1.0,
            consonant_weight: 1.0,
            exact_match_bonus: 0.0,
        }
    }
}

impl DistanceConfig {
    /// Plain weights with a small bonus so an identical span strictly
    /// outranks a zero-distance but non-identical one.
    pub fn biased() -> Self {
        Self {
            exact_match_bonus: 0.01,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("vowel_weight", self.vowel_weight),
            ("consonant_weight", self.consonant_weight),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AlignError::config(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }
        if !self.exact_match_bonus.is_finite() || self.exact_match_bonus < 0.0 {
            return Err(AlignError::config(format!(
                "exact_match_bonus must be a non-negative finite number, got {}",
                self.exact_match_bonus
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Max difference between a segment's own length and its span length
    pub window: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

/// Full alignment configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub distance: DistanceConfig,
    pub solver: SolverConfig,
}

impl AlignConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignError::io("reading config", e))?;
        let config: Self =
            serde_json::from_str(&data).map_err(|e| AlignError::json("parsing config", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the active config.
    ///
    /// An explicit path wins, then `SORAMIMI_ALIGN_CONFIG`, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));
        match path {
            Some(p) => {
                log::info!("Loading config: {}", p.display());
                Self::from_path(&p)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.distance.validate()
    }
}
