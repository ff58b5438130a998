//! Engine configuration
//!
//! Policy knobs for the extraction, diffing and history stages. Defaults
//! match the strictest reading of the model invariants: duplicate sibling
//! signatures are fatal and moved entities continue their history.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// What to do when two sibling entities share a structural signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Fail the file with `ModelError::DuplicateSignature`.
    #[default]
    Fail,
    /// Keep the first occurrence and record a warning diagnostic.
    KeepFirst,
}

/// Whether a moved entity continues its logical history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovePolicy {
    /// The moved entity keeps its identifier; its path is remapped.
    #[default]
    ContinueHistory,
    /// A move terminates the old record and starts a fresh identity.
    NewIdentity,
}

/// Configuration shared by all engine stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub duplicate_policy: DuplicatePolicy,
    pub move_policy: MovePolicy,

    /// Minimum combined similarity score for rename matching.
    pub similarity_threshold: f64,

    /// Weight of name similarity in the combined score.
    pub name_weight: f64,
    /// Weight of parameter-type overlap in the combined score.
    pub param_weight: f64,
    /// Weight of shared child-signature overlap for container entities.
    pub child_weight: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            move_policy: MovePolicy::default(),
            similarity_threshold: 0.6,
            name_weight: 0.5,
            param_weight: 0.25,
            child_weight: 0.25,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.similarity_threshold));
        }
        let weights = [self.name_weight, self.param_weight, self.child_weight];
        if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(ConfigError::InvalidWeights);
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::InvalidWeights);
        }
        Ok(())
    }
}
