// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The engine's tunable configuration points, collected on one struct
//! so a caller tunes the engine without forking any downstream crate.

use std::collections::HashMap;

use dbforensic_detectors::HealthWeights;
use dbforensic_graph::default_plural_overrides;

/// The ambient configuration surface the core owns: the irregular-plural
/// map for the naming heuristic, and health-score weights.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Singular→plural overrides fed to [`dbforensic_graph::inference::infer`]
    /// in addition to the built-in irregular-plural map.
    pub plural_overrides: HashMap<String, String>,
    pub health_weights: HealthWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            plural_overrides: default_plural_overrides(),
            health_weights: HealthWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_plural_override(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.plural_overrides.insert(singular.into(), plural.into());
        self
    }

    pub fn with_health_weights(mut self, weights: HealthWeights) -> Self {
        self.health_weights = weights;
        self
    }
}
