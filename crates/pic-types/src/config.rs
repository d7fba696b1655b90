// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PicError, PicResult};
use crate::geometry::GeometryMode;

/// Top-level particle engine configuration (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub geometry: GeometryMode,
    /// Particles per tile before a new tile is opened.
    #[serde(default = "default_tile_capacity")]
    pub tile_capacity: usize,
    /// Number of AMR levels that can hold particles.
    #[serde(default = "default_levels")]
    pub levels: usize,
    /// Rank id stamped into the cpu half of every particle idcpu.
    #[serde(default)]
    pub rank: u32,
    pub species: Vec<SpeciesConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    /// Runtime real components registered at construction, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_real_comps: Vec<String>,
    /// Runtime integer components registered at construction, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_int_comps: Vec<String>,
}

impl SpeciesConfig {
    pub fn new(name: impl Into<String>) -> Self {
        SpeciesConfig {
            name: name.into(),
            extra_real_comps: Vec::new(),
            extra_int_comps: Vec::new(),
        }
    }

    pub fn with_real_comps<I, S>(mut self, comps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_real_comps
            .extend(comps.into_iter().map(Into::into));
        self
    }
}

fn default_tile_capacity() -> usize {
    256
}
fn default_levels() -> usize {
    1
}

impl EngineConfig {
    pub fn new(geometry: GeometryMode, species: Vec<SpeciesConfig>) -> Self {
        EngineConfig {
            geometry,
            tile_capacity: default_tile_capacity(),
            levels: default_levels(),
            rank: 0,
            species,
        }
    }

    /// Load from JSON file and validate.
    pub fn from_file(path: &str) -> PicResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse and validate. An unrecognised geometry name is a configuration
    /// error rather than a JSON error.
    pub fn from_json(contents: &str) -> PicResult<Self> {
        let raw: serde_json::Value = serde_json::from_str(contents)?;
        if let Some(name) = raw.get("geometry").and_then(serde_json::Value::as_str) {
            name.parse::<GeometryMode>()?;
        }
        let config: Self = serde_json::from_value(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PicResult<()> {
        if self.tile_capacity == 0 {
            return Err(PicError::ConfigError(
                "tile_capacity must be >= 1".to_string(),
            ));
        }
        if self.levels == 0 {
            return Err(PicError::ConfigError("levels must be >= 1".to_string()));
        }
        // idcpu keeps 24 bits for the cpu.
        if self.rank >= (1 << 24) {
            return Err(PicError::ConfigError(format!(
                "rank {} does not fit in 24 bits",
                self.rank
            )));
        }
        let mut seen = HashSet::new();
        for species in &self.species {
            if species.name.is_empty() {
                return Err(PicError::ConfigError(
                    "species name must be non-empty".to_string(),
                ));
            }
            if !seen.insert(species.name.as_str()) {
                return Err(PicError::ConfigError(format!(
                    "duplicate species name: {}",
                    species.name
                )));
            }
        }
        Ok(())
    }
}
