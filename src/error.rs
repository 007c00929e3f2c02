//! Recoverable failures of field generation and queries.

use bevy::prelude::Vec2;
use thiserror::Error;

use crate::zones::{GeneratorError, ZoneId};

/// A query that cannot be answered at the given position.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum FieldError {
    /// No cell lies close enough to `position` to carry any weight.
    #[error("no zone covers {position}")]
    NoCoverage {
        /// Queried world position.
        position: Vec2,
    },
}

/// Generation aborted; no partial field is kept.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A configuration value is unusable.
    #[error("invalid field config: {0}")]
    InvalidConfig(&'static str),
    /// The biome registry is empty or every weight is zero.
    #[error("no biome can be selected")]
    NoBiomes,
    /// A biome carries unusable parameters.
    #[error("biome `{biome}` is invalid: {reason}")]
    InvalidBiome {
        /// Biome tag.
        biome: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Not a single hex fits inside the land bounds.
    #[error("land bounds fit no hex")]
    EmptyMesh,
    /// A zone generator reported a failure.
    #[error("generator of biome `{biome}` failed on {zone}")]
    Generator {
        /// Zone being generated.
        zone: ZoneId,
        /// Biome tag.
        biome: String,
        /// Generator's own error.
        #[source]
        source: GeneratorError,
    },
    /// A zone generator returned the wrong number of heights.
    #[error("generator of biome `{biome}` returned {actual} heights for {expected} cells of {zone}")]
    GeneratorOutput {
        /// Zone being generated.
        zone: ZoneId,
        /// Biome tag.
        biome: String,
        /// Cells in the zone.
        expected: usize,
        /// Heights returned.
        actual: usize,
    },
}
