#![warn(missing_docs)]
//! Hex-grid zone fields.
//!
//! Grows a pointy-top hex mesh with shared edge/vertex topology over a
//! bounded region, carves it into biome zones, and answers continuous
//! height and zone-influence queries by Shepard blending of nearby cells.

pub mod cluster;
pub mod error;
pub mod field;
pub mod grid;
pub mod heights;
pub mod influence;
pub mod math;
pub mod zones;

pub use error::{FieldError, GenerationError};
pub use field::{FieldConfig, ZoneField, ZoneFieldPlugin};
