//! Zone field: mesh growth over the land bounds, zone carving, and
//! Shepard-blended height/influence queries.

mod assign;
mod mesh;
mod spatial;
mod systems;
mod zone_field;

pub use spatial::KdTree;
pub use zone_field::ZoneField;

use bevy::prelude::*;

use crate::error::GenerationError;
use crate::grid::MAX_RADIUS;
use crate::math::SmoothingKernel;
use crate::zones::BiomeRegistry;

/// Field generation and query parameters.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct FieldConfig {
    /// World region the mesh must fit inside.
    pub land_bounds: Rect,
    /// Hex side length (center to corner).
    pub hex_side: f32,
    /// Rings of the backing grid around the origin.
    pub grid_radius: u32,
    /// Cells farther than this from a query point carry no weight.
    pub search_radius: f32,
    /// Shape of the Shepard falloff.
    pub kernel: SmoothingKernel,
    /// Slack for hex corners lying on the land boundary.
    pub vertex_epsilon: f32,
    /// Seed for biome and zone size draws.
    pub seed: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            land_bounds: Rect::new(-500.0, -500.0, 500.0, 500.0),
            hex_side: 10.0,
            grid_radius: 40,
            search_radius: 25.0,
            kernel: SmoothingKernel::default(),
            vertex_epsilon: 1e-3,
            seed: 42,
        }
    }
}

impl FieldConfig {
    /// Rejects values generation cannot work with.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !(self.hex_side.is_finite() && self.hex_side > 0.0) {
            return Err(GenerationError::InvalidConfig("hex side must be positive"));
        }
        if !(self.search_radius.is_finite() && self.search_radius > 0.0) {
            return Err(GenerationError::InvalidConfig("search radius must be positive"));
        }
        if !(self.vertex_epsilon.is_finite() && self.vertex_epsilon >= 0.0) {
            return Err(GenerationError::InvalidConfig("vertex epsilon must not be negative"));
        }
        if self.grid_radius > MAX_RADIUS {
            return Err(GenerationError::InvalidConfig("grid radius exceeds the supported maximum"));
        }
        let size = self.land_bounds.size();
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(GenerationError::InvalidConfig("land bounds must have an area"));
        }
        Ok(())
    }
}

/// Builds a [`ZoneField`] at startup from the given config and biomes.
pub struct ZoneFieldPlugin(pub FieldConfig, pub BiomeRegistry);

impl Plugin for ZoneFieldPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<FieldConfig>()
            .register_type::<SmoothingKernel>()
            .insert_resource(self.0.clone())
            .insert_resource(self.1.clone())
            .add_systems(Startup, systems::generate_zone_field);
    }
}
