use bevy::prelude::*;

use super::{FieldConfig, ZoneField};
use crate::zones::BiomeRegistry;

/// Startup: generates the field and inserts it as a resource.
///
/// On failure nothing is inserted and the error is logged.
pub fn generate_zone_field(
    mut commands: Commands,
    config: Res<FieldConfig>,
    biomes: Res<BiomeRegistry>,
) {
    match ZoneField::generate(&config, &biomes) {
        Ok(field) => commands.insert_resource(field),
        Err(err) => error!("zone field generation failed: {err}"),
    }
}
