use bevy::log::{debug, info};
use hexx::Hex;
use rand::Rng;

use crate::cluster::Cluster;
use crate::error::GenerationError;
use crate::influence::Influence;
use crate::zones::{BiomeRegistry, CellSite, GeneratorError, Zone, ZoneGrid, ZoneId};

/// Checks that `biomes` can drive zone assignment.
pub(super) fn validate_biomes(biomes: &BiomeRegistry) -> Result<(), GenerationError> {
    for (_, biome) in biomes.iter() {
        let invalid = |reason| GenerationError::InvalidBiome {
            biome: biome.name.clone(),
            reason,
        };
        if *biome.zone_size.start() == 0 || biome.zone_size.is_empty() {
            return Err(invalid("zone size range must be non-empty and start at 1 or more"));
        }
        if !(biome.weight.is_finite() && biome.weight >= 0.0) {
            return Err(invalid("weight must be finite and not negative"));
        }
    }
    if !biomes.iter().any(|(_, b)| b.weight > 0.0) {
        return Err(GenerationError::NoBiomes);
    }
    Ok(())
}

/// Carves every materialized cell into zones.
///
/// Seeds are taken in arena order from cells still unassigned. Each zone
/// draws a biome and a target size, then flood-fills over unassigned cells
/// until the target is met or the region runs out. The biome generator runs
/// once per zone with all of its cells.
pub(super) fn assign_zones(
    grid: &mut ZoneGrid,
    biomes: &BiomeRegistry,
    rng: &mut impl Rng,
) -> Result<Vec<Zone>, GenerationError> {
    let mut zones = Vec::new();
    let mut cursor = 0;

    while cursor < grid.cells().len() {
        let seed = grid.holder_at(cursor);
        if seed.payload().zone.is_valid() {
            cursor += 1;
            continue;
        }
        let seed = seed.hex();

        let biome_id = biomes.pick(rng).ok_or(GenerationError::NoBiomes)?;
        let biome = biomes.get(biome_id).ok_or(GenerationError::NoBiomes)?;
        let target = rng.random_range(biome.zone_size.clone());
        let members: Vec<Hex> = grid
            .flood_fill(seed, |c| !c.payload().zone.is_valid())
            .take(target)
            .collect();

        let zone = ZoneId(zones.len() as u32);
        let sites: Vec<CellSite> = members
            .iter()
            .map(|&hex| CellSite {
                hex,
                center: grid.hex_center(hex),
            })
            .collect();
        let heights = biome
            .generator
            .generate(zone, &sites)
            .map_err(|source| GenerationError::Generator {
                zone,
                biome: biome.name.clone(),
                source,
            })?;
        if heights.len() != sites.len() {
            return Err(GenerationError::GeneratorOutput {
                zone,
                biome: biome.name.clone(),
                expected: sites.len(),
                actual: heights.len(),
            });
        }
        if let Some(bad) = heights.iter().find(|h| !h.is_finite()) {
            return Err(GenerationError::Generator {
                zone,
                biome: biome.name.clone(),
                source: GeneratorError::new(format!("non-finite height {bad}")),
            });
        }

        let name = format!("{}#{}", biome.name, zone.0);
        let mut cluster = Cluster::for_grid(name.clone(), grid);
        for (&hex, height) in members.iter().zip(heights) {
            let bounds = grid.metrics().hex_bounds(hex);
            let cell = grid.get_mut(hex);
            cell.zone = zone;
            cell.biome = Some(biome_id);
            cell.desired_height = height;
            cell.heights = biome.layers.heights_at(height);
            cell.bounds = bounds;
            cluster.add(hex);
        }
        debug!(
            "{zone} `{name}` seeded at {seed:?}: {} of {target} cells",
            members.len()
        );
        zones.push(Zone {
            id: zone,
            name,
            biome: biome_id,
            cluster,
            influence: Influence::single(zone),
        });
    }

    info!("{} zones carved from {} cells", zones.len(), grid.cells().len());
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldConfig;
    use crate::field::mesh;
    use crate::zones::{Biome, FlatGenerator, FnGenerator};
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid() -> ZoneGrid {
        let cfg = FieldConfig {
            land_bounds: Rect::new(-80.0, -80.0, 80.0, 80.0),
            grid_radius: 8,
            ..default()
        };
        mesh::grow(&cfg).unwrap()
    }

    fn flat(name: &str, sizes: std::ops::RangeInclusive<usize>) -> Biome {
        Biome::new(name, FlatGenerator { height: 2.0 }).with_zone_size(sizes)
    }

    #[test]
    fn every_cell_gets_exactly_one_zone() {
        let mut grid = grid();
        let biomes = BiomeRegistry::default().with(flat("a", 3..=6)).with(flat("b", 1..=2));
        let zones = assign_zones(&mut grid, &biomes, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert!(grid.cells().iter().all(|c| c.payload().zone.is_valid()));
        let total: usize = zones.iter().map(|z| z.cluster().len()).sum();
        assert_eq!(total, grid.cells().len());
        for zone in &zones {
            assert!(zone.cluster().is_connected(), "{} is split", zone.name());
            assert!(zone.cluster().len() <= 6);
            for hex in zone.cluster().iter() {
                assert_eq!(grid.get(hex).zone, zone.id());
            }
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let biomes = BiomeRegistry::default().with(flat("a", 2..=9)).with(flat("b", 4..=5));
        let run = |seed| {
            let mut grid = grid();
            assign_zones(&mut grid, &biomes, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            grid.cells().iter().map(|c| c.payload().zone).collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn short_generator_output_is_rejected() {
        let empty = FnGenerator(|_: ZoneId, _: &[CellSite]| -> Result<Vec<f32>, GeneratorError> {
            Ok(Vec::new())
        });
        let biomes = BiomeRegistry::default().with(Biome::new("short", empty).with_zone_size(1..=1));
        let err = assign_zones(&mut grid(), &biomes, &mut ChaCha8Rng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::GeneratorOutput { zone: ZoneId(0), expected: 1, actual: 0, .. }
        ));
    }

    #[test]
    fn generator_error_carries_source() {
        let failing = FnGenerator(|_: ZoneId, _: &[CellSite]| -> Result<Vec<f32>, GeneratorError> {
            Err(GeneratorError::new("boom"))
        });
        let biomes = BiomeRegistry::default().with(Biome::new("bad", failing));
        let err = assign_zones(&mut grid(), &biomes, &mut ChaCha8Rng::seed_from_u64(1)).unwrap_err();
        match err {
            GenerationError::Generator { zone, biome, source } => {
                assert_eq!(zone, ZoneId(0));
                assert_eq!(biome, "bad");
                assert_eq!(source.reason, "boom");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn biome_validation() {
        assert!(matches!(
            validate_biomes(&BiomeRegistry::default()),
            Err(GenerationError::NoBiomes)
        ));
        #[allow(clippy::reversed_empty_ranges)]
        let empty_range = flat("x", 5..=2);
        for bad in [flat("x", 0..=3), empty_range, flat("x", 1..=2).with_weight(f32::NAN)] {
            let reg = BiomeRegistry::default().with(bad);
            assert!(matches!(validate_biomes(&reg), Err(GenerationError::InvalidBiome { .. })));
        }
        let zero = BiomeRegistry::default().with(flat("x", 1..=2).with_weight(0.0));
        assert!(matches!(validate_biomes(&zero), Err(GenerationError::NoBiomes)));
    }
}
