use bevy::prelude::*;
use hexx::{EdgeDirection, Hex};

use hex_zones::heights::Heights;
use hex_zones::influence::Influence;
use hex_zones::zones::{
    Biome, BiomeRegistry, CellSite, FlatGenerator, FnGenerator, GeneratorError, ZoneId,
    default_biomes,
};
use hex_zones::{FieldConfig, FieldError, GenerationError, ZoneField};

/// Radius-2 grid of side-10 hexes inside a 120×120 square.
fn small_config() -> FieldConfig {
    FieldConfig {
        land_bounds: Rect::new(-60.0, -60.0, 60.0, 60.0),
        hex_side: 10.0,
        grid_radius: 2,
        search_radius: 25.0,
        ..default()
    }
}

fn origin_low_others_high() -> BiomeRegistry {
    BiomeRegistry::default().with(
        Biome::new(
            "split",
            FnGenerator(|_: ZoneId, cells: &[CellSite]| -> Result<Vec<f32>, GeneratorError> {
                Ok(cells
                    .iter()
                    .map(|c| if c.hex == Hex::ZERO { 0.0 } else { 10.0 })
                    .collect())
            }),
        )
        .with_zone_size(1..=1),
    )
}

// ── End-to-end scenario ────────────────────────────────────────────

#[test]
fn single_zone_height_is_exact() {
    let biomes = BiomeRegistry::default()
        .with(Biome::new("flat", FlatGenerator { height: 4.0 }).with_zone_size(64..=64));
    let field = ZoneField::generate(&small_config(), &biomes).unwrap();
    assert_eq!(field.cells().len(), 19);
    assert_eq!(field.zones().len(), 1);
    assert_eq!(field.height_at(Vec2::new(5.0, 5.0)), Ok(4.0));
}

#[test]
fn competing_zone_pulls_height_between_the_two() {
    let field = ZoneField::generate(&small_config(), &origin_low_others_high()).unwrap();
    assert_eq!(field.zones().len(), 19);
    let h = field.height_at(Vec2::new(5.0, 5.0)).unwrap();
    assert!(h > 0.0 && h < 10.0, "height {h}");
}

#[test]
fn one_zone_in_range_dominates() {
    let config = FieldConfig {
        search_radius: 5.0,
        ..small_config()
    };
    let field = ZoneField::generate(&config, &origin_low_others_high()).unwrap();
    let influence = field.influence_at(Vec2::new(1.0, 1.0)).unwrap();
    assert_eq!(influence.len(), 1);
    let origin_zone = field.cell(Hex::ZERO).unwrap().zone;
    assert_eq!(influence.weight_of(origin_zone), 1.0);
    assert_eq!(field.height_at(Vec2::new(1.0, 1.0)), Ok(0.0));
}

#[test]
fn out_of_range_query_reports_no_coverage() {
    let field = ZoneField::generate(&small_config(), &origin_low_others_high()).unwrap();
    let far = Vec2::new(500.0, 500.0);
    assert_eq!(field.influence_at(far), Err(FieldError::NoCoverage { position: far }));
    assert_eq!(field.height_at(far), Err(FieldError::NoCoverage { position: far }));
}

// ── Generation properties ──────────────────────────────────────────

#[test]
fn every_cell_is_in_one_connected_zone() {
    let config = FieldConfig {
        land_bounds: Rect::new(-200.0, -150.0, 200.0, 150.0),
        grid_radius: 20,
        seed: 99,
        ..default()
    };
    let field = ZoneField::generate(&config, &default_biomes(99)).unwrap();
    let mut covered = 0;
    for zone in field.zones() {
        let cluster = zone.cluster();
        assert!(!cluster.is_empty());
        assert!(cluster.is_connected(), "{} is not connected", zone.name());
        covered += cluster.len();
    }
    assert_eq!(covered, field.cells().len());
    assert!(field.cells().iter().all(|c| c.payload().zone.is_valid()));
}

#[test]
fn shared_edges_match_across_neighbors() {
    let field = ZoneField::generate(&FieldConfig::default(), &default_biomes(1)).unwrap();
    let grid = field.grid();
    for holder in field.cells() {
        for dir in EdgeDirection::ALL_DIRECTIONS {
            if let Some(other) = grid.holder(holder.hex().neighbor(dir)) {
                assert_eq!(holder.edge(dir), other.edge(dir.const_neg()));
            }
        }
    }
}

#[test]
fn block_roundtrip_over_the_mesh() {
    let field = ZoneField::generate(&FieldConfig::default(), &default_biomes(1)).unwrap();
    let grid = field.grid();
    for holder in field.cells() {
        let block = grid.metrics().hex_center_block(holder.hex());
        assert_eq!(grid.block_to_hex(block), holder.hex());
    }
}

#[test]
fn generator_failure_aborts_generation() {
    let biomes = BiomeRegistry::default().with(Biome::new(
        "broken",
        FnGenerator(|zone: ZoneId, _: &[CellSite]| -> Result<Vec<f32>, GeneratorError> {
            Err(GeneratorError::new(format!("cannot shape {zone}")))
        }),
    ));
    let err = ZoneField::generate(&small_config(), &biomes).unwrap_err();
    assert!(matches!(err, GenerationError::Generator { zone: ZoneId(0), .. }));
    assert_eq!(
        std::error::Error::source(&err).map(ToString::to_string),
        Some("cannot shape zone#0".to_string())
    );
}

#[test]
fn same_seed_reproduces_the_layout() {
    let layout = || {
        let field = ZoneField::generate(&small_config(), &default_biomes(5)).unwrap();
        field
            .cells()
            .iter()
            .map(|c| (c.hex(), c.payload().zone, c.payload().desired_height))
            .collect::<Vec<_>>()
    };
    assert_eq!(layout(), layout());
}

// ── Value types ────────────────────────────────────────────────────

#[test]
fn heights_clamp_upward() {
    let h = Heights::new(0.0, 10.0, 5.0);
    assert_eq!((h.base(), h.underground(), h.main()), (5.0, 10.0, 10.0));
}

#[test]
fn influence_merges_and_normalizes() {
    let (a, b) = (ZoneId(0), ZoneId(1));
    let inf = Influence::from_weights([(a, 0.7), (b, 0.3), (a, 0.1)]);
    assert_eq!(inf.len(), 2);
    assert!((inf.weight_of(a) - 0.727_272_7).abs() < 1e-4);
    assert!((inf.weight_of(b) - 0.272_727_3).abs() < 1e-4);
}
