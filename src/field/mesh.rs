use std::collections::VecDeque;

use bevy::log::{debug, info};
use bevy::platform::collections::HashSet;
use hexx::Hex;

use super::FieldConfig;
use crate::error::GenerationError;
use crate::grid::{EdgeId, HexMetrics, VertexId};
use crate::zones::ZoneGrid;

/// Grows the mesh breadth-first from the hex under the center of the land
/// bounds. A candidate is kept only if all six corners lie inside the bounds
/// (within `vertex_epsilon`) and it fits the grid; only kept candidates
/// enqueue their neighbors.
pub(super) fn grow(config: &FieldConfig) -> Result<ZoneGrid, GenerationError> {
    let mut grid = ZoneGrid::new(config.grid_radius, HexMetrics::new(config.hex_side));
    let land = config.land_bounds.inflate(config.vertex_epsilon);

    let origin = grid.world_to_hex(config.land_bounds.center());
    let mut seen: HashSet<Hex> = HashSet::default();
    let mut queue = VecDeque::from([origin]);
    seen.insert(origin);
    let mut rejected = 0usize;

    while let Some(candidate) = queue.pop_front() {
        let fits = grid.is_contains(candidate)
            && grid
                .hex_corners(candidate)
                .iter()
                .all(|&corner| land.contains(corner));
        if !fits {
            rejected += 1;
            continue;
        }
        grid.materialize(candidate);
        for neighbor in candidate.all_neighbors() {
            if seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    if grid.cells().is_empty() {
        return Err(GenerationError::EmptyMesh);
    }
    info!(
        "mesh grown: {} cells, {} edges, {} vertices",
        grid.cells().len(),
        grid.edges().len(),
        grid.vertices().len()
    );
    debug!("{rejected} candidates rejected at the land boundary");
    Ok(grid)
}

/// Derives edge and vertex payloads from the assigned cells.
pub(super) fn finalize(grid: &mut ZoneGrid) {
    let vertex_heights: Vec<f32> = grid
        .vertices()
        .iter()
        .map(|vertex| {
            let (sum, count) = vertex
                .owners()
                .fold((0.0, 0u32), |(sum, n), hex| (sum + grid.get(hex).desired_height, n + 1));
            sum / count.max(1) as f32
        })
        .collect();
    for (i, height) in vertex_heights.into_iter().enumerate() {
        grid.vertex_mut(VertexId(i as u32)).payload_mut().height = height;
    }

    let borders: Vec<bool> = grid
        .edges()
        .iter()
        .map(|edge| {
            edge.twin()
                .is_some_and(|twin| grid.get(twin).zone != grid.get(edge.origin()).zone)
        })
        .collect();
    let mut seams = 0usize;
    for (i, is_zone_border) in borders.into_iter().enumerate() {
        seams += usize::from(is_zone_border);
        grid.edge_mut(EdgeId(i as u32)).payload_mut().is_zone_border = is_zone_border;
    }
    debug!("{seams} edges separate zones");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::platform::collections::HashMap;
    use bevy::prelude::*;

    fn config(bounds: Rect) -> FieldConfig {
        FieldConfig {
            land_bounds: bounds,
            grid_radius: 10,
            ..default()
        }
    }

    #[test]
    fn every_corner_stays_inside_the_bounds() {
        let cfg = config(Rect::new(-60.0, -60.0, 60.0, 60.0));
        let grid = grow(&cfg).unwrap();
        let land = cfg.land_bounds.inflate(cfg.vertex_epsilon);
        for holder in grid.cells() {
            for corner in grid.hex_corners(holder.hex()) {
                assert!(land.contains(corner));
            }
        }
    }

    #[test]
    fn mesh_is_connected_and_contains_the_center() {
        let grid = grow(&config(Rect::new(-60.0, -60.0, 60.0, 60.0))).unwrap();
        assert!(grid.is_materialized(Hex::ZERO));
        let reached = grid.flood_fill(Hex::ZERO, |_| true).count();
        assert_eq!(reached, grid.cells().len());
    }

    #[test]
    fn grid_radius_caps_growth() {
        let cfg = FieldConfig {
            land_bounds: Rect::new(-1000.0, -1000.0, 1000.0, 1000.0),
            grid_radius: 2,
            ..default()
        };
        assert_eq!(grow(&cfg).unwrap().cells().len(), 19);
    }

    #[test]
    fn bounds_smaller_than_a_hex_are_an_error() {
        let cfg = config(Rect::new(-1.0, -1.0, 1.0, 1.0));
        assert!(matches!(grow(&cfg), Err(GenerationError::EmptyMesh)));
    }

    #[test]
    fn no_two_vertices_share_a_position() {
        let grid = grow(&config(Rect::new(-80.0, -80.0, 80.0, 80.0))).unwrap();
        let mut by_position: HashMap<IVec2, usize> = HashMap::default();
        for i in 0..grid.vertices().len() {
            let key = (grid.vertex_position(VertexId(i as u32)) * 10.0).round().as_ivec2();
            assert!(by_position.insert(key, i).is_none(), "vertex {i} duplicated");
        }
    }

    #[test]
    fn finalize_averages_owner_heights() {
        let mut grid = grow(&config(Rect::new(-60.0, -60.0, 60.0, 60.0))).unwrap();
        let hexes: Vec<Hex> = grid.cells().iter().map(|c| c.hex()).collect();
        for hex in hexes {
            let cell = grid.get_mut(hex);
            cell.desired_height = hex.x as f32;
            cell.zone = crate::zones::ZoneId(u32::from(hex.x > 0));
        }
        finalize(&mut grid);
        for vertex in grid.vertices() {
            let owners: Vec<Hex> = vertex.owners().collect();
            let mean = owners.iter().map(|h| h.x as f32).sum::<f32>() / owners.len() as f32;
            assert!((vertex.payload().height - mean).abs() < 1e-5);
        }
        for edge in grid.edges() {
            let crosses = edge.twin().is_some_and(|t| (t.x > 0) != (edge.origin().x > 0));
            assert_eq!(edge.payload().is_zone_border, crosses);
        }
    }
}
