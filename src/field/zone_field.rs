use std::cell::RefCell;
use std::sync::OnceLock;

use bevy::log::info;
use bevy::prelude::*;
use hexx::Hex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::spatial::KdTree;
use super::{FieldConfig, assign, mesh};
use crate::error::{FieldError, GenerationError};
use crate::grid::{CellHolder, EdgeHolder, FloodFill, VertexHolder};
use crate::heights::Heights;
use crate::influence::Influence;
use crate::zones::{BiomeRegistry, Cell, EdgeData, VertexData, Zone, ZoneGrid, ZoneId};

thread_local! {
    /// Per-thread `(cell index, weight)` scratch for field queries.
    static SAMPLES: RefCell<Vec<(usize, f32)>> = const { RefCell::new(Vec::new()) };
}

/// A generated, read-only zone field.
///
/// Built once by [`ZoneField::generate`]; afterwards only shared access is
/// exposed, so queries may run from several threads at once.
#[derive(Resource, Debug)]
pub struct ZoneField {
    config: FieldConfig,
    grid: ZoneGrid,
    zones: Vec<Zone>,
    index: OnceLock<KdTree>,
}

impl ZoneField {
    /// Grows the mesh, carves zones, and runs every zone generator.
    ///
    /// Any generator failure aborts the whole run.
    pub fn generate(config: &FieldConfig, biomes: &BiomeRegistry) -> Result<Self, GenerationError> {
        config.validate()?;
        assign::validate_biomes(biomes)?;

        let mut grid = mesh::grow(config)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let zones = assign::assign_zones(&mut grid, biomes, &mut rng)?;
        mesh::finalize(&mut grid);
        info!(
            "zone field ready: {} cells in {} zones (seed {})",
            grid.cells().len(),
            zones.len(),
            config.seed
        );

        Ok(Self {
            config: config.clone(),
            grid,
            zones,
            index: OnceLock::new(),
        })
    }

    // ── Read-only views ────────────────────────────────────────────

    /// Parameters the field was generated with.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Underlying grid.
    pub fn grid(&self) -> &ZoneGrid {
        &self.grid
    }

    /// All zones, indexed by [`ZoneId::index`].
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Zone by id.
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.index())
    }

    /// Every cell in creation order.
    pub fn cells(&self) -> &[CellHolder<Cell>] {
        self.grid.cells()
    }

    /// Every edge of the mesh.
    pub fn edges(&self) -> &[EdgeHolder<EdgeData>] {
        self.grid.edges()
    }

    /// Every vertex of the mesh.
    pub fn vertices(&self) -> &[VertexHolder<VertexData>] {
        self.grid.vertices()
    }

    /// Payload of a mesh cell.
    pub fn cell(&self, hex: Hex) -> Option<&Cell> {
        self.grid.holder(hex).map(CellHolder::payload)
    }

    /// Lazy breadth-first walk over mesh cells accepted by `predicate`.
    pub fn flood_fill<'a, P>(
        &'a self,
        start: Hex,
        predicate: P,
    ) -> FloodFill<impl FnMut(Hex) -> bool + 'a>
    where
        P: FnMut(&CellHolder<Cell>) -> bool + 'a,
    {
        self.grid.flood_fill(start, predicate)
    }

    // ── Field queries ──────────────────────────────────────────────

    fn index(&self) -> &KdTree {
        self.index.get_or_init(|| {
            KdTree::build(
                self.grid
                    .cells()
                    .iter()
                    .enumerate()
                    .map(|(i, holder)| (self.grid.hex_center(holder.hex()), i)),
            )
        })
    }

    /// Runs `blend` over the cells within the search radius of `position`,
    /// each paired with its Shepard weight. Zero-weight cells are dropped.
    fn with_samples<R>(
        &self,
        position: Vec2,
        blend: impl FnOnce(&[(usize, f32)]) -> R,
    ) -> R {
        let radius = self.config.search_radius;
        let kernel = self.config.kernel;
        SAMPLES.with_borrow_mut(|samples| {
            samples.clear();
            self.index().radius_query(position, radius, samples);
            for sample in samples.iter_mut() {
                sample.1 = kernel.weight(sample.1, radius);
            }
            samples.retain(|&(_, w)| w > 0.0);
            blend(samples)
        })
    }

    fn cell_at(&self, index: usize) -> &Cell {
        self.grid.holder_at(index).payload()
    }

    /// Shepard-blended desired height at `position`.
    pub fn height_at(&self, position: Vec2) -> Result<f32, FieldError> {
        self.with_samples(position, |samples| {
            let (mut sum, mut total) = (0.0, 0.0);
            let (mut lo, mut hi) = (f32::INFINITY, f32::NEG_INFINITY);
            for &(i, w) in samples {
                let h = self.cell_at(i).desired_height;
                sum += h * w;
                total += w;
                lo = lo.min(h);
                hi = hi.max(h);
            }
            if total <= 0.0 {
                return Err(FieldError::NoCoverage { position });
            }
            // Rounding must not push the mean outside the sampled range.
            Ok((sum / total).clamp(lo, hi))
        })
    }

    /// Per-layer Shepard blend of cell heights at `position`.
    pub fn heights_at(&self, position: Vec2) -> Result<Heights, FieldError> {
        self.with_samples(position, |samples| {
            Heights::blend(samples.iter().map(|&(i, w)| (self.cell_at(i).heights, w)))
                .ok_or(FieldError::NoCoverage { position })
        })
    }

    /// Blended zone membership at `position`.
    ///
    /// Each cell contributes its zone's influence scaled by the cell's weight;
    /// totals are accumulated per zone before the four heaviest are kept.
    pub fn influence_at(&self, position: Vec2) -> Result<Influence, FieldError> {
        let totals = self.with_samples(position, |samples| {
            let mut totals: Vec<(ZoneId, f32)> = Vec::new();
            for &(i, w) in samples {
                let Some(zone) = self.zone(self.cell_at(i).zone) else {
                    continue;
                };
                for (z, zw) in zone.influence().iter() {
                    match totals.iter_mut().find(|t| t.0 == z) {
                        Some(total) => total.1 += w * zw,
                        None => totals.push((z, w * zw)),
                    }
                }
            }
            totals
        });
        let influence = Influence::from_weights(totals);
        if influence.is_empty() {
            return Err(FieldError::NoCoverage { position });
        }
        Ok(influence)
    }

    /// The most influential zone at `position`.
    pub fn zone_at(&self, position: Vec2) -> Result<ZoneId, FieldError> {
        self.influence_at(position)?
            .most_influence_zone()
            .ok_or(FieldError::NoCoverage { position })
    }

    /// Mesh cell whose center is closest to `position`.
    pub fn nearest_cell(&self, position: Vec2) -> Option<Hex> {
        self.index()
            .nearest(position)
            .map(|(i, _)| self.grid.holder_at(i).hex())
    }
}
