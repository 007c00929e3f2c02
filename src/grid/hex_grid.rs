use bevy::prelude::*;
use hexx::{EdgeDirection, GridVertex, Hex, VertexDirection};

use super::flood_fill::FloodFill;
use super::metrics::HexMetrics;
use super::topology::{CellHolder, EdgeHolder, EdgeId, VertexHolder, VertexId};
use crate::math;

/// Largest radius a [`HexGrid`] accepts.
///
/// Keeps the dense slot table allocatable and every slot offset within `i32`.
pub const MAX_RADIUS: u32 = 2048;

/// Finite hexagonal lattice with shared edge/vertex topology.
///
/// Positions within `radius` rings of the origin are addressable; their
/// holders are materialized on first write and live as long as the grid.
/// Edges and vertices are allocated once and shared by every adjacent cell.
#[derive(Clone, Debug)]
pub struct HexGrid<C, E = (), V = ()> {
    radius: u32,
    diameter: usize,
    metrics: HexMetrics,
    slots: Vec<Option<u32>>,
    cells: Vec<CellHolder<C>>,
    edges: Vec<EdgeHolder<E>>,
    vertices: Vec<VertexHolder<V>>,
    empty: C,
}

impl<C: Default, E: Default, V: Default> HexGrid<C, E, V> {
    /// Allocates a grid covering every hex within `radius` of the origin.
    ///
    /// # Panics
    /// If `radius` exceeds [`MAX_RADIUS`].
    pub fn new(radius: u32, metrics: HexMetrics) -> Self {
        assert!(
            radius <= MAX_RADIUS,
            "grid radius {radius} exceeds the maximum of {MAX_RADIUS}"
        );
        let diameter = 2 * radius as usize + 1;
        Self {
            radius,
            diameter,
            metrics,
            slots: vec![None; diameter * diameter],
            cells: Vec::new(),
            edges: Vec::new(),
            vertices: Vec::new(),
            empty: C::default(),
        }
    }

    /// Materializes the holder for `hex`, returning its arena index.
    ///
    /// Each edge and vertex slot is inherited from an already-materialized
    /// neighbor when one exists, so both sides see the same instance.
    ///
    /// # Panics
    /// If `hex` lies outside the grid.
    pub fn materialize(&mut self, hex: Hex) -> usize {
        let slot = self.slot(hex);
        if let Some(idx) = self.slots[slot] {
            return idx as usize;
        }

        let mut edges = [EdgeId(0); 6];
        for dir in EdgeDirection::ALL_DIRECTIONS {
            let neighbor = hex.neighbor(dir);
            let inherited = self
                .cell_index(neighbor)
                .map(|n| self.cells[n].edge(dir.const_neg()));
            edges[dir.index() as usize] = match inherited {
                Some(id) => {
                    self.edges[id.index()].twin = Some(hex);
                    id
                }
                None => {
                    self.edges.push(EdgeHolder {
                        origin: hex,
                        direction: dir,
                        twin: None,
                        payload: E::default(),
                    });
                    EdgeId((self.edges.len() - 1) as u32)
                }
            };
        }

        let mut vertices = [VertexId(0); 6];
        for dir in VertexDirection::ALL_DIRECTIONS {
            let target = GridVertex {
                origin: hex,
                direction: dir,
            };
            let inherited = target
                .coordinates()
                .into_iter()
                .filter(|&c| c != hex)
                .find_map(|c| {
                    let n = self.cell_index(c)?;
                    let corner = corner_for_vertex(c, &target)?;
                    Some(self.cells[n].vertex(corner))
                });
            vertices[dir.index() as usize] = match inherited {
                Some(id) => {
                    self.vertices[id.index()].add_owner(hex);
                    id
                }
                None => {
                    self.vertices
                        .push(VertexHolder::new(hex, dir, V::default()));
                    VertexId((self.vertices.len() - 1) as u32)
                }
            };
        }

        let idx = self.cells.len();
        self.cells.push(CellHolder {
            hex,
            payload: C::default(),
            edges,
            vertices,
        });
        self.slots[slot] = Some(idx as u32);
        idx
    }

    /// Writes the payload of `hex`, materializing it if needed.
    ///
    /// # Panics
    /// If `hex` lies outside the grid.
    pub fn set(&mut self, hex: Hex, payload: C) {
        let idx = self.materialize(hex);
        self.cells[idx].payload = payload;
    }

    /// Mutable payload of `hex`, materializing it if needed.
    ///
    /// # Panics
    /// If `hex` lies outside the grid.
    pub fn get_mut(&mut self, hex: Hex) -> &mut C {
        let idx = self.materialize(hex);
        &mut self.cells[idx].payload
    }
}

impl<C, E, V> HexGrid<C, E, V> {
    /// Number of rings around the origin.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Geometry used for world conversions.
    pub fn metrics(&self) -> &HexMetrics {
        &self.metrics
    }

    /// `true` when `hex` is within the grid's radius. O(1).
    pub fn is_contains(&self, hex: Hex) -> bool {
        math::hex_distance(hex, Hex::ZERO) <= self.radius
    }

    fn slot(&self, hex: Hex) -> usize {
        assert!(
            self.is_contains(hex),
            "hex {hex:?} is outside the grid of radius {}",
            self.radius
        );
        let r = self.radius as i32;
        (hex.x + r) as usize * self.diameter + (hex.y + r) as usize
    }

    /// Arena index of a materialized cell; `None` for empty or out-of-grid hexes.
    pub fn cell_index(&self, hex: Hex) -> Option<usize> {
        if !self.is_contains(hex) {
            return None;
        }
        self.slots[self.slot(hex)].map(|i| i as usize)
    }

    /// `true` once `hex` has a holder.
    pub fn is_materialized(&self, hex: Hex) -> bool {
        self.cell_index(hex).is_some()
    }

    // ── Payload access ─────────────────────────────────────────────

    /// Payload of `hex`, or the default payload if it was never written.
    ///
    /// # Panics
    /// If `hex` lies outside the grid.
    pub fn get(&self, hex: Hex) -> &C {
        match self.slots[self.slot(hex)] {
            Some(idx) => &self.cells[idx as usize].payload,
            None => &self.empty,
        }
    }

    /// Holder of a materialized cell.
    pub fn holder(&self, hex: Hex) -> Option<&CellHolder<C>> {
        self.cell_index(hex).map(|i| &self.cells[i])
    }

    /// Holder by arena index.
    pub fn holder_at(&self, index: usize) -> &CellHolder<C> {
        &self.cells[index]
    }

    /// The six edges around `hex`, indexed by edge direction.
    pub fn get_edges(&self, hex: Hex) -> Option<[&EdgeHolder<E>; 6]> {
        let holder = self.holder(hex)?;
        Some(holder.edges.map(|id| &self.edges[id.index()]))
    }

    /// The six vertices around `hex`, indexed by vertex direction.
    pub fn get_vertices(&self, hex: Hex) -> Option<[&VertexHolder<V>; 6]> {
        let holder = self.holder(hex)?;
        Some(holder.vertices.map(|id| &self.vertices[id.index()]))
    }

    /// In-grid neighbors of `hex` (0-6).
    pub fn neighbor_hexes(&self, hex: Hex) -> impl Iterator<Item = Hex> + '_ {
        hex.all_neighbors()
            .into_iter()
            .filter(move |&n| self.is_contains(n))
    }

    /// Payloads of the in-grid neighbors of `hex`.
    pub fn get_neighbors(&self, hex: Hex) -> impl Iterator<Item = (Hex, &C)> + '_ {
        self.neighbor_hexes(hex).map(move |n| (n, self.get(n)))
    }

    // ── Enumerations ───────────────────────────────────────────────

    /// Materialized cells in creation order.
    pub fn cells(&self) -> &[CellHolder<C>] {
        &self.cells
    }

    /// Every edge allocated so far.
    pub fn edges(&self) -> &[EdgeHolder<E>] {
        &self.edges
    }

    /// Every vertex allocated so far.
    pub fn vertices(&self) -> &[VertexHolder<V>] {
        &self.vertices
    }

    /// Edge by id.
    pub fn edge(&self, id: EdgeId) -> &EdgeHolder<E> {
        &self.edges[id.index()]
    }

    /// Mutable edge by id.
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut EdgeHolder<E> {
        &mut self.edges[id.index()]
    }

    /// Vertex by id.
    pub fn vertex(&self, id: VertexId) -> &VertexHolder<V> {
        &self.vertices[id.index()]
    }

    /// Mutable vertex by id.
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut VertexHolder<V> {
        &mut self.vertices[id.index()]
    }

    // ── Geometry ───────────────────────────────────────────────────

    /// World-space center of `hex`.
    pub fn hex_center(&self, hex: Hex) -> Vec2 {
        self.metrics.hex_to_world(hex)
    }

    /// The six corner positions of `hex`, indexed by vertex direction.
    pub fn hex_corners(&self, hex: Hex) -> [Vec2; 6] {
        self.metrics.hex_corners(hex)
    }

    /// Derived world position of a vertex.
    pub fn vertex_position(&self, id: VertexId) -> Vec2 {
        let (anchor, corner) = self.vertex(id).anchor();
        self.metrics.vertex_position(anchor, corner)
    }

    /// The two vertices bounding an edge.
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<[VertexId; 2]> {
        let edge = self.edge(id);
        let holder = self.holder(edge.origin)?;
        Some(
            edge.direction
                .vertex_directions()
                .map(|dir| holder.vertex(dir)),
        )
    }

    /// Hex owning the unit raster block at `block`.
    pub fn block_to_hex(&self, block: IVec2) -> Hex {
        self.metrics.block_to_hex(block)
    }

    /// Hex containing a world position (may lie outside the grid).
    pub fn world_to_hex(&self, pos: Vec2) -> Hex {
        self.metrics.world_to_hex(pos)
    }

    /// Hexes approximating the straight segment between two cells.
    pub fn rasterize_line(&self, from: Hex, to: Hex) -> Vec<Hex> {
        math::hex_line(from, to)
    }

    // ── Traversal ──────────────────────────────────────────────────

    /// Breadth-first fill from `start` over materialized cells accepted by
    /// `predicate`. See [`FloodFill`] for ring semantics.
    pub fn flood_fill<'a, P>(
        &'a self,
        start: Hex,
        mut predicate: P,
    ) -> FloodFill<impl FnMut(Hex) -> bool + 'a>
    where
        P: FnMut(&CellHolder<C>) -> bool + 'a,
    {
        FloodFill::new(start, move |hex| {
            self.holder(hex).is_some_and(|holder| predicate(holder))
        })
    }
}

/// Corner of `hex` that coincides with `target`.
fn corner_for_vertex(hex: Hex, target: &GridVertex) -> Option<VertexDirection> {
    VertexDirection::ALL_DIRECTIONS.into_iter().find(|&dir| {
        GridVertex {
            origin: hex,
            direction: dir,
        }
        .equivalent(target)
    })
}
