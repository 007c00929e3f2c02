//! Arena holders for cells, edges, and vertices.
//!
//! The [`HexGrid`](super::HexGrid) owns every holder. Holders refer to each
//! other by [`EdgeId`] / [`VertexId`], never by reference.

use hexx::{EdgeDirection, Hex, VertexDirection};

/// Index of an [`EdgeHolder`] in the grid arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) u32);

/// Index of a [`VertexHolder`] in the grid arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub(crate) u32);

impl EdgeId {
    /// Position in [`HexGrid::edges`](super::HexGrid::edges).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl VertexId {
    /// Position in [`HexGrid::vertices`](super::HexGrid::vertices).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The grid's slot for one materialized hex.
#[derive(Clone, Debug)]
pub struct CellHolder<C> {
    pub(crate) hex: Hex,
    pub(crate) payload: C,
    pub(crate) edges: [EdgeId; 6],
    pub(crate) vertices: [VertexId; 6],
}

impl<C> CellHolder<C> {
    /// Axial coordinate of this cell.
    pub fn hex(&self) -> Hex {
        self.hex
    }

    /// Cell payload.
    pub fn payload(&self) -> &C {
        &self.payload
    }

    /// Edge on side `direction`.
    pub fn edge(&self, direction: EdgeDirection) -> EdgeId {
        self.edges[direction.index() as usize]
    }

    /// Vertex at corner `direction`.
    pub fn vertex(&self, direction: VertexDirection) -> VertexId {
        self.vertices[direction.index() as usize]
    }

    /// All six edges, indexed by edge direction.
    pub fn edge_ids(&self) -> [EdgeId; 6] {
        self.edges
    }

    /// All six vertices, indexed by vertex direction.
    pub fn vertex_ids(&self) -> [VertexId; 6] {
        self.vertices
    }
}

/// A hex side shared by the (up to) two cells on either side of it.
#[derive(Clone, Debug)]
pub struct EdgeHolder<E> {
    pub(crate) origin: Hex,
    pub(crate) direction: EdgeDirection,
    pub(crate) twin: Option<Hex>,
    pub(crate) payload: E,
}

impl<E> EdgeHolder<E> {
    /// The cell that allocated this edge.
    pub fn origin(&self) -> Hex {
        self.origin
    }

    /// Side of [`Self::origin`] this edge lies on.
    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }

    /// The cell across the edge, once it has been materialized.
    pub fn twin(&self) -> Option<Hex> {
        self.twin
    }

    /// Owning cells: the origin, then the twin if present.
    pub fn owners(&self) -> impl Iterator<Item = Hex> + '_ {
        std::iter::once(self.origin).chain(self.twin)
    }

    /// `true` when only one cell owns the edge.
    pub fn is_border(&self) -> bool {
        self.twin.is_none()
    }

    /// Edge payload.
    pub fn payload(&self) -> &E {
        &self.payload
    }

    /// Mutable edge payload.
    pub fn payload_mut(&mut self) -> &mut E {
        &mut self.payload
    }
}

/// A hex corner shared by between one and three cells.
///
/// The world position is not stored; see
/// [`HexGrid::vertex_position`](super::HexGrid::vertex_position).
#[derive(Clone, Debug)]
pub struct VertexHolder<V> {
    pub(crate) anchor: Hex,
    pub(crate) corner: VertexDirection,
    pub(crate) owners: [Option<Hex>; 3],
    pub(crate) payload: V,
}

impl<V> VertexHolder<V> {
    pub(crate) fn new(anchor: Hex, corner: VertexDirection, payload: V) -> Self {
        Self {
            anchor,
            corner,
            owners: [Some(anchor), None, None],
            payload,
        }
    }

    pub(crate) fn add_owner(&mut self, hex: Hex) {
        if let Some(slot) = self.owners.iter_mut().find(|o| o.is_none()) {
            *slot = Some(hex);
        }
    }

    /// First cell that touched this vertex and the corner it sits at.
    pub fn anchor(&self) -> (Hex, VertexDirection) {
        (self.anchor, self.corner)
    }

    /// Cells sharing this vertex.
    pub fn owners(&self) -> impl Iterator<Item = Hex> + '_ {
        self.owners.iter().flatten().copied()
    }

    /// Number of cells sharing this vertex (1..=3).
    pub fn owner_count(&self) -> usize {
        self.owners.iter().flatten().count()
    }

    /// Vertex payload.
    pub fn payload(&self) -> &V {
        &self.payload
    }

    /// Mutable vertex payload.
    pub fn payload_mut(&mut self) -> &mut V {
        &mut self.payload
    }
}
