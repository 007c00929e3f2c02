use std::fmt;

use bevy::prelude::*;

use super::biome::BiomeId;
use crate::cluster::Cluster;
use crate::grid::HexGrid;
use crate::heights::Heights;
use crate::influence::Influence;

/// The grid specialization used by the zone field.
pub type ZoneGrid = HexGrid<Cell, EdgeData, VertexData>;

/// Identifier of a generated zone; [`ZoneId::INVALID`] marks unassigned cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(pub u32);

impl ZoneId {
    /// Placeholder for cells that no zone has claimed yet.
    pub const INVALID: Self = Self(u32::MAX);

    /// `false` for [`ZoneId::INVALID`].
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// Position in [`ZoneField::zones`](crate::field::ZoneField::zones).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "zone#{}", self.0)
        } else {
            f.write_str("zone#invalid")
        }
    }
}

/// Per-hex payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    /// Owning zone.
    pub zone: ZoneId,
    /// Biome whose generator shaped this cell.
    pub biome: Option<BiomeId>,
    /// Target surface height produced by the zone generator.
    pub desired_height: f32,
    /// Layered heights derived from `desired_height` and the biome profile.
    pub heights: Heights,
    /// World-space bounding box of the hex outline.
    pub bounds: Rect,
}

/// Per-edge payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeData {
    /// The two cells on either side belong to different zones.
    pub is_zone_border: bool,
}

/// Per-vertex payload.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexData {
    /// Mean desired height of the cells sharing the vertex.
    pub height: f32,
}

/// A contiguous group of cells sharing one biome.
#[derive(Clone, Debug)]
pub struct Zone {
    pub(crate) id: ZoneId,
    pub(crate) name: String,
    pub(crate) biome: BiomeId,
    pub(crate) cluster: Cluster,
    pub(crate) influence: Influence,
}

impl Zone {
    /// Zone identifier.
    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// Display name, `<biome>#<index>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Biome the zone was generated from.
    pub fn biome(&self) -> BiomeId {
        self.biome
    }

    /// Member cells.
    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    /// The influence a member cell contributes to field blending.
    pub fn influence(&self) -> Influence {
        self.influence
    }
}
