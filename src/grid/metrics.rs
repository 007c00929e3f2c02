use bevy::prelude::*;
use hexx::{GridVertex, Hex, HexLayout, HexOrientation, VertexDirection};

use crate::math;

/// Pointy-top hex geometry: hex ↔ world and block ↔ hex conversion.
///
/// Hex centers come from the [`HexLayout`]; the inverse mapping is derived
/// from the layout's own axial basis vectors so both directions always agree.
#[derive(Clone, Debug)]
pub struct HexMetrics {
    layout: HexLayout,
    side: f32,
    inverse: Mat2,
}

impl HexMetrics {
    /// Metrics for hexes whose side length (= circumradius) is `side`.
    pub fn new(side: f32) -> Self {
        let layout = HexLayout {
            orientation: HexOrientation::Pointy,
            scale: Vec2::splat(side),
            ..default()
        };
        let origin = layout.hex_to_world_pos(Hex::ZERO);
        let q_axis = layout.hex_to_world_pos(Hex::new(1, 0)) - origin;
        let r_axis = layout.hex_to_world_pos(Hex::new(0, 1)) - origin;
        let inverse = Mat2::from_cols(q_axis, r_axis).inverse();
        Self {
            layout,
            side,
            inverse,
        }
    }

    /// Hex side length in world units.
    pub fn side(&self) -> f32 {
        self.side
    }

    /// Distance between the centers of two adjacent hexes (`√3 · side`).
    pub fn center_spacing(&self) -> f32 {
        self.side * 3f32.sqrt()
    }

    // ── Coordinate conversion ──────────────────────────────────────

    /// World-space 2D position of a hex center.
    pub fn hex_to_world(&self, hex: Hex) -> Vec2 {
        self.layout.hex_to_world_pos(hex)
    }

    /// Fractional axial coordinates `(q, r)` of a world position.
    pub fn world_to_fract(&self, pos: Vec2) -> Vec2 {
        self.inverse * (pos - self.layout.hex_to_world_pos(Hex::ZERO))
    }

    /// Hex containing a world position, snapped with [`math::cube_round`].
    pub fn world_to_hex(&self, pos: Vec2) -> Hex {
        let fract = self.world_to_fract(pos);
        math::cube_round(fract.x, fract.y)
    }

    /// Hex owning the unit raster block at `block`.
    ///
    /// A block covers `[x, x + 1) × [y, y + 1)` in world units and belongs to
    /// the hex containing its center. No branches beyond the rounding rule,
    /// so boundary blocks always land on the same side.
    pub fn block_to_hex(&self, block: IVec2) -> Hex {
        self.world_to_hex(block.as_vec2() + Vec2::splat(0.5))
    }

    /// Raster block containing the center of `hex`.
    pub fn hex_center_block(&self, hex: Hex) -> IVec2 {
        self.hex_to_world(hex).floor().as_ivec2()
    }

    // ── Corners ────────────────────────────────────────────────────

    /// World position of the grid vertex at corner `direction` of `origin`.
    ///
    /// A hex vertex is the centroid of the three hexes meeting there.
    pub fn vertex_position(&self, origin: Hex, direction: VertexDirection) -> Vec2 {
        let coords = GridVertex { origin, direction }.coordinates();
        coords
            .iter()
            .map(|&hex| self.hex_to_world(hex))
            .fold(Vec2::ZERO, |acc, p| acc + p)
            / 3.0
    }

    /// The six corner positions of `hex`, indexed by vertex direction.
    pub fn hex_corners(&self, hex: Hex) -> [Vec2; 6] {
        let mut corners = [Vec2::ZERO; 6];
        for dir in VertexDirection::ALL_DIRECTIONS {
            corners[dir.index() as usize] = self.vertex_position(hex, dir);
        }
        corners
    }

    /// Axis-aligned bounding box of the hex outline.
    pub fn hex_bounds(&self, hex: Hex) -> Rect {
        self.hex_corners(hex)
            .iter()
            .fold(Rect::from_center_size(self.hex_to_world(hex), Vec2::ZERO), |r, &c| {
                r.union_point(c)
            })
    }
}
