//! Named subsets of grid positions.

use bevy::log::debug;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use hexx::{EdgeDirection, Hex};

use crate::grid::{EdgeId, FloodFill, HexGrid, HexMetrics};
use crate::math;

/// A named set of hexes inside a grid of fixed radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    name: String,
    grid_radius: u32,
    cells: HashSet<Hex>,
}

impl Cluster {
    /// An empty cluster for a grid of `grid_radius` rings.
    pub fn new(name: impl Into<String>, grid_radius: u32) -> Self {
        Self {
            name: name.into(),
            grid_radius,
            cells: HashSet::default(),
        }
    }

    /// An empty cluster sized for `grid`.
    pub fn for_grid<C, E, V>(name: impl Into<String>, grid: &HexGrid<C, E, V>) -> Self {
        Self::new(name, grid.radius())
    }

    /// Cluster name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn in_grid(&self, hex: Hex) -> bool {
        math::hex_distance(hex, Hex::ZERO) <= self.grid_radius
    }

    /// Adds `hex`. Hexes outside the parent grid are ignored and `false` is
    /// returned; nothing else fails.
    pub fn add(&mut self, hex: Hex) -> bool {
        if !self.in_grid(hex) {
            debug!(
                "cluster `{}` ignored {hex:?} outside grid radius {}",
                self.name, self.grid_radius
            );
            return false;
        }
        self.cells.insert(hex);
        true
    }

    /// Removes `hex`, returning whether it was a member.
    pub fn remove(&mut self, hex: Hex) -> bool {
        self.cells.remove(&hex)
    }

    /// Membership test.
    pub fn contains(&self, hex: Hex) -> bool {
        self.cells.contains(&hex)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` without members.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Members in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = Hex> + '_ {
        self.cells.iter().copied()
    }

    /// In-grid neighbors of `hex` that are not members.
    fn outside_neighbors(&self, hex: Hex) -> impl Iterator<Item = EdgeDirection> + '_ {
        EdgeDirection::ALL_DIRECTIONS.into_iter().filter(move |&dir| {
            let n = hex.neighbor(dir);
            self.in_grid(n) && !self.contains(n)
        })
    }

    /// Members with at least one in-grid neighbor outside the cluster.
    pub fn border_cells(&self) -> Vec<Hex> {
        let mut border: Vec<Hex> = self
            .iter()
            .filter(|&hex| self.outside_neighbors(hex).next().is_some())
            .collect();
        border.sort_by_key(|h| (h.x, h.y));
        border
    }

    /// Edges leading from a member to an in-grid non-member.
    ///
    /// Members that `grid` never materialized contribute nothing.
    pub fn border_edges<C, E, V>(&self, grid: &HexGrid<C, E, V>) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = self
            .iter()
            .filter_map(|hex| grid.holder(hex).map(|holder| (hex, holder)))
            .flat_map(|(hex, holder)| self.outside_neighbors(hex).map(|dir| holder.edge(dir)))
            .collect();
        edges.sort();
        edges
    }

    /// Member closest to `position`.
    ///
    /// The containing hex is returned directly when it is a member; otherwise
    /// all members are scanned by squared distance to their centers.
    pub fn nearest_cell(&self, position: Vec2, metrics: &HexMetrics) -> Option<Hex> {
        let direct = metrics.world_to_hex(position);
        if self.contains(direct) {
            return Some(direct);
        }
        self.iter().min_by(|&a, &b| {
            let da = metrics.hex_to_world(a).distance_squared(position);
            let db = metrics.hex_to_world(b).distance_squared(position);
            da.total_cmp(&db).then_with(|| (a.x, a.y).cmp(&(b.x, b.y)))
        })
    }

    /// Breadth-first fill from `start` that never leaves the cluster.
    pub fn flood_fill<'a, P>(
        &'a self,
        start: Hex,
        mut predicate: P,
    ) -> FloodFill<impl FnMut(Hex) -> bool + 'a>
    where
        P: FnMut(Hex) -> bool + 'a,
    {
        FloodFill::new(start, move |hex| self.contains(hex) && predicate(hex))
    }

    /// `true` when every member is reachable from every other.
    pub fn is_connected(&self) -> bool {
        match self.iter().next() {
            Some(start) => self.flood_fill(start, |_| true).count() == self.len(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexx::shapes;

    fn disk(radius: u32, grid_radius: u32) -> Cluster {
        let mut c = Cluster::new("disk", grid_radius);
        for hex in shapes::hexagon(Hex::ZERO, radius) {
            c.add(hex);
        }
        c
    }

    #[test]
    fn add_outside_grid_is_a_reported_noop() {
        let mut c = Cluster::new("c", 2);
        assert!(c.add(Hex::new(2, 0)));
        assert!(!c.add(Hex::new(3, 0)));
        assert_eq!(c.len(), 1);
        assert!(!c.contains(Hex::new(3, 0)));
    }

    #[test]
    fn far_away_hexes_are_ignored_without_overflow() {
        let mut cluster = Cluster::new("c", 5);
        assert!(!cluster.add(Hex::new(i32::MAX, 0)));
        assert!(!cluster.add(Hex::new(i32::MIN, i32::MIN)));
        assert!(cluster.is_empty());
    }

    #[test]
    fn remove_reports_membership() {
        let mut c = disk(1, 3);
        assert!(c.remove(Hex::ZERO));
        assert!(!c.remove(Hex::ZERO));
        assert_eq!(c.len(), 6);
    }

    #[test]
    fn border_of_disk_is_its_outer_ring() {
        let c = disk(2, 5);
        let border = c.border_cells();
        assert_eq!(border.len(), 12);
        assert!(border.iter().all(|&h| math::hex_distance(h, Hex::ZERO) == 2));
    }

    #[test]
    fn cluster_filling_the_grid_has_no_border() {
        let c = disk(2, 2);
        assert!(c.border_cells().is_empty());
    }

    #[test]
    fn border_edges_cross_to_non_members() {
        let mut grid: HexGrid<()> = HexGrid::new(3, HexMetrics::new(10.0));
        for hex in shapes::hexagon(Hex::ZERO, 3) {
            grid.materialize(hex);
        }
        let c = disk(1, 3);
        let edges = c.border_edges(&grid);
        // 6 ring cells, each touching 3 outer neighbors.
        assert_eq!(edges.len(), 18);
        for id in edges {
            let edge = grid.edge(id);
            let owners: Vec<Hex> = edge.owners().collect();
            assert_eq!(owners.len(), 2);
            assert_eq!(owners.iter().filter(|&&h| c.contains(h)).count(), 1);
        }
    }

    #[test]
    fn nearest_prefers_containing_member() {
        let metrics = HexMetrics::new(10.0);
        let c = disk(1, 3);
        let p = metrics.hex_to_world(Hex::new(1, 0)) + Vec2::new(1.0, 1.0);
        assert_eq!(c.nearest_cell(p, &metrics), Some(Hex::new(1, 0)));
    }

    #[test]
    fn nearest_falls_back_to_scan() {
        let metrics = HexMetrics::new(10.0);
        let mut c = Cluster::new("pair", 5);
        c.add(Hex::ZERO);
        c.add(Hex::new(3, 0));
        let near_far_one = metrics.hex_to_world(Hex::new(4, 0));
        assert_eq!(c.nearest_cell(near_far_one, &metrics), Some(Hex::new(3, 0)));
        assert_eq!(Cluster::new("empty", 5).nearest_cell(Vec2::ZERO, &metrics), None);
    }

    #[test]
    fn flood_fill_stays_inside() {
        let mut c = Cluster::new("line", 5);
        for q in -2..=2 {
            c.add(Hex::new(q, 0));
        }
        let reached: Vec<Hex> = c.flood_fill(Hex::ZERO, |_| true).collect();
        assert_eq!(reached.len(), 5);
        assert!(c.is_connected());
        c.remove(Hex::new(1, 0));
        assert!(!c.is_connected());
    }
}
