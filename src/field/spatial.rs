//! Static 2D kd-tree over cell centers.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug)]
struct KdNode {
    point: Vec2,
    tag: usize,
}

/// Balanced kd-tree stored as an implicit array.
///
/// The root of every sub-slice sits at its midpoint; points to the left are
/// not greater on the split axis, points to the right not smaller. Each point
/// carries a `usize` tag chosen by the caller.
#[derive(Clone, Debug, Default)]
pub struct KdTree {
    nodes: Vec<KdNode>,
}

impl KdTree {
    /// Builds a tree from `(point, tag)` pairs.
    pub fn build(points: impl IntoIterator<Item = (Vec2, usize)>) -> Self {
        let mut nodes: Vec<KdNode> = points
            .into_iter()
            .map(|(point, tag)| KdNode { point, tag })
            .collect();
        split(&mut nodes, 0);
        Self { nodes }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `(tag, distance)` for every point within `radius` of `center`.
    ///
    /// `out` is not cleared, so callers can reuse one buffer across queries.
    pub fn radius_query(&self, center: Vec2, radius: f32, out: &mut Vec<(usize, f32)>) {
        if radius >= 0.0 {
            collect_within(&self.nodes, 0, center, radius * radius, out);
        }
    }

    /// Closest point to `center` as `(tag, distance)`.
    pub fn nearest(&self, center: Vec2) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        nearest_in(&self.nodes, 0, center, &mut best);
        best.map(|(tag, dist_sq)| (tag, dist_sq.sqrt()))
    }
}

/// Split coordinate at `depth`: x on even levels, y on odd.
fn coord(p: Vec2, depth: usize) -> f32 {
    if depth % 2 == 0 { p.x } else { p.y }
}

fn collect_within(
    nodes: &[KdNode],
    depth: usize,
    center: Vec2,
    radius_sq: f32,
    out: &mut Vec<(usize, f32)>,
) {
    if nodes.is_empty() {
        return;
    }
    let mid = nodes.len() / 2;
    let node = nodes[mid];
    let dist_sq = node.point.distance_squared(center);
    if dist_sq <= radius_sq {
        out.push((node.tag, dist_sq.sqrt()));
    }
    let diff = coord(center, depth) - coord(node.point, depth);
    let (near, far) = if diff <= 0.0 {
        (&nodes[..mid], &nodes[mid + 1..])
    } else {
        (&nodes[mid + 1..], &nodes[..mid])
    };
    collect_within(near, depth + 1, center, radius_sq, out);
    if diff * diff <= radius_sq {
        collect_within(far, depth + 1, center, radius_sq, out);
    }
}

fn split(nodes: &mut [KdNode], depth: usize) {
    if nodes.len() <= 1 {
        return;
    }
    let mid = nodes.len() / 2;
    nodes.select_nth_unstable_by(mid, |a, b| coord(a.point, depth).total_cmp(&coord(b.point, depth)));
    let (left, rest) = nodes.split_at_mut(mid);
    split(left, depth + 1);
    split(&mut rest[1..], depth + 1);
}

fn nearest_in(nodes: &[KdNode], depth: usize, center: Vec2, best: &mut Option<(usize, f32)>) {
    if nodes.is_empty() {
        return;
    }
    let mid = nodes.len() / 2;
    let node = nodes[mid];
    let dist_sq = node.point.distance_squared(center);
    if best.is_none_or(|(_, b)| dist_sq < b) {
        *best = Some((node.tag, dist_sq));
    }
    let diff = coord(center, depth) - coord(node.point, depth);
    let (near, far) = if diff <= 0.0 {
        (&nodes[..mid], &nodes[mid + 1..])
    } else {
        (&nodes[mid + 1..], &nodes[..mid])
    };
    nearest_in(near, depth + 1, center, best);
    if best.is_none_or(|(_, b)| diff * diff < b) {
        nearest_in(far, depth + 1, center, best);
    }
}
