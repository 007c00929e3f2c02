use bevy::platform::collections::HashSet;
use hexx::Hex;

/// Lazy, ring-indexed breadth-first expansion over hex adjacency.
///
/// Ring 0 is the start hex, ring `n` the admitted hexes first reached after
/// `n` steps. Each ring is computed on first request and cached for the life
/// of the enumerator. The enumerator snapshots nothing, so it must not
/// outlive a mutation of whatever `admit` inspects.
///
/// Iterating yields every reachable hex in ring order.
pub struct FloodFill<F> {
    admit: F,
    visited: HashSet<Hex>,
    rings: Vec<Vec<Hex>>,
    exhausted: bool,
    cursor: (usize, usize),
}

impl<F: FnMut(Hex) -> bool> FloodFill<F> {
    /// Starts a fill at `start`. A start rejected by `admit` yields nothing.
    pub fn new(start: Hex, mut admit: F) -> Self {
        let mut visited = HashSet::default();
        let first = if admit(start) {
            visited.insert(start);
            vec![start]
        } else {
            Vec::new()
        };
        Self {
            admit,
            visited,
            exhausted: first.is_empty(),
            rings: vec![first],
            cursor: (0, 0),
        }
    }

    /// Hexes at exactly `n` steps from the start; empty past the last ring.
    pub fn ring(&mut self, n: usize) -> &[Hex] {
        while self.rings.len() <= n && self.expand() {}
        self.rings.get(n).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of rings computed so far.
    pub fn computed_rings(&self) -> usize {
        self.rings.len()
    }

    /// `true` once no further ring can be produced.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Computes the next ring. Returns `false` when the fill is exhausted.
    fn expand(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let mut next = Vec::new();
        if let Some(last) = self.rings.last() {
            for hex in last {
                for neighbor in hex.all_neighbors() {
                    if !self.visited.contains(&neighbor) && (self.admit)(neighbor) {
                        self.visited.insert(neighbor);
                        next.push(neighbor);
                    }
                }
            }
        }
        if next.is_empty() {
            self.exhausted = true;
            return false;
        }
        self.rings.push(next);
        true
    }
}

impl<F: FnMut(Hex) -> bool> Iterator for FloodFill<F> {
    type Item = Hex;

    fn next(&mut self) -> Option<Hex> {
        loop {
            let (ring, idx) = self.cursor;
            if ring >= self.rings.len() && !self.expand() {
                return None;
            }
            if let Some(&hex) = self.rings[ring].get(idx) {
                self.cursor = (ring, idx + 1);
                return Some(hex);
            }
            if ring + 1 >= self.rings.len() && !self.expand() {
                return None;
            }
            self.cursor = (ring + 1, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::hex_distance;
    use std::cell::Cell;

    #[test]
    fn rings_match_hex_distance_on_open_plane() {
        let mut fill = FloodFill::new(Hex::ZERO, |h| hex_distance(h, Hex::ZERO) <= 5);
        assert_eq!(fill.ring(0), &[Hex::ZERO]);
        assert_eq!(fill.ring(1).len(), 6);
        assert_eq!(fill.ring(3).len(), 18);
        for &hex in fill.ring(4) {
            assert_eq!(hex_distance(hex, Hex::ZERO), 4);
        }
        assert!(fill.ring(6).is_empty());
        assert!(fill.is_exhausted());
    }

    #[test]
    fn rings_are_cached_not_recomputed() {
        let calls = Cell::new(0usize);
        let mut fill = FloodFill::new(Hex::ZERO, |h| {
            calls.set(calls.get() + 1);
            hex_distance(h, Hex::ZERO) <= 3
        });
        let ring2 = fill.ring(2).to_vec();
        let after_first = calls.get();
        assert_eq!(fill.ring(2), ring2.as_slice());
        assert_eq!(fill.ring(1).len(), 6);
        assert_eq!(fill.ring(0), &[Hex::ZERO]);
        assert_eq!(calls.get(), after_first);
        assert_eq!(fill.computed_rings(), 3);
    }

    #[test]
    fn iterator_yields_in_ring_order() {
        let fill = FloodFill::new(Hex::ZERO, |h| hex_distance(h, Hex::ZERO) <= 2);
        let order: Vec<u32> = fill.map(|h| hex_distance(h, Hex::ZERO)).collect();
        assert_eq!(order.len(), 19);
        for w in order.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn predicate_blocks_expansion() {
        // A wall along q = 1 keeps the fill on the q <= 0 half.
        let mut fill = FloodFill::new(Hex::ZERO, |h| h.x <= 0 && hex_distance(h, Hex::ZERO) <= 2);
        assert!(fill.all(|h| h.x <= 0));
    }

    #[test]
    fn rejected_start_yields_nothing() {
        let mut fill = FloodFill::new(Hex::ZERO, |_| false);
        assert!(fill.ring(0).is_empty());
        assert_eq!(fill.next(), None);
    }
}
