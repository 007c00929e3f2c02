//! Sparse, normalized zone membership of a world point.

use crate::zones::ZoneId;

/// Most zones an [`Influence`] retains.
pub const MAX_INFLUENCE_ZONES: usize = 4;

/// Up to four `(zone, weight)` pairs sorted by descending weight.
///
/// Weights sum to 1, or the value is empty. The dominant zone is resolved at
/// construction, so the value carries no lazily filled state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Influence {
    entries: [(ZoneId, f32); MAX_INFLUENCE_ZONES],
    len: u8,
}

impl Default for Influence {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Influence {
    /// No zones.
    pub const EMPTY: Self = Self {
        entries: [(ZoneId::INVALID, 0.0); MAX_INFLUENCE_ZONES],
        len: 0,
    };

    /// Full membership in one zone.
    pub fn single(zone: ZoneId) -> Self {
        let mut entries = Self::EMPTY.entries;
        entries[0] = (zone, 1.0);
        Self { entries, len: 1 }
    }

    /// Builds an influence from raw `(zone, weight)` samples.
    ///
    /// Samples are sorted by descending weight and merged per zone. Only the
    /// first [`MAX_INFLUENCE_ZONES`] distinct zones encountered in that order
    /// are kept; later zones are dropped for good, even if a later sample
    /// would have raised them. Non-positive and non-finite weights are
    /// ignored. The survivors are renormalized to sum to 1.
    pub fn from_weights<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (ZoneId, f32)>,
    {
        let mut sorted: Vec<(ZoneId, f32)> = samples
            .into_iter()
            .filter(|&(zone, w)| zone.is_valid() && w.is_finite() && w > 0.0)
            .collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut entries = Self::EMPTY.entries;
        let mut len = 0;
        for (zone, weight) in sorted {
            if let Some(entry) = entries[..len].iter_mut().find(|e| e.0 == zone) {
                entry.1 += weight;
            } else if len < MAX_INFLUENCE_ZONES {
                entries[len] = (zone, weight);
                len += 1;
            }
        }

        let total: f32 = entries[..len].iter().map(|e| e.1).sum();
        if len == 0 || total <= 0.0 {
            return Self::EMPTY;
        }
        for entry in &mut entries[..len] {
            entry.1 /= total;
        }
        entries[..len].sort_by(|a, b| b.1.total_cmp(&a.1));
        Self {
            entries,
            len: len as u8,
        }
    }

    /// Number of retained zones (0..=4).
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// `true` when no zone has influence.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Retained `(zone, weight)` pairs, heaviest first.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, f32)> + '_ {
        self.entries[..self.len()].iter().copied()
    }

    /// Weight of `zone`, zero if it was not retained.
    pub fn weight_of(&self, zone: ZoneId) -> f32 {
        self.iter()
            .find(|&(z, _)| z == zone)
            .map_or(0.0, |(_, w)| w)
    }

    /// The zone with the largest weight.
    pub fn most_influence_zone(&self) -> Option<ZoneId> {
        (!self.is_empty()).then_some(self.entries[0].0)
    }
}
