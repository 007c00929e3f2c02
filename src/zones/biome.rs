use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use hexx::Hex;
use rand::Rng;
use thiserror::Error;

use super::entities::ZoneId;
use crate::heights::Heights;

/// Index of a biome in its [`BiomeRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BiomeId(pub u16);

impl BiomeId {
    /// Position in the registry.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Failure reported by a [`ZoneGenerator`].
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{reason}")]
pub struct GeneratorError {
    /// Human-readable cause.
    pub reason: String,
}

impl GeneratorError {
    /// Wraps a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// One cell handed to a generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSite {
    /// Axial coordinate.
    pub hex: Hex,
    /// World-space center.
    pub center: Vec2,
}

/// Per-biome height policy.
///
/// Called once per zone with every member cell; must return exactly one
/// desired height per site, in order.
pub trait ZoneGenerator: Send + Sync + fmt::Debug {
    /// Desired surface height for each cell of `zone`.
    fn generate(&self, zone: ZoneId, cells: &[CellSite]) -> Result<Vec<f32>, GeneratorError>;
}

/// Depths of the lower layers below the generated surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerProfile {
    /// Surface → underground distance.
    pub soil_depth: f32,
    /// Surface → base distance.
    pub bedrock_depth: f32,
}

impl Default for LayerProfile {
    fn default() -> Self {
        Self {
            soil_depth: 2.0,
            bedrock_depth: 8.0,
        }
    }
}

impl LayerProfile {
    /// Layered heights under a surface at `surface`.
    pub fn heights_at(&self, surface: f32) -> Heights {
        Heights::new(
            surface,
            surface - self.soil_depth,
            surface - self.bedrock_depth,
        )
    }
}

/// A biome: a generator plus how often and how large its zones are.
#[derive(Clone, Debug)]
pub struct Biome {
    /// Registry tag.
    pub name: String,
    /// Height policy.
    pub generator: Arc<dyn ZoneGenerator>,
    /// Inclusive range of zone sizes, in cells.
    pub zone_size: RangeInclusive<usize>,
    /// Relative selection weight.
    pub weight: f32,
    /// Lower layer depths.
    pub layers: LayerProfile,
}

impl Biome {
    /// A biome with zones of 8-24 cells and unit weight.
    pub fn new(name: impl Into<String>, generator: impl ZoneGenerator + 'static) -> Self {
        Self {
            name: name.into(),
            generator: Arc::new(generator),
            zone_size: 8..=24,
            weight: 1.0,
            layers: LayerProfile::default(),
        }
    }

    /// Sets the zone size range.
    pub fn with_zone_size(mut self, zone_size: RangeInclusive<usize>) -> Self {
        self.zone_size = zone_size;
        self
    }

    /// Sets the selection weight.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the lower layer depths.
    pub fn with_layers(mut self, layers: LayerProfile) -> Self {
        self.layers = layers;
        self
    }
}

/// Tag → biome mapping. New biomes register here; nothing else changes.
#[derive(Resource, Clone, Debug, Default)]
pub struct BiomeRegistry {
    biomes: Vec<Biome>,
    by_name: HashMap<String, BiomeId>,
}

impl BiomeRegistry {
    /// Adds `biome`, replacing any biome registered under the same name.
    pub fn register(&mut self, biome: Biome) -> BiomeId {
        if let Some(&id) = self.by_name.get(&biome.name) {
            self.biomes[id.index()] = biome;
            return id;
        }
        let id = BiomeId(self.biomes.len() as u16);
        self.by_name.insert(biome.name.clone(), id);
        self.biomes.push(biome);
        id
    }

    /// Builder-style [`Self::register`].
    pub fn with(mut self, biome: Biome) -> Self {
        self.register(biome);
        self
    }

    /// Biome by id.
    pub fn get(&self, id: BiomeId) -> Option<&Biome> {
        self.biomes.get(id.index())
    }

    /// Biome id by tag.
    pub fn find(&self, name: &str) -> Option<BiomeId> {
        self.by_name.get(name).copied()
    }

    /// Registered biomes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BiomeId, &Biome)> {
        self.biomes
            .iter()
            .enumerate()
            .map(|(i, b)| (BiomeId(i as u16), b))
    }

    /// Number of registered biomes.
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }

    /// Draws a biome with probability proportional to its weight.
    ///
    /// Returns `None` when no biome has a positive weight.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<BiomeId> {
        let total: f32 = self.biomes.iter().map(|b| b.weight.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = rng.random_range(0.0..total);
        let mut last = None;
        for (id, biome) in self.iter() {
            let w = biome.weight.max(0.0);
            if w <= 0.0 {
                continue;
            }
            if roll < w {
                return Some(id);
            }
            roll -= w;
            last = Some(id);
        }
        last
    }
}
