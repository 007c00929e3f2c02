//! Grid payloads for the zone field: cells, edges, vertices, zones, and the
//! biome registry that supplies per-zone height generators.

mod biome;
mod entities;
mod generators;

pub use biome::{Biome, BiomeId, BiomeRegistry, CellSite, GeneratorError, LayerProfile, ZoneGenerator};
pub use entities::{Cell, EdgeData, VertexData, Zone, ZoneGrid, ZoneId};
pub use generators::{FlatGenerator, FnGenerator, HillsGenerator, default_biomes};
