use std::fmt;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::biome::{Biome, BiomeRegistry, CellSite, GeneratorError, LayerProfile, ZoneGenerator};
use super::entities::ZoneId;
use crate::math;

/// Every cell at the same height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatGenerator {
    /// Surface height.
    pub height: f32,
}

impl ZoneGenerator for FlatGenerator {
    fn generate(&self, _zone: ZoneId, cells: &[CellSite]) -> Result<Vec<f32>, GeneratorError> {
        Ok(vec![self.height; cells.len()])
    }
}

/// fBm Perlin noise sampled at each cell center, mapped into a height range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HillsGenerator {
    /// Noise seed.
    pub seed: u32,
    /// Number of fBm octaves.
    pub octaves: usize,
    /// Spatial scale divisor for noise sampling.
    pub scale: f64,
    /// Height at noise `-1`.
    pub min_height: f32,
    /// Height at noise `1`.
    pub max_height: f32,
}

impl Default for HillsGenerator {
    fn default() -> Self {
        Self {
            seed: 42,
            octaves: 4,
            scale: 50.0,
            min_height: 0.0,
            max_height: 10.0,
        }
    }
}

impl ZoneGenerator for HillsGenerator {
    fn generate(&self, _zone: ZoneId, cells: &[CellSite]) -> Result<Vec<f32>, GeneratorError> {
        if self.scale <= 0.0 {
            return Err(GeneratorError::new(format!(
                "noise scale must be positive, got {}",
                self.scale
            )));
        }
        let fbm: Fbm<Perlin> = Fbm::new(self.seed).set_octaves(self.octaves);
        Ok(cells
            .iter()
            .map(|site| {
                let noise_val = fbm.get([
                    site.center.x as f64 / self.scale,
                    site.center.y as f64 / self.scale,
                ]);
                math::map_noise_to_range(noise_val.clamp(-1.0, 1.0), self.min_height, self.max_height)
            })
            .collect())
    }
}

/// Adapts a closure into a [`ZoneGenerator`].
pub struct FnGenerator<F>(pub F);

impl<F> fmt::Debug for FnGenerator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnGenerator")
    }
}

impl<F> ZoneGenerator for FnGenerator<F>
where
    F: Fn(ZoneId, &[CellSite]) -> Result<Vec<f32>, GeneratorError> + Send + Sync,
{
    fn generate(&self, zone: ZoneId, cells: &[CellSite]) -> Result<Vec<f32>, GeneratorError> {
        (self.0)(zone, cells)
    }
}

/// Folds a 64-bit seed into the 32 bits the noise functions take.
fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Lowlands, rolling hills, and high plateaus.
pub fn default_biomes(seed: u64) -> BiomeRegistry {
    let seed = noise_seed(seed);
    BiomeRegistry::default()
        .with(
            Biome::new(
                "lowlands",
                HillsGenerator {
                    seed,
                    octaves: 3,
                    scale: 120.0,
                    min_height: 0.0,
                    max_height: 3.0,
                },
            )
            .with_zone_size(16..=40)
            .with_weight(3.0),
        )
        .with(
            Biome::new(
                "hills",
                HillsGenerator {
                    seed: seed.wrapping_add(1),
                    min_height: 2.0,
                    max_height: 14.0,
                    ..HillsGenerator::default()
                },
            )
            .with_zone_size(8..=24)
            .with_weight(2.0),
        )
        .with(
            Biome::new("plateau", FlatGenerator { height: 12.0 })
                .with_zone_size(4..=12)
                .with_layers(LayerProfile {
                    soil_depth: 0.5,
                    bedrock_depth: 3.0,
                }),
        )
}
