//! Lattice arithmetic and falloff curves.
//!
//! Cube rounding, hex distance, line rasterization, and the smoothing kernels
//! used for Shepard weights. Nothing here touches grid state.

use bevy::prelude::*;
use hexx::Hex;

/// Maps a noise value from the standard `[-1, 1]` range into `[min, max]`.
///
/// Noise generators (e.g. `Fbm<Perlin>`) produce values centred around zero.
/// This linearly rescales to an arbitrary output range.
///
/// # Examples
/// ```
/// # use hex_zones::math::map_noise_to_range;
/// assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
/// assert_eq!(map_noise_to_range( 1.0, 0.0, 10.0), 10.0);
/// assert_eq!(map_noise_to_range( 0.0, 2.0, 6.0),  4.0);
/// ```
pub fn map_noise_to_range(noise_val: f64, min: f32, max: f32) -> f32 {
    min + ((noise_val as f32 + 1.0) / 2.0) * (max - min)
}

/// Rounds half-way values up (`floor(v + 0.5)`), independent of sign.
fn round_half_up(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Rounds fractional axial coordinates `(q, r)` to the containing hex.
///
/// Each cube component is rounded with [`round_half_up`]. The component with
/// the largest rounding error is then recomputed from the other two so that
/// `q + r + s == 0`. Ties between errors resolve in the order `q`, `r`, `s`:
/// `q` is only corrected when its error is strictly the largest, otherwise `r`
/// when its error strictly exceeds `s`, otherwise `s`.
pub fn cube_round(q: f32, r: f32) -> Hex {
    let s = -q - r;
    let mut rq = round_half_up(q);
    let mut rr = round_half_up(r);
    let rs = round_half_up(s);

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    Hex::new(rq as i32, rr as i32)
}

/// Hex distance in steps between two axial coordinates.
///
/// Computed in `i64` so any pair of `i32` coordinates is valid; distances
/// past `u32::MAX` saturate.
pub fn hex_distance(a: Hex, b: Hex) -> u32 {
    let dq = i64::from(a.x) - i64::from(b.x);
    let dr = i64::from(a.y) - i64::from(b.y);
    let d = (dq.abs() + dr.abs() + (dq + dr).abs()) / 2;
    u32::try_from(d).unwrap_or(u32::MAX)
}

/// Ordered hexes approximating the straight segment `from → to`.
///
/// Samples `N + 1` evenly spaced points in cube space (`N` = hex distance) and
/// snaps each with [`cube_round`]. No epsilon nudge is applied, so exact ties
/// resolve through the rounding rule alone.
pub fn hex_line(from: Hex, to: Hex) -> Vec<Hex> {
    let n = hex_distance(from, to);
    if n == 0 {
        return vec![from];
    }
    let step = 1.0 / n as f32;
    (0..=n)
        .map(|i| {
            let t = i as f32 * step;
            let q = from.x as f32 + (to.x - from.x) as f32 * t;
            let r = from.y as f32 + (to.y - from.y) as f32 * t;
            cube_round(q, r)
        })
        .collect()
}

/// Monotonic smoothing curve applied to the normalised Shepard distance.
///
/// Every variant maps `0 → 0` and `1 → 1` and is non-decreasing in between.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum SmoothingKernel {
    /// `t`
    Linear,
    /// `t²`
    Quadratic,
    /// `3t² − 2t³`
    #[default]
    Smoothstep,
    /// `6t⁵ − 15t⁴ + 10t³`
    Smootherstep,
    /// `1 − (1 − t)³`, front-loaded falloff.
    EaseOutCubic,
}

impl SmoothingKernel {
    /// Applies the curve to `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Quadratic => t * t,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
            Self::Smootherstep => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
            Self::EaseOutCubic => ease_out_cubic(t),
        }
    }

    /// Shepard weight `K(1 − d / radius)`; zero at and beyond `radius`.
    pub fn weight(self, distance: f32, radius: f32) -> f32 {
        if radius <= 0.0 || distance >= radius {
            return 0.0;
        }
        self.apply(1.0 - distance / radius)
    }
}

/// Cubic ease-out curve: fast start, gentle deceleration.
///
/// `t` should be in `[0, 1]`. Returns `1 - (1 - t)^3`.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
