//! Seeded continuous noise field
//!
//! One Perlin generator serves every procedural feature. Independent
//! "channels" are carved out of it by offsetting the input coordinate with a
//! large per-use constant instead of seeding more generators.

use std::fmt;

use noise::{NoiseFn, Perlin};

/// Offset between terrain fractal octaves
pub const OCTAVE_STRIDE: f64 = 3333.0;
/// Cloud height channel base, plus `CLOUD_LAYER_HEIGHT_STRIDE` per layer
pub const CLOUD_HEIGHT_CHANNEL: f64 = 20313.0;
pub const CLOUD_LAYER_HEIGHT_STRIDE: f64 = 99990.0;
/// Cloud density channel base, plus `CLOUD_LAYER_DENSITY_STRIDE` per layer
pub const CLOUD_DENSITY_CHANNEL: f64 = 999.0;
pub const CLOUD_LAYER_DENSITY_STRIDE: f64 = 444477.0;
/// Flag breeze channel
pub const BREEZE_CHANNEL: f64 = 1000.0;
/// Sun disc channel; off the integer lattice so Perlin doesn't pin to zero
pub const SUN_CHANNEL: f64 = 7777.5;

/// Deterministic noise in `[0, 1]`
#[derive(Clone)]
pub struct NoiseField {
    seed: u32,
    perlin: Perlin,
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            perlin: Perlin::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample the 2D field; output lies in `[0, 1]`
    pub fn sample(&self, x: f64, y: f64) -> f32 {
        let raw = self.perlin.get([x, y]);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }

    /// Sample along the x axis only
    #[inline]
    pub fn sample1(&self, x: f64) -> f32 {
        self.sample(x, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_in_unit_range() {
        let field = NoiseField::new(123);
        for i in -500..500 {
            let v = field.sample(i as f64 * 0.173, i as f64 * 0.031);
            assert!((0.0..=1.0).contains(&v), "sample {} out of range", v);
        }
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        for i in 0..100 {
            let x = i as f64 * 0.37;
            assert_eq!(a.sample1(x), b.sample1(x));
        }
    }

    #[test]
    fn test_small_steps_vary_smoothly() {
        let field = NoiseField::new(7);
        let mut prev = field.sample1(0.0);
        for i in 1..2000 {
            let v = field.sample1(i as f64 * 0.001);
            assert!((v - prev).abs() < 0.02, "jump of {} at step {}", v - prev, i);
            prev = v;
        }
    }

    #[test]
    fn test_channels_decorrelate() {
        let field = NoiseField::new(123);
        let x = 0.37;
        let terrain = field.sample1(x);
        let density = field.sample1(CLOUD_DENSITY_CHANNEL + x);
        let height = field.sample1(CLOUD_HEIGHT_CHANNEL + x);
        assert!(terrain != density || terrain != height);
    }
}
