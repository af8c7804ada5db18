//! Procedural terrain height and slope
//!
//! Terrain is never stored: the ground under any world x is recomputed from
//! the noise field on demand. Peers sharing a seed therefore agree on the
//! landscape without ever transmitting it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::noise::{NoiseField, OCTAVE_STRIDE};
use crate::{heading, map_range};

/// Horizontal scale applied to world x before sampling noise
pub const TERRAIN_NOISE_SCALE: f64 = 0.004;
/// Highest ground on screen (smallest y)
pub const TERRAIN_MIN_Y: f32 = 400.0;
/// Lowest ground on screen (largest y)
pub const TERRAIN_MAX_Y: f32 = 680.0;

const FRACTAL_OCTAVES: u32 = 4;
const FRACTAL_GAIN: f32 = 0.6;
const FRACTAL_LACUNARITY: f64 = 2.0;
const FRACTAL_FREQ_SCALE: f64 = 0.4;

/// Height algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerrainAlgorithm {
    /// Single noise sample
    #[default]
    Simple,
    /// Four-octave fractal sum (slower, craggier)
    Fractal,
}

/// Ground elevation as a pure function of x
#[derive(Debug, Clone)]
pub struct Terrain {
    noise: NoiseField,
    pub algorithm: TerrainAlgorithm,
}

impl Terrain {
    pub fn new(noise: NoiseField, algorithm: TerrainAlgorithm) -> Self {
        Self { noise, algorithm }
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Ground y at world x
    #[inline]
    pub fn height_at(&self, x: f32) -> f32 {
        self.height_at_z(x, 0.0)
    }

    /// Ground y at world x on the contour layer `z`
    pub fn height_at_z(&self, x: f32, z: f32) -> f32 {
        match self.algorithm {
            TerrainAlgorithm::Simple => {
                let n = self.simple_noise(x, z);
                map_range(n, 0.1, 0.9, TERRAIN_MAX_Y, TERRAIN_MIN_Y)
            }
            TerrainAlgorithm::Fractal => {
                let n = self.fractal_noise(x, z);
                map_range(n, 0.4, 1.35, TERRAIN_MAX_Y, TERRAIN_MIN_Y)
            }
        }
    }

    fn simple_noise(&self, x: f32, z: f32) -> f32 {
        self.noise.sample(
            x as f64 * TERRAIN_NOISE_SCALE,
            z as f64 * TERRAIN_NOISE_SCALE,
        )
    }

    /// Amplitude-weighted octave sum normalized by the total weight
    fn fractal_noise(&self, x: f32, z: f32) -> f32 {
        let mut amp = 1.0;
        let mut amp_total = 0.0;
        let mut freq = 1.0;
        let mut total = 0.0;
        for octave in 0..FRACTAL_OCTAVES {
            let sample = self.noise.sample(
                OCTAVE_STRIDE * octave as f64
                    + x as f64 * TERRAIN_NOISE_SCALE * freq * FRACTAL_FREQ_SCALE,
                z as f64 * TERRAIN_NOISE_SCALE,
            );
            total += sample * amp;
            amp_total += amp;
            amp *= FRACTAL_GAIN;
            freq *= FRACTAL_LACUNARITY;
        }
        total / amp_total
    }

    /// Angle of the ground under an object of the given wheelbase centered on x
    pub fn angle_at(&self, x: f32, wheelbase: f32) -> f32 {
        let x1 = x - wheelbase / 2.0;
        let x2 = x + wheelbase / 2.0;
        let left = Vec2::new(x1, self.height_at(x1));
        let right = Vec2::new(x2, self.height_at(x2));
        heading(right - left)
    }

    /// Upward-pointing unit normal of the ground at x
    pub fn normal_at(&self, x: f32, wheelbase: f32) -> Vec2 {
        let angle = self.angle_at(x, wheelbase);
        // y grows downward, so "up" is the surface direction turned -90°
        Vec2::new(angle.sin(), -angle.cos())
    }

    /// True if `pos` is below the ground surface
    #[inline]
    pub fn is_below_ground(&self, pos: Vec2) -> bool {
        pos.y > self.height_at(pos.x)
    }
}
