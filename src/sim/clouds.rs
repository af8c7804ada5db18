//! Parallax cloud layers
//!
//! Clouds are never destroyed. One that drifts too far from the player is
//! moved to a fresh spot ahead of or behind them and resampled there.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::noise::{
    CLOUD_DENSITY_CHANNEL, CLOUD_HEIGHT_CHANNEL, CLOUD_LAYER_DENSITY_STRIDE,
    CLOUD_LAYER_HEIGHT_STRIDE, NoiseField,
};
use crate::consts::SPAWN_RANGE;
use crate::map_range;

pub const CLOUD_COUNT: usize = 100;
const CLOUD_HEIGHT_SCALE: f64 = 0.0001;
const CLOUD_DENSITY_SCALE: f64 = 0.001;
/// Clouds thinner than this are not drawn
pub const CLOUD_MIN_VISIBLE_DENSITY: f32 = 0.4;

/// Depth layer a cloud scrolls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudLayer {
    Near,
    Far,
}

impl CloudLayer {
    pub fn index(&self) -> u32 {
        match self {
            CloudLayer::Near => 0,
            CloudLayer::Far => 1,
        }
    }

    /// Fraction of the camera's horizontal motion this layer follows
    pub fn parallax(&self) -> f32 {
        match self {
            CloudLayer::Near => 1.0,
            CloudLayer::Far => 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cloud {
    pub pos: Vec2,
    pub vel: Vec2,
    pub layer: CloudLayer,
    pub width: f32,
    pub height: f32,
    pub density: f32,
}

impl Cloud {
    pub fn random(noise: &NoiseField, view_height: f32, rng: &mut Pcg32) -> Self {
        // One in three on the near layer
        let layer = if rng.random_range(0..3) == 0 {
            CloudLayer::Near
        } else {
            CloudLayer::Far
        };
        let mut x = rng.random_range(-SPAWN_RANGE..SPAWN_RANGE);
        if layer == CloudLayer::Far {
            x *= 2.0;
        }
        let speed = rng.random_range(0.001..0.2);
        let speed = if rng.random_bool(0.5) { speed } else { -speed };
        let width = rng.random_range(200.0..400.0);
        let height = width / rng.random_range(1.4..4.0);
        Self {
            pos: Vec2::new(x, cloud_height_at(noise, x, layer, view_height, rng)),
            vel: Vec2::new(speed, 0.0),
            layer,
            width,
            height,
            density: cloud_density_at(noise, x, layer),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.density >= CLOUD_MIN_VISIBLE_DENSITY
    }

    /// Drift, recycling when out of range of the player.
    ///
    /// Returns true if the cloud was relocated.
    pub fn update(
        &mut self,
        player_x: f32,
        view: Vec2,
        noise: &NoiseField,
        rng: &mut Pcg32,
    ) -> bool {
        self.pos += self.vel;
        let anchor = player_x * self.layer.parallax();
        if (self.pos.x - anchor).abs() <= view.x * 4.0 {
            return false;
        }
        let offset = rng.random_range(view.x * 1.1..view.x * 2.0);
        self.pos.x = if rng.random_bool(0.5) { anchor + offset } else { anchor - offset };
        self.pos.y = cloud_height_at(noise, self.pos.x, self.layer, view.y, rng);
        self.density = cloud_density_at(noise, self.pos.x, self.layer);
        true
    }
}

/// Cloud altitude follows a slow noise channel per layer, with some jitter
pub fn cloud_height_at(
    noise: &NoiseField,
    x: f32,
    layer: CloudLayer,
    view_height: f32,
    rng: &mut Pcg32,
) -> f32 {
    let channel = CLOUD_HEIGHT_CHANNEL + layer.index() as f64 * CLOUD_LAYER_HEIGHT_STRIDE;
    let n = noise.sample1(channel + x as f64 * CLOUD_HEIGHT_SCALE);
    map_range(n, 0.1, 0.9, 0.0, view_height * 0.8) + rng.random_range(-50.0..50.0)
}

pub fn cloud_density_at(noise: &NoiseField, x: f32, layer: CloudLayer) -> f32 {
    let channel = CLOUD_DENSITY_CHANNEL + layer.index() as f64 * CLOUD_LAYER_DENSITY_STRIDE;
    noise.sample1(channel + x as f64 * CLOUD_DENSITY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const VIEW: Vec2 = Vec2::new(1280.0, 800.0);

    #[test]
    fn test_layer_split() {
        let noise = NoiseField::new(123);
        let mut rng = Pcg32::seed_from_u64(1);
        let clouds: Vec<Cloud> = (0..CLOUD_COUNT)
            .map(|_| Cloud::random(&noise, VIEW.y, &mut rng))
            .collect();
        let near = clouds.iter().filter(|c| c.layer == CloudLayer::Near).count();
        assert!(near > 10 && near < 60, "near layer count {}", near);
        for c in &clouds {
            assert!(c.width >= 200.0 && c.width < 400.0);
            assert!(c.height > c.width / 4.0 - 1e-3 && c.height <= c.width / 1.4);
            assert!(c.vel.x.abs() < 0.2 && c.vel.x != 0.0);
        }
    }

    #[test]
    fn test_recycled_near_player() {
        let noise = NoiseField::new(123);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut cloud = Cloud::random(&noise, VIEW.y, &mut rng);
        cloud.layer = CloudLayer::Far;
        let player_x = 100_000.0;
        assert!(cloud.update(player_x, VIEW, &noise, &mut rng));
        let dist = (cloud.pos.x - player_x * 0.5).abs();
        assert!(dist >= VIEW.x * 1.1 && dist <= VIEW.x * 2.0);
        // Now in range; stays put apart from drift
        let x = cloud.pos.x;
        assert!(!cloud.update(player_x, VIEW, &noise, &mut rng));
        assert!((cloud.pos.x - x).abs() < 0.2 + 1e-3);
    }

    #[test]
    fn test_height_band() {
        let noise = NoiseField::new(7);
        let mut rng = Pcg32::seed_from_u64(3);
        for i in 0..200 {
            let h = cloud_height_at(&noise, i as f32 * 991.0, CloudLayer::Near, VIEW.y, &mut rng);
            assert!((-50.0..=VIEW.y * 0.8 + 50.0).contains(&h));
        }
    }
}
