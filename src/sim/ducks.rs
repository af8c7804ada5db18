//! Shooting-gallery ducks

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Liveness;
use super::terrain::Terrain;
use crate::consts::{DUCK_GRAVITY, SPAWN_RANGE};
use crate::{from_angle, heading, map_range};

pub const DUCK_SIZE: f32 = 40.0;
/// Height of ducks that are not planted on the ground
pub const DUCK_AIR_Y: f32 = 200.0;
/// Half-width of the sway around the anchor point
pub const DUCK_SWAY: f32 = 50.0;
/// Speed a hit duck is knocked away at
pub const DUCK_KNOCKBACK: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuckMotion {
    /// Slide along the ground around the anchor
    Horizontal,
    /// Bob up and down around the anchor
    Vertical,
    Still,
}

#[derive(Debug, Clone)]
pub struct Duck {
    pub home_pos: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
    pub motion: DuckMotion,
    /// Artwork variant, 1..=3
    pub variant: u8,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub liveness: Liveness,
}

impl Duck {
    pub fn new(home_pos: Vec2, motion: DuckMotion, variant: u8) -> Self {
        Self {
            home_pos,
            pos: home_pos,
            vel: Vec2::ZERO,
            motion,
            variant,
            size: DUCK_SIZE,
            rotation: 0.0,
            rotation_speed: 0.0,
            liveness: Liveness::Alive,
        }
    }

    /// A duck somewhere in the spawn range, half of them planted on the ground
    pub fn random(terrain: &Terrain, rng: &mut Pcg32) -> Self {
        let on_ground = rng.random_bool(0.5);
        let motion = match rng.random_range(0..3) {
            0 => DuckMotion::Horizontal,
            1 => DuckMotion::Vertical,
            _ => DuckMotion::Still,
        };
        let x = rng.random_range(-SPAWN_RANGE..SPAWN_RANGE);
        let y = if on_ground { terrain.height_at(x) } else { DUCK_AIR_Y };
        Self::new(Vec2::new(x, y), motion, rng.random_range(1..=3))
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.liveness == Liveness::Alive
    }

    pub fn update(&mut self, frame: u64, terrain: &Terrain, view_height: f32) {
        self.pos += self.vel;
        match self.liveness {
            Liveness::Dying => {
                self.vel.y += DUCK_GRAVITY;
                self.rotation += self.rotation_speed;
                if self.pos.y > view_height {
                    self.liveness = Liveness::Dead;
                }
            }
            Liveness::Alive => match self.motion {
                DuckMotion::Horizontal => {
                    let x = self.home_pos.x + sway(frame, 40.0);
                    self.pos = Vec2::new(x, terrain.height_at(x));
                }
                DuckMotion::Vertical => {
                    self.pos = Vec2::new(
                        self.home_pos.x,
                        self.home_pos.y + sway(frame, 30.0),
                    );
                }
                DuckMotion::Still => {}
            },
            Liveness::Dead => {}
        }
    }

    /// Knock the duck off its stick along the projectile's path
    pub fn take_hit(&mut self, projectile_vel: Vec2, rng: &mut Pcg32) {
        if !self.is_alive() {
            return;
        }
        self.liveness = Liveness::Dying;
        let angle = heading(projectile_vel) + rng.random_range(-0.5..0.5);
        self.vel = from_angle(angle) * DUCK_KNOCKBACK;
        let spin = rng.random_range(0.02..0.2);
        self.rotation_speed = if rng.random_bool(0.5) { spin } else { -spin };
    }
}

fn sway(frame: u64, period: f32) -> f32 {
    map_range((frame as f32 / period).sin(), -1.0, 1.0, -DUCK_SWAY, DUCK_SWAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::noise::NoiseField;
    use crate::sim::terrain::TerrainAlgorithm;
    use rand::SeedableRng;

    fn terrain() -> Terrain {
        Terrain::new(NoiseField::new(123), TerrainAlgorithm::Simple)
    }

    #[test]
    fn test_horizontal_duck_rides_the_ground() {
        let terrain = terrain();
        let mut duck = Duck::new(Vec2::new(500.0, 0.0), DuckMotion::Horizontal, 1);
        for frame in 0..200 {
            duck.update(frame, &terrain, 800.0);
            assert!((duck.pos.x - 500.0).abs() <= DUCK_SWAY + 1e-3);
            assert_eq!(duck.pos.y, terrain.height_at(duck.pos.x));
        }
    }

    #[test]
    fn test_vertical_duck_bobs_around_anchor() {
        let terrain = terrain();
        let mut duck = Duck::new(Vec2::new(0.0, DUCK_AIR_Y), DuckMotion::Vertical, 2);
        for frame in 0..200 {
            duck.update(frame, &terrain, 800.0);
            assert_eq!(duck.pos.x, 0.0);
            assert!((duck.pos.y - DUCK_AIR_Y).abs() <= DUCK_SWAY + 1e-3);
        }
    }

    #[test]
    fn test_hit_duck_falls_out_of_view() {
        let terrain = terrain();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut duck = Duck::new(Vec2::new(0.0, DUCK_AIR_Y), DuckMotion::Still, 3);
        duck.take_hit(Vec2::new(5.0, 0.0), &mut rng);
        assert_eq!(duck.liveness, Liveness::Dying);
        assert!((duck.vel.length() - DUCK_KNOCKBACK).abs() < 1e-4);
        assert!(duck.rotation_speed.abs() >= 0.02);

        let mut frames = 0;
        while duck.liveness != Liveness::Dead {
            duck.update(frames, &terrain, 800.0);
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(duck.pos.y > 800.0);

        // Dead is terminal
        duck.take_hit(Vec2::new(5.0, 0.0), &mut rng);
        assert_eq!(duck.liveness, Liveness::Dead);
    }

    #[test]
    fn test_random_ducks_in_range() {
        let terrain = terrain();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let duck = Duck::random(&terrain, &mut rng);
            assert!(duck.pos.x.abs() <= SPAWN_RANGE);
            assert!((1..=3).contains(&duck.variant));
            assert!(duck.pos.y == DUCK_AIR_Y || duck.pos.y == terrain.height_at(duck.pos.x));
        }
    }
}
