//! Explosion debris and tread dust

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::collision::reflect_velocity;
use super::terrain::Terrain;
use crate::consts::DEBRIS_GRAVITY;
use crate::from_angle;
use crate::palette::{self, Color};

pub const PARTICLES_PER_EXPLOSION: usize = 5;
/// Velocity kept after bouncing off the ground
pub const BOUNCE_DAMPING: f32 = 0.8;
/// Frames of life lost per bounce
pub const BOUNCE_LIFE_PENALTY: f32 = 10.0;
/// Wheelbase used when sampling the ground slope at an impact
const IMPACT_WHEELBASE: f32 = 10.0;

pub const DUST_LIFE: f32 = 100.0;
/// Life lost by dust for each frame spent below ground
pub const DUST_BURIED_PENALTY: f32 = 30.0;

/// What was hit; selects the debris palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionKind {
    Ground,
    Tank,
    CrateClosed,
    Rainbow,
}

impl ExplosionKind {
    pub fn palette(&self) -> &'static [Color] {
        match self {
            ExplosionKind::Ground => &palette::GROUND_IMPACT,
            ExplosionKind::Tank => &palette::TANK_IMPACT,
            ExplosionKind::CrateClosed => &palette::CRATE_CLOSED_IMPACT,
            ExplosionKind::Rainbow => &palette::RAINBOW,
        }
    }
}

/// A single piece of debris
#[derive(Debug, Clone)]
pub struct ExplosionParticle {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub frames_remaining: f32,
}

impl ExplosionParticle {
    pub fn update(&mut self, terrain: &Terrain, rng: &mut Pcg32) {
        self.prev_pos = self.pos;
        self.pos += self.vel;
        self.rotation += self.rotation_speed;
        self.vel.y += DEBRIS_GRAVITY;

        if terrain.is_below_ground(self.pos) {
            self.pos = self.prev_pos;
            let normal = terrain.normal_at(self.pos.x, IMPACT_WHEELBASE);
            self.vel = reflect_velocity(self.vel, normal) * BOUNCE_DAMPING;
            self.rotation_speed = rng.random_range(-0.1..0.1);
            self.frames_remaining -= BOUNCE_LIFE_PENALTY;
        }
        self.frames_remaining -= 1.0;
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.frames_remaining <= 0.0
    }
}

/// A burst of debris thrown up from an impact point
#[derive(Debug, Clone)]
pub struct Explosion {
    pub kind: ExplosionKind,
    pub particles: Vec<ExplosionParticle>,
}

impl Explosion {
    /// Throw debris away from the ground surface at `pos`
    pub fn spawn(pos: Vec2, kind: ExplosionKind, terrain: &Terrain, rng: &mut Pcg32) -> Self {
        let colors = kind.palette();
        let core_angle = terrain.angle_at(pos.x, IMPACT_WHEELBASE) - FRAC_PI_2;
        let particles = (0..PARTICLES_PER_EXPLOSION)
            .map(|_| {
                let angle = core_angle + rng.random_range(-0.7..0.7);
                let speed = rng.random_range(5.0..20.0);
                ExplosionParticle {
                    pos,
                    prev_pos: pos,
                    vel: from_angle(angle) * speed,
                    color: colors.choose(rng).copied().unwrap_or(palette::WHITE),
                    size: rng.random_range(2.0..5.0),
                    rotation: rng.random_range(0.0..TAU),
                    rotation_speed: rng.random_range(-0.1..0.1),
                    frames_remaining: rng.random_range(30.0..60.0),
                }
            })
            .collect();
        Self { kind, particles }
    }

    /// Update all debris and drop the expired pieces
    pub fn update(&mut self, terrain: &Terrain, rng: &mut Pcg32) {
        for particle in &mut self.particles {
            particle.update(terrain, rng);
        }
        self.particles.retain(|p| !p.is_dead());
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Dust kicked up behind a moving tank
#[derive(Debug, Clone)]
pub struct DustParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub color: Color,
    pub life: f32,
}

impl DustParticle {
    /// Dust thrown from `src` along `angle`, faster the quicker the tank moves
    pub fn thrown(src: Vec2, src_speed: f32, angle: f32, rng: &mut Pcg32) -> Self {
        let jitter = from_angle(rng.random_range(0.0..TAU)) * 10.0;
        Self {
            pos: src + jitter,
            vel: from_angle(angle) * (src_speed * 3.0).abs(),
            size: rng.random_range(3.0..8.0),
            rotation: rng.random_range(0.0..TAU),
            rotation_speed: rng.random_range(-0.2..0.2),
            color: palette::DUST_COLORS.choose(rng).copied().unwrap_or(palette::DUST),
            life: DUST_LIFE,
        }
    }

    pub fn update(&mut self, terrain: &Terrain) {
        self.pos += self.vel;
        self.vel.y += DEBRIS_GRAVITY;
        self.rotation += self.rotation_speed;
        self.life -= 1.0;
        if terrain.is_below_ground(self.pos) {
            self.life -= DUST_BURIED_PENALTY;
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}
