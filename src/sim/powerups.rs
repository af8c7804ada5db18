//! Supply crates dropped into the world

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::state::Liveness;
use super::tank::{TANK_MAX_HEALTH, Tank};
use super::terrain::Terrain;
use super::weapon::WeaponSystem;
use crate::consts::{POWERUP_GRAVITY, SPAWN_RANGE};

pub const POWERUP_SIZE: f32 = 40.0;
/// Height crates are dropped from
pub const POWERUP_DROP_Y: f32 = 200.0;
/// Landing speed below which a crate stops bouncing
const REST_SPEED: f32 = 1.0;
const BOUNCE_RESTITUTION: f32 = -0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Armor,
    Ammo,
    Repair,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Armor, PowerupKind::Ammo, PowerupKind::Repair];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Armor => "armor",
            PowerupKind::Ammo => "ammo",
            PowerupKind::Repair => "repair",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Powerup {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: PowerupKind,
    pub size: f32,
    /// Shot open; only opened crates can be collected
    pub opened: bool,
    pub liveness: Liveness,
}

impl Powerup {
    pub fn new(pos: Vec2, kind: PowerupKind) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            kind,
            size: POWERUP_SIZE,
            opened: false,
            liveness: Liveness::Alive,
        }
    }

    /// A closed crate of random kind dropped somewhere in the spawn range
    pub fn random(rng: &mut Pcg32) -> Self {
        let x = rng.random_range(-SPAWN_RANGE..SPAWN_RANGE);
        let kind = *PowerupKind::ALL.choose(rng).unwrap_or(&PowerupKind::Ammo);
        Self::new(Vec2::new(x, POWERUP_DROP_Y), kind)
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.liveness == Liveness::Dead
    }

    /// Fall, then settle on the ground with a damped bounce
    pub fn update(&mut self, terrain: &Terrain) {
        self.pos += self.vel;
        let ground = terrain.height_at(self.pos.x);
        if self.pos.y >= ground {
            self.pos.y = ground;
            if self.vel.y.abs() > REST_SPEED {
                self.vel.y *= BOUNCE_RESTITUTION;
            } else {
                self.vel.y = 0.0;
            }
        } else {
            self.vel.y += POWERUP_GRAVITY;
        }
    }

    pub fn open(&mut self) {
        self.opened = true;
    }

    /// Whether `tank` would benefit from this crate right now
    pub fn can_be_collected_by(&self, tank: &Tank) -> bool {
        if !tank.is_alive() {
            return false;
        }
        match self.kind {
            PowerupKind::Repair => tank.health < TANK_MAX_HEALTH,
            PowerupKind::Ammo => true,
            PowerupKind::Armor => false,
        }
    }

    /// Hand the crate's contents to a tank standing on it.
    ///
    /// Returns the kind collected; the crate is then dead.
    pub fn try_collect(&mut self, tank: &mut Tank, weapon: &mut WeaponSystem) -> Option<PowerupKind> {
        if self.is_dead() || !self.opened || self.pos.distance(tank.pos) >= self.size {
            return None;
        }
        if !self.can_be_collected_by(tank) {
            return None;
        }
        match self.kind {
            PowerupKind::Repair => tank.repair(),
            PowerupKind::Ammo => weapon.refill(),
            PowerupKind::Armor => {}
        }
        self.liveness = Liveness::Dead;
        Some(self.kind)
    }
}
