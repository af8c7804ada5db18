//! Tanks: the local player and the proxies standing in for remote players

use std::f32::consts::PI;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::DustParticle;
use super::state::Liveness;
use super::terrain::Terrain;
use crate::{from_angle, heading};

/// Network identifier of a tank (kept below 2^53 so JS peers can hold it)
pub type TankId = u64;

pub const TANK_MAX_HEALTH: u8 = 3;
pub const TANK_HIT_RADIUS: f32 = 40.0;
/// Tanks ride this far above the ground line
pub const TANK_GROUND_OFFSET: f32 = 20.0;
pub const TANK_WHEELBASE: f32 = 40.0;
pub const TANK_ACCEL: f32 = 0.15;
pub const TANK_VEL_DECAY: f32 = 0.95;
/// Vertical speed pressing an idle tank onto the ground
pub const TANK_SETTLE_SPEED: f32 = 3.0;

pub const AIM_POWER_MIN: f32 = 20.0;
pub const AIM_POWER_MAX: f32 = 100.0;
pub const AIM_POWER_STEP: f32 = 2.0;
pub const BARREL_ANGLE_MIN: f32 = -PI - 0.5;
pub const BARREL_ANGLE_MAX: f32 = 0.5;
pub const BARREL_ANGLE_STEP: f32 = 0.02;

/// Shot speed per unit of aim power
pub const POWER_TO_SPEED: f32 = 1.0 / 3.5;
/// Distance from tank center to where shots appear
pub const MUZZLE_DISTANCE: f32 = 50.0;

pub const DAMAGE_FLASH_FRAMES: u32 = 10;
/// Explosions in the burst played when a tank is destroyed
pub const DEATH_BURST_COUNT: u32 = 10;
/// Ticks between burst explosions (~100 ms at 60 Hz)
pub const DEATH_BURST_SPACING: u64 = 6;

/// Team colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    pub fn opponent(&self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }

    /// -1 for red (west), +1 for blue (east)
    pub fn side(&self) -> f32 {
        match self {
            Team::Red => -1.0,
            Team::Blue => 1.0,
        }
    }
}

/// Held-key state driving the local tank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TankControls {
    pub left: bool,
    pub right: bool,
    /// Raise the barrel ("w")
    pub barrel_up: bool,
    /// Lower the barrel ("s")
    pub barrel_down: bool,
    pub power_up: bool,
    pub power_down: bool,
}

impl TankControls {
    /// Horizontal acceleration requested this frame (right wins ties)
    pub fn accel(&self) -> f32 {
        if self.right {
            TANK_ACCEL
        } else if self.left {
            -TANK_ACCEL
        } else {
            0.0
        }
    }
}

/// Result of a projectile striking a tank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Wounded,
    Destroyed,
    /// Already dying or dead; only the flash is shown
    Ignored,
}

/// A tank entity
#[derive(Debug, Clone)]
pub struct Tank {
    pub id: TankId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub facing_right: bool,
    /// Aim power is being adjusted this frame
    pub aiming: bool,
    pub aim_power: f32,
    /// Barrel angle relative to the body (radians)
    pub barrel_angle: f32,
    /// Body tilt following the ground (radians)
    pub body_angle: f32,
    pub health: u8,
    /// Frames left to show the hit flash
    pub damage_display: u32,
    pub hit_radius: f32,
    pub team: Team,
    pub liveness: Liveness,
    /// Frames until a dying tank is finished
    pub dying_frames: u32,
}

impl Tank {
    pub fn new(id: TankId, pos: Vec2, team: Team) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(0.0, 1.0),
            facing_right: true,
            aiming: false,
            aim_power: 50.0,
            barrel_angle: 0.0,
            body_angle: 0.0,
            health: TANK_MAX_HEALTH,
            damage_display: 0,
            hit_radius: TANK_HIT_RADIUS,
            team,
            liveness: Liveness::Alive,
            dying_frames: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.liveness == Liveness::Alive
    }

    /// Advance the locally controlled tank one frame.
    ///
    /// Returns a dust particle when the treads kick one up.
    pub fn update_local(
        &mut self,
        controls: &TankControls,
        terrain: &Terrain,
        rng: &mut Pcg32,
    ) -> Option<DustParticle> {
        self.pos += self.vel;
        self.damage_display = self.damage_display.saturating_sub(1);
        self.tick_dying();

        let accel = controls.accel();

        let mut dust = None;
        let ground_y = terrain.height_at(self.pos.x) - TANK_GROUND_OFFSET;
        if self.pos.y > ground_y {
            self.pos.y = ground_y;
            dust = self.maybe_throw_dust(accel, rng);
        }

        self.body_angle = terrain.angle_at(self.pos.x, TANK_WHEELBASE);

        if accel != 0.0 {
            self.vel.x += accel;
        } else {
            self.vel.x *= TANK_VEL_DECAY;
            self.vel.y = TANK_SETTLE_SPEED;
        }

        // Zero velocity keeps the previous facing
        if self.vel.x > 0.0 {
            self.facing_right = true;
        } else if self.vel.x < 0.0 {
            self.facing_right = false;
        }

        self.aim(controls);
        dust
    }

    /// Per-frame upkeep for a remote proxy (no physics, snapshots drive it)
    pub fn update_proxy(&mut self) {
        self.damage_display = self.damage_display.saturating_sub(1);
        self.tick_dying();
    }

    fn tick_dying(&mut self) {
        if self.liveness == Liveness::Dying {
            self.dying_frames = self.dying_frames.saturating_sub(1);
            if self.dying_frames == 0 {
                self.liveness = Liveness::Dead;
            }
        }
    }

    fn aim(&mut self, controls: &TankControls) {
        if controls.barrel_up {
            if self.barrel_angle > BARREL_ANGLE_MIN {
                self.barrel_angle -= BARREL_ANGLE_STEP;
            }
        } else if controls.barrel_down && self.barrel_angle < BARREL_ANGLE_MAX {
            self.barrel_angle += BARREL_ANGLE_STEP;
        }

        if controls.power_up {
            if self.aim_power < AIM_POWER_MAX {
                self.aim_power = (self.aim_power + AIM_POWER_STEP).min(AIM_POWER_MAX);
                self.aiming = true;
            }
        } else if controls.power_down {
            if self.aim_power > AIM_POWER_MIN {
                self.aim_power = (self.aim_power - AIM_POWER_STEP).max(AIM_POWER_MIN);
                self.aiming = true;
            }
        } else {
            self.aiming = false;
        }
    }

    fn maybe_throw_dust(&self, accel: f32, rng: &mut Pcg32) -> Option<DustParticle> {
        if self.vel.x.abs() <= 0.2 || accel == 0.0 {
            return None;
        }
        let src = Vec2::new(
            self.pos.x - self.vel.x.signum() * 20.0,
            self.pos.y + 20.0,
        );
        let throw_angle = if self.facing_right {
            self.body_angle - PI + 20f32.to_radians()
        } else {
            self.body_angle - 20f32.to_radians()
        };
        Some(DustParticle::thrown(src, self.vel.x, throw_angle, rng))
    }

    /// World angle the barrel points along
    pub fn firing_angle(&self) -> f32 {
        if self.facing_right {
            self.barrel_angle + self.body_angle
        } else {
            -PI + self.body_angle - self.barrel_angle
        }
    }

    /// Spawn position and velocity of a shot fired now
    pub fn muzzle(&self) -> (Vec2, Vec2) {
        let vel = from_angle(self.firing_angle()) * self.aim_power * POWER_TO_SPEED;
        let pos = self.pos + from_angle(heading(vel)) * MUZZLE_DISTANCE;
        (pos, vel)
    }

    pub fn take_damage(&mut self) -> DamageOutcome {
        self.damage_display = DAMAGE_FLASH_FRAMES;
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.liveness = Liveness::Dying;
            self.dying_frames = DEATH_BURST_COUNT * DEATH_BURST_SPACING as u32;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Wounded
        }
    }

    pub fn repair(&mut self) {
        self.health = (self.health + 1).min(TANK_MAX_HEALTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::noise::NoiseField;
    use crate::sim::terrain::TerrainAlgorithm;
    use rand::SeedableRng;

    fn setup() -> (Terrain, Pcg32) {
        (
            Terrain::new(NoiseField::new(123), TerrainAlgorithm::Simple),
            Pcg32::seed_from_u64(1),
        )
    }

    #[test]
    fn test_tank_never_sinks_below_ground() {
        let (terrain, mut rng) = setup();
        let mut tank = Tank::new(1, Vec2::new(200.0, 300.0), Team::Red);
        let controls = TankControls {
            right: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tank.update_local(&controls, &terrain, &mut rng);
            let ground = terrain.height_at(tank.pos.x) - TANK_GROUND_OFFSET;
            assert!(tank.pos.y <= ground + 1e-3);
        }
    }

    #[test]
    fn test_velocity_decays_without_input() {
        let (terrain, mut rng) = setup();
        let mut tank = Tank::new(1, Vec2::new(0.0, 300.0), Team::Red);
        tank.vel.x = 4.0;
        tank.update_local(&TankControls::default(), &terrain, &mut rng);
        assert!((tank.vel.x - 4.0 * TANK_VEL_DECAY).abs() < 1e-5);
        assert_eq!(tank.vel.y, TANK_SETTLE_SPEED);
    }

    #[test]
    fn test_facing_kept_at_zero_velocity() {
        let (terrain, mut rng) = setup();
        let mut tank = Tank::new(1, Vec2::new(0.0, 300.0), Team::Blue);
        tank.vel.x = -1.0;
        tank.update_local(&TankControls::default(), &terrain, &mut rng);
        assert!(!tank.facing_right);
        tank.vel.x = 0.0;
        tank.update_local(&TankControls::default(), &terrain, &mut rng);
        assert!(!tank.facing_right);
    }

    #[test]
    fn test_aim_is_bounded() {
        let (terrain, mut rng) = setup();
        let mut tank = Tank::new(1, Vec2::new(0.0, 300.0), Team::Red);
        let up = TankControls {
            power_up: true,
            barrel_down: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tank.update_local(&up, &terrain, &mut rng);
        }
        assert!(tank.aim_power <= AIM_POWER_MAX);
        assert!(tank.barrel_angle <= BARREL_ANGLE_MAX + BARREL_ANGLE_STEP);
        assert!(tank.aiming);

        let down = TankControls {
            power_down: true,
            barrel_up: true,
            ..Default::default()
        };
        for _ in 0..500 {
            tank.update_local(&down, &terrain, &mut rng);
        }
        assert!(tank.aim_power >= AIM_POWER_MIN);
        assert!(tank.barrel_angle >= BARREL_ANGLE_MIN - BARREL_ANGLE_STEP);
    }

    #[test]
    fn test_firing_angle_mirrors_when_facing_left() {
        let mut tank = Tank::new(1, Vec2::ZERO, Team::Red);
        tank.barrel_angle = -0.5;
        tank.body_angle = 0.1;
        assert!((tank.firing_angle() - (-0.4)).abs() < 1e-6);
        tank.facing_right = false;
        assert!((tank.firing_angle() - (-PI + 0.1 + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_muzzle_sits_outside_hit_radius() {
        let tank = Tank::new(1, Vec2::new(10.0, 20.0), Team::Red);
        let (pos, vel) = tank.muzzle();
        assert!((pos.distance(tank.pos) - MUZZLE_DISTANCE).abs() < 1e-3);
        assert!(pos.distance(tank.pos) > tank.hit_radius);
        assert!((vel.length() - 50.0 / 3.5).abs() < 1e-3);
    }

    #[test]
    fn test_damage_state_machine() {
        let mut tank = Tank::new(1, Vec2::ZERO, Team::Red);
        assert_eq!(tank.take_damage(), DamageOutcome::Wounded);
        assert_eq!(tank.take_damage(), DamageOutcome::Wounded);
        assert_eq!(tank.take_damage(), DamageOutcome::Destroyed);
        assert_eq!(tank.liveness, Liveness::Dying);
        assert_eq!(tank.take_damage(), DamageOutcome::Ignored);
        assert_eq!(tank.health, 0);

        for _ in 0..(DEATH_BURST_COUNT as u64 * DEATH_BURST_SPACING) {
            tank.update_proxy();
        }
        assert_eq!(tank.liveness, Liveness::Dead);
        tank.update_proxy();
        assert_eq!(tank.liveness, Liveness::Dead);
    }

    #[test]
    fn test_repair_caps_at_max() {
        let mut tank = Tank::new(1, Vec2::ZERO, Team::Red);
        tank.take_damage();
        tank.repair();
        tank.repair();
        assert_eq!(tank.health, TANK_MAX_HEALTH);
    }
}
