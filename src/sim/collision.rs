//! Projectile collision resolution
//!
//! Each frame a projectile is tested against the local tank, then closed
//! crates, then live ducks. The first target found wins; a shell passing
//! through the player and a duck in the same frame only hurts the player.
//! The ground is tested separately and always.

use glam::Vec2;

use super::entity::Entity;
use super::particles::ExplosionKind;
use super::state::Liveness;
use super::tank::Tank;
use super::terrain::Terrain;

/// Ground explosions are raised this far above the surface
pub const GROUND_EXPLOSION_LIFT: f32 = 5.0;

/// Reflect velocity off a surface with unit normal `normal`
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Strictly inside `radius` of `center`
#[inline]
pub fn circle_hit(pos: Vec2, center: Vec2, radius: f32) -> bool {
    pos.distance(center) < radius
}

/// A target struck by a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetHit {
    /// The local tank
    Tank,
    /// Index into the entity list
    Powerup(usize),
    /// Index into the entity list
    Duck(usize),
}

impl TargetHit {
    pub fn explosion_kind(&self) -> ExplosionKind {
        match self {
            TargetHit::Tank => ExplosionKind::Tank,
            TargetHit::Powerup(_) | TargetHit::Duck(_) => ExplosionKind::CrateClosed,
        }
    }
}

/// Everything a projectile touched this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Impact {
    pub target: Option<TargetHit>,
    /// Where the ground explosion goes, if the projectile went underground
    pub ground: Option<Vec2>,
}

impl Impact {
    pub fn is_hit(&self) -> bool {
        self.target.is_some() || self.ground.is_some()
    }
}

/// First target hit at `pos`, in priority order
pub fn find_target(pos: Vec2, player: &Tank, entities: &[Entity]) -> Option<TargetHit> {
    if circle_hit(pos, player.pos, player.hit_radius) {
        return Some(TargetHit::Tank);
    }

    let powerup = entities.iter().position(|e| match e {
        Entity::Powerup(p) => !p.opened && !p.is_dead() && circle_hit(pos, p.pos, p.size),
        _ => false,
    });
    if let Some(ix) = powerup {
        return Some(TargetHit::Powerup(ix));
    }

    entities
        .iter()
        .position(|e| match e {
            Entity::Duck(d) => d.liveness == Liveness::Alive && circle_hit(pos, d.pos, d.size),
            _ => false,
        })
        .map(TargetHit::Duck)
}

/// Explosion point if `pos` is below the ground
pub fn ground_contact(pos: Vec2, terrain: &Terrain) -> Option<Vec2> {
    let ground = terrain.height_at(pos.x);
    (pos.y > ground).then(|| Vec2::new(pos.x, ground - GROUND_EXPLOSION_LIFT))
}

pub fn resolve_projectile(pos: Vec2, player: &Tank, entities: &[Entity], terrain: &Terrain) -> Impact {
    Impact {
        target: find_target(pos, player, entities),
        ground: ground_contact(pos, terrain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;
    use crate::sim::ducks::{Duck, DuckMotion};
    use crate::sim::noise::NoiseField;
    use crate::sim::powerups::{Powerup, PowerupKind};
    use crate::sim::tank::Team;
    use crate::sim::terrain::TerrainAlgorithm;

    fn terrain() -> Terrain {
        Terrain::new(NoiseField::new(123), TerrainAlgorithm::Simple)
    }

    #[test]
    fn test_reflect_velocity() {
        // Falling onto flat ground (normal pointing up)
        let velocity = Vec2::new(3.0, 10.0);
        let normal = Vec2::new(0.0, -1.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - 3.0).abs() < 0.001);
        assert!((reflected.y + 10.0).abs() < 0.001);
    }

    #[test]
    fn test_tank_hit_radius_boundary() {
        let tank = Tank::new(1, Vec2::new(100.0, 100.0), Team::Red);
        assert_eq!(tank.hit_radius, 40.0);
        let near = tank.pos + Vec2::new(39.0, 0.0);
        let far = tank.pos + Vec2::new(41.0, 0.0);
        assert_eq!(find_target(near, &tank, &[]), Some(TargetHit::Tank));
        assert_eq!(find_target(far, &tank, &[]), None);
    }

    #[test]
    fn test_player_before_duck() {
        let tank = Tank::new(1, Vec2::new(0.0, 100.0), Team::Red);
        let entities = vec![Entity::Duck(Duck::new(
            Vec2::new(30.0, 100.0),
            DuckMotion::Still,
            1,
        ))];
        // Inside both the tank's and the duck's radius
        let pos = Vec2::new(15.0, 100.0);
        assert_eq!(find_target(pos, &tank, &entities), Some(TargetHit::Tank));
    }

    #[test]
    fn test_powerup_before_duck_regardless_of_list_order() {
        let tank = Tank::new(1, Vec2::new(-5000.0, 100.0), Team::Red);
        let entities = vec![
            Entity::Duck(Duck::new(Vec2::new(0.0, 100.0), DuckMotion::Still, 1)),
            Entity::Powerup(Powerup::new(Vec2::new(10.0, 100.0), PowerupKind::Repair)),
        ];
        let pos = Vec2::new(5.0, 100.0);
        assert_eq!(find_target(pos, &tank, &entities), Some(TargetHit::Powerup(1)));
    }

    #[test]
    fn test_opened_crates_and_dying_ducks_are_ignored() {
        let tank = Tank::new(1, Vec2::new(-5000.0, 100.0), Team::Red);
        let mut crate_ = Powerup::new(Vec2::ZERO, PowerupKind::Ammo);
        crate_.open();
        let mut duck = Duck::new(Vec2::ZERO, DuckMotion::Still, 2);
        duck.liveness = Liveness::Dying;
        let entities = vec![Entity::Powerup(crate_), Entity::Duck(duck)];
        assert_eq!(find_target(Vec2::ZERO, &tank, &entities), None);
    }

    #[test]
    fn test_crate_and_duck_hits_throw_crate_debris() {
        assert_eq!(TargetHit::Tank.explosion_kind(), ExplosionKind::Tank);
        assert_eq!(TargetHit::Powerup(0).explosion_kind(), ExplosionKind::CrateClosed);
        assert_eq!(TargetHit::Duck(3).explosion_kind(), ExplosionKind::CrateClosed);
        assert_eq!(ExplosionKind::CrateClosed.palette(), &palette::CRATE_CLOSED_IMPACT[..]);
    }

    #[test]
    fn test_ground_checked_independently() {
        let terrain = terrain();
        let x = 250.0;
        let ground = terrain.height_at(x);
        let below = Vec2::new(x, ground + 3.0);
        let tank = Tank::new(1, below, Team::Blue);

        let impact = resolve_projectile(below, &tank, &[], &terrain);
        assert_eq!(impact.target, Some(TargetHit::Tank));
        assert_eq!(impact.ground, Some(Vec2::new(x, ground - GROUND_EXPLOSION_LIFT)));

        let above = Vec2::new(x, ground - 100.0);
        let far_tank = Tank::new(1, Vec2::new(-5000.0, 0.0), Team::Blue);
        let impact = resolve_projectile(above, &far_tank, &[], &terrain);
        assert!(!impact.is_hit());
    }
}
