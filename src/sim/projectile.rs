//! Projectiles and their trails

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::ExplosionKind;
use super::state::Liveness;
use crate::consts::PROJECTILE_GRAVITY;
use crate::from_angle;

/// Maximum number of trail points kept per projectile
pub const TRAIL_LENGTH: usize = 30;
/// Size of the random wobble added to a drunk projectile each frame
pub const DRUNK_WOBBLE: f32 = 0.1;

/// Projectile variants.
///
/// Unknown kinds received over the wire decode as `Normal` so peers running a
/// build with extra kinds still interoperate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectileKind {
    Drunk,
    Rainbow,
    // serde only accepts the catch-all on the last variant
    #[default]
    #[serde(other)]
    Normal,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 3] = [
        ProjectileKind::Normal,
        ProjectileKind::Drunk,
        ProjectileKind::Rainbow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectileKind::Normal => "normal",
            ProjectileKind::Drunk => "drunk",
            ProjectileKind::Rainbow => "rainbow",
        }
    }

    /// Next kind in the weapon cycle
    pub fn next(&self) -> Self {
        match self {
            ProjectileKind::Normal => ProjectileKind::Drunk,
            ProjectileKind::Drunk => ProjectileKind::Rainbow,
            ProjectileKind::Rainbow => ProjectileKind::Normal,
        }
    }

    /// Extra acceleration applied on top of gravity this frame
    pub fn perturbation(&self, rng: &mut Pcg32) -> Vec2 {
        match self {
            ProjectileKind::Drunk => {
                from_angle(rng.random_range(0.0..std::f32::consts::TAU)) * DRUNK_WOBBLE
            }
            ProjectileKind::Normal | ProjectileKind::Rainbow => Vec2::ZERO,
        }
    }

    /// Palette that replaces the target's impact palette, if any
    pub fn explosion_override(&self) -> Option<ExplosionKind> {
        match self {
            ProjectileKind::Rainbow => Some(ExplosionKind::Rainbow),
            ProjectileKind::Normal | ProjectileKind::Drunk => None,
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Local,
    Remote,
}

/// A projectile entity
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
    pub kind: ProjectileKind,
    pub owner: Owner,
    pub liveness: Liveness,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, kind: ProjectileKind, owner: Owner) -> Self {
        Self {
            id,
            pos,
            vel,
            acc: Vec2::new(0.0, PROJECTILE_GRAVITY),
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
            kind,
            owner,
            liveness: Liveness::Alive,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.liveness == Liveness::Alive
    }

    /// Record the current position, dropping the oldest beyond `TRAIL_LENGTH`
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    /// Advance one frame: trail, then `pos += vel`, then `vel += acc`
    pub fn integrate(&mut self, rng: &mut Pcg32) {
        self.record_trail();
        self.acc = Vec2::new(0.0, PROJECTILE_GRAVITY) + self.kind.perturbation(rng);
        self.pos += self.vel;
        self.vel += self.acc;
    }

    /// Mark dead; returns false if it already was
    pub fn kill(&mut self) -> bool {
        if self.liveness == Liveness::Dead {
            return false;
        }
        self.liveness = Liveness::Dead;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    proptest! {
        #[test]
        fn prop_trail_never_exceeds_cap(frames in 0usize..200, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut p = Projectile::new(1, Vec2::ZERO, Vec2::new(3.0, -5.0), ProjectileKind::Drunk, Owner::Local);
            for _ in 0..frames {
                p.integrate(&mut rng);
                prop_assert!(p.trail.len() <= TRAIL_LENGTH);
            }
            prop_assert_eq!(p.trail.len(), frames.min(TRAIL_LENGTH));
        }
    }

    #[test]
    fn test_trail_evicts_oldest() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::ZERO, ProjectileKind::Normal, Owner::Local);
        for i in 0..TRAIL_LENGTH {
            p.pos = Vec2::new(i as f32, 0.0);
            p.record_trail();
        }
        assert_eq!(p.trail.front(), Some(&Vec2::ZERO));
        p.pos = Vec2::new(99.0, 0.0);
        p.record_trail();
        assert_eq!(p.trail.len(), TRAIL_LENGTH);
        assert_eq!(p.trail.front(), Some(&Vec2::new(1.0, 0.0)));
        assert_eq!(p.trail.back(), Some(&Vec2::new(99.0, 0.0)));
    }

    #[test]
    fn test_normal_projectile_follows_gravity() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::new(2.0, 0.0), ProjectileKind::Normal, Owner::Local);
        p.integrate(&mut rng);
        assert_eq!(p.pos, Vec2::new(2.0, 0.0));
        assert!((p.vel.y - PROJECTILE_GRAVITY).abs() < 1e-6);
        p.integrate(&mut rng);
        assert!((p.pos.y - PROJECTILE_GRAVITY).abs() < 1e-6);
    }

    #[test]
    fn test_drunk_wobble_is_small() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..100 {
            let wobble = ProjectileKind::Drunk.perturbation(&mut rng);
            assert!((wobble.length() - DRUNK_WOBBLE).abs() < 1e-5);
        }
        assert_eq!(ProjectileKind::Normal.perturbation(&mut rng), Vec2::ZERO);
    }

    #[test]
    fn test_unknown_kind_decodes_as_normal() {
        let kind: ProjectileKind = serde_json::from_str("\"homing\"").unwrap();
        assert_eq!(kind, ProjectileKind::Normal);
        let kind: ProjectileKind = serde_json::from_str("\"rainbow\"").unwrap();
        assert_eq!(kind, ProjectileKind::Rainbow);
        assert_eq!(serde_json::to_string(&ProjectileKind::Drunk).unwrap(), "\"drunk\"");
    }

    #[test]
    fn test_kinds_serialize_lowercase_and_default_to_normal() {
        assert_eq!(ProjectileKind::default(), ProjectileKind::Normal);
        for kind in ProjectileKind::ALL {
            let text = serde_json::to_string(&kind).unwrap();
            assert_eq!(text, format!("\"{}\"", kind.as_str()));
            assert_eq!(serde_json::from_str::<ProjectileKind>(&text).unwrap(), kind);
        }
        assert_eq!(
            serde_json::from_str::<ProjectileKind>("\"\"").unwrap(),
            ProjectileKind::Normal
        );
    }

    #[test]
    fn test_kind_cycle_visits_all() {
        let mut kind = ProjectileKind::Normal;
        for expected in ProjectileKind::ALL.iter().cycle().skip(1).take(3) {
            kind = kind.next();
            assert_eq!(kind, *expected);
        }
    }

    #[test]
    fn test_kill_once() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::ZERO, ProjectileKind::Normal, Owner::Remote);
        assert!(p.kill());
        assert!(!p.kill());
        assert!(!p.is_alive());
    }
}
