//! Remote tank cache
//!
//! One proxy per remote id, created on first sight and dropped after it has
//! been silent for too long. Snapshots are applied in arrival order; the last
//! one received wins.

use std::collections::BTreeMap;

use super::protocol::TankSnapshot;
use crate::sim::state::Liveness;
use crate::sim::tank::{Tank, TankId};

/// Proxies silent for longer than this are evicted
pub const STALE_AFTER_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct RemoteTank {
    pub tank: Tank,
    /// Local bookkeeping; never taken from a snapshot
    pub last_seen_ms: u64,
}

/// Proxies keyed by remote id (ordered for stable iteration)
#[derive(Debug, Clone, Default)]
pub struct RemoteTanks {
    tanks: BTreeMap<TankId, RemoteTank>,
}

impl RemoteTanks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh a proxy. Returns true if it was newly created.
    pub fn upsert(&mut self, snapshot: &TankSnapshot, now_ms: u64) -> bool {
        let mut created = false;
        let entry = self.tanks.entry(snapshot.id).or_insert_with(|| {
            created = true;
            log::debug!("new remote tank {}", snapshot.id);
            RemoteTank {
                tank: Tank::new(snapshot.id, snapshot.pos.into(), snapshot.team_colour),
                last_seen_ms: now_ms,
            }
        });
        apply_snapshot(&mut entry.tank, snapshot);
        entry.last_seen_ms = now_ms;
        created
    }

    /// Drop proxies not heard from within `STALE_AFTER_MS`; returns their ids
    pub fn evict_stale(&mut self, now_ms: u64) -> Vec<TankId> {
        let stale: Vec<TankId> = self
            .tanks
            .iter()
            .filter(|(_, r)| now_ms.saturating_sub(r.last_seen_ms) > STALE_AFTER_MS)
            .map(|(id, _)| *id)
            .collect();
        for id in &stale {
            self.tanks.remove(id);
            log::info!("evicted stale remote tank {}", id);
        }
        stale
    }

    /// Remove a proxy; removing an unknown id is a no-op
    pub fn remove(&mut self, id: TankId) -> Option<RemoteTank> {
        self.tanks.remove(&id)
    }

    pub fn get(&self, id: TankId) -> Option<&Tank> {
        self.tanks.get(&id).map(|r| &r.tank)
    }

    pub fn entry(&self, id: TankId) -> Option<&RemoteTank> {
        self.tanks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TankId> + '_ {
        self.tanks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tank> {
        self.tanks.values().map(|r| &r.tank)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tank> {
        self.tanks.values_mut().map(|r| &mut r.tank)
    }
}

/// Copy the overwritable fields of a snapshot onto a proxy.
///
/// Identity and local bookkeeping are never touched. A proxy that has been
/// seen dead stays dead even if an older snapshot arrives later.
pub fn apply_snapshot(tank: &mut Tank, snapshot: &TankSnapshot) {
    tank.pos = snapshot.pos.into();
    tank.team = snapshot.team_colour;
    if let Some(vel) = snapshot.vel {
        tank.vel = vel.into();
    }
    if let Some(facing_right) = snapshot.is_facing_right {
        tank.facing_right = facing_right;
    }
    if let Some(barrel_angle) = snapshot.barrel_angle {
        tank.barrel_angle = barrel_angle;
    }
    if let Some(body_angle) = snapshot.body_angle {
        tank.body_angle = body_angle;
    }
    if let Some(aim_power) = snapshot.aim_power {
        tank.aim_power = aim_power;
    }
    if let Some(health) = snapshot.health {
        tank.health = health;
    }
    if snapshot.is_dead == Some(true) {
        tank.liveness = Liveness::Dead;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tank::Team;
    use glam::Vec2;

    fn snapshot(id: TankId, x: f32, y: f32) -> TankSnapshot {
        TankSnapshot::new(id, Vec2::new(x, y), Team::Red)
    }

    #[test]
    fn test_upsert_round_trip() {
        let mut cache = RemoteTanks::new();
        assert!(cache.upsert(&snapshot(42, 10.0, 20.0), 0));
        assert_eq!(cache.len(), 1);
        let tank = cache.get(42).unwrap();
        assert_eq!(tank.id, 42);
        assert_eq!(tank.pos, Vec2::new(10.0, 20.0));
        assert_eq!(tank.team, Team::Red);

        assert!(!cache.upsert(&snapshot(42, 15.0, 20.0), 100));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(42).unwrap().pos.x, 15.0);
        assert_eq!(cache.entry(42).unwrap().last_seen_ms, 100);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cache = RemoteTanks::new();
        cache.upsert(&snapshot(1, 0.0, 0.0), 0);
        assert!(cache.remove(2).is_none());
        assert_eq!(cache.len(), 1);
        assert!(cache.remove(1).is_some());
        assert!(cache.remove(1).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_staleness_threshold() {
        let mut cache = RemoteTanks::new();
        cache.upsert(&snapshot(1, 0.0, 0.0), 0);
        cache.upsert(&snapshot(2, 0.0, 0.0), 200);

        // 10.1 s since id 1, 9.9 s since id 2
        let evicted = cache.evict_stale(10_100);
        assert_eq!(evicted, vec![1]);
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_some());
    }

    #[test]
    fn test_exactly_threshold_is_kept() {
        let mut cache = RemoteTanks::new();
        cache.upsert(&snapshot(1, 0.0, 0.0), 0);
        assert!(cache.evict_stale(STALE_AFTER_MS).is_empty());
        assert_eq!(cache.evict_stale(STALE_AFTER_MS + 1), vec![1]);
    }

    #[test]
    fn test_partial_snapshot_keeps_unsent_fields() {
        let mut cache = RemoteTanks::new();
        let mut full = snapshot(3, 0.0, 0.0);
        full.barrel_angle = Some(-1.0);
        full.health = Some(2);
        cache.upsert(&full, 0);
        cache.upsert(&snapshot(3, 5.0, 0.0), 50);
        let tank = cache.get(3).unwrap();
        assert_eq!(tank.barrel_angle, -1.0);
        assert_eq!(tank.health, 2);
        assert_eq!(tank.pos.x, 5.0);
    }

    #[test]
    fn test_dead_proxy_stays_dead() {
        let mut tank = Tank::new(1, Vec2::ZERO, Team::Blue);
        let mut dead = snapshot(1, 0.0, 0.0);
        dead.is_dead = Some(true);
        apply_snapshot(&mut tank, &dead);
        assert_eq!(tank.liveness, Liveness::Dead);
        let mut alive = snapshot(1, 0.0, 0.0);
        alive.is_dead = Some(false);
        apply_snapshot(&mut tank, &alive);
        assert_eq!(tank.liveness, Liveness::Dead);
    }

    #[test]
    fn test_ids_are_ordered() {
        let mut cache = RemoteTanks::new();
        for id in [30, 10, 20] {
            cache.upsert(&snapshot(id, 0.0, 0.0), 0);
        }
        assert_eq!(cache.ids().collect::<Vec<_>>(), vec![10, 20, 30]);
    }
}
