//! Per-frame simulation tick
//!
//! Core game loop that advances the session one frame. Entities created during
//! a tick are appended; dead ones are only removed in the compaction pass at
//! the very end, so every collision check earlier in the tick still sees them.

use glam::Vec2;

use super::collision::{TargetHit, resolve_projectile};
use super::ducks::Duck;
use super::entity::{Entity, EntityContext, count_ducks, count_powerups};
use super::flags::FlagEvent;
use super::particles::ExplosionKind;
use super::powerups::Powerup;
use super::projectile::{Owner, ProjectileKind};
use super::state::{GameEvent, GameState, TankLookup};
use super::tank::{DamageOutcome, TankControls};
use crate::consts::TRANSMIT_EVERY_FRAMES;
use crate::net::{BulletFired, NetMessage, TankSnapshot};
use crate::settings::Toggle;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Wall clock in milliseconds
    pub now_ms: u64,
    /// Held keys, polled each frame
    pub controls: TankControls,
    /// Fire key pressed since the last tick
    pub fire: bool,
    /// Weapon-kind key pressed since the last tick
    pub cycle_kind: bool,
    /// Debug toggles pressed since the last tick
    pub toggles: Vec<Toggle>,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.now_ms = input.now_ms;

    apply_inbox(state);

    for toggle in &input.toggles {
        state.settings.toggle(*toggle);
        if *toggle == Toggle::FractalTerrain {
            state.sync_terrain_algorithm();
        }
    }

    if input.cycle_kind {
        state.weapon.cycle_kind();
    }
    if input.fire {
        fire_local(state);
    }

    state.frame += 1;

    run_spawners(state);
    update_player(state, &input.controls);
    update_proxies(state);
    update_entities(state);
    update_projectiles(state);
    update_explosions(state);
    update_flags(state);

    let player_x = state.player.pos.x;
    for cloud in &mut state.clouds {
        cloud.update(player_x, state.view, state.terrain.noise(), &mut state.rng);
    }

    state.effects.update(&mut state.rng);
    state.weapon.update(state.now_ms);

    compact(state);
}

/// Apply everything the transport queued since the last tick
fn apply_inbox(state: &mut GameState) {
    for message in state.inbox.drain() {
        match message {
            NetMessage::TankUpdate(snapshot) => {
                // Our own broadcast echoed back
                if snapshot.id == state.player.id {
                    continue;
                }
                state.remotes.upsert(&snapshot, state.now_ms);
            }
            NetMessage::BulletFired(bullet) => {
                state.spawn_projectile(bullet.pos.into(), bullet.vel.into(), bullet.kind, Owner::Remote);
            }
        }
    }
}

/// Fire the local tank's weapon if it is ready
pub fn fire_local(state: &mut GameState) -> Option<u32> {
    if !state.player.is_alive() || !state.weapon.can_fire(state.now_ms) {
        return None;
    }
    let (pos, vel) = state.player.muzzle();
    let kind = state.weapon.kind();
    let id = state.spawn_projectile(pos, vel, kind, Owner::Local);
    state.weapon.count_firing(state.now_ms);
    state
        .outbox
        .push(NetMessage::BulletFired(BulletFired::new(pos, vel, kind)));
    Some(id)
}

fn run_spawners(state: &mut GameState) {
    let frame = state.frame;
    if state.settings.include_ducks
        && state.duck_spawner.should_spawn(frame, count_ducks(&state.entities))
    {
        let duck = Duck::random(&state.terrain, &mut state.rng);
        log::debug!("spawning duck at {:.0}", duck.pos.x);
        state.entities.push(Entity::Duck(duck));
    }
    if state.settings.include_powerups
        && state.powerup_spawner.should_spawn(frame, count_powerups(&state.entities))
    {
        let powerup = Powerup::random(&mut state.rng);
        log::debug!("dropping {} crate at {:.0}", powerup.kind.as_str(), powerup.pos.x);
        state.entities.push(Entity::Powerup(powerup));
    }
}

fn update_player(state: &mut GameState, controls: &TankControls) {
    let controls = if state.player.is_alive() {
        *controls
    } else {
        TankControls::default()
    };
    if let Some(dust) = state
        .player
        .update_local(&controls, &state.terrain, &mut state.rng)
    {
        state.entities.push(Entity::Dust(dust));
    }

    if state.settings.transmit && state.frame % TRANSMIT_EVERY_FRAMES == 0 {
        state
            .outbox
            .push(NetMessage::TankUpdate(TankSnapshot::from_tank(&state.player)));
    }
}

fn update_proxies(state: &mut GameState) {
    for tank in state.remotes.iter_mut() {
        tank.update_proxy();
    }
    state.remotes.evict_stale(state.now_ms);
}

fn update_entities(state: &mut GameState) {
    let ctx = EntityContext {
        frame: state.frame,
        terrain: &state.terrain,
        view_height: state.view.y,
    };
    for entity in &mut state.entities {
        entity.update(&ctx);
        if let Entity::Powerup(powerup) = entity {
            if let Some(kind) = powerup.try_collect(&mut state.player, &mut state.weapon) {
                log::info!("collected {} crate", kind.as_str());
                state.events.push(GameEvent::PowerupCollected(kind));
            }
        }
    }
}

fn update_projectiles(state: &mut GameState) {
    for i in 0..state.projectiles.len() {
        if !state.projectiles[i].is_alive() {
            continue;
        }
        state.projectiles[i].integrate(&mut state.rng);
        let projectile = &state.projectiles[i];
        let (id, pos, vel, kind) = (projectile.id, projectile.pos, projectile.vel, projectile.kind);

        let impact = resolve_projectile(pos, &state.player, &state.entities, &state.terrain);
        if !impact.is_hit() {
            state.events.push(GameEvent::ProjectileInFlight { id, pos, vel });
            continue;
        }

        if let Some(target) = impact.target {
            apply_target_hit(state, target, pos, vel, kind);
        }
        if let Some(at) = impact.ground {
            let explosion = kind.explosion_override().unwrap_or(ExplosionKind::Ground);
            state.spawn_explosion(at, explosion);
        }
        if state.projectiles[i].kill() {
            state.events.push(GameEvent::ProjectileDestroyed { id });
        }
    }
}

fn apply_target_hit(state: &mut GameState, target: TargetHit, pos: Vec2, vel: Vec2, kind: ProjectileKind) {
    match target {
        TargetHit::Tank => {
            let outcome = state.player.take_damage();
            state.effects.on_tank_hit();
            state
                .flags
                .drop_carried_by(state.player.id, state.player.pos, &mut state.rng);
            let destroyed = outcome == DamageOutcome::Destroyed;
            if destroyed {
                log::info!("tank {} destroyed", state.player.id);
                state.queue_death_burst(pos);
            }
            if outcome != DamageOutcome::Ignored {
                state.events.push(GameEvent::TankHit {
                    id: state.player.id,
                    destroyed,
                });
            }
        }
        TargetHit::Powerup(ix) => {
            if let Some(Entity::Powerup(powerup)) = state.entities.get_mut(ix) {
                powerup.open();
            }
        }
        TargetHit::Duck(ix) => {
            if let Some(Entity::Duck(duck)) = state.entities.get_mut(ix) {
                duck.take_hit(vel, &mut state.rng);
            }
        }
    }
    let explosion = kind
        .explosion_override()
        .unwrap_or_else(|| target.explosion_kind());
    state.spawn_explosion(pos, explosion);
}

fn update_explosions(state: &mut GameState) {
    for explosion in &mut state.explosions {
        explosion.update(&state.terrain, &mut state.rng);
    }

    let frame = state.frame;
    let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pending_explosions)
        .into_iter()
        .partition(|p| p.due_frame <= frame);
    state.pending_explosions = later;
    for pending in due {
        state.spawn_explosion(pending.pos, pending.kind);
    }
}

fn update_flags(state: &mut GameState) {
    let lookup = TankLookup::new(&state.player, &state.remotes);
    let flag_events = state
        .flags
        .update(state.frame, &lookup, &state.terrain, &mut state.rng);
    for event in flag_events {
        if let FlagEvent::Scored { scorer, .. } = event {
            state.events.push(GameEvent::FlagScored(scorer));
        }
    }
}

/// End-of-tick removal of everything that died this frame
fn compact(state: &mut GameState) {
    state.projectiles.retain(|p| p.is_alive());
    state.explosions.retain(|e| !e.is_finished());
    state.entities.retain(|e| !e.is_dead());
}
