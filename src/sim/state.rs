//! Game state and core simulation types
//!
//! One `GameState` holds everything a session owns. It is built once and
//! threaded through every update and draw call.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clouds::{CLOUD_COUNT, Cloud};
use super::ducks::Duck;
use super::entity::Entity;
use super::flags::Flags;
use super::noise::NoiseField;
use super::particles::{Explosion, ExplosionKind};
use super::powerups::{Powerup, PowerupKind};
use super::projectile::{Owner, Projectile, ProjectileKind};
use super::schedule::Spawner;
use super::tank::{TANK_GROUND_OFFSET, Tank, TankId, Team};
use super::terrain::Terrain;
use super::weapon::WeaponSystem;
use crate::consts::*;
use crate::from_angle;
use crate::net::{Inbox, NetMessage, RemoteTanks};
use crate::settings::Settings;

/// Ducks and crates placed at session start
pub const INITIAL_POPULATION: usize = 10;
/// Camera shake added per tank hit
pub const SHAKE_PER_HIT: f32 = 10.0;
pub const SHAKE_DECAY: f32 = 0.4;
/// Frames the sky stays dark after a tank hit
pub const SKY_DARK_FRAMES: u32 = 10;
/// Radius around an impact that a death burst is scattered over
pub const DEATH_BURST_SPREAD: f32 = 30.0;

/// Generic entity lifecycle; `Dead` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Liveness {
    #[default]
    Alive,
    Dying,
    Dead,
}

/// Events for the audio layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ProjectileLaunched { id: u32, owner: Owner },
    ProjectileDestroyed { id: u32 },
    ProjectileInFlight { id: u32, pos: Vec2, vel: Vec2 },
    TankHit { id: TankId, destroyed: bool },
    PowerupCollected(PowerupKind),
    FlagScored(Team),
}

/// Whole-screen feedback
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenEffects {
    pub camera_shake: f32,
    /// Offset applied to the camera this frame
    pub shake_offset: Vec2,
    /// Frames of darkened sky remaining
    pub sky_darkness: u32,
}

impl ScreenEffects {
    pub fn on_tank_hit(&mut self) {
        self.camera_shake += SHAKE_PER_HIT;
        self.sky_darkness = SKY_DARK_FRAMES;
    }

    pub fn update(&mut self, rng: &mut Pcg32) {
        self.camera_shake = (self.camera_shake - SHAKE_DECAY).max(0.0);
        self.sky_darkness = self.sky_darkness.saturating_sub(1);
        self.shake_offset = if self.camera_shake > 0.0 {
            from_angle(rng.random_range(0.0..std::f32::consts::TAU)) * self.camera_shake
        } else {
            Vec2::ZERO
        };
    }
}

/// An explosion queued for a later tick (death bursts)
#[derive(Debug, Clone, Copy)]
pub struct PendingExplosion {
    pub due_frame: u64,
    pub pos: Vec2,
    pub kind: ExplosionKind,
}

/// Resolves tank ids to the local player or a cached proxy
#[derive(Debug, Clone, Copy)]
pub struct TankLookup<'a> {
    pub player: &'a Tank,
    pub remotes: &'a RemoteTanks,
}

impl<'a> TankLookup<'a> {
    pub fn new(player: &'a Tank, remotes: &'a RemoteTanks) -> Self {
        Self { player, remotes }
    }

    pub fn get(&self, id: TankId) -> Option<&'a Tank> {
        if id == self.player.id {
            Some(self.player)
        } else {
            self.remotes.get(id)
        }
    }
}

/// Complete session state
#[derive(Debug)]
pub struct GameState {
    pub settings: Settings,
    /// Gameplay RNG seed (terrain uses `settings.world_seed`)
    pub seed: u64,
    pub rng: Pcg32,
    pub terrain: Terrain,
    /// Viewport size in world units
    pub view: Vec2,
    /// Simulation tick counter
    pub frame: u64,
    /// Wall clock of the latest tick
    pub now_ms: u64,

    pub player: Tank,
    pub remotes: RemoteTanks,
    pub weapon: WeaponSystem,

    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub pending_explosions: Vec<PendingExplosion>,
    /// Ducks, crates and dust
    pub entities: Vec<Entity>,
    pub clouds: Vec<Cloud>,
    pub flags: Flags,

    pub duck_spawner: Spawner,
    pub powerup_spawner: Spawner,
    pub effects: ScreenEffects,

    /// Audio events produced this tick
    pub events: Vec<GameEvent>,
    /// Network messages waiting to be applied at the next tick
    pub inbox: Inbox,
    /// Network messages produced by ticks, waiting for the transport
    pub outbox: Vec<NetMessage>,

    next_projectile_id: u32,
}

impl GameState {
    /// Create a new session. `seed` drives gameplay randomness only.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = Terrain::new(
            NoiseField::new(settings.world_seed),
            settings.terrain_algorithm,
        );
        let view = Vec2::new(VIEW_WIDTH, VIEW_HEIGHT);

        // Ids stay below 2^53 so browser peers can represent them exactly
        let player_id: TankId = rng.random::<u64>() >> 11;
        let team = if rng.random_bool(0.5) { Team::Red } else { Team::Blue };
        let x = rng.random_range(100.0..500.0);
        let player = Tank::new(
            player_id,
            Vec2::new(x, terrain.height_at(x) - TANK_GROUND_OFFSET),
            team,
        );

        let clouds = (0..CLOUD_COUNT)
            .map(|_| Cloud::random(terrain.noise(), view.y, &mut rng))
            .collect();

        let mut entities = Vec::new();
        if settings.include_ducks {
            entities.extend((0..INITIAL_POPULATION).map(|_| Entity::Duck(Duck::random(&terrain, &mut rng))));
        }
        if settings.include_powerups {
            entities.extend((0..INITIAL_POPULATION).map(|_| Entity::Powerup(Powerup::random(&mut rng))));
        }

        let flags = Flags::new(settings.flag_start_distance, settings.goal_start_distance, &terrain);

        log::info!(
            "session start: tank {} on team {}, world seed {}, rng seed {}",
            player_id,
            team.as_str(),
            settings.world_seed,
            seed
        );

        Self {
            settings,
            seed,
            rng,
            terrain,
            view,
            frame: 0,
            now_ms: 0,
            player,
            remotes: RemoteTanks::new(),
            weapon: WeaponSystem::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            pending_explosions: Vec::new(),
            entities,
            clouds,
            flags,
            duck_spawner: Spawner::default(),
            powerup_spawner: Spawner::default(),
            effects: ScreenEffects::default(),
            events: Vec::new(),
            inbox: Inbox::new(),
            outbox: Vec::new(),
            next_projectile_id: 1,
        }
    }

    pub fn tanks(&self) -> TankLookup<'_> {
        TankLookup::new(&self.player, &self.remotes)
    }

    /// Add a projectile to the world and announce it to the audio layer
    pub fn spawn_projectile(&mut self, pos: Vec2, vel: Vec2, kind: ProjectileKind, owner: Owner) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        self.projectiles.push(Projectile::new(id, pos, vel, kind, owner));
        self.events.push(GameEvent::ProjectileLaunched { id, owner });
        id
    }

    pub fn spawn_explosion(&mut self, pos: Vec2, kind: ExplosionKind) {
        let explosion = Explosion::spawn(pos, kind, &self.terrain, &mut self.rng);
        self.explosions.push(explosion);
    }

    /// Queue a tank's death burst around `pos`, one blast every few ticks
    pub fn queue_death_burst(&mut self, pos: Vec2) {
        use super::tank::{DEATH_BURST_COUNT, DEATH_BURST_SPACING};
        for i in 0..DEATH_BURST_COUNT as u64 {
            let jitter = Vec2::new(
                self.rng.random_range(-DEATH_BURST_SPREAD..DEATH_BURST_SPREAD),
                self.rng.random_range(-DEATH_BURST_SPREAD..DEATH_BURST_SPREAD),
            );
            self.pending_explosions.push(PendingExplosion {
                due_frame: self.frame + i * DEATH_BURST_SPACING,
                pos: pos + jitter,
                kind: ExplosionKind::Tank,
            });
        }
    }

    /// Switch the terrain algorithm and keep the settings in step
    pub fn sync_terrain_algorithm(&mut self) {
        self.terrain.algorithm = self.settings.terrain_algorithm;
    }

    /// Take this tick's audio events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take messages for the transport
    pub fn drain_outbox(&mut self) -> Vec<NetMessage> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{count_ducks, count_powerups};

    #[test]
    fn test_new_session_population() {
        let state = GameState::new(Settings::default(), 42);
        assert_eq!(state.clouds.len(), CLOUD_COUNT);
        assert_eq!(count_ducks(&state.entities), INITIAL_POPULATION);
        assert_eq!(count_powerups(&state.entities), INITIAL_POPULATION);
        assert!(state.player.id < (1u64 << 53));
        assert!(state.player.pos.x >= 100.0 && state.player.pos.x < 500.0);
    }

    #[test]
    fn test_excluded_kinds_not_populated() {
        let settings = Settings {
            include_ducks: false,
            include_powerups: false,
            ..Default::default()
        };
        let state = GameState::new(settings, 42);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_same_seed_same_session() {
        let a = GameState::new(Settings::default(), 7);
        let b = GameState::new(Settings::default(), 7);
        assert_eq!(a.player.id, b.player.id);
        assert_eq!(a.player.team, b.player.team);
        assert_eq!(a.clouds[10].pos, b.clouds[10].pos);
    }

    #[test]
    fn test_lookup_resolves_player_and_proxies() {
        let state = GameState::new(Settings::default(), 1);
        let lookup = state.tanks();
        assert_eq!(lookup.get(state.player.id).map(|t| t.id), Some(state.player.id));
        assert!(lookup.get(state.player.id.wrapping_add(1)).is_none());
    }

    #[test]
    fn test_screen_effects_decay() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut fx = ScreenEffects::default();
        fx.on_tank_hit();
        assert_eq!(fx.sky_darkness, SKY_DARK_FRAMES);
        fx.update(&mut rng);
        assert!((fx.camera_shake - (SHAKE_PER_HIT - SHAKE_DECAY)).abs() < 1e-5);
        assert!((fx.shake_offset.length() - fx.camera_shake).abs() < 1e-3);
        for _ in 0..100 {
            fx.update(&mut rng);
        }
        assert_eq!(fx.camera_shake, 0.0);
        assert_eq!(fx.sky_darkness, 0);
        assert_eq!(fx.shake_offset, Vec2::ZERO);
    }

    #[test]
    fn test_death_burst_is_spaced() {
        let mut state = GameState::new(Settings::default(), 3);
        state.frame = 50;
        state.queue_death_burst(Vec2::new(0.0, 400.0));
        let frames: Vec<u64> = state.pending_explosions.iter().map(|p| p.due_frame).collect();
        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0], 50);
        assert_eq!(frames[9], 50 + 9 * 6);
    }
}
