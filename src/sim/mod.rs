//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - One tick per frame, wall-clock time only for the weapon
//! - Seeded RNG only
//! - Stable iteration order (remote tanks by id)
//! - No rendering or platform dependencies

pub mod clouds;
pub mod collision;
pub mod ducks;
pub mod entity;
pub mod flags;
pub mod noise;
pub mod particles;
pub mod powerups;
pub mod projectile;
pub mod schedule;
pub mod state;
pub mod tank;
pub mod terrain;
pub mod tick;
pub mod weapon;

pub use collision::{Impact, TargetHit, reflect_velocity, resolve_projectile};
pub use entity::{Entity, EntityContext};
pub use flags::{FlagEvent, Flags, Scores};
pub use noise::NoiseField;
pub use projectile::{Owner, Projectile, ProjectileKind};
pub use state::{GameEvent, GameState, Liveness, TankLookup};
pub use tank::{Tank, TankControls, TankId, Team};
pub use terrain::{Terrain, TerrainAlgorithm};
pub use tick::{TickInput, tick};
pub use weapon::WeaponSystem;
