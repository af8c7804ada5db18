//! The mixed entity list: ducks, crates and dust share one collection

use super::ducks::Duck;
use super::particles::DustParticle;
use super::powerups::Powerup;
use super::state::Liveness;
use super::terrain::Terrain;

/// What an entity needs to see of the world while updating
#[derive(Debug, Clone, Copy)]
pub struct EntityContext<'a> {
    pub frame: u64,
    pub terrain: &'a Terrain,
    pub view_height: f32,
}

#[derive(Debug, Clone)]
pub enum Entity {
    Duck(Duck),
    Powerup(Powerup),
    Dust(DustParticle),
}

impl Entity {
    pub fn update(&mut self, ctx: &EntityContext<'_>) {
        match self {
            Entity::Duck(duck) => duck.update(ctx.frame, ctx.terrain, ctx.view_height),
            Entity::Powerup(powerup) => powerup.update(ctx.terrain),
            Entity::Dust(dust) => dust.update(ctx.terrain),
        }
    }

    pub fn is_dead(&self) -> bool {
        match self {
            Entity::Duck(duck) => duck.liveness == Liveness::Dead,
            Entity::Powerup(powerup) => powerup.is_dead(),
            Entity::Dust(dust) => dust.is_dead(),
        }
    }

    pub fn as_duck(&self) -> Option<&Duck> {
        match self {
            Entity::Duck(duck) => Some(duck),
            _ => None,
        }
    }

    pub fn as_powerup(&self) -> Option<&Powerup> {
        match self {
            Entity::Powerup(powerup) => Some(powerup),
            _ => None,
        }
    }
}

/// Live ducks in the list
pub fn count_ducks(entities: &[Entity]) -> usize {
    entities
        .iter()
        .filter(|e| e.as_duck().is_some_and(|d| d.liveness != Liveness::Dead))
        .count()
}

/// Live crates in the list
pub fn count_powerups(entities: &[Entity]) -> usize {
    entities
        .iter()
        .filter(|e| e.as_powerup().is_some_and(|p| !p.is_dead()))
        .count()
}
