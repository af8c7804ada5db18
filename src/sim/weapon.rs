//! Ammo and fire-rate bookkeeping for the local tank
//!
//! Driven by wall-clock milliseconds rather than ticks so the fire rate does
//! not depend on the display's frame rate.

use super::projectile::ProjectileKind;

pub const MAX_AMMO: u32 = 5;
/// Minimum gap between two shots
pub const FIRE_DELAY_MS: u64 = 100;
/// One round regenerates per period while below max
pub const AMMO_REGEN_MS: u64 = 600;

#[derive(Debug, Clone)]
pub struct WeaponSystem {
    ammo: u32,
    last_fired_ms: Option<u64>,
    last_regain_ms: Option<u64>,
    kind: ProjectileKind,
}

impl Default for WeaponSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl WeaponSystem {
    pub fn new() -> Self {
        Self {
            ammo: MAX_AMMO,
            last_fired_ms: None,
            last_regain_ms: None,
            kind: ProjectileKind::Normal,
        }
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    pub fn can_fire(&self, now_ms: u64) -> bool {
        self.has_ammo()
            && self
                .last_fired_ms
                .is_none_or(|last| last + FIRE_DELAY_MS < now_ms)
    }

    /// Spend a round. Also restarts the regen clock.
    pub fn count_firing(&mut self, now_ms: u64) {
        self.ammo = self.ammo.saturating_sub(1);
        self.last_fired_ms = Some(now_ms);
        self.last_regain_ms = Some(now_ms);
    }

    /// Regenerate at most one round
    pub fn update(&mut self, now_ms: u64) {
        if self.ammo < MAX_AMMO && self.last_regain_ms.unwrap_or(0) + AMMO_REGEN_MS < now_ms {
            self.ammo += 1;
            self.last_regain_ms = Some(now_ms);
        }
    }

    pub fn refill(&mut self) {
        self.ammo = MAX_AMMO;
    }

    /// Kind of projectile fired next
    pub fn kind(&self) -> ProjectileKind {
        self.kind
    }

    pub fn cycle_kind(&mut self) -> ProjectileKind {
        self.kind = self.kind.next();
        log::info!("weapon kind: {}", self.kind.as_str());
        self.kind
    }
}
