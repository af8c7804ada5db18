//! Tank Skirmish - a side-scrolling artillery tank game
//!
//! Core modules:
//! - `sim`: Simulation core (noise terrain, entities, collisions, game state)
//! - `net`: Wire protocol and remote tank cache
//! - `renderer`: Draw-target abstraction and scene drawing
//! - `audio`: Projectile tone tracking (Web Audio on wasm32)
//! - `settings`: Runtime toggles

pub mod audio;
pub mod net;
pub mod palette;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, Toggle};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the per-frame constants are tuned for
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Default viewport (canvas) dimensions
    pub const VIEW_WIDTH: f32 = 1280.0;
    pub const VIEW_HEIGHT: f32 = 800.0;

    /// Horizontal half-extent of the region ducks and powerups spawn in
    pub const SPAWN_RANGE: f32 = 4000.0;

    /// Downward gravity applied to projectiles each frame
    pub const PROJECTILE_GRAVITY: f32 = 0.4;
    /// Downward gravity applied to explosion debris and dust
    pub const DEBRIS_GRAVITY: f32 = 0.8;
    /// Downward gravity applied to falling powerups
    pub const POWERUP_GRAVITY: f32 = 0.5;
    /// Downward gravity applied to dying ducks
    pub const DUCK_GRAVITY: f32 = 0.6;
    /// Downward gravity applied to free flags
    pub const FLAG_GRAVITY: f32 = 0.2;

    /// Tanks transmit their state every N frames
    pub const TRANSMIT_EVERY_FRAMES: u64 = 6;
}

/// Linear remap of `value` from `[in_min, in_max]` to `[out_min, out_max]`, clamped
/// to the output range. Handles inverted output ranges.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let t = (value - in_min) / (in_max - in_min);
    let mapped = out_min + t * (out_max - out_min);
    if out_min < out_max {
        mapped.clamp(out_min, out_max)
    } else {
        mapped.clamp(out_max, out_min)
    }
}

/// Unit vector pointing along `angle` (radians, y grows downward)
#[inline]
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of a vector in radians
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range_inverted_output_clamps() {
        assert_eq!(map_range(0.1, 0.1, 0.9, 680.0, 400.0), 680.0);
        assert_eq!(map_range(0.9, 0.1, 0.9, 680.0, 400.0), 400.0);
        assert_eq!(map_range(-5.0, 0.1, 0.9, 680.0, 400.0), 680.0);
        assert_eq!(map_range(5.0, 0.1, 0.9, 680.0, 400.0), 400.0);
        assert!((map_range(0.5, 0.1, 0.9, 680.0, 400.0) - 540.0).abs() < 0.001);
    }

    #[test]
    fn test_heading_round_trip() {
        let angle = 1.2;
        assert!((heading(from_angle(angle)) - angle).abs() < 0.0001);
    }
}
