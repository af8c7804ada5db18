//! Game settings and runtime toggles
//!
//! Lives for one session only; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::sim::terrain::TerrainAlgorithm;

/// Boolean settings that can be flipped at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Toggle {
    Transmit,
    IncludeDucks,
    IncludePowerups,
    DrawMinimap,
    MinimapCoords,
    FractalTerrain,
}

impl Toggle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Toggle::Transmit => "transmit",
            Toggle::IncludeDucks => "ducks",
            Toggle::IncludePowerups => "powerups",
            Toggle::DrawMinimap => "minimap",
            Toggle::MinimapCoords => "minimap coords",
            Toggle::FractalTerrain => "fractal terrain",
        }
    }

    /// Debug key bound to this toggle
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            't' => Some(Toggle::Transmit),
            'c' => Some(Toggle::MinimapCoords),
            'm' => Some(Toggle::DrawMinimap),
            'f' => Some(Toggle::FractalTerrain),
            _ => None,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Broadcast our tank over the network channel
    pub transmit: bool,
    /// Populate and repopulate ducks
    pub include_ducks: bool,
    /// Populate and repopulate powerup crates
    pub include_powerups: bool,

    // === HUD ===
    pub draw_minimap: bool,
    pub minimap_coords: bool,

    // === World ===
    pub terrain_algorithm: TerrainAlgorithm,
    /// Distance of each team's flag start from x = 0
    pub flag_start_distance: f32,
    /// Distance of each team's goal from x = 0
    pub goal_start_distance: f32,
    /// Noise seed; every peer must share it to agree on the terrain
    pub world_seed: u32,

    /// Broadcast relay (WebSocket URL); offline when unset
    pub server_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transmit: false,
            include_ducks: true,
            include_powerups: true,

            draw_minimap: true,
            minimap_coords: false,

            terrain_algorithm: TerrainAlgorithm::Simple,
            flag_start_distance: 1000.0,
            goal_start_distance: 2000.0,
            world_seed: 123,

            server_url: None,
        }
    }
}

impl Settings {
    /// Parse settings overrides; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_enabled(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Transmit => self.transmit,
            Toggle::IncludeDucks => self.include_ducks,
            Toggle::IncludePowerups => self.include_powerups,
            Toggle::DrawMinimap => self.draw_minimap,
            Toggle::MinimapCoords => self.minimap_coords,
            Toggle::FractalTerrain => self.terrain_algorithm == TerrainAlgorithm::Fractal,
        }
    }

    /// Flip a toggle, returning its new value
    pub fn toggle(&mut self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Transmit => self.transmit = !self.transmit,
            Toggle::IncludeDucks => self.include_ducks = !self.include_ducks,
            Toggle::IncludePowerups => self.include_powerups = !self.include_powerups,
            Toggle::DrawMinimap => self.draw_minimap = !self.draw_minimap,
            Toggle::MinimapCoords => self.minimap_coords = !self.minimap_coords,
            Toggle::FractalTerrain => {
                self.terrain_algorithm = match self.terrain_algorithm {
                    TerrainAlgorithm::Simple => TerrainAlgorithm::Fractal,
                    TerrainAlgorithm::Fractal => TerrainAlgorithm::Simple,
                }
            }
        }
        let enabled = self.is_enabled(toggle);
        log::info!("{} is {}", toggle.as_str(), if enabled { "on" } else { "off" });
        enabled
    }
}
