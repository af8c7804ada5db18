//! Colour palette shared by the simulation (particle colours picked at spawn)
//! and the renderer.

use serde::{Deserialize, Serialize};

/// An sRGB colour with alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` string for canvas styles
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const GRASS: Color = Color::rgb(82, 180, 82);
pub const DIRT: Color = Color::rgb(181, 133, 74);
pub const DUST: Color = Color::rgba(187, 151, 60, 0.82);
pub const CLOUD: Color = Color::rgba(255, 255, 255, 0.22);
pub const ORANGE: Color = Color::rgb(255, 165, 0);
pub const TOMATO: Color = Color::rgb(255, 99, 71);
pub const DODGER_BLUE: Color = Color::rgb(30, 144, 255);
pub const CRATE: Color = Color::rgb(197, 122, 44);
pub const CRATE_LIGHT: Color = Color::rgb(216, 179, 128);
pub const SKY_TOP: Color = Color::rgb(50, 50, 101);
pub const SKY_MID: Color = Color::rgb(0, 255, 255);
pub const SKY_LOW: Color = Color::rgb(255, 192, 203);
pub const SKY_HORIZON: Color = Color::rgb(190, 151, 158);
pub const DARK_SKY: Color = Color::gray(40);

/// Dust colours thrown up by tank treads
pub const DUST_COLORS: [Color; 3] = [GRASS, DIRT, DUST];

pub const GROUND_IMPACT: [Color; 3] = [Color::rgb(0, 128, 0), CRATE, ORANGE];
pub const TANK_IMPACT: [Color; 5] = [Color::gray(100), Color::gray(150), Color::gray(200), ORANGE, TOMATO];
pub const CRATE_CLOSED_IMPACT: [Color; 2] = [CRATE, CRATE_LIGHT];
pub const RAINBOW: [Color; 7] = [
    Color::rgb(255, 0, 0),
    ORANGE,
    Color::rgb(255, 255, 0),
    Color::rgb(0, 200, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(75, 0, 130),
    Color::rgb(238, 130, 238),
];

/// Linear blend between a list of colour stops, `t` in `[0, 1]`
pub fn lerp_colors(stops: &[Color], t: f32) -> Color {
    match stops {
        [] => BLACK,
        [only] => *only,
        _ => {
            let t = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let i = (t.floor() as usize).min(stops.len() - 2);
            let u = t - i as f32;
            let (a, b) = (stops[i], stops[i + 1]);
            let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * u).round() as u8;
            Color::rgba(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), a.a + (b.a - a.a) * u)
        }
    }
}
