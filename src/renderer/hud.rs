//! Minimap and debug text overlay

use glam::Vec2;

use super::{DrawTarget, View};
use crate::palette::{self, Color};
use crate::sim::{GameState, Team};

pub const MINIMAP_SIZE: Vec2 = Vec2::new(300.0, 100.0);
/// World units per minimap unit horizontally
pub const MINIMAP_SCALE: f32 = 20.0;
/// Left edge of the minimap centre line on screen
const MINIMAP_X: f32 = 400.0;
const BLIP_RADIUS: f32 = 3.0;

const DUCK_BLIP: Color = Color::rgb(151, 93, 33);
const POWERUP_BLIP: Color = Color::gray(128);
const TANK_BLIP: Color = Color::rgb(255, 255, 0);
const RED_FLAG_BLIP: Color = Color::rgb(255, 0, 0);
const HUD_TEXT: Color = Color::rgba(255, 255, 255, 0.4);

/// One dot on the minimap, in minimap coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blip {
    pub pos: Vec2,
    pub color: Color,
}

/// Position relative to the player, squeezed into the minimap
pub fn to_minimap(pos: Vec2, player_x: f32, view_height: f32) -> Vec2 {
    Vec2::new(
        (pos.x - player_x) / MINIMAP_SCALE,
        MINIMAP_SIZE.y * pos.y / view_height,
    )
}

fn on_minimap(pos: Vec2) -> bool {
    pos.x.abs() < MINIMAP_SIZE.x / 2.0
}

/// Everything worth a dot, in draw order (player last, on top)
pub fn minimap_blips(state: &GameState) -> Vec<Blip> {
    let player_x = state.player.pos.x;
    let view_h = state.view.y;
    let ducks = state
        .entities
        .iter()
        .filter_map(|e| e.as_duck())
        .map(|d| (d.pos, DUCK_BLIP));
    let powerups = state
        .entities
        .iter()
        .filter_map(|e| e.as_powerup())
        .map(|p| (p.pos, POWERUP_BLIP));
    let tanks = state.remotes.iter().map(|t| (t.pos, TANK_BLIP));
    let flags = [
        (state.flags.flag(Team::Red).pos, RED_FLAG_BLIP),
        (state.flags.flag(Team::Blue).pos, palette::DODGER_BLUE),
    ];

    ducks
        .chain(powerups)
        .chain(tanks)
        .chain(flags)
        .map(|(pos, color)| Blip {
            pos: to_minimap(pos, player_x, view_h),
            color,
        })
        .filter(|b| on_minimap(b.pos))
        .chain(std::iter::once(Blip {
            pos: to_minimap(state.player.pos, player_x, view_h),
            color: palette::WHITE,
        }))
        .collect()
}

pub fn draw_minimap(target: &mut dyn DrawTarget, state: &GameState, view: &View) {
    if !state.settings.draw_minimap {
        return;
    }
    target.push_transform(Vec2::new(MINIMAP_X, view.size.y - MINIMAP_SIZE.y), 0.0);

    let half = MINIMAP_SIZE.x / 2.0;
    target.fill_rect(Vec2::new(-half, 0.0), MINIMAP_SIZE, Color::rgba(255, 255, 255, 0.15));
    target.polyline(
        &[
            Vec2::new(-half, 0.0),
            Vec2::new(half, 0.0),
            Vec2::new(half, MINIMAP_SIZE.y),
            Vec2::new(-half, MINIMAP_SIZE.y),
            Vec2::new(-half, 0.0),
        ],
        1.0,
        palette::WHITE,
    );

    for blip in minimap_blips(state) {
        target.fill_circle(blip.pos, BLIP_RADIUS, blip.color);
        if state.settings.minimap_coords {
            target.text(
                &format!("{:.0}, {:.0}", blip.pos.x, blip.pos.y),
                blip.pos + Vec2::new(0.0, 10.0),
                7.0,
                blip.color,
            );
        }
    }
    target.pop_transform();
}

/// Debug readout, one line per fact
pub fn hud_lines(state: &GameState) -> Vec<String> {
    let cached_ids: Vec<String> = state
        .remotes
        .ids()
        .map(|id| {
            let s = id.to_string();
            let tail = &s[s.len().saturating_sub(4)..];
            format!("...{}", tail)
        })
        .collect();
    let transmit = if state.settings.transmit {
        "transmit is on (t)"
    } else {
        "transmit is off (t)"
    };
    let weapon = if state.weapon.can_fire(state.now_ms) {
        "OK"
    } else {
        "..."
    };

    vec![
        format!("Your x pos: {:.1}", state.player.pos.x),
        format!("Cached tank ids: {}", cached_ids.join(", ")),
        format!("cached tanks: {}", state.remotes.len()),
        transmit.to_string(),
        format!("Your Team: {}", state.player.team.as_str()),
        format!("Weapon: {}", weapon),
        format!("ammo: {}", "*".repeat(state.weapon.ammo() as usize)),
        format!("kind: {}", state.weapon.kind().as_str()),
        format!(
            "score: red: {}, blue: {}",
            state.flags.scores.red, state.flags.scores.blue
        ),
        format!("projectile count: {}", state.projectiles.len()),
    ]
}

pub fn draw_hud(target: &mut dyn DrawTarget, state: &GameState, view: &View) {
    for (i, line) in hud_lines(state).iter().enumerate() {
        let pos = Vec2::new(view.size.x - 200.0, 20.0 + i as f32 * 30.0);
        target.text(line, pos, 20.0, HUD_TEXT);
    }
}
