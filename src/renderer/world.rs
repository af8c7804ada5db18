//! Whole-frame drawing: sky, ground and every entity in back-to-front order

use glam::Vec2;

use super::hud::{draw_hud, draw_minimap};
use super::sprites::FlagPose;
use super::{Draw, DrawTarget, View};
use crate::palette::{self, Color};
use crate::sim::flags::breeze_offset;
use crate::sim::noise::SUN_CHANNEL;
use crate::sim::{Entity, GameState, NoiseField, Terrain};
use crate::{from_angle, map_range};

/// Sky gradient is painted in bands this tall
const SKY_STRIPE: f32 = 3.0;
/// Ground outline is sampled every N world units
pub const GROUND_STEP: f32 = 5.0;
/// Sun centre in screen space; it ignores the camera
const SUN_POS: Vec2 = Vec2::new(100.0, 100.0);
const SUN_RADIUS: f32 = 50.0;
const SUN_DISCS: usize = 10;
const SUN_BEAMS: usize = 8;
const BEAM_LENGTH: f32 = 2000.0;
/// Angular width of each beam in radians
const BEAM_WIDTH: f32 = 0.1;
const SUN_HAZE: Color = Color::rgba(255, 255, 255, 0.03);
const SKY_STOPS: [Color; 4] = [
    palette::SKY_TOP,
    palette::SKY_MID,
    palette::SKY_LOW,
    palette::SKY_HORIZON,
];

/// Draw one frame of the game
pub fn draw_scene(target: &mut dyn DrawTarget, state: &GameState) {
    let view = View::for_state(state);

    draw_sky(target, &view);

    target.push_transform(view.shake, 0.0);

    draw_sun(target, state.terrain.noise(), &view);
    for duck in state.entities.iter().filter(|e| e.as_duck().is_some()) {
        duck.draw(target, &view);
    }
    draw_ground(target, &state.terrain, &view, state.player.pos);
    for tank in state.remotes.iter() {
        tank.draw(target, &view);
    }
    for entity in state
        .entities
        .iter()
        .filter(|e| !matches!(e, Entity::Duck(_)))
    {
        entity.draw(target, &view);
    }
    state.player.draw(target, &view);
    for projectile in &state.projectiles {
        projectile.draw(target, &view);
    }
    for explosion in &state.explosions {
        explosion.draw(target, &view);
    }
    for cloud in &state.clouds {
        cloud.draw(target, &view);
    }
    draw_flags(target, state, &view);
    draw_minimap(target, state, &view);
    draw_hud(target, state, &view);

    target.pop_transform();
}

pub fn draw_sky(target: &mut dyn DrawTarget, view: &View) {
    target.fill_rect(Vec2::ZERO, view.size, palette::DARK_SKY);
    if view.dark_sky {
        return;
    }
    let mut y = 0.0;
    while y < view.size.y {
        let color = palette::lerp_colors(&SKY_STOPS, y / view.size.y);
        target.fill_rect(Vec2::new(0.0, y), Vec2::new(view.size.x, SKY_STRIPE), color);
        y += SKY_STRIPE;
    }
}

/// Pulsing halo rings and slowly turning beams around a white disc
pub fn draw_sun(target: &mut dyn DrawTarget, noise: &NoiseField, view: &View) {
    let t = view.frame as f64;
    target.push_transform(SUN_POS, 0.0);

    for i in 0..SUN_DISCS {
        let i = i as f64;
        let size = noise.sample(i * 555.0 + t / 953.0, SUN_CHANNEL);
        let diameter = map_range(size, 0.2, 0.8, 20.0, 500.0);
        let weight = noise.sample(i * 333.0 + t / 30.0, -SUN_CHANNEL);
        let width = map_range(weight, 0.0, 1.0, 3.0, 30.0);
        // Big rings fade out entirely
        let alpha = map_range(diameter, 300.0, 400.0, 10.0, 0.0) / 255.0;
        target.stroke_circle(Vec2::ZERO, diameter / 2.0, width, palette::WHITE.with_alpha(alpha));
    }

    // Each beam turns on top of the previous one's rotation
    let drift = view.frame as f32 / 4000.0;
    let mut rotation = 0.0;
    for i in 0..SUN_BEAMS {
        rotation += i as f32 * std::f32::consts::PI / 8.0 + drift;
        let start = rotation + std::f32::consts::FRAC_PI_4;
        let wedge = [
            Vec2::ZERO,
            from_angle(start) * BEAM_LENGTH,
            from_angle(start + BEAM_WIDTH / 2.0) * BEAM_LENGTH,
            from_angle(start + BEAM_WIDTH) * BEAM_LENGTH,
        ];
        target.fill_polygon(&wedge, SUN_HAZE);
    }

    target.fill_circle(Vec2::ZERO, SUN_RADIUS, palette::WHITE);
    target.pop_transform();
}

fn snap(value: f32, grid: f32) -> f32 {
    grid * (value / grid).round()
}

/// Screen-space outline of the ground, closed off below the bottom edge
pub fn ground_outline(terrain: &Terrain, view: &View) -> Vec<Vec2> {
    let (left, right) = view.world_span();
    let start = snap(left, GROUND_STEP) - GROUND_STEP;
    let end = snap(right, GROUND_STEP) + GROUND_STEP * 2.0;
    let (w, h) = (view.size.x, view.size.y);

    let mut points = vec![Vec2::new(-50.0, h / 2.0)];
    let mut x = start;
    while x < end {
        points.push(view.to_screen(Vec2::new(x, terrain.height_at(x))));
        x += GROUND_STEP;
    }
    points.extend([
        Vec2::new(w + 50.0, h / 2.0),
        Vec2::new(w + 50.0, h + 20.0),
        Vec2::new(-50.0, h + 20.0),
    ]);
    points
}

pub fn draw_ground(target: &mut dyn DrawTarget, terrain: &Terrain, view: &View, player_pos: Vec2) {
    let fill = if view.dark_sky {
        // Blast glow behind the hit tank shows through the blacked-out sky
        let centre = view.to_screen(player_pos);
        let flicker = (view.frame % 4) as f32 * 6.25;
        target.fill_circle(centre, 75.0 + flicker, Color::rgba(255, 165, 0, 0.69));
        target.fill_circle(centre, 50.0, palette::DARK_SKY);
        Color::gray(200)
    } else {
        palette::GRASS
    };
    target.fill_polygon(&ground_outline(terrain, view), fill);
}

fn draw_flags(target: &mut dyn DrawTarget, state: &GameState, view: &View) {
    let tanks = state.tanks();
    let breeze = breeze_offset(state.terrain.noise(), state.frame);
    for flag in &state.flags.flags {
        let carrier = flag.carrier.and_then(|id| tanks.get(id));
        let pose = match carrier {
            Some(tank) => FlagPose {
                flag,
                offset: Vec2::ZERO,
                mirrored: tank.facing_right,
            },
            None => FlagPose {
                flag,
                offset: breeze,
                mirrored: false,
            },
        };
        pose.draw(target, view);
    }
    for goal in &state.flags.goals {
        goal.draw(target, view);
    }
}
