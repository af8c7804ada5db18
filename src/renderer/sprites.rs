//! Per-entity drawing with plain shapes

use std::f32::consts::PI;

use glam::Vec2;

use super::{Draw, DrawTarget, View};
use crate::palette::{self, Color};
use crate::sim::clouds::{Cloud, CloudLayer};
use crate::sim::ducks::Duck;
use crate::sim::flags::{Flag, Goal};
use crate::sim::particles::{DustParticle, Explosion, ExplosionParticle};
use crate::sim::powerups::{Powerup, PowerupKind};
use crate::sim::{Entity, Liveness, Projectile, ProjectileKind, Tank, Team};
use crate::{from_angle, heading, map_range};

const TREAD: Color = Color::gray(60);
const SHIELD: Color = Color::rgb(176, 196, 222);
const TRAIL: Color = Color::rgba(255, 255, 255, 0.27);
const AIM_ARROW: Color = Color::rgba(255, 255, 255, 0.5);
const DUCK_STICK: Color = Color::rgb(151, 93, 33);
const DUCK_BEAK: Color = Color::rgb(255, 140, 0);
const DUCK_BODIES: [Color; 3] = [
    Color::rgb(255, 215, 0),
    Color::rgb(240, 240, 240),
    Color::rgb(110, 160, 90),
];
const BEIGE: Color = Color::rgb(245, 245, 220);
/// Aim power at which the arrow switches to its "full" look
const FULL_POWER: f32 = 90.0;

pub fn team_color(team: Team) -> Color {
    match team {
        Team::Red => palette::TOMATO,
        Team::Blue => palette::DODGER_BLUE,
    }
}

/// Lining under a cloud picks up the sky colour below it
pub fn sky_reflection(y: f32, view: &View) -> Color {
    if view.dark_sky {
        Color::rgba(255, 165, 0, 0.9)
    } else if y > view.size.y * 0.33 {
        Color::rgba(255, 222, 227, 0.33)
    } else {
        Color::rgba(0, 255, 255, 0.23)
    }
}

impl Draw for Tank {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        let screen = view.to_screen(self.pos);
        let mut body = if self.damage_display > 0 {
            palette::WHITE
        } else {
            team_color(self.team)
        };
        if self.liveness != Liveness::Alive {
            body = body.with_alpha(0.27);
        }

        target.push_transform(screen, self.body_angle);
        target.fill_rect(Vec2::new(-25.0, 2.0), Vec2::new(50.0, 10.0), TREAD);
        target.fill_rect(Vec2::new(-22.0, -8.0), Vec2::new(44.0, 12.0), body);
        let turret = Vec2::new(0.0, -8.0);
        target.fill_circle(turret, 9.0, body);

        // Mirrored tanks aim into the other half-plane
        let angle = if self.facing_right {
            self.barrel_angle
        } else {
            PI - self.barrel_angle
        };
        let dir = from_angle(angle);
        let tip = turret + dir * 40.0 * self.aim_power / 75.0;
        let arrow = if self.aim_power < FULL_POWER {
            AIM_ARROW
        } else {
            palette::ORANGE
        };
        target.polyline(&[turret, tip], 4.0, arrow);
        let side = Vec2::new(-dir.y, dir.x) * 6.0;
        target.fill_polygon(&[tip + dir * 10.0, tip + side, tip - side], arrow);
        target.pop_transform();

        target.text(
            &(self.id % 10_000).to_string(),
            screen + Vec2::new(0.0, 100.0),
            20.0,
            palette::WHITE,
        );
        for i in 0..self.health {
            let offset = Vec2::new(-50.0 + f32::from(i) * 50.0, 130.0);
            target.fill_circle(screen + offset, 10.0, SHIELD);
        }
    }
}

impl Draw for Projectile {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        let color = match self.kind {
            ProjectileKind::Normal => Color::gray(230),
            ProjectileKind::Drunk => palette::ORANGE,
            ProjectileKind::Rainbow => {
                palette::RAINBOW[(view.frame / 4) as usize % palette::RAINBOW.len()]
            }
        };
        target.push_transform(view.to_screen(self.pos), heading(self.vel));
        target.fill_rect(Vec2::new(-8.0, -3.0), Vec2::new(16.0, 6.0), color);
        target.pop_transform();

        if self.trail.len() > 1 {
            let points: Vec<Vec2> = self.trail.iter().map(|p| view.to_screen(*p)).collect();
            target.polyline(&points, 1.0, TRAIL);
        }
    }
}

impl Draw for ExplosionParticle {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        target.push_transform(view.to_screen(self.pos), self.rotation);
        target.fill_rect(Vec2::splat(-self.size), Vec2::splat(self.size * 2.0), self.color);
        target.pop_transform();
    }
}

impl Draw for Explosion {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        for particle in &self.particles {
            particle.draw(target, view);
        }
    }
}

impl Draw for DustParticle {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        target.fill_circle(view.to_screen(self.pos), self.size / 2.0, self.color);
    }
}

impl Draw for Duck {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        let scale = 0.6;
        let radius = self.size * scale;
        let body = DUCK_BODIES[usize::from(self.variant.saturating_sub(1)) % DUCK_BODIES.len()];

        target.push_transform(
            view.to_screen(self.pos) - Vec2::new(0.0, self.size / 2.0),
            self.rotation,
        );
        target.fill_rect(Vec2::new(-2.0, 0.0), Vec2::new(4.0, 110.0 * scale), DUCK_STICK);
        target.fill_circle(Vec2::ZERO, radius, body);
        target.fill_polygon(
            &[
                Vec2::new(radius * 0.8, -4.0),
                Vec2::new(radius * 1.4, 0.0),
                Vec2::new(radius * 0.8, 4.0),
            ],
            DUCK_BEAK,
        );
        target.fill_circle(Vec2::new(radius * 0.4, -radius * 0.3), 3.0, palette::BLACK);
        target.pop_transform();
    }
}

impl Draw for Powerup {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        let half = self.size / 2.0;
        let centre = view.to_screen(self.pos) - Vec2::new(0.0, half);
        target.push_transform(centre, 0.0);
        target.fill_rect(Vec2::splat(-half), Vec2::splat(self.size), BEIGE);
        if self.opened {
            let (mark, color) = match self.kind {
                PowerupKind::Armor => ("A", palette::DODGER_BLUE),
                PowerupKind::Ammo => ("*", palette::ORANGE),
                PowerupKind::Repair => ("+", palette::GRASS),
            };
            target.fill_circle(Vec2::ZERO, half * 0.7, color);
            target.text(mark, Vec2::new(0.0, 6.0), 20.0, palette::WHITE);
        } else {
            let inset = half - 3.0;
            target.fill_rect(Vec2::splat(-inset), Vec2::splat(inset * 2.0), palette::CRATE);
            target.polyline(&[Vec2::splat(-inset), Vec2::splat(inset)], 3.0, palette::CRATE_LIGHT);
            target.polyline(
                &[Vec2::new(-inset, inset), Vec2::new(inset, -inset)],
                3.0,
                palette::CRATE_LIGHT,
            );
        }
        target.pop_transform();
    }
}

impl Draw for Cloud {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        if !self.is_visible() {
            return;
        }
        // Far clouds look flatter
        let y_scale = match self.layer {
            CloudLayer::Near => 1.0,
            CloudLayer::Far => 0.7,
        };
        let screen = view.to_screen_parallax(self.pos, self.layer.parallax());
        let height = self.height * y_scale;
        let left = screen.x - self.width / 2.0;
        target.fill_rect(
            Vec2::new(left, screen.y - height),
            Vec2::new(self.width, height),
            palette::CLOUD,
        );
        target.fill_rect(
            Vec2::new(left, screen.y),
            Vec2::new(self.width, 6.0 * y_scale),
            sky_reflection(self.pos.y, view),
        );
    }
}

/// A flag with its on-screen adjustments
#[derive(Debug, Clone, Copy)]
pub struct FlagPose<'a> {
    pub flag: &'a Flag,
    pub offset: Vec2,
    /// Pennant streams to the left when the carrier faces right
    pub mirrored: bool,
}

impl Draw for FlagPose<'_> {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        let side = if self.mirrored { -1.0 } else { 1.0 };
        let flutter = if self.flag.anim_frame == 0 { 0.0 } else { 4.0 };
        let color = team_color(self.flag.team);

        target.push_transform(view.to_screen(self.flag.pos + self.offset), 0.0);
        target.polyline(
            &[Vec2::new(0.0, 30.0), Vec2::new(0.0, -30.0)],
            3.0,
            palette::WHITE,
        );
        target.fill_polygon(
            &[
                Vec2::new(0.0, -30.0),
                Vec2::new(side * 30.0, -20.0 + flutter),
                Vec2::new(0.0, -8.0),
            ],
            color,
        );
        target.pop_transform();
    }
}

impl Draw for Flag {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        FlagPose {
            flag: self,
            offset: Vec2::ZERO,
            mirrored: false,
        }
        .draw(target, view);
    }
}

impl Draw for Goal {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        let t = view.frame as f32;
        let bob = Vec2::new(0.0, map_range((t / 23.0).sin(), -1.0, 1.0, -5.0, 5.0));
        let pulse = map_range((t / 43.0).sin(), -1.0, 1.0, 0.8, 1.1);
        let centre = view.to_screen(self.pos + bob);
        let radius = pulse * self.hit_radius;
        target.fill_circle(centre, radius, team_color(self.team).with_alpha(0.4));
        target.stroke_circle(centre, radius, 10.0, Color::rgba(255, 255, 255, 0.4));
    }
}

impl Draw for Entity {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        match self {
            Entity::Duck(duck) => duck.draw(target, view),
            Entity::Powerup(powerup) => powerup.draw(target, view),
            Entity::Dust(dust) => dust.draw(target, view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recorder::{Op, Recorder};
    use crate::sim::projectile::Owner;

    fn view() -> View {
        View::new(Vec2::new(1000.0, 800.0), 0.0)
    }

    #[test]
    fn test_tank_draws_one_shield_per_health() {
        let mut tank = Tank::new(12345, Vec2::new(0.0, 300.0), Team::Red);
        let mut rec = Recorder::default();
        tank.draw(&mut rec, &view());
        let shields = rec
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Circle { color, .. } if *color == SHIELD))
            .count();
        assert_eq!(shields, 3);
        assert_eq!(rec.texts(), vec!["2345"]);
        assert!(rec.depth_is_balanced());

        tank.health = 1;
        let mut rec = Recorder::default();
        tank.draw(&mut rec, &view());
        let shields = rec
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Circle { color, .. } if *color == SHIELD))
            .count();
        assert_eq!(shields, 1);
    }

    #[test]
    fn test_damaged_tank_flashes_white() {
        let mut tank = Tank::new(1, Vec2::ZERO, Team::Blue);
        tank.damage_display = 5;
        let mut rec = Recorder::default();
        tank.draw(&mut rec, &view());
        assert!(rec.ops.iter().any(|op| matches!(op, Op::Circle { color, .. } if *color == palette::WHITE)));
    }

    #[test]
    fn test_projectile_trail_in_screen_space() {
        let mut p = Projectile::new(1, Vec2::new(10.0, 10.0), Vec2::X, ProjectileKind::Normal, Owner::Local);
        p.trail.push_back(Vec2::new(0.0, 10.0));
        p.trail.push_back(Vec2::new(5.0, 10.0));
        let mut rec = Recorder::default();
        p.draw(&mut rec, &view());
        let line = rec.ops.iter().find_map(|op| match op {
            Op::Line { points, .. } => Some(points.clone()),
            _ => None,
        });
        assert_eq!(line, Some(vec![Vec2::new(500.0, 10.0), Vec2::new(505.0, 10.0)]));
    }

    #[test]
    fn test_faint_clouds_are_skipped() {
        let cloud = Cloud {
            pos: Vec2::new(0.0, 100.0),
            vel: Vec2::ZERO,
            layer: CloudLayer::Far,
            width: 200.0,
            height: 50.0,
            density: 0.1,
        };
        let mut rec = Recorder::default();
        cloud.draw(&mut rec, &view());
        assert!(rec.ops.is_empty());

        let dense = Cloud { density: 0.9, ..cloud };
        dense.draw(&mut rec, &view());
        assert_eq!(rec.ops.len(), 2);
    }

    #[test]
    fn test_reflection_under_dark_sky() {
        let mut v = view();
        assert_eq!(sky_reflection(700.0, &v), Color::rgba(255, 222, 227, 0.33));
        assert_eq!(sky_reflection(100.0, &v), Color::rgba(0, 255, 255, 0.23));
        v.dark_sky = true;
        assert_eq!(sky_reflection(100.0, &v), Color::rgba(255, 165, 0, 0.9));
    }
}
