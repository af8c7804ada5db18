//! `DrawTarget` over a browser 2D canvas context

use std::f64::consts::TAU;

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use super::DrawTarget;
use crate::palette::Color;

pub struct CanvasTarget {
    ctx: CanvasRenderingContext2d,
}

impl CanvasTarget {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        ctx.set_text_align("center");
        Self { ctx }
    }

    fn trace(&self, points: &[Vec2]) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        true
    }

    fn circle_path(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
    }
}

impl DrawTarget for CanvasTarget {
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if self.circle_path(center, radius) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        if self.circle_path(center, radius) {
            self.ctx.set_stroke_style_str(&color.to_css());
            self.ctx.set_line_width(width as f64);
            self.ctx.stroke();
        }
    }

    fn polyline(&mut self, points: &[Vec2], width: f32, color: Color) {
        if self.trace(points) {
            self.ctx.set_stroke_style_str(&color.to_css());
            self.ctx.set_line_width(width as f64);
            self.ctx.stroke();
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if self.trace(points) {
            self.ctx.close_path();
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.ctx.set_font(&format!("{}px sans-serif", size));
        self.ctx.set_fill_style_str(&color.to_css());
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }

    fn push_transform(&mut self, translate: Vec2, rotate: f32) {
        self.ctx.save();
        let _ = self.ctx.translate(translate.x as f64, translate.y as f64);
        if rotate != 0.0 {
            let _ = self.ctx.rotate(rotate as f64);
        }
    }

    fn pop_transform(&mut self) {
        self.ctx.restore();
    }
}
