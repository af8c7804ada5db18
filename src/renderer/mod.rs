//! Rendering module
//!
//! Everything draws through the `DrawTarget` trait so the scene can be
//! recorded in tests and painted onto a 2D canvas in the browser.

pub mod hud;
pub mod sprites;
pub mod world;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasTarget;
pub use world::draw_scene;

use glam::Vec2;

use crate::palette::Color;
use crate::sim::GameState;

/// Minimal immediate-mode 2D surface
pub trait DrawTarget {
    /// Axis-aligned rectangle from its top-left corner
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
    fn polyline(&mut self, points: &[Vec2], width: f32, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
    /// Translate then rotate everything drawn until the matching pop
    fn push_transform(&mut self, translate: Vec2, rotate: f32);
    fn pop_transform(&mut self);
}

/// Camera for one frame: the player is kept at the horizontal centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub size: Vec2,
    pub camera_x: f32,
    pub shake: Vec2,
    /// Frame counter for purely visual animation
    pub frame: u64,
    /// Sky is blacked out after a hit on the player
    pub dark_sky: bool,
}

impl View {
    pub fn new(size: Vec2, camera_x: f32) -> Self {
        Self {
            size,
            camera_x,
            shake: Vec2::ZERO,
            frame: 0,
            dark_sky: false,
        }
    }

    pub fn for_state(state: &GameState) -> Self {
        Self {
            size: state.view,
            camera_x: state.player.pos.x,
            shake: state.effects.shake_offset,
            frame: state.frame,
            dark_sky: state.effects.sky_darkness > 0,
        }
    }

    /// World position to screen position on the foreground layer
    pub fn to_screen(&self, pos: Vec2) -> Vec2 {
        self.to_screen_parallax(pos, 1.0)
    }

    /// Layers further back scroll slower than the camera
    pub fn to_screen_parallax(&self, pos: Vec2, parallax: f32) -> Vec2 {
        Vec2::new(self.size.x / 2.0 + pos.x - self.camera_x * parallax, pos.y)
    }

    /// Inverse of `to_screen` for the given layer
    pub fn to_world(&self, screen: Vec2, parallax: f32) -> Vec2 {
        Vec2::new(screen.x + self.camera_x * parallax - self.size.x / 2.0, screen.y)
    }

    /// Horizontal world range currently on screen
    pub fn world_span(&self) -> (f32, f32) {
        let half = self.size.x / 2.0;
        (self.camera_x - half, self.camera_x + half)
    }
}

/// Something that knows how to paint itself
pub trait Draw {
    fn draw(&self, target: &mut dyn DrawTarget, view: &View);
}

#[cfg(test)]
pub(crate) mod recorder {
    use super::*;

    /// One recorded draw call
    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Rect { pos: Vec2, size: Vec2, color: Color },
        Circle { center: Vec2, radius: f32, color: Color },
        Ring { center: Vec2, radius: f32, color: Color },
        Line { points: Vec<Vec2>, color: Color },
        Polygon { points: Vec<Vec2>, color: Color },
        Text { text: String, pos: Vec2 },
        Push { translate: Vec2, rotate: f32 },
        Pop,
    }

    /// Draw target that keeps every call for inspection
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub ops: Vec<Op>,
    }

    impl Recorder {
        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn depth_is_balanced(&self) -> bool {
            let mut depth: i64 = 0;
            for op in &self.ops {
                match op {
                    Op::Push { .. } => depth += 1,
                    Op::Pop => {
                        depth -= 1;
                        if depth < 0 {
                            return false;
                        }
                    }
                    _ => {}
                }
            }
            depth == 0
        }
    }

    impl DrawTarget for Recorder {
        fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
            self.ops.push(Op::Rect { pos, size, color });
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.ops.push(Op::Circle { center, radius, color });
        }

        fn stroke_circle(&mut self, center: Vec2, radius: f32, _width: f32, color: Color) {
            self.ops.push(Op::Ring { center, radius, color });
        }

        fn polyline(&mut self, points: &[Vec2], _width: f32, color: Color) {
            self.ops.push(Op::Line {
                points: points.to_vec(),
                color,
            });
        }

        fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
            self.ops.push(Op::Polygon {
                points: points.to_vec(),
                color,
            });
        }

        fn text(&mut self, text: &str, pos: Vec2, _size: f32, _color: Color) {
            self.ops.push(Op::Text {
                text: text.to_string(),
                pos,
            });
        }

        fn push_transform(&mut self, translate: Vec2, rotate: f32) {
            self.ops.push(Op::Push { translate, rotate });
        }

        fn pop_transform(&mut self) {
            self.ops.push(Op::Pop);
        }
    }
}
