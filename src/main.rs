//! Tank Skirmish entry point
//!
//! Browser: canvas, keyboard, optional WebSocket relay and the frame loop.
//! Native: a headless session for smoke-testing the simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MessageEvent, WebSocket};

    use tank_skirmish::audio::{AudioManager, SoundEffect, ToneTracker};
    use tank_skirmish::net::{Inbox, encode};
    use tank_skirmish::renderer::{CanvasTarget, draw_scene};
    use tank_skirmish::settings::{Settings, Toggle};
    use tank_skirmish::sim::{GameState, TankControls, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        target: CanvasTarget,
        audio: AudioManager,
        tone: ToneTracker,
        socket: Option<WebSocket>,
        /// Keys currently held down
        held: HashSet<String>,
        // One-shot inputs gathered between frames
        fire: bool,
        cycle_kind: bool,
        toggles: Vec<Toggle>,
    }

    impl Game {
        fn is_held(&self, keys: &[&str]) -> bool {
            keys.iter().any(|k| self.held.contains(*k))
        }

        fn controls(&self) -> TankControls {
            TankControls {
                left: self.is_held(&["ArrowLeft", "a"]),
                right: self.is_held(&["ArrowRight", "d"]),
                barrel_up: self.is_held(&["w"]),
                barrel_down: self.is_held(&["s"]),
                power_up: self.is_held(&["ArrowUp"]),
                power_down: self.is_held(&["ArrowDown"]),
            }
        }

        fn key_down(&mut self, key: String, repeat: bool) {
            self.audio.resume();
            if !repeat {
                match key.as_str() {
                    " " => self.fire = true,
                    "k" => self.cycle_kind = true,
                    _ => {
                        let mut chars = key.chars();
                        if let (Some(c), None) = (chars.next(), chars.next()) {
                            if let Some(toggle) = Toggle::from_key(c) {
                                self.toggles.push(toggle);
                            }
                        }
                    }
                }
            }
            self.held.insert(key);
        }

        fn key_up(&mut self, key: &str) {
            self.held.remove(key);
        }

        fn frame(&mut self, now_ms: u64) {
            let input = TickInput {
                now_ms,
                controls: self.controls(),
                fire: std::mem::take(&mut self.fire),
                cycle_kind: std::mem::take(&mut self.cycle_kind),
                toggles: std::mem::take(&mut self.toggles),
            };
            tick(&mut self.state, &input);

            self.send_outbox();

            let events = self.state.drain_events();
            let commands = self.tone.process(
                &events,
                self.state.frame,
                self.state.player.pos,
                self.state.view,
            );
            for command in commands {
                self.audio.apply(command);
            }
            for effect in events.iter().filter_map(SoundEffect::for_event) {
                self.audio.play(effect);
            }

            draw_scene(&mut self.target, &self.state);
        }

        fn send_outbox(&mut self) {
            let outbox = self.state.drain_outbox();
            let Some(socket) = &self.socket else { return };
            if socket.ready_state() != WebSocket::OPEN {
                return;
            }
            for message in &outbox {
                match encode(message) {
                    Ok(text) => {
                        if let Err(e) = socket.send_with_str(&text) {
                            log::warn!("send failed: {:?}", e);
                        }
                    }
                    Err(e) => log::warn!("encode failed: {}", e),
                }
            }
        }
    }

    /// Normalise letters so held-key checks ignore shift
    fn key_name(event: &KeyboardEvent) -> String {
        let key = event.key();
        if key.chars().count() == 1 {
            key.to_lowercase()
        } else {
            key
        }
    }

    fn server_url(window: &web_sys::Window) -> Option<String> {
        let search = window.location().search().ok()?;
        let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
        params.get("server").filter(|s| !s.is_empty())
    }

    /// Connect to the broadcast relay; inbound text lands in the inbox
    fn connect(url: &str, inbox: Inbox) -> Option<WebSocket> {
        let socket = match WebSocket::new(url) {
            Ok(socket) => socket,
            Err(e) => {
                log::warn!("could not open {}: {:?}", url, e);
                return None;
            }
        };

        let onmessage = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                inbox.push_raw(&text);
            }
        });
        socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();

        let opened_url = url.to_string();
        let onopen = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            log::info!("connected to {}", opened_url);
        });
        socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();

        let onclose = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            log::warn!("relay connection closed");
        });
        socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();

        Some(socket)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tank Skirmish starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings {
            server_url: server_url(&window),
            ..Settings::default()
        };
        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(settings, seed);
        state.view = Vec2::new(width as f32, height as f32);

        let socket = state
            .settings
            .server_url
            .clone()
            .and_then(|url| connect(&url, state.inbox.clone()));

        let game = Rc::new(RefCell::new(Game {
            state,
            target: CanvasTarget::new(ctx),
            audio: AudioManager::new(),
            tone: ToneTracker::new(),
            socket,
            held: HashSet::new(),
            fire: false,
            cycle_kind: false,
            toggles: Vec::new(),
        }));

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Tank Skirmish running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " || event.key().starts_with("Arrow") {
                    event.prevent_default();
                }
                game.borrow_mut().key_down(key_name(&event), event.repeat());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().key_up(&key_name(&event));
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time as u64);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3600);

    log::info!("Tank Skirmish (native) headless session: seed {}, {} ticks", seed, ticks);
    headless::run(seed, ticks);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use tank_skirmish::consts::FRAMES_PER_SECOND;
    use tank_skirmish::settings::Settings;
    use tank_skirmish::sim::{GameEvent, GameState, TankControls, TickInput, tick};

    /// Scripted driver: creep right, fire once a second, cycle weapons now and then
    fn scripted_input(frame: u64) -> TickInput {
        let ms_per_frame = 1000 / u64::from(FRAMES_PER_SECOND);
        TickInput {
            now_ms: frame * ms_per_frame,
            controls: TankControls {
                right: (frame / 300) % 2 == 0,
                left: (frame / 300) % 2 == 1,
                power_up: frame % 120 < 20,
                ..TankControls::default()
            },
            fire: frame % 60 == 30,
            cycle_kind: frame % 600 == 599,
            toggles: Vec::new(),
        }
    }

    #[derive(Debug, Default)]
    struct Summary {
        launched: u32,
        destroyed: u32,
        tank_hits: u32,
        pickups: u32,
        flags: u32,
    }

    pub fn run(seed: u64, ticks: u64) {
        let mut state = GameState::new(Settings::default(), seed);
        let mut summary = Summary::default();

        for frame in 0..ticks {
            tick(&mut state, &scripted_input(frame));
            state.drain_outbox();
            for event in state.drain_events() {
                match event {
                    GameEvent::ProjectileLaunched { .. } => summary.launched += 1,
                    GameEvent::ProjectileDestroyed { .. } => summary.destroyed += 1,
                    GameEvent::TankHit { .. } => summary.tank_hits += 1,
                    GameEvent::PowerupCollected(_) => summary.pickups += 1,
                    GameEvent::FlagScored(_) => summary.flags += 1,
                    GameEvent::ProjectileInFlight { .. } => {}
                }
            }
        }

        log::info!(
            "after {} frames: player at {:.1} ({} health), {} entities, {} projectiles live",
            state.frame,
            state.player.pos.x,
            state.player.health,
            state.entities.len(),
            state.projectiles.len()
        );
        log::info!(
            "launched {}, destroyed {}, tank hits {}, pickups {}, flags scored {}",
            summary.launched,
            summary.destroyed,
            summary.tank_hits,
            summary.pickups,
            summary.flags
        );
    }
}
