//! Audio: projectile tone tracking and one-shot effects
//!
//! The simulation only emits `GameEvent`s. `ToneTracker` turns them into
//! pitch/volume targets for a single continuous oscillator that follows the
//! most recently launched projectile. On wasm32, `AudioManager` plays those
//! targets and the one-shot effects through the Web Audio API; no sound files
//! are needed.

use glam::Vec2;

use crate::map_range;
use crate::sim::GameEvent;

/// Oscillator frequency when a new projectile is picked up
pub const TONE_START_HZ: f32 = 200.0;
/// Volume level treated as silence
pub const TONE_SILENT: f32 = -1.0;
pub const TONE_LOUDEST: f32 = -0.5;
/// Tone targets are refreshed every N frames
pub const TONE_UPDATE_EVERY_FRAMES: u64 = 3;

/// Instruction for the continuous projectile tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneCommand {
    /// Jump to the start pitch, silent
    Start { frequency: f32 },
    /// Glide toward a pitch and level
    Ramp { frequency: f32, volume: f32 },
    FadeOut,
}

/// Pitch for a projectile at height `y`: higher in the sky, higher the pitch
pub fn tone_pitch(y: f32, view_height: f32) -> f32 {
    map_range(y, view_height, -2000.0, 500.0, 2000.0)
}

/// Level for a projectile; loud when fast and close to the listener
pub fn tone_volume(speed: f32, distance: f32, view_width: f32) -> f32 {
    let speed_amp = map_range(speed, 7.0, 20.0, 0.0, 0.1);
    let dist_gain = map_range(distance, 300.0, view_width * 0.9, 1.0, 0.0);
    map_range(speed_amp * dist_gain, 0.0, 1.0, TONE_SILENT, TONE_LOUDEST)
}

/// Follows one projectile at a time for the continuous tone
#[derive(Debug, Clone, Default)]
pub struct ToneTracker {
    tracked: Option<u32>,
}

impl ToneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked(&self) -> Option<u32> {
        self.tracked
    }

    /// Turn one frame of events into tone commands
    pub fn process(
        &mut self,
        events: &[GameEvent],
        frame: u64,
        listener: Vec2,
        view: Vec2,
    ) -> Vec<ToneCommand> {
        let mut commands = Vec::new();
        for event in events {
            match *event {
                GameEvent::ProjectileLaunched { id, .. } => {
                    self.tracked = Some(id);
                    commands.push(ToneCommand::Start {
                        frequency: TONE_START_HZ,
                    });
                }
                GameEvent::ProjectileDestroyed { id } if self.tracked == Some(id) => {
                    self.tracked = None;
                    commands.push(ToneCommand::FadeOut);
                }
                GameEvent::ProjectileInFlight { id, pos, vel }
                    if self.tracked == Some(id) && frame % TONE_UPDATE_EVERY_FRAMES == 0 =>
                {
                    commands.push(ToneCommand::Ramp {
                        frequency: tone_pitch(pos.y, view.y),
                        volume: tone_volume(vel.length(), pos.distance(listener), view.x),
                    });
                }
                _ => {}
            }
        }
        commands
    }
}

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Explosion,
    TankHit,
    TankDestroyed,
    Pickup,
    FlagScored,
}

impl SoundEffect {
    /// Effect to play for an event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ProjectileDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::TankHit { destroyed: true, .. } => Some(SoundEffect::TankDestroyed),
            GameEvent::TankHit { destroyed: false, .. } => Some(SoundEffect::TankHit),
            GameEvent::PowerupCollected(_) => Some(SoundEffect::Pickup),
            GameEvent::FlagScored(_) => Some(SoundEffect::FlagScored),
            GameEvent::ProjectileLaunched { .. } | GameEvent::ProjectileInFlight { .. } => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, TONE_SILENT, ToneCommand};
    use crate::map_range;

    /// Gain reached by the projectile tone at its loudest
    const TONE_MAX_GAIN: f32 = 0.2;
    /// Time constant for tone glides (seconds)
    const TONE_GLIDE: f64 = 0.03;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        tone: Option<(OscillatorNode, GainNode)>,
        master_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                tone: None,
                master_volume: 0.8,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.master_volume }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Lazily start the continuous tone on first use
        fn tone(&mut self) -> Option<(&AudioContext, &OscillatorNode, &GainNode)> {
            let ctx = self.ctx.as_ref()?;
            if self.tone.is_none() {
                let (osc, gain) = Self::create_osc(ctx, super::TONE_START_HZ, OscillatorType::Sine)?;
                gain.gain().set_value(0.0);
                osc.start().ok()?;
                self.tone = Some((osc, gain));
            }
            let (osc, gain) = self.tone.as_ref()?;
            Some((ctx, osc, gain))
        }

        pub fn apply(&mut self, command: ToneCommand) {
            let vol = self.effective_volume();
            let Some((ctx, osc, gain)) = self.tone() else { return };
            let t = ctx.current_time();
            match command {
                ToneCommand::Start { frequency } => {
                    osc.frequency().set_target_at_time(frequency, t, 0.005).ok();
                    gain.gain().set_target_at_time(0.0, t, 0.005).ok();
                }
                ToneCommand::Ramp { frequency, volume } => {
                    let level = map_range(volume, TONE_SILENT, super::TONE_LOUDEST, 0.0, TONE_MAX_GAIN);
                    osc.frequency().set_target_at_time(frequency, t, TONE_GLIDE).ok();
                    gain.gain().set_target_at_time(level * vol, t, TONE_GLIDE).ok();
                }
                ToneCommand::FadeOut => {
                    gain.gain().set_target_at_time(0.0, t, TONE_GLIDE).ok();
                }
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Explosion => Self::play_explosion(ctx, vol * 0.5),
                SoundEffect::TankHit => Self::play_thump(ctx, vol),
                SoundEffect::TankDestroyed => {
                    Self::play_thump(ctx, vol);
                    Self::play_explosion(ctx, vol);
                }
                SoundEffect::Pickup => Self::play_arpeggio(ctx, vol, &[600.0, 800.0, 1000.0]),
                SoundEffect::FlagScored => {
                    Self::play_arpeggio(ctx, vol, &[523.0, 659.0, 784.0, 1047.0])
                }
            }
        }

        /// Low rumble with a short crack on top
        fn play_explosion(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();

            if let Some((osc2, gain2)) = Self::create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain2.gain().set_value_at_time(vol * 0.2, t).ok();
                gain2
                    .gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc2.start().ok();
                osc2.stop_with_when(t + 0.15).ok();
            }
        }

        /// Heavy metallic thump
        fn play_thump(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 150.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Rising notes, one every 80 ms
        fn play_arpeggio(ctx: &AudioContext, vol: f32, notes: &[f32]) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Owner;

    const VIEW: Vec2 = Vec2::new(1280.0, 800.0);

    #[test]
    fn test_pitch_rises_with_altitude() {
        assert_eq!(tone_pitch(800.0, VIEW.y), 500.0);
        assert_eq!(tone_pitch(-2000.0, VIEW.y), 2000.0);
        assert_eq!(tone_pitch(-5000.0, VIEW.y), 2000.0);
        assert!(tone_pitch(0.0, VIEW.y) > tone_pitch(400.0, VIEW.y));
    }

    #[test]
    fn test_volume_bounds() {
        // Slow or far projectiles are silent
        assert_eq!(tone_volume(5.0, 0.0, VIEW.x), TONE_SILENT);
        assert_eq!(tone_volume(20.0, 5000.0, VIEW.x), TONE_SILENT);
        // Fast and close: speed_amp 0.1, dist_gain 1
        let v = tone_volume(20.0, 100.0, VIEW.x);
        assert!((v - (-0.95)).abs() < 1e-5);
    }

    #[test]
    fn test_tracks_latest_projectile() {
        let mut tracker = ToneTracker::new();
        let events = [
            GameEvent::ProjectileLaunched { id: 1, owner: Owner::Local },
            GameEvent::ProjectileLaunched { id: 2, owner: Owner::Remote },
        ];
        let cmds = tracker.process(&events, 1, Vec2::ZERO, VIEW);
        assert_eq!(cmds.len(), 2);
        assert_eq!(tracker.tracked(), Some(2));

        // Untracked projectile ending changes nothing
        let cmds = tracker.process(&[GameEvent::ProjectileDestroyed { id: 1 }], 2, Vec2::ZERO, VIEW);
        assert!(cmds.is_empty());

        let cmds = tracker.process(&[GameEvent::ProjectileDestroyed { id: 2 }], 3, Vec2::ZERO, VIEW);
        assert_eq!(cmds, vec![ToneCommand::FadeOut]);
        assert_eq!(tracker.tracked(), None);
    }

    #[test]
    fn test_in_flight_updates_every_third_frame() {
        let mut tracker = ToneTracker::new();
        tracker.process(&[GameEvent::ProjectileLaunched { id: 7, owner: Owner::Local }], 0, Vec2::ZERO, VIEW);
        let flight = [GameEvent::ProjectileInFlight {
            id: 7,
            pos: Vec2::new(0.0, 0.0),
            vel: Vec2::new(10.0, 0.0),
        }];
        let counts: Vec<usize> = (1..=6)
            .map(|frame| tracker.process(&flight, frame, Vec2::ZERO, VIEW).len())
            .collect();
        assert_eq!(counts, vec![0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_effect_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::TankHit { id: 1, destroyed: true }),
            Some(SoundEffect::TankDestroyed)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ProjectileInFlight {
                id: 1,
                pos: Vec2::ZERO,
                vel: Vec2::ZERO
            }),
            None
        );
    }
}
