//! Capture the flag: flags, goals and the score board
//!
//! A carried flag refers to its carrier by id only and looks the tank up each
//! frame. A carrier that has vanished or died simply loses the flag.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::noise::{BREEZE_CHANNEL, NoiseField};
use super::state::TankLookup;
use super::tank::{Team, TankId};
use super::terrain::Terrain;
use crate::consts::FLAG_GRAVITY;
use crate::{from_angle, map_range};

pub const FLAG_HIT_RADIUS: f32 = 60.0;
pub const GOAL_HIT_RADIUS: f32 = 100.0;
/// Free flags rest this far above the ground
pub const FLAG_REST_HEIGHT: f32 = 30.0;
pub const FLAG_CARRY_OFFSET: Vec2 = Vec2::new(0.0, -40.0);
pub const FLAG_DROP_OFFSET: Vec2 = Vec2::new(0.0, -100.0);
pub const FLAG_POP_SPEED: f32 = 10.0;
/// Frames between flag animation frames
pub const FLAG_ANIM_PERIOD: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagEvent {
    PickedUp { flag: Team, carrier: TankId },
    Dropped { flag: Team },
    Scored { flag: Team, scorer: Team },
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub team: Team,
    pub pos: Vec2,
    pub vel: Vec2,
    pub start: Vec2,
    pub carrier: Option<TankId>,
    pub hit_radius: f32,
    pub anim_frame: u8,
}

impl Flag {
    pub fn new(team: Team, start: Vec2) -> Self {
        Self {
            team,
            pos: start,
            vel: Vec2::ZERO,
            start,
            carrier: None,
            hit_radius: FLAG_HIT_RADIUS,
            anim_frame: 0,
        }
    }

    /// Fall under light gravity and settle above the ground
    pub fn fall(&mut self, terrain: &Terrain) {
        self.vel.y += FLAG_GRAVITY;
        self.pos += self.vel;
        let rest_y = terrain.height_at(self.pos.x) - FLAG_REST_HEIGHT;
        if self.pos.y > rest_y {
            self.pos.y = rest_y;
            self.vel = Vec2::ZERO;
        }
    }

    /// Let go of the flag at `pos` with an upward pop
    pub fn release(&mut self, pos: Vec2, rng: &mut Pcg32) {
        self.pos = pos;
        self.vel = pop_velocity(rng);
        self.carrier = None;
    }
}

#[derive(Debug, Clone)]
pub struct Goal {
    pub team: Team,
    pub pos: Vec2,
    pub hit_radius: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores {
    pub red: u32,
    pub blue: u32,
}

impl Scores {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }

    fn add(&mut self, team: Team) {
        match team {
            Team::Red => self.red += 1,
            Team::Blue => self.blue += 1,
        }
    }
}

/// Both teams' flags and goals
#[derive(Debug, Clone)]
pub struct Flags {
    pub flags: [Flag; 2],
    pub goals: [Goal; 2],
    pub scores: Scores,
}

impl Flags {
    /// Red sits west of the origin, blue east
    pub fn new(flag_distance: f32, goal_distance: f32, terrain: &Terrain) -> Self {
        let flag = |team: Team| {
            let x = team.side() * flag_distance;
            Flag::new(team, Vec2::new(x, terrain.height_at(x) - FLAG_REST_HEIGHT))
        };
        let goal = |team: Team| {
            let x = team.side() * goal_distance;
            Goal {
                team,
                pos: Vec2::new(x, terrain.height_at(x)),
                hit_radius: GOAL_HIT_RADIUS,
            }
        };
        Self {
            flags: [flag(Team::Red), flag(Team::Blue)],
            goals: [goal(Team::Red), goal(Team::Blue)],
            scores: Scores::default(),
        }
    }

    pub fn flag(&self, team: Team) -> &Flag {
        &self.flags[team_index(team)]
    }

    pub fn goal(&self, team: Team) -> &Goal {
        &self.goals[team_index(team)]
    }

    /// Goal a flag of `flag_team` must be carried to
    pub fn destination_for(&self, flag_team: Team) -> &Goal {
        self.goal(flag_team.opponent())
    }

    /// Team of the flag `id` is carrying, if any
    pub fn carried_by(&self, id: TankId) -> Option<Team> {
        self.flags
            .iter()
            .find(|f| f.carrier == Some(id))
            .map(|f| f.team)
    }

    pub fn update(
        &mut self,
        frame: u64,
        tanks: &TankLookup<'_>,
        terrain: &Terrain,
        rng: &mut Pcg32,
    ) -> Vec<FlagEvent> {
        let mut events = Vec::new();
        for i in 0..self.flags.len() {
            let destination = self.destination_for(self.flags[i].team).clone();
            let flag = &mut self.flags[i];
            if frame % FLAG_ANIM_PERIOD == 0 {
                flag.anim_frame = (flag.anim_frame + 1) % 2;
            }

            match flag.carrier {
                None => {
                    flag.fall(terrain);
                    // Only the local tank may pick up; peers decide for themselves
                    let player = tanks.player;
                    if player.is_alive()
                        && player.team != flag.team
                        && player.pos.distance(flag.pos) < flag.hit_radius
                    {
                        flag.carrier = Some(player.id);
                        log::info!("{} flag picked up by {}", flag.team.as_str(), player.id);
                        events.push(FlagEvent::PickedUp {
                            flag: flag.team,
                            carrier: player.id,
                        });
                    }
                }
                Some(id) => match tanks.get(id).filter(|t| t.is_alive()) {
                    None => {
                        flag.carrier = None;
                        flag.vel = Vec2::ZERO;
                        log::info!("{} flag dropped, carrier {} is gone", flag.team.as_str(), id);
                        events.push(FlagEvent::Dropped { flag: flag.team });
                    }
                    Some(carrier) => {
                        flag.pos = carrier.pos + FLAG_CARRY_OFFSET;
                        if flag.pos.distance(destination.pos) < destination.hit_radius {
                            let scorer = flag.team.opponent();
                            self.scores.add(scorer);
                            flag.carrier = None;
                            flag.pos = flag.start;
                            flag.vel = pop_velocity(rng);
                            log::info!(
                                "{} scores with the {} flag ({}:{})",
                                scorer.as_str(),
                                flag.team.as_str(),
                                self.scores.red,
                                self.scores.blue
                            );
                            events.push(FlagEvent::Scored {
                                flag: flag.team,
                                scorer,
                            });
                        }
                    }
                },
            }
        }
        events
    }

    /// Drop whatever `carrier` is holding above its position
    pub fn drop_carried_by(&mut self, carrier: TankId, carrier_pos: Vec2, rng: &mut Pcg32) -> Option<Team> {
        let flag = self.flags.iter_mut().find(|f| f.carrier == Some(carrier))?;
        flag.release(carrier_pos + FLAG_DROP_OFFSET, rng);
        log::info!("{} flag dropped by {}", flag.team.as_str(), carrier);
        Some(flag.team)
    }
}

fn team_index(team: Team) -> usize {
    match team {
        Team::Red => 0,
        Team::Blue => 1,
    }
}

fn pop_velocity(rng: &mut Pcg32) -> Vec2 {
    from_angle(-FRAC_PI_2 + rng.random_range(-0.2..0.2)) * FLAG_POP_SPEED
}

/// Small wandering offset for drawing a free flag fluttering in the wind
pub fn breeze_offset(noise: &NoiseField, frame: u64) -> Vec2 {
    let t = frame as f64;
    let angle = map_range(noise.sample1(t / 20.0), 0.0, 1.0, 0.0, 2.0 * TAU);
    let strength = noise.sample1(BREEZE_CHANNEL + t / 31.0) * 2.0;
    from_angle(angle) * strength
}
