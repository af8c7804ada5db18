//! Wire protocol DTOs and conversions
//!
//! JSON objects tagged by `"type"`, field names in camelCase so browser peers
//! can read them directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::projectile::ProjectileKind;
use crate::sim::tank::{Tank, TankId, Team};

/// `{x, y}` vector as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireVec {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for WireVec {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<WireVec> for Vec2 {
    fn from(v: WireVec) -> Self {
        Vec2::new(v.x, v.y)
    }
}

/// Messages exchanged over the broadcast channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NetMessage {
    /// Periodic full state of a sender's tank
    TankUpdate(TankSnapshot),
    /// A sender fired a shot
    BulletFired(BulletFired),
}

/// Tank state; everything past `team_colour` is optional on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TankSnapshot {
    pub id: TankId,
    pub pos: WireVec,
    pub team_colour: Team,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vel: Option<WireVec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_facing_right: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barrel_angle: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_angle: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aim_power: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dead: Option<bool>,
}

impl TankSnapshot {
    /// Minimal snapshot: id, position and team only
    pub fn new(id: TankId, pos: Vec2, team: Team) -> Self {
        Self {
            id,
            pos: pos.into(),
            team_colour: team,
            vel: None,
            is_facing_right: None,
            barrel_angle: None,
            body_angle: None,
            aim_power: None,
            health: None,
            is_dead: None,
        }
    }

    pub fn from_tank(tank: &Tank) -> Self {
        Self {
            vel: Some(tank.vel.into()),
            is_facing_right: Some(tank.facing_right),
            barrel_angle: Some(tank.barrel_angle),
            body_angle: Some(tank.body_angle),
            aim_power: Some(tank.aim_power),
            health: Some(tank.health),
            is_dead: Some(!tank.is_alive()),
            ..Self::new(tank.id, tank.pos, tank.team)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletFired {
    pub pos: WireVec,
    pub vel: WireVec,
    #[serde(default)]
    pub kind: ProjectileKind,
}

impl BulletFired {
    pub fn new(pos: Vec2, vel: Vec2, kind: ProjectileKind) -> Self {
        Self {
            pos: pos.into(),
            vel: vel.into(),
            kind,
        }
    }
}

pub fn encode(message: &NetMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

pub fn decode(text: &str) -> Result<NetMessage, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal_tank_update() {
        let msg = decode(r#"{"type":"tankUpdate","id":5,"pos":{"x":10,"y":20},"teamColour":"red"}"#)
            .unwrap();
        assert_eq!(
            msg,
            NetMessage::TankUpdate(TankSnapshot::new(5, Vec2::new(10.0, 20.0), Team::Red))
        );
    }

    #[test]
    fn test_encode_uses_camel_case_fields() {
        let tank = Tank::new(9, Vec2::new(1.0, 2.0), Team::Blue);
        let json = encode(&NetMessage::TankUpdate(TankSnapshot::from_tank(&tank))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "tankUpdate");
        assert_eq!(value["teamColour"], "blue");
        assert_eq!(value["isFacingRight"], true);
        assert_eq!(value["aimPower"], 50.0);
        assert_eq!(value["isDead"], false);
        assert_eq!(value["pos"]["x"], 1.0);
    }

    #[test]
    fn test_minimal_snapshot_omits_optional_fields() {
        let json = encode(&NetMessage::TankUpdate(TankSnapshot::new(1, Vec2::ZERO, Team::Red))).unwrap();
        assert!(!json.contains("vel"));
        assert!(!json.contains("health"));
    }

    #[test]
    fn test_bullet_kinds() {
        let msg = decode(r#"{"type":"bulletFired","pos":{"x":0,"y":0},"vel":{"x":1,"y":-1},"kind":"drunk"}"#)
            .unwrap();
        match msg {
            NetMessage::BulletFired(b) => assert_eq!(b.kind, ProjectileKind::Drunk),
            other => panic!("unexpected {:?}", other),
        }

        // Unknown and missing kinds fall back to normal
        for text in [
            r#"{"type":"bulletFired","pos":{"x":0,"y":0},"vel":{"x":1,"y":-1},"kind":"homing"}"#,
            r#"{"type":"bulletFired","pos":{"x":0,"y":0},"vel":{"x":1,"y":-1}}"#,
        ] {
            match decode(text).unwrap() {
                NetMessage::BulletFired(b) => assert_eq!(b.kind, ProjectileKind::Normal),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_malformed_messages_are_errors() {
        assert!(decode("not json").is_err());
        assert!(decode(r#"{"type":"chat","text":"hi"}"#).is_err());
        assert!(decode(r#"{"type":"tankUpdate","pos":{"x":1,"y":2}}"#).is_err());
        assert!(decode(r#"{"type":"tankUpdate","id":1,"pos":{"x":1,"y":2},"teamColour":"green"}"#).is_err());
    }
}
