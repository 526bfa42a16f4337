//! Season-wide static data: gameweeks, clubs and players.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::de::string_or_number_f64;
use super::{ElementId, Gameweek, TeamId};

/// Payload of `bootstrap-static/`.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapStatic {
    pub events: Vec<GameweekEvent>,
    pub teams: Vec<Team>,
    pub elements: Vec<Element>,
}

impl BootstrapStatic {
    pub fn element_index(&self) -> HashMap<ElementId, &Element> {
        self.elements.iter().map(|e| (e.id, e)).collect()
    }

    pub fn team_names(&self) -> HashMap<TeamId, &str> {
        self.teams.iter().map(|t| (t.id, t.name.as_str())).collect()
    }
}

/// A gameweek as listed in bootstrap data.
#[derive(Debug, Clone, Deserialize)]
pub struct GameweekEvent {
    pub id: Gameweek,
    pub deadline_time: DateTime<Utc>,
}

/// A real-world club.
#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,

    /// Badge asset code
    #[serde(default)]
    pub code: u32,
}

impl Team {
    pub fn badge_url(&self) -> String {
        format!(
            "https://resources.premierleague.com/premierleague/badges/70/t{}.png",
            self.code
        )
    }
}

/// Player position, upstream `element_type`. Type 5 is the assistant
/// manager slot some seasons add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Manager,
}

impl TryFrom<u8> for Position {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Position::Goalkeeper),
            2 => Ok(Position::Defender),
            3 => Ok(Position::Midfielder),
            4 => Ok(Position::Forward),
            5 => Ok(Position::Manager),
            other => Err(format!("unknown element_type {}", other)),
        }
    }
}

impl From<Position> for u8 {
    fn from(p: Position) -> u8 {
        match p {
            Position::Goalkeeper => 1,
            Position::Defender => 2,
            Position::Midfielder => 3,
            Position::Forward => 4,
            Position::Manager => 5,
        }
    }
}

/// A real-world player.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub web_name: String,
    pub team: TeamId,
    pub element_type: Position,

    /// Price in tenths of a million
    #[serde(default)]
    pub now_cost: i64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub form: f64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub points_per_game: f64,

    #[serde(default)]
    pub transfers_in_event: i64,

    #[serde(default)]
    pub transfers_out_event: i64,
}
