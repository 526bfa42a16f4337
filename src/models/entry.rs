//! Manager entry payloads: profile, round history and picks.

use serde::{Deserialize, Serialize};

use super::{ElementId, Gameweek};

/// Payload of `entry/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryProfile {
    /// Team name
    pub name: String,

    pub player_first_name: String,
    pub player_last_name: String,

    #[serde(default)]
    pub player_region_name: Option<String>,

    #[serde(default)]
    pub summary_overall_rank: Option<u64>,

    #[serde(default)]
    pub leagues: EntryLeagues,
}

impl EntryProfile {
    pub fn manager_name(&self) -> String {
        format!("{} {}", self.player_first_name, self.player_last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryLeagues {
    #[serde(default)]
    pub classic: Vec<LeagueRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueRef {
    pub name: String,
}

/// Payload of `entry/{id}/history/`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryHistory {
    pub current: Vec<GameweekHistory>,

    #[serde(default)]
    pub chips: Vec<ChipPlay>,
}

impl EntryHistory {
    /// The history row for one gameweek, if the entry has played it.
    pub fn gameweek(&self, gameweek: Gameweek) -> Option<&GameweekHistory> {
        self.current.iter().find(|gw| gw.event == gameweek)
    }
}

/// One gameweek of an entry's season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameweekHistory {
    pub event: Gameweek,

    /// Gross points, before transfer cost
    pub points: i64,

    #[serde(default)]
    pub total_points: i64,

    #[serde(default)]
    pub rank: Option<u64>,

    #[serde(default)]
    pub overall_rank: Option<u64>,

    #[serde(default)]
    pub event_transfers: i64,

    #[serde(default)]
    pub event_transfers_cost: i64,

    #[serde(default)]
    pub points_on_bench: i64,

    #[serde(default)]
    pub bank: i64,

    #[serde(default)]
    pub value: i64,
}

impl GameweekHistory {
    /// Points after the transfer hit.
    pub fn net_points(&self) -> i64 {
        self.points - self.event_transfers_cost
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipPlay {
    pub name: String,

    #[serde(default)]
    pub time: Option<String>,

    pub event: Gameweek,
}

/// Payload of `entry/{id}/event/{gw}/picks/`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryPicks {
    #[serde(default)]
    pub picks: Vec<Pick>,
}

/// A player selected into a squad for one gameweek.
#[derive(Debug, Clone, Deserialize)]
pub struct Pick {
    pub element: ElementId,

    #[serde(default)]
    pub is_captain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_gameweek_lookup() {
        let json = r#"{
            "current": [
                {"event": 1, "points": 60, "total_points": 60, "event_transfers": 0, "event_transfers_cost": 0, "points_on_bench": 4},
                {"event": 2, "points": 72, "total_points": 132, "event_transfers": 2, "event_transfers_cost": 4, "points_on_bench": 1}
            ],
            "past": [],
            "chips": [{"name": "wildcard", "time": "2024-09-01T10:00:00Z", "event": 2}]
        }"#;

        let history: EntryHistory = serde_json::from_str(json).unwrap();
        let gw2 = history.gameweek(Gameweek(2)).unwrap();
        assert_eq!(gw2.points, 72);
        assert_eq!(gw2.net_points(), 68);
        assert!(history.gameweek(Gameweek(3)).is_none());
        assert_eq!(history.chips[0].name, "wildcard");
    }

    #[test]
    fn test_profile_manager_name() {
        let json = r#"{
            "id": 5, "name": "Everest FC", "player_first_name": "Bikash",
            "player_last_name": "Shrestha", "player_region_name": "Nepal",
            "summary_overall_rank": 120000,
            "leagues": {"classic": [{"id": 1, "name": "Overall"}], "h2h": []}
        }"#;

        let profile: EntryProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.manager_name(), "Bikash Shrestha");
        assert_eq!(profile.leagues.classic[0].name, "Overall");
    }

    #[test]
    fn test_pick_defaults() {
        let captain: Pick = serde_json::from_str(
            r#"{"element": 3, "position": 11, "multiplier": 2, "is_captain": true, "is_vice_captain": false}"#,
        )
        .unwrap();
        let bench: Pick = serde_json::from_str(r#"{"element": 4, "position": 12}"#).unwrap();

        assert!(captain.is_captain);
        assert_eq!(captain.element, ElementId(3));
        assert_eq!(bench.element, ElementId(4));
        assert!(!bench.is_captain);
    }
}
