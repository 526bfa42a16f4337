//! Per-round match data: fixtures, live player stats and season history.

use serde::{Deserialize, Serialize};

use super::de::{null_as_zero, string_or_number_f64};
use super::{ElementId, Gameweek, TeamId};

/// A real-world match from `fixtures/?event={gw}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub id: u32,

    #[serde(default)]
    pub event: Option<Gameweek>,

    pub team_h: TeamId,
    pub team_a: TeamId,

    /// Null until kickoff
    #[serde(default)]
    pub team_h_score: Option<i64>,

    #[serde(default)]
    pub team_a_score: Option<i64>,

    #[serde(default)]
    pub finished: bool,
}

/// Payload of `event/{gw}/live/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveEvent {
    pub elements: Vec<LiveElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveElement {
    pub id: ElementId,
    pub stats: LiveStats,
}

/// A player's stats for one gameweek.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveStats {
    #[serde(deserialize_with = "null_as_zero", default)]
    pub minutes: i64,

    #[serde(deserialize_with = "null_as_zero", default)]
    pub goals_scored: i64,

}

/// Payload of `element-summary/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementSummary {
    #[serde(default)]
    pub history: Vec<ElementGameweek>,
}

/// One played fixture in a player's season.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementGameweek {
    #[serde(deserialize_with = "null_as_zero", default)]
    pub minutes: i64,

    #[serde(deserialize_with = "null_as_zero", default)]
    pub bonus: i64,

    #[serde(deserialize_with = "null_as_zero", default)]
    pub bps: i64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub influence: f64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub creativity: f64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub threat: f64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub ict_index: f64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub expected_goals: f64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub expected_assists: f64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub expected_goal_involvements: f64,

    #[serde(deserialize_with = "string_or_number_f64", default)]
    pub expected_goals_conceded: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstarted_fixture_has_no_scores() {
        let json = r#"{"id": 9, "event": 3, "team_h": 1, "team_a": 2, "team_h_score": null, "team_a_score": null, "finished": false}"#;
        let fixture: Fixture = serde_json::from_str(json).unwrap();

        assert_eq!(fixture.team_h_score, None);
        assert_eq!(fixture.team_a, TeamId(2));
    }

    #[test]
    fn test_live_event_deserialize() {
        let json = r#"{"elements": [
            {"id": 1, "stats": {"minutes": 90, "goals_scored": 1, "assists": 0, "total_points": 8}, "explain": []},
            {"id": 2, "stats": {"minutes": 0}}
        ]}"#;

        let live: LiveEvent = serde_json::from_str(json).unwrap();
        assert_eq!(live.elements[0].stats.goals_scored, 1);
        assert_eq!(live.elements[1].stats.goals_scored, 0);
    }
}
