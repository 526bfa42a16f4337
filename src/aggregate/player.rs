//! Season totals for one player.

use serde::Serialize;
use tracing::info;

use super::Aggregator;
use crate::fetch::FetchError;
use crate::models::{ElementGameweek, ElementId};

/// Season totals over a player's played fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerTotals {
    pub bonus: i64,
    pub bps: i64,
    pub influence: f64,
    pub creativity: f64,
    pub threat: f64,
    pub ict_index: f64,
    pub minutes: i64,
    pub expected_goals: f64,
    pub expected_assists: f64,
    pub expected_goal_involvements: f64,
    pub expected_goals_conceded: f64,
}

impl PlayerTotals {
    pub fn from_history(history: &[ElementGameweek]) -> Self {
        history.iter().fold(Self::default(), |mut acc, gw| {
            acc.bonus += gw.bonus;
            acc.bps += gw.bps;
            acc.influence += gw.influence;
            acc.creativity += gw.creativity;
            acc.threat += gw.threat;
            acc.ict_index += gw.ict_index;
            acc.minutes += gw.minutes;
            acc.expected_goals += gw.expected_goals;
            acc.expected_assists += gw.expected_assists;
            acc.expected_goal_involvements += gw.expected_goal_involvements;
            acc.expected_goals_conceded += gw.expected_goals_conceded;
            acc
        })
    }
}

impl Aggregator {
    pub async fn player_totals(&self, element: ElementId) -> Result<PlayerTotals, FetchError> {
        let summary = self.api.element_summary(element).await?;
        info!("Player {}: {} fixtures played", element, summary.history.len());
        Ok(PlayerTotals::from_history(&summary.history))
    }
}
