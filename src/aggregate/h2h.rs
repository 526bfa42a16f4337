//! Head-to-head divisions: per-gameweek top scorers and full tables.
//!
//! Results are keyed by division name and keep configuration order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{info, warn};

use super::Aggregator;
use crate::config::Division;
use crate::fetch::FetchError;
use crate::models::{EntryId, Gameweek, StandingRow, NOT_AVAILABLE};

/// Per-division results, serialized as a JSON object in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionTable<T>(pub Vec<(String, T)>);

impl<T: Serialize> Serialize for DivisionTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// An entry's score for one gameweek.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundScore {
    pub entry: EntryId,
    pub manager_name: String,

    /// Net of transfer cost
    pub net_points: i64,
    pub transfer_cost: i64,
}

/// Single left-to-right scan keeping every score tied at the running
/// maximum. A strictly higher score replaces the set; an equal one joins it.
pub fn leading_scores(scores: impl IntoIterator<Item = RoundScore>) -> Vec<RoundScore> {
    let mut best: Option<i64> = None;
    let mut leaders = Vec::new();

    for score in scores {
        match best {
            Some(max) if score.net_points < max => {}
            Some(max) if score.net_points == max => leaders.push(score),
            _ => {
                best = Some(score.net_points);
                leaders.clear();
                leaders.push(score);
            }
        }
    }

    leaders
}

/// A division's highest net scorer (one of possibly several tied).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TopScorer {
    pub manager_id: EntryId,
    pub manager_name: String,
    pub team_name: String,

    /// Net of transfer cost
    pub gameweek_score: i64,
    pub transfer_cost: i64,
}

/// A formatted head-to-head table row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct H2hStanding {
    pub rank: u32,
    pub team_name: String,
    pub manager_name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,

    /// League points, not fantasy points
    pub total_points: i64,
}

impl Aggregator {
    /// Top net scorers for `gameweek` in every configured division.
    ///
    /// Divisions are independent: one whose standings cannot be read
    /// reports an empty list and the rest carry on.
    pub async fn top_scorers_by_division(&self, gameweek: Gameweek) -> DivisionTable<Vec<TopScorer>> {
        let mut table = Vec::with_capacity(self.divisions.len());
        for division in self.divisions.iter() {
            let scorers = self.division_top_scorers(division, gameweek).await;
            table.push((division.name.clone(), scorers));
        }
        DivisionTable(table)
    }

    async fn division_top_scorers(&self, division: &Division, gameweek: Gameweek) -> Vec<TopScorer> {
        let rows = match self.h2h_standings(division.league_id).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Invalid response for {}: {}", division.name, e);
                return Vec::new();
            }
        };

        let scores = self
            .fan_out(rows, |row| async move {
                let Some(entry) = row.entry_id() else {
                    return None;
                };
                let history = match self
                    .retrying("entry history", || self.api.entry_history(entry))
                    .await
                {
                    Ok(history) => history,
                    Err(e) => {
                        warn!("Error fetching history for {}: {}", entry, e);
                        return None;
                    }
                };
                // No row for the gameweek: the entry takes no part.
                let gw = history.gameweek(gameweek)?;
                Some(RoundScore {
                    entry,
                    manager_name: row.manager_name().to_string(),
                    net_points: gw.net_points(),
                    transfer_cost: gw.event_transfers_cost,
                })
            })
            .await;

        let leaders = leading_scores(scores.into_iter().flatten());

        let scorers = self
            .fan_out(leaders, |leader| async move {
                let team_name = self.team_name(leader.entry).await;
                TopScorer {
                    manager_id: leader.entry,
                    gameweek_score: leader.net_points,
                    manager_name: leader.manager_name,
                    team_name,
                    transfer_cost: leader.transfer_cost,
                }
            })
            .await;

        info!(
            "{}: {} top scorer(s) for gameweek {}",
            division.name,
            scorers.len(),
            gameweek
        );
        scorers
    }

    async fn team_name(&self, entry: EntryId) -> String {
        match self.retrying("entry", || self.api.entry(entry)).await {
            Ok(profile) if !profile.name.is_empty() => profile.name,
            Ok(_) => NOT_AVAILABLE.to_string(),
            Err(e) => {
                warn!("Error fetching team name for {}: {}", entry, e);
                NOT_AVAILABLE.to_string()
            }
        }
    }

    /// Full head-to-head tables for every configured division.
    ///
    /// Unlike the top-scorer view, any division failing fails the call.
    pub async fn h2h_standings_all(&self) -> Result<DivisionTable<Vec<H2hStanding>>, FetchError> {
        let mut table = Vec::with_capacity(self.divisions.len());
        for division in self.divisions.iter() {
            let rows = self.h2h_standings(division.league_id).await.map_err(|e| {
                warn!("Invalid response for {}: {}", division.name, e);
                e
            })?;
            let formatted = rows
                .into_iter()
                .map(|row| H2hStanding {
                    rank: row.rank,
                    team_name: row.entry_name,
                    manager_name: row.player_name,
                    matches_played: row.matches_played,
                    wins: row.matches_won,
                    draws: row.matches_drawn,
                    losses: row.matches_lost,
                    total_points: row.total,
                })
                .collect();
            table.push((division.name.clone(), formatted));
        }
        Ok(DivisionTable(table))
    }
}
