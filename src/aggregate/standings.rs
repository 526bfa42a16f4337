//! Classic league standings with a per-gameweek score column.

use serde::Serialize;
use tracing::{info, warn};

use super::Aggregator;
use crate::fetch::FetchError;
use crate::models::{EntryId, Gameweek, LeagueId, ScoreCell};

/// A classic-league row with the entry's score for one gameweek.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedEntrant {
    pub id: EntryId,
    pub manager_name: String,
    pub team_name: String,
    pub total_points: i64,

    /// Gross gameweek points; transfer cost is not deducted here
    pub gameweek_score: ScoreCell,
}

impl Aggregator {
    /// Full classic-league standings with each entry's `gameweek` score.
    ///
    /// Failing to read the standings themselves fails the call. A failed
    /// history lookup only marks that entry's score as `Error`; an entry
    /// with no row for the gameweek gets `N/A`.
    pub async fn aggregate_classic_standings(
        &self,
        league: LeagueId,
        gameweek: Gameweek,
    ) -> Result<Vec<EnrichedEntrant>, FetchError> {
        info!(
            "Fetching standings for league {}, gameweek {}",
            league, gameweek
        );
        let rows = self.classic_standings(league).await?;

        let enriched = self
            .fan_out(rows, |row| async move {
                let gameweek_score = self.gameweek_score(row.entry, gameweek).await;
                EnrichedEntrant {
                    id: row.entry,
                    manager_name: row.player_name,
                    team_name: row.entry_name,
                    total_points: row.total,
                    gameweek_score,
                }
            })
            .await;

        let failed = enriched
            .iter()
            .filter(|e| e.gameweek_score == ScoreCell::Error)
            .count();
        info!(
            "League {}: enriched {} entries ({} history failures)",
            league,
            enriched.len(),
            failed
        );
        Ok(enriched)
    }

    async fn gameweek_score(&self, entry: EntryId, gameweek: Gameweek) -> ScoreCell {
        match self
            .retrying("entry history", || self.api.entry_history(entry))
            .await
        {
            Ok(history) => history
                .gameweek(gameweek)
                .map(|gw| ScoreCell::Points(gw.points))
                .unwrap_or(ScoreCell::NotAvailable),
            Err(e) => {
                warn!("Error fetching gameweek history for {}: {}", entry, e);
                ScoreCell::Error
            }
        }
    }
}
