//! Season summary for one manager.
//!
//! Walks every played gameweek's picks to find the most selected and most
//! captained players, alongside the best and worst rounds.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{info, warn};

use super::Aggregator;
use crate::fetch::FetchError;
use crate::models::{ChipPlay, ElementId, EntryId, Gameweek, GameweekHistory, NOT_AVAILABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameweekPoints {
    pub event: Gameweek,
    pub points: i64,
}

/// A manager's season at a glance.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerSummary {
    pub name: String,
    pub team_name: String,
    pub region_name: Option<String>,
    pub overall_rank: Option<u64>,

    /// Classic league names
    pub leagues: Vec<String>,

    pub current: Vec<GameweekHistory>,
    pub chips: Vec<ChipPlay>,
    pub favorite_player: String,
    pub favorite_captain: String,
    pub best_gameweek: Option<GameweekPoints>,
    pub worst_gameweek: Option<GameweekPoints>,
    pub total_bench_points: i64,

    /// Rounds each player was in the squad
    pub selection_counts: BTreeMap<ElementId, u32>,
    pub captain_counts: BTreeMap<ElementId, u32>,
}

/// Most frequent player; equal counts go to the higher id.
pub fn most_picked(counts: &BTreeMap<ElementId, u32>) -> Option<ElementId> {
    counts
        .iter()
        .max_by_key(|(id, count)| (**count, **id))
        .map(|(id, _)| *id)
}

/// Highest and lowest scoring rounds. The earliest round wins a tie.
pub fn best_and_worst(
    rounds: &[GameweekHistory],
) -> (Option<GameweekPoints>, Option<GameweekPoints>) {
    let mut best: Option<GameweekPoints> = None;
    let mut worst: Option<GameweekPoints> = None;

    for gw in rounds {
        let here = GameweekPoints {
            event: gw.event,
            points: gw.points,
        };
        if best.map_or(true, |b| gw.points > b.points) {
            best = Some(here);
        }
        if worst.map_or(true, |w| gw.points < w.points) {
            worst = Some(here);
        }
    }

    (best, worst)
}

fn player_name(names: &HashMap<ElementId, &str>, id: Option<ElementId>) -> String {
    match id {
        None => NOT_AVAILABLE.to_string(),
        Some(id) => names
            .get(&id)
            .map(|name| name.to_string())
            .unwrap_or_else(|| "Unknown Player".to_string()),
    }
}

impl Aggregator {
    /// Season summary for one entry. Rounds whose picks cannot be read
    /// are left out of the selection counts.
    pub async fn manager_summary(&self, entry: EntryId) -> Result<ManagerSummary, FetchError> {
        let (profile, history, bootstrap) = tokio::try_join!(
            self.api.entry(entry),
            self.api.entry_history(entry),
            self.api.bootstrap()
        )?;

        let rounds: Vec<Gameweek> = history.current.iter().map(|gw| gw.event).collect();
        let round_picks = self
            .fan_out(rounds, |gameweek| async move {
                match self
                    .retrying("entry picks", || self.api.entry_picks(entry, gameweek))
                    .await
                {
                    Ok(picks) => Some(picks.picks),
                    Err(e) => {
                        warn!("Error fetching picks for {} in gameweek {}: {}", entry, gameweek, e);
                        None
                    }
                }
            })
            .await;

        let mut selection_counts: BTreeMap<ElementId, u32> = BTreeMap::new();
        let mut captain_counts: BTreeMap<ElementId, u32> = BTreeMap::new();
        for pick in round_picks.into_iter().flatten().flatten() {
            *selection_counts.entry(pick.element).or_default() += 1;
            if pick.is_captain {
                *captain_counts.entry(pick.element).or_default() += 1;
            }
        }

        let names: HashMap<ElementId, &str> = bootstrap
            .elements
            .iter()
            .map(|e| (e.id, e.web_name.as_str()))
            .collect();
        let (best_gameweek, worst_gameweek) = best_and_worst(&history.current);
        let total_bench_points = history.current.iter().map(|gw| gw.points_on_bench).sum();

        info!(
            "Summary for {}: {} rounds, {} distinct players",
            entry,
            history.current.len(),
            selection_counts.len()
        );

        Ok(ManagerSummary {
            name: profile.manager_name(),
            team_name: profile.name,
            region_name: profile.player_region_name,
            overall_rank: profile.summary_overall_rank,
            leagues: profile
                .leagues
                .classic
                .into_iter()
                .map(|league| league.name)
                .collect(),
            favorite_player: player_name(&names, most_picked(&selection_counts)),
            favorite_captain: player_name(&names, most_picked(&captain_counts)),
            best_gameweek,
            worst_gameweek,
            total_bench_points,
            current: history.current,
            chips: history.chips,
            selection_counts,
            captain_counts,
        })
    }
}
