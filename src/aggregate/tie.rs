//! Tie analysis between two entries for one gameweek.
//!
//! Each side's picks are credited with their real-world goals scored and
//! with goals conceded by their club. More goals scored wins, then fewer
//! conceded; otherwise the tie goes to a draw.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{info, warn};

use super::Aggregator;
use crate::fetch::FetchError;
use crate::models::{
    BootstrapStatic, Element, ElementId, EntryId, Fixture, Gameweek, LiveEvent, LiveStats, Pick,
    Position, TeamId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieReason {
    GoalsScored,
    GoalsConceded,
    RandomDraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Team1,
    Team2,
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalTally {
    pub scored: i64,
    pub conceded: i64,
}

/// More goals scored wins; then fewer goals conceded; otherwise a draw.
pub fn decide_winner(team1: GoalTally, team2: GoalTally) -> (Side, TieReason) {
    use std::cmp::Ordering::*;

    match team1.scored.cmp(&team2.scored) {
        Greater => (Side::Team1, TieReason::GoalsScored),
        Less => (Side::Team2, TieReason::GoalsScored),
        Equal => match team1.conceded.cmp(&team2.conceded) {
            Less => (Side::Team1, TieReason::GoalsConceded),
            Greater => (Side::Team2, TieReason::GoalsConceded),
            Equal => (Side::Tie, TieReason::RandomDraw),
        },
    }
}

/// Goals conceded per club in one round.
///
/// The home side concedes the away score and vice versa; an unplayed
/// score counts as zero. If a club appears in several fixtures the last
/// one listed wins.
pub fn conceded_by_team(fixtures: &[Fixture]) -> HashMap<TeamId, i64> {
    let mut conceded = HashMap::new();
    for fixture in fixtures {
        conceded.insert(fixture.team_h, fixture.team_a_score.unwrap_or(0));
        conceded.insert(fixture.team_a, fixture.team_h_score.unwrap_or(0));
    }
    conceded
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringPlayer {
    pub id: ElementId,
    pub name: String,
    pub team: TeamId,
    pub team_name: String,
    pub position: Position,
    pub goals: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcedingPlayer {
    pub id: ElementId,
    pub name: String,
    pub team: TeamId,
    pub team_name: String,
    pub position: Position,
    pub conceded: i64,
}

/// One side's goal attribution for the round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamTieStats {
    pub manager_name: String,
    pub team_name: String,
    pub goals_scored: i64,
    pub goals_conceded: i64,
    pub players_scored: Vec<ScoringPlayer>,

    /// Grouped by club id, pick order within a club
    pub players_conceded: Vec<ConcedingPlayer>,
}

impl TeamTieStats {
    pub fn tally(&self) -> GoalTally {
        GoalTally {
            scored: self.goals_scored,
            conceded: self.goals_conceded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SideOutcome {
    Stats(TeamTieStats),
    Error { error: String },
}

impl SideOutcome {
    fn error(message: String) -> Self {
        SideOutcome::Error { error: message }
    }

    pub fn stats(&self) -> Option<&TeamTieStats> {
        match self {
            SideOutcome::Stats(stats) => Some(stats),
            SideOutcome::Error { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TieAnalysis {
    pub team1: SideOutcome,
    pub team2: SideOutcome,

    /// Winning manager's name, or `"Tie"`
    pub winner: Option<String>,
    pub winner_side: Option<Side>,

    #[serde(rename = "tieReason")]
    pub tie_reason: Option<TieReason>,
}

impl TieAnalysis {
    fn resolve(team1: SideOutcome, team2: SideOutcome) -> Self {
        let decision = match (team1.stats(), team2.stats()) {
            (Some(a), Some(b)) => {
                let (side, reason) = decide_winner(a.tally(), b.tally());
                let winner = match side {
                    Side::Team1 => a.manager_name.clone(),
                    Side::Team2 => b.manager_name.clone(),
                    Side::Tie => "Tie".to_string(),
                };
                Some((winner, side, reason))
            }
            _ => None,
        };

        let (winner, winner_side, tie_reason) = match decision {
            Some((winner, side, reason)) => (Some(winner), Some(side), Some(reason)),
            None => (None, None, None),
        };

        TieAnalysis {
            team1,
            team2,
            winner,
            winner_side,
            tie_reason,
        }
    }
}

/// Round data shared by both sides of an analysis.
struct RoundContext<'a> {
    players: HashMap<ElementId, &'a Element>,
    team_names: HashMap<TeamId, &'a str>,
    live: HashMap<ElementId, &'a LiveStats>,
    conceded: HashMap<TeamId, i64>,
}

impl<'a> RoundContext<'a> {
    fn new(bootstrap: &'a BootstrapStatic, fixtures: &[Fixture], live: &'a LiveEvent) -> Self {
        Self {
            players: bootstrap.element_index(),
            team_names: bootstrap.team_names(),
            live: live.elements.iter().map(|e| (e.id, &e.stats)).collect(),
            conceded: conceded_by_team(fixtures),
        }
    }

    fn team_name(&self, team: TeamId) -> String {
        self.team_names
            .get(&team)
            .map(|name| name.to_string())
            .unwrap_or_default()
    }

    /// Attribute goals for the picks. Players without minutes contribute
    /// nothing; a player absent from live data has not played.
    fn attribute(
        &self,
        picks: &[Pick],
    ) -> Result<(GoalTally, Vec<ScoringPlayer>, Vec<ConcedingPlayer>), FetchError> {
        let mut tally = GoalTally::default();
        let mut scored = Vec::new();
        let mut conceded: BTreeMap<TeamId, Vec<ConcedingPlayer>> = BTreeMap::new();

        for pick in picks {
            let player = self.players.get(&pick.element).ok_or_else(|| {
                FetchError::Format(format!("pick {} is not in bootstrap data", pick.element))
            })?;
            let Some(stats) = self.live.get(&pick.element) else {
                continue;
            };
            if stats.minutes <= 0 {
                continue;
            }

            if stats.goals_scored > 0 {
                tally.scored += stats.goals_scored;
                scored.push(ScoringPlayer {
                    id: pick.element,
                    name: player.web_name.clone(),
                    team: player.team,
                    team_name: self.team_name(player.team),
                    position: player.element_type,
                    goals: stats.goals_scored,
                });
            }

            let team_conceded = self.conceded.get(&player.team).copied().unwrap_or(0);
            if team_conceded > 0 {
                tally.conceded += team_conceded;
                conceded.entry(player.team).or_default().push(ConcedingPlayer {
                    id: pick.element,
                    name: player.web_name.clone(),
                    team: player.team,
                    team_name: self.team_name(player.team),
                    position: player.element_type,
                    conceded: team_conceded,
                });
            }
        }

        Ok((tally, scored, conceded.into_values().flatten().collect()))
    }
}

impl Aggregator {
    /// Compare two entries' real-world goal involvement in `gameweek`.
    ///
    /// Only a bootstrap failure fails the call. Fixture or live data
    /// failures, and any per-side failure, are reported inside the
    /// affected side(s) and leave the winner unset.
    pub async fn analyze_tie(
        &self,
        team1: EntryId,
        team2: EntryId,
        gameweek: Gameweek,
    ) -> Result<TieAnalysis, FetchError> {
        info!(
            "Analyzing tie between {} and {} for gameweek {}",
            team1, team2, gameweek
        );
        let bootstrap = self.api.bootstrap().await?;

        let round = tokio::try_join!(self.api.fixtures(gameweek), self.api.live(gameweek));
        let (side1, side2) = match round {
            Ok((fixtures, live)) => {
                let context = RoundContext::new(&bootstrap, &fixtures, &live);
                tokio::join!(
                    self.side_stats(&context, team1, gameweek),
                    self.side_stats(&context, team2, gameweek)
                )
            }
            Err(e) => {
                warn!("Error fetching round data for gameweek {}: {}", gameweek, e);
                (
                    SideOutcome::error(fetch_failed(team1)),
                    SideOutcome::error(fetch_failed(team2)),
                )
            }
        };

        let analysis = TieAnalysis::resolve(side1, side2);
        info!(
            "Tie {} vs {}: winner {:?} ({:?})",
            team1, team2, analysis.winner_side, analysis.tie_reason
        );
        Ok(analysis)
    }

    async fn side_stats(
        &self,
        round: &RoundContext<'_>,
        entry: EntryId,
        gameweek: Gameweek,
    ) -> SideOutcome {
        let (profile, picks) = tokio::join!(
            self.retrying("entry", || self.api.entry(entry)),
            self.retrying("entry picks", || self.api.entry_picks(entry, gameweek))
        );

        let profile = match profile {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Error fetching profile for {}: {}", entry, e);
                return SideOutcome::error(fetch_failed(entry));
            }
        };
        let picks = match picks {
            Ok(picks) => picks,
            Err(e) if e.is_not_found() => {
                return SideOutcome::error(format!(
                    "Gameweek {} data not available for team {}",
                    gameweek, entry
                ));
            }
            Err(e) => {
                warn!("Error fetching picks for {}: {}", entry, e);
                return SideOutcome::error(fetch_failed(entry));
            }
        };

        match round.attribute(&picks.picks) {
            Ok((tally, players_scored, players_conceded)) => SideOutcome::Stats(TeamTieStats {
                manager_name: profile.manager_name(),
                team_name: profile.name,
                goals_scored: tally.scored,
                goals_conceded: tally.conceded,
                players_scored,
                players_conceded,
            }),
            Err(e) => {
                warn!("Error attributing goals for {}: {}", entry, e);
                SideOutcome::error(fetch_failed(entry))
            }
        }
    }
}

fn fetch_failed(entry: EntryId) -> String {
    format!("Error fetching data for team {}", entry)
}
