//! League standings pages.

use serde::Deserialize;

use super::EntryId;

/// One page of a standings endpoint. The `standings` object is required:
/// a response without it is a format error, not an empty page.
#[derive(Debug, Clone, Deserialize)]
pub struct StandingsPage<R> {
    pub standings: StandingsBlock<R>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsBlock<R> {
    pub has_next: bool,
    pub results: Vec<R>,
}

/// A row of `leagues-classic/{id}/standings/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassicStandingRow {
    pub entry: EntryId,
    pub entry_name: String,
    pub player_name: String,
    pub total: i64,
}

/// A row of `leagues-h2h/{id}/standings/`.
///
/// Odd-sized leagues carry an "AVERAGE" pseudo-entrant with no entry id.
#[derive(Debug, Clone, Deserialize)]
pub struct H2hStandingRow {
    pub entry: Option<EntryId>,
    pub entry_name: String,
    pub player_name: String,

    #[serde(default)]
    pub rank: u32,

    #[serde(default)]
    pub matches_played: u32,

    #[serde(default)]
    pub matches_won: u32,

    #[serde(default)]
    pub matches_drawn: u32,

    #[serde(default)]
    pub matches_lost: u32,

    /// League points (3 per win, 1 per draw)
    pub total: i64,
}

/// Row types that name a manager entry.
pub trait StandingRow {
    fn entry_id(&self) -> Option<EntryId>;
    fn manager_name(&self) -> &str;
}

impl StandingRow for ClassicStandingRow {
    fn entry_id(&self) -> Option<EntryId> {
        Some(self.entry)
    }

    fn manager_name(&self) -> &str {
        &self.player_name
    }
}

impl StandingRow for H2hStandingRow {
    fn entry_id(&self) -> Option<EntryId> {
        self.entry
    }

    fn manager_name(&self) -> &str {
        &self.player_name
    }
}
