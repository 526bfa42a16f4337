//! Fantasy Premier League API client.
//!
//! All upstream endpoint specifics live in this module so path changes are
//! easy to fix. Aggregations depend on the [`FplApi`] trait, not on HTTP.

use async_trait::async_trait;
use serde_json::Value;

use crate::fetch::{decode, FetchError, Fetcher};
use crate::models::{
    BootstrapStatic, ClassicStandingRow, ElementId, ElementSummary, EntryHistory, EntryId,
    EntryPicks, EntryProfile, Fixture, Gameweek, H2hStandingRow, LeagueId, LiveEvent,
    StandingsPage,
};

#[cfg(test)]
pub mod mock;

/// Upstream endpoint paths, relative to the API root.
pub mod paths {
    use crate::models::{ElementId, EntryId, Gameweek, LeagueId};

    pub const BOOTSTRAP: &str = "bootstrap-static/";

    pub fn fixtures(gameweek: Gameweek) -> String {
        format!("fixtures/?event={}", gameweek)
    }

    pub fn live(gameweek: Gameweek) -> String {
        format!("event/{}/live/", gameweek)
    }

    pub fn dream_team(gameweek: Gameweek) -> String {
        format!("dream-team/{}/", gameweek)
    }

    pub fn classic_standings(league: LeagueId, page: u32) -> String {
        format!("leagues-classic/{}/standings/?page_standings={}", league, page)
    }

    pub fn h2h_standings(league: LeagueId, page: u32) -> String {
        format!(
            "leagues-h2h/{}/standings/?page_new_entries=1&page_standings={}",
            league, page
        )
    }

    pub fn entry(entry: EntryId) -> String {
        format!("entry/{}/", entry)
    }

    pub fn entry_history(entry: EntryId) -> String {
        format!("entry/{}/history/", entry)
    }

    pub fn entry_picks(entry: EntryId, gameweek: Gameweek) -> String {
        format!("entry/{}/event/{}/picks/", entry, gameweek)
    }

    pub fn element_summary(element: ElementId) -> String {
        format!("element-summary/{}/", element)
    }
}

/// Read-only view of the upstream API.
///
/// Implementors only provide [`FplApi::get_json`]; the typed accessors
/// decode on top of it and report shape mismatches as
/// [`FetchError::Format`].
#[async_trait]
pub trait FplApi: Send + Sync {
    /// GET an upstream path and return the JSON body.
    async fn get_json(&self, path: &str) -> Result<Value, FetchError>;

    async fn bootstrap(&self) -> Result<BootstrapStatic, FetchError> {
        decode(self.get_json(paths::BOOTSTRAP).await?, "bootstrap-static")
    }

    async fn fixtures(&self, gameweek: Gameweek) -> Result<Vec<Fixture>, FetchError> {
        decode(self.get_json(&paths::fixtures(gameweek)).await?, "fixtures")
    }

    async fn live(&self, gameweek: Gameweek) -> Result<LiveEvent, FetchError> {
        decode(self.get_json(&paths::live(gameweek)).await?, "event live")
    }

    async fn classic_standings_page(
        &self,
        league: LeagueId,
        page: u32,
    ) -> Result<StandingsPage<ClassicStandingRow>, FetchError> {
        decode(
            self.get_json(&paths::classic_standings(league, page)).await?,
            "classic standings",
        )
    }

    async fn h2h_standings_page(
        &self,
        league: LeagueId,
        page: u32,
    ) -> Result<StandingsPage<H2hStandingRow>, FetchError> {
        decode(
            self.get_json(&paths::h2h_standings(league, page)).await?,
            "h2h standings",
        )
    }

    async fn entry(&self, entry: EntryId) -> Result<EntryProfile, FetchError> {
        decode(self.get_json(&paths::entry(entry)).await?, "entry")
    }

    async fn entry_history(&self, entry: EntryId) -> Result<EntryHistory, FetchError> {
        decode(self.get_json(&paths::entry_history(entry)).await?, "entry history")
    }

    async fn entry_picks(
        &self,
        entry: EntryId,
        gameweek: Gameweek,
    ) -> Result<EntryPicks, FetchError> {
        decode(
            self.get_json(&paths::entry_picks(entry, gameweek)).await?,
            "entry picks",
        )
    }

    async fn element_summary(&self, element: ElementId) -> Result<ElementSummary, FetchError> {
        decode(
            self.get_json(&paths::element_summary(element)).await?,
            "element summary",
        )
    }
}

/// The live upstream.
pub struct FplClient {
    fetcher: Fetcher,
}

impl FplClient {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl FplApi for FplClient {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        self.fetcher.get_json(path).await
    }
}
