//! Route table and handlers, grouped by what they serve.

pub mod leagues;
pub mod players;
pub mod proxy;
pub mod tie;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// All routes, relative to wherever they are mounted.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // League aggregations
        .route("/classic-league/:league/:gameweek", get(leagues::classic_league))
        .route("/h2h-topscorer/:gameweek", get(leagues::h2h_top_scorers))
        .route("/h2h-league-all", get(leagues::h2h_league_all))
        .route("/tieanalyze", get(tie::analyze))
        // Managers and players
        .route("/price-change-prediction", get(players::price_change_prediction))
        .route("/user-history/:entry", get(players::user_history))
        .route("/player/:element", get(players::player))
        // Upstream pass-through
        .route("/fpl-data", get(proxy::bootstrap_static))
        .route("/bootstrap-static", get(proxy::bootstrap_static))
        .route("/fixtures", get(proxy::fixtures))
        .route("/teams", get(proxy::teams))
        .route("/injuries", get(proxy::injuries))
        .route("/manager-history/:entry", get(proxy::manager_history))
        .route("/dream-team/:gameweek", get(proxy::dream_team))
        .route("/live-fixtures", get(proxy::live_fixtures))
}
