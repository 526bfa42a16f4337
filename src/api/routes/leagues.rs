use axum::extract::{Path, State};
use axum::Json;

use crate::aggregate::{DivisionTable, EnrichedEntrant, H2hStanding, TopScorer};
use crate::api::state::AppState;
use crate::api::{parse_id, ApiError};
use crate::models::{Gameweek, LeagueId};

pub async fn classic_league(
    State(state): State<AppState>,
    Path((league, gameweek)): Path<(String, String)>,
) -> Result<Json<Vec<EnrichedEntrant>>, ApiError> {
    let league: LeagueId = parse_id(&league, "league id")?;
    let gameweek: Gameweek = parse_id(&gameweek, "gameweek")?;

    let standings = state
        .aggregator
        .aggregate_classic_standings(league, gameweek)
        .await?;
    Ok(Json(standings))
}

pub async fn h2h_top_scorers(
    State(state): State<AppState>,
    Path(gameweek): Path<String>,
) -> Result<Json<DivisionTable<Vec<TopScorer>>>, ApiError> {
    let gameweek: Gameweek = parse_id(&gameweek, "gameweek")?;
    Ok(Json(state.aggregator.top_scorers_by_division(gameweek).await))
}

pub async fn h2h_league_all(
    State(state): State<AppState>,
) -> Result<Json<DivisionTable<Vec<H2hStanding>>>, ApiError> {
    Ok(Json(state.aggregator.h2h_standings_all().await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::aggregate::testing::{classic_row, h2h_row, history, page, profile};
    use crate::api::test_support::{app, app_with_divisions, get_json};
    use crate::config::Division;
    use crate::fpl::mock::MockFplApi;
    use crate::fpl::paths;
    use crate::models::{EntryId, LeagueId};

    #[tokio::test]
    async fn test_classic_league_route() {
        let api = MockFplApi::new()
            .with_json(
                &paths::classic_standings(LeagueId(314), 1),
                page(
                    vec![
                        classic_row(1, "Asha Rai", "Kathmandu XI", 500),
                        classic_row(2, "Bikash Shrestha", "Everest FC", 480),
                    ],
                    false,
                ),
            )
            .with_json(&paths::entry_history(EntryId(1)), history(&[(3, 57, 4)]))
            .with_status(&paths::entry_history(EntryId(2)), 503);

        let (status, json) = get_json(app(api), "/api/classic-league/314/3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!([
                {"id": 1, "manager_name": "Asha Rai", "team_name": "Kathmandu XI", "total_points": 500, "gameweek_score": 57},
                {"id": 2, "manager_name": "Bikash Shrestha", "team_name": "Everest FC", "total_points": 480, "gameweek_score": "Error"}
            ])
        );
    }

    #[tokio::test]
    async fn test_classic_league_bad_standings_is_bad_gateway() {
        let api = MockFplApi::new()
            .with_json(&paths::classic_standings(LeagueId(314), 1), json!({"detail": "Not found."}));

        let (status, json) = get_json(app(api), "/classic-league/314/3").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM_FORMAT");
    }

    #[tokio::test]
    async fn test_classic_league_rejects_bad_gameweek() {
        let (status, json) = get_json(app(MockFplApi::new()), "/classic-league/314/zero").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_h2h_topscorer_route() {
        let api = MockFplApi::new()
            .with_json(
                &paths::h2h_standings(LeagueId(20), 1),
                page(vec![h2h_row(5, "Dipesh Thapa", "Lumbini United", 1)], false),
            )
            .with_json(&paths::entry_history(EntryId(5)), history(&[(7, 88, 0)]))
            .with_json(&paths::entry(EntryId(5)), profile(5, "Dipesh", "Thapa", "Lumbini United"))
            .with_json(&paths::h2h_standings(LeagueId(10), 1), page(vec![], false));
        let divisions = vec![Division::new("Div B", 20), Division::new("Div A", 10)];

        let (status, json) = get_json(app_with_divisions(api, divisions), "/h2h-topscorer/7").await;

        assert_eq!(status, StatusCode::OK);
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(
            json["Div B"],
            json!([{
                "manager_id": 5,
                "manager_name": "Dipesh Thapa",
                "team_name": "Lumbini United",
                "gameweek_score": 88,
                "transfer_cost": 0
            }])
        );
        assert_eq!(json["Div A"], json!([]));
    }

    #[tokio::test]
    async fn test_h2h_league_all_failure_is_bad_gateway() {
        let api = MockFplApi::new().with_status(&paths::h2h_standings(LeagueId(10), 1), 500);

        let (status, json) = get_json(
            app_with_divisions(api, vec![Division::new("Div A", 10)]),
            "/h2h-league-all",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM_UNAVAILABLE");
    }
}
