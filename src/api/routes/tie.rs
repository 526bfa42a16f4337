use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::aggregate::TieAnalysis;
use crate::api::state::AppState;
use crate::api::{parse_id, ApiError};
use crate::models::{EntryId, Gameweek};

#[derive(Debug, Deserialize)]
pub struct TieParams {
    pub team_id1: Option<String>,
    pub team_id2: Option<String>,
    pub gameweek: Option<String>,
}

pub async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<TieParams>,
) -> Result<Json<TieAnalysis>, ApiError> {
    let (Some(team1), Some(team2), Some(gameweek)) =
        (params.team_id1, params.team_id2, params.gameweek)
    else {
        return Err(ApiError::BadRequest(
            "Missing team IDs or gameweek".to_string(),
        ));
    };

    let team1: EntryId = parse_id(&team1, "team_id1")?;
    let team2: EntryId = parse_id(&team2, "team_id2")?;
    let gameweek: Gameweek = parse_id(&gameweek, "gameweek")?;

    Ok(Json(state.aggregator.analyze_tie(team1, team2, gameweek).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::aggregate::testing::{bootstrap, element, profile, team};
    use crate::api::test_support::{app, get_json};
    use crate::fpl::mock::MockFplApi;
    use crate::fpl::paths;
    use crate::models::{EntryId, Gameweek};

    #[tokio::test]
    async fn test_missing_params_is_bad_request() {
        for uri in [
            "/tieanalyze",
            "/tieanalyze?team_id1=1&team_id2=2",
            "/api/tieanalyze?team_id1=1&gameweek=3",
        ] {
            let (status, json) = get_json(app(MockFplApi::new()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(json["error"]["code"], "BAD_REQUEST");
        }
    }

    #[tokio::test]
    async fn test_tie_route() {
        let gw = Gameweek(9);
        let api = MockFplApi::new()
            .with_json(
                paths::BOOTSTRAP,
                bootstrap(
                    vec![team(1, "Arsenal"), team(2, "Chelsea")],
                    vec![element(10, "Saka", 1, 3), element(20, "Palmer", 2, 3)],
                ),
            )
            .with_json(
                &paths::fixtures(gw),
                json!([{"id": 1, "team_h": 1, "team_a": 2, "team_h_score": 1, "team_a_score": 1}]),
            )
            .with_json(
                &paths::live(gw),
                json!({"elements": [
                    {"id": 10, "stats": {"minutes": 90, "goals_scored": 1}},
                    {"id": 20, "stats": {"minutes": 90, "goals_scored": 1}}
                ]}),
            )
            .with_json(&paths::entry(EntryId(1)), profile(1, "Asha", "Rai", "Kathmandu XI"))
            .with_json(&paths::entry(EntryId(2)), profile(2, "Bikash", "Shrestha", "Everest FC"))
            .with_json(
                &paths::entry_picks(EntryId(1), gw),
                json!({"picks": [{"element": 10, "position": 1}]}),
            )
            .with_not_found(&paths::entry_picks(EntryId(2), gw));

        let (status, json) =
            get_json(app(api), "/tieanalyze?team_id1=1&team_id2=2&gameweek=9").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["team1"]["goals_scored"], 1);
        assert_eq!(json["team1"]["players_scored"][0]["name"], "Saka");
        assert_eq!(json["team1"]["players_scored"][0]["position"], 3);
        assert_eq!(
            json["team2"],
            json!({"error": "Gameweek 9 data not available for team 2"})
        );
        assert_eq!(json["winner"], serde_json::Value::Null);
        assert_eq!(json["tieReason"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_is_bad_gateway() {
        let api = MockFplApi::new().with_status(paths::BOOTSTRAP, 503);

        let (status, _) = get_json(app(api), "/tieanalyze?team_id1=1&team_id2=2&gameweek=9").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
