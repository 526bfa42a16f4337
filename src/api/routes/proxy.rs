//! Upstream data served as-is or lightly reshaped.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregate::LiveFixtures;
use crate::api::state::AppState;
use crate::api::{parse_id, ApiError};
use crate::fpl::paths;
use crate::models::{EntryId, Gameweek, TeamId};

pub async fn bootstrap_static(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.aggregator.api().get_json(paths::BOOTSTRAP).await?))
}

#[derive(Debug, Deserialize)]
pub struct FixturesParams {
    pub event: Option<String>,
}

pub async fn fixtures(
    State(state): State<AppState>,
    Query(params): Query<FixturesParams>,
) -> Result<Json<Value>, ApiError> {
    let Some(event) = params.event else {
        return Err(ApiError::BadRequest(
            "Gameweek (event) is required".to_string(),
        ));
    };
    let gameweek: Gameweek = parse_id(&event, "event")?;
    Ok(Json(
        state
            .aggregator
            .api()
            .get_json(&paths::fixtures(gameweek))
            .await?,
    ))
}

#[derive(Debug, Serialize)]
pub struct TeamBadge {
    pub id: TeamId,
    pub name: String,
    pub badge: String,
}

pub async fn teams(State(state): State<AppState>) -> Result<Json<Vec<TeamBadge>>, ApiError> {
    let bootstrap = state.aggregator.api().bootstrap().await?;
    let teams = bootstrap
        .teams
        .iter()
        .map(|team| TeamBadge {
            id: team.id,
            name: team.name.clone(),
            badge: team.badge_url(),
        })
        .collect();
    Ok(Json(teams))
}

/// Raw player records carrying a news item, with every upstream field kept.
pub async fn injuries(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let mut bootstrap = state.aggregator.api().get_json(paths::BOOTSTRAP).await?;
    let elements = match bootstrap.get_mut("elements").map(Value::take) {
        Some(Value::Array(elements)) => elements,
        _ => {
            return Err(ApiError::UpstreamFormat(
                "bootstrap-static: missing elements".to_string(),
            ))
        }
    };

    let with_news = elements
        .into_iter()
        .filter(|player| {
            player
                .get("news")
                .and_then(Value::as_str)
                .is_some_and(|news| !news.is_empty())
        })
        .collect();
    Ok(Json(with_news))
}

pub async fn manager_history(
    State(state): State<AppState>,
    Path(entry): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let entry: EntryId = parse_id(&entry, "manager id")?;
    Ok(Json(
        state
            .aggregator
            .api()
            .get_json(&paths::entry_history(entry))
            .await?,
    ))
}

pub async fn dream_team(
    State(state): State<AppState>,
    Path(gameweek): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let gameweek: Gameweek = parse_id(&gameweek, "gameweek")?;
    Ok(Json(
        state
            .aggregator
            .api()
            .get_json(&paths::dream_team(gameweek))
            .await?,
    ))
}

pub async fn live_fixtures(State(state): State<AppState>) -> Result<Json<LiveFixtures>, ApiError> {
    Ok(Json(state.aggregator.live_fixtures().await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::aggregate::testing::{bootstrap, element, team};
    use crate::api::test_support::{app, get_json};
    use crate::fpl::mock::MockFplApi;
    use crate::fpl::paths;
    use crate::models::{EntryId, Gameweek};

    fn bootstrap_with_news() -> serde_json::Value {
        let mut injured = element(10, "Saka", 1, 3);
        injured["news"] = json!("Hamstring injury - 75% chance of playing");
        bootstrap(
            vec![team(1, "Arsenal"), team(2, "Chelsea")],
            vec![injured, element(11, "Raya", 1, 1)],
        )
    }

    #[tokio::test]
    async fn test_bootstrap_passthrough() {
        for uri in ["/fpl-data", "/bootstrap-static", "/api/bootstrap-static"] {
            let api = MockFplApi::new().with_json(paths::BOOTSTRAP, bootstrap_with_news());
            let (status, json) = get_json(app(api), uri).await;

            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert_eq!(json, bootstrap_with_news());
        }
    }

    #[tokio::test]
    async fn test_fixtures_requires_event() {
        let (status, json) = get_json(app(MockFplApi::new()), "/fixtures").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_fixtures_passthrough() {
        let fixtures = json!([{"id": 1, "event": 4, "team_h": 1, "team_a": 2, "kickoff_time": "2024-09-14T11:30:00Z"}]);
        let api = MockFplApi::new().with_json(&paths::fixtures(Gameweek(4)), fixtures.clone());

        let (status, json) = get_json(app(api), "/fixtures?event=4").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, fixtures);
    }

    #[tokio::test]
    async fn test_teams_with_badges() {
        let api = MockFplApi::new().with_json(paths::BOOTSTRAP, bootstrap_with_news());

        let (status, json) = get_json(app(api), "/teams").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json[0],
            json!({
                "id": 1,
                "name": "Arsenal",
                "badge": "https://resources.premierleague.com/premierleague/badges/70/t3.png"
            })
        );
        assert_eq!(json.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_injuries_keep_players_with_news() {
        let api = MockFplApi::new().with_json(paths::BOOTSTRAP, bootstrap_with_news());

        let (status, json) = get_json(app(api), "/injuries").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["web_name"], "Saka");
        assert_eq!(json[0]["now_cost"], 50);
    }

    #[tokio::test]
    async fn test_injuries_without_elements_is_bad_gateway() {
        let api = MockFplApi::new().with_json(paths::BOOTSTRAP, json!({"events": []}));

        let (status, json) = get_json(app(api), "/injuries").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM_FORMAT");
    }

    #[tokio::test]
    async fn test_manager_history_and_dream_team() {
        let history = json!({"current": [{"event": 1, "points": 64}], "past": [], "chips": []});
        let dream = json!({"top_player": {"id": 10, "points": 18}, "team": []});
        let api = MockFplApi::new()
            .with_json(&paths::entry_history(EntryId(7)), history.clone())
            .with_json(&paths::dream_team(Gameweek(2)), dream.clone());
        let router = app(api);

        let (status, json) = get_json(router.clone(), "/manager-history/7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, history);

        let (status, json) = get_json(router, "/dream-team/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, dream);
    }

    #[tokio::test]
    async fn test_live_fixtures_route() {
        let mut data = bootstrap(vec![], vec![]);
        data["events"] = json!([{"id": 1, "deadline_time": "2020-01-01T00:00:00Z"}]);
        let api = MockFplApi::new()
            .with_json(paths::BOOTSTRAP, data)
            .with_json(&paths::fixtures(Gameweek(1)), json!([]));

        let (status, json) = get_json(app(api), "/live-fixtures").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"gameweek": 1, "fixtures": []}));
    }
}
