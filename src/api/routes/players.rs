use axum::extract::{Path, State};
use axum::Json;

use crate::aggregate::{ManagerSummary, PlayerTotals, PricePrediction};
use crate::api::state::AppState;
use crate::api::{parse_id, ApiError};
use crate::models::{ElementId, EntryId};

pub async fn price_change_prediction(
    State(state): State<AppState>,
) -> Result<Json<Vec<PricePrediction>>, ApiError> {
    Ok(Json(state.aggregator.price_change_predictions().await?))
}

pub async fn user_history(
    State(state): State<AppState>,
    Path(entry): Path<String>,
) -> Result<Json<ManagerSummary>, ApiError> {
    let entry: EntryId = parse_id(&entry, "team id")?;
    Ok(Json(state.aggregator.manager_summary(entry).await?))
}

pub async fn player(
    State(state): State<AppState>,
    Path(element): Path<String>,
) -> Result<Json<PlayerTotals>, ApiError> {
    let element: ElementId = parse_id(&element, "player id")?;
    Ok(Json(state.aggregator.player_totals(element).await?))
}
