//! Price-change heuristic from gameweek transfers, form and points per game.

use serde::Serialize;
use tracing::{debug, info};

use super::Aggregator;
use crate::fetch::FetchError;
use crate::models::{BootstrapStatic, Element, ElementId};

const RISE_TRANSFERS_IN: i64 = 10_000;
const FALL_TRANSFERS_OUT: i64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceDirection {
    Rise,
    Fall,
}

/// Heuristic direction for a player's next price move, if any.
pub fn predict_direction(player: &Element) -> Option<PriceDirection> {
    let form = player.form;
    let ppg = player.points_per_game;

    if player.transfers_in_event > RISE_TRANSFERS_IN && form > 5.0 && ppg > 3.0 {
        Some(PriceDirection::Rise)
    } else if player.transfers_out_event > FALL_TRANSFERS_OUT && form < 4.0 && ppg < 3.0 {
        Some(PriceDirection::Fall)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePrediction {
    pub id: ElementId,
    pub web_name: String,
    pub team: String,

    /// In millions
    pub current_price: f64,
    pub predicted_change: PriceDirection,
    pub transfers_in: i64,
    pub transfers_out: i64,
    pub form: f64,
    pub points_per_game: f64,
}

impl PricePrediction {
    fn sort_key(&self) -> f64 {
        match self.predicted_change {
            PriceDirection::Rise => self.transfers_in as f64 + self.form * 10.0,
            PriceDirection::Fall => -(self.transfers_out as f64 + (5.0 - self.form) * 10.0),
        }
    }
}

/// Players predicted to rise or fall, strongest signal first. Risers
/// always sort ahead of fallers.
pub fn predict_price_changes(bootstrap: &BootstrapStatic) -> Vec<PricePrediction> {
    let teams = bootstrap.team_names();

    let mut predictions: Vec<PricePrediction> = bootstrap
        .elements
        .iter()
        .filter_map(|player| {
            let Some(direction) = predict_direction(player) else {
                debug!(
                    "No change for {} ({}): in {}, out {}, form {}, ppg {}",
                    player.web_name,
                    player.id,
                    player.transfers_in_event,
                    player.transfers_out_event,
                    player.form,
                    player.points_per_game
                );
                return None;
            };
            Some(PricePrediction {
                id: player.id,
                web_name: player.web_name.clone(),
                team: teams
                    .get(&player.team)
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| "Unknown Team".to_string()),
                current_price: player.now_cost as f64 / 10.0,
                predicted_change: direction,
                transfers_in: player.transfers_in_event,
                transfers_out: player.transfers_out_event,
                form: player.form,
                points_per_game: player.points_per_game,
            })
        })
        .collect();

    predictions.sort_by(|a, b| b.sort_key().total_cmp(&a.sort_key()));
    predictions
}

impl Aggregator {
    pub async fn price_change_predictions(&self) -> Result<Vec<PricePrediction>, FetchError> {
        let bootstrap = self.api.bootstrap().await?;
        let predictions = predict_price_changes(&bootstrap);
        info!(
            "Price predictions: {} of {} players flagged",
            predictions.len(),
            bootstrap.elements.len()
        );
        Ok(predictions)
    }
}
