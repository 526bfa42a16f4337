//! Current gameweek detection and the live fixture list.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::Aggregator;
use crate::fetch::FetchError;
use crate::models::{Fixture, Gameweek, GameweekEvent};

/// The latest gameweek whose deadline has passed at `now`.
///
/// Falls back to the first gameweek before the season's first deadline.
pub fn current_gameweek(events: &[GameweekEvent], now: DateTime<Utc>) -> Gameweek {
    events
        .iter()
        .filter(|e| e.deadline_time <= now)
        .map(|e| e.id)
        .max()
        .unwrap_or(Gameweek::FIRST)
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveFixtures {
    pub gameweek: Gameweek,
    pub fixtures: Vec<Fixture>,
}

impl Aggregator {
    /// Current gameweek according to upstream deadlines and the system clock.
    pub async fn current_gameweek(&self) -> Result<Gameweek, FetchError> {
        let bootstrap = self.api.bootstrap().await?;
        Ok(current_gameweek(&bootstrap.events, Utc::now()))
    }

    /// Fixtures of the current gameweek.
    pub async fn live_fixtures(&self) -> Result<LiveFixtures, FetchError> {
        let gameweek = self.current_gameweek().await?;
        let fixtures = self.api.fixtures(gameweek).await?;
        info!("Gameweek {}: {} fixtures", gameweek, fixtures.len());
        Ok(LiveFixtures { gameweek, fixtures })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::aggregate::testing::{aggregator, bootstrap};
    use crate::fpl::mock::MockFplApi;
    use crate::fpl::paths;

    fn event(id: u32, deadline: &str) -> GameweekEvent {
        serde_json::from_value(json!({"id": id, "deadline_time": deadline})).unwrap()
    }

    fn season() -> Vec<GameweekEvent> {
        vec![
            event(1, "2024-08-16T17:30:00Z"),
            event(2, "2024-08-24T10:00:00Z"),
            event(3, "2024-08-31T10:00:00Z"),
        ]
    }

    #[test]
    fn test_current_gameweek_mid_season() {
        let now = Utc.with_ymd_and_hms(2024, 8, 27, 12, 0, 0).unwrap();
        assert_eq!(current_gameweek(&season(), now), Gameweek(2));
    }

    #[test]
    fn test_current_gameweek_at_deadline() {
        let now = Utc.with_ymd_and_hms(2024, 8, 31, 10, 0, 0).unwrap();
        assert_eq!(current_gameweek(&season(), now), Gameweek(3));
    }

    #[test]
    fn test_current_gameweek_before_season() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        assert_eq!(current_gameweek(&season(), now), Gameweek::FIRST);
        assert_eq!(current_gameweek(&[], now), Gameweek::FIRST);
    }

    #[test]
    fn test_current_gameweek_ignores_event_order() {
        let mut events = season();
        events.reverse();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(current_gameweek(&events, now), Gameweek(3));
    }

    #[tokio::test]
    async fn test_live_fixtures() {
        let mut data = bootstrap(vec![], vec![]);
        data["events"] = json!([
            {"id": 1, "deadline_time": "2020-08-16T17:30:00Z"},
            {"id": 2, "deadline_time": "2020-08-24T10:00:00Z"},
            {"id": 38, "deadline_time": "2999-05-01T10:00:00Z"}
        ]);
        let api = Arc::new(
            MockFplApi::new()
                .with_json(paths::BOOTSTRAP, data)
                .with_json(
                    &paths::fixtures(Gameweek(2)),
                    json!([{"id": 11, "event": 2, "team_h": 1, "team_a": 2}]),
                ),
        );

        let live = aggregator(api, vec![]).live_fixtures().await.unwrap();
        assert_eq!(live.gameweek, Gameweek(2));
        assert_eq!(live.fixtures.len(), 1);
    }
}
