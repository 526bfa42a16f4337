//! Sequential walks over paginated standings.

use std::future::Future;

use tracing::{debug, info};

use super::Aggregator;
use crate::fetch::FetchError;
use crate::models::{ClassicStandingRow, H2hStandingRow, LeagueId, StandingsPage};

/// Fetch standings pages 1, 2, ... until `has_next` is false and return
/// every row in page order.
///
/// Pages are fetched one at a time since each page's `has_next` decides
/// whether the next exists. Any page failing fails the whole walk.
pub async fn collect_pages<R, F, Fut>(mut fetch_page: F) -> Result<Vec<R>, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<StandingsPage<R>, FetchError>>,
{
    let mut rows = Vec::new();
    let mut page = 1;

    loop {
        let block = fetch_page(page).await?.standings;
        debug!("Fetched page {}, entries: {}", page, block.results.len());

        if block.has_next && block.results.is_empty() {
            return Err(FetchError::Format(format!(
                "page {} is empty but claims a next page",
                page
            )));
        }

        rows.extend(block.results);
        if !block.has_next {
            break;
        }
        page += 1;
    }

    Ok(rows)
}

impl Aggregator {
    /// All rows of a classic league, in rank order.
    pub async fn classic_standings(
        &self,
        league: LeagueId,
    ) -> Result<Vec<ClassicStandingRow>, FetchError> {
        let rows = collect_pages(|page| self.api.classic_standings_page(league, page)).await?;
        info!("League {}: {} classic entries", league, rows.len());
        Ok(rows)
    }

    /// All rows of a head-to-head league, in rank order.
    pub async fn h2h_standings(&self, league: LeagueId) -> Result<Vec<H2hStandingRow>, FetchError> {
        let rows = collect_pages(|page| self.api.h2h_standings_page(league, page)).await?;
        info!("League {}: {} h2h entries", league, rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::aggregate::testing::{aggregator, classic_row, page};
    use crate::fpl::mock::MockFplApi;
    use crate::fpl::paths;
    use crate::models::EntryId;

    fn rows(range: std::ops::Range<u64>) -> Vec<serde_json::Value> {
        range
            .map(|i| classic_row(i, &format!("Manager {}", i), &format!("Team {}", i), 100))
            .collect()
    }

    #[tokio::test]
    async fn test_three_pages_equal_one_page() {
        let league = LeagueId(10);
        let paged = Arc::new(
            MockFplApi::new()
                .with_json(&paths::classic_standings(league, 1), page(rows(0..10), true))
                .with_json(&paths::classic_standings(league, 2), page(rows(10..20), true))
                .with_json(&paths::classic_standings(league, 3), page(rows(20..30), false)),
        );
        let single = Arc::new(
            MockFplApi::new()
                .with_json(&paths::classic_standings(league, 1), page(rows(0..30), false)),
        );

        let from_pages: Vec<EntryId> = aggregator(paged.clone(), vec![])
            .classic_standings(league)
            .await
            .unwrap()
            .iter()
            .map(|r| r.entry)
            .collect();
        let from_single: Vec<EntryId> = aggregator(single, vec![])
            .classic_standings(league)
            .await
            .unwrap()
            .iter()
            .map(|r| r.entry)
            .collect();

        assert_eq!(from_pages, from_single);
        assert_eq!(from_pages.len(), 30);
        assert_eq!(paged.call_count(&paths::classic_standings(league, 4)), 0);
    }

    #[tokio::test]
    async fn test_bad_page_fails_whole_walk() {
        let league = LeagueId(11);
        let api = Arc::new(
            MockFplApi::new()
                .with_json(&paths::classic_standings(league, 1), page(rows(0..2), true))
                .with_json(
                    &paths::classic_standings(league, 2),
                    serde_json::json!({"detail": "Not found."}),
                ),
        );

        let err = aggregator(api, vec![])
            .classic_standings(league)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Format(_)));
    }

    #[tokio::test]
    async fn test_empty_page_claiming_next_is_rejected() {
        let league = LeagueId(12);
        let api = Arc::new(
            MockFplApi::new().with_json(&paths::classic_standings(league, 1), page(vec![], true)),
        );

        let err = aggregator(api, vec![])
            .classic_standings(league)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Format(_)));
    }

    #[tokio::test]
    async fn test_empty_league() {
        let league = LeagueId(13);
        let api = Arc::new(
            MockFplApi::new().with_json(&paths::classic_standings(league, 1), page(vec![], false)),
        );

        let rows = aggregator(api, vec![]).classic_standings(league).await.unwrap();
        assert!(rows.is_empty());
    }
}
