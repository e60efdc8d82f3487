//! Debounced free-text place search.
//!
//! Typing fires one query per keystroke. Each query waits for a quiet period
//! and only the newest query still waiting reaches the geocoder.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::domain::PlaceSuggestion;
use crate::domain::ports::Geocoder;

/// Quiet period before a query is sent.
pub const PLACE_SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Debouncing front for a [`Geocoder`].
///
/// One instance serves one input box (for example one WebSocket session).
pub struct DebouncedPlaceSearch<G: ?Sized> {
    geocoder: Arc<G>,
    quiet: Duration,
    generation: AtomicU64,
}

impl<G> DebouncedPlaceSearch<G>
where
    G: Geocoder + ?Sized,
{
    pub fn new(geocoder: Arc<G>) -> Self {
        Self::with_quiet_period(geocoder, PLACE_SEARCH_QUIET_PERIOD)
    }

    pub fn with_quiet_period(geocoder: Arc<G>, quiet: Duration) -> Self {
        Self {
            geocoder,
            quiet,
            generation: AtomicU64::new(0),
        }
    }

    /// Search for `query` once the input has settled.
    ///
    /// Returns `None` when a newer query arrived first. A blank query
    /// clears the suggestions at once without touching the geocoder.
    pub async fn search(&self, query: &str) -> Option<Vec<PlaceSuggestion>> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim();
        if query.is_empty() {
            return Some(Vec::new());
        }

        tokio::time::sleep(self.quiet).await;
        if self.is_superseded(ticket) {
            debug!(query, "place search superseded during quiet period");
            return None;
        }

        let found = self.geocoder.search(query).await;
        if self.is_superseded(ticket) {
            debug!(query, "place search superseded during lookup");
            return None;
        }
        Some(found)
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::domain::ports::MockGeocoder;

    fn suggestion(name: &str) -> PlaceSuggestion {
        PlaceSuggestion {
            display_name: name.to_owned(),
            location: Coordinates::new(19.07, 72.87).expect("valid"),
            city: Some("Mumbai".into()),
            state: Some("Maharashtra".into()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn settled_query_reaches_the_geocoder() {
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_search()
            .withf(|q| q == "Andheri")
            .times(1)
            .returning(|q| vec![suggestion(q)]);
        let search = DebouncedPlaceSearch::new(Arc::new(geocoder));

        let found = search.search("  Andheri ").await.expect("not superseded");

        assert_eq!(found, vec![suggestion("Andheri")]);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_query_supersedes_pending_one() {
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_search()
            .withf(|q| q == "Andheri East")
            .times(1)
            .returning(|q| vec![suggestion(q)]);
        let search = Arc::new(DebouncedPlaceSearch::new(Arc::new(geocoder)));

        let first = {
            let search = Arc::clone(&search);
            tokio::spawn(async move { search.search("Andh").await })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;
        let second = search.search("Andheri East").await;

        assert_eq!(first.await.expect("task joins"), None);
        assert_eq!(second.map(|s| s.len()), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn blank_query_clears_without_lookup() {
        let mut geocoder = MockGeocoder::new();
        geocoder.expect_search().never();
        let search = DebouncedPlaceSearch::new(Arc::new(geocoder));

        assert_eq!(search.search("   ").await, Some(Vec::new()));
    }
}
