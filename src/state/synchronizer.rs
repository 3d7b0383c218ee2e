//! Read/write API over a [`FilterStore`] implementing the listing rules:
//! mutual exclusion of the two search modes, filter resets and the
//! debounced catalog search box.

use std::time::{Duration, Instant};

use crate::domain::filters::{FilterDimension, FilterState, FilterValue, UnknownDimension};
use crate::state::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::state::store::FilterStore;

pub struct FilterSynchronizer<S> {
    store: S,
    search_input: Debouncer<String>,
}

impl<S: FilterStore> FilterSynchronizer<S> {
    pub fn new(store: S) -> Self {
        Self::with_debounce(store, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(store: S, wait: Duration) -> Self {
        Self {
            store,
            search_input: Debouncer::new(wait),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> FilterState {
        self.store.snapshot()
    }

    /// Canonical query string of the current state.
    pub fn serialized(&self) -> String {
        self.store.snapshot().to_query_string()
    }

    pub fn set_dimension(&self, dimension: FilterDimension, value: impl Into<FilterValue>) {
        let value = value.into();
        log::debug!("Setting filter {dimension} to {value:?}");
        self.store.update(&mut |state| state.set(dimension, value.clone()));
    }

    /// String-keyed variant of [`FilterSynchronizer::set_dimension`]. An
    /// unknown name is a caller bug and nothing is written.
    pub fn set_dimension_by_name(
        &self,
        name: &str,
        value: impl Into<FilterValue>,
    ) -> Result<(), UnknownDimension> {
        let dimension = name.parse::<FilterDimension>()?;
        self.set_dimension(dimension, value);
        Ok(())
    }

    pub fn reset_filters(&self) {
        self.store.update(&mut |state| state.reset_filters());
    }

    pub fn handle_search_change(&self, term: &str) {
        self.store.update(&mut |state| state.apply_search(term));
    }

    pub fn handle_global_search_change(&self, term: &str) {
        self.store
            .update(&mut |state| state.apply_global_search(term));
    }

    /// Schedules a catalog search; a later call within the quiet period
    /// replaces this one.
    pub fn debounced_search_change(&mut self, term: impl Into<String>, now: Instant) {
        self.search_input.call(term.into(), now);
    }

    /// Applies the pending debounced search if it is due. Returns `true`
    /// when the store was written.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.search_input.poll(now) {
            Some(term) => {
                self.handle_search_change(&term);
                true
            }
            None => false,
        }
    }

    pub fn pending_search_deadline(&self) -> Option<Instant> {
        self.search_input.deadline()
    }

    /// Cancels the pending debounced search, e.g. when the search box is
    /// torn down.
    pub fn cancel_pending_search(&mut self) -> Option<String> {
        self.search_input.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::store::InMemoryFilterStore;

    #[test]
    fn set_dimension_by_name_rejects_unknown_names() {
        let sync = FilterSynchronizer::new(InMemoryFilterStore::default());
        assert_eq!(
            sync.set_dimension_by_name("Brand", "3"),
            Err(UnknownDimension("Brand".to_string()))
        );
        assert_eq!(sync.serialized(), "");

        sync.set_dimension_by_name("PriceRangeId", "3").unwrap();
        assert_eq!(sync.serialized(), "PriceRangeId=3");
    }

    #[test]
    fn set_dimension_search_keeps_mutual_exclusion() {
        let sync = FilterSynchronizer::new(InMemoryFilterStore::from_query("q=hat"));
        sync.set_dimension(FilterDimension::Search, "shoes");

        let state = sync.state();
        assert_eq!(state.search(), "shoes");
        assert_eq!(state.global_search(), "");
    }

    #[test]
    fn debounced_search_applies_only_latest_text() {
        let store = InMemoryFilterStore::from_query("MainCategoryId=2&PageNumber=3");
        let mut sync = FilterSynchronizer::new(&store);
        let start = Instant::now();
        let at = |ms: u64| start + Duration::from_millis(ms);

        sync.debounced_search_change("a", at(0));
        sync.debounced_search_change("ab", at(100));
        sync.debounced_search_change("abc", at(200));

        assert!(!sync.poll(at(500)));
        assert_eq!(store.snapshot().search(), "");

        assert!(sync.poll(at(700)));
        assert_eq!(
            store.snapshot().to_query_string(),
            "MainCategoryId=2&search=abc&PageNumber=1"
        );
        assert!(!sync.poll(at(1400)));
    }

    #[test]
    fn teardown_cancels_pending_search() {
        let store = InMemoryFilterStore::default();
        let mut sync = FilterSynchronizer::new(&store);
        let start = Instant::now();

        sync.debounced_search_change("late", start);
        assert_eq!(sync.cancel_pending_search().as_deref(), Some("late"));
        assert!(!sync.poll(start + Duration::from_secs(1)));
        assert_eq!(store.snapshot(), FilterState::new());
    }
}
