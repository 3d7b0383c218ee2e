//! Injectable container holding the current [`FilterState`].
//!
//! Pages read and write filters through a [`FilterStore`] instead of a router,
//! so the synchronization rules can be exercised without a navigation stack.

use std::sync::{Arc, RwLock};

use crate::domain::filters::FilterState;

pub trait FilterStore {
    /// Returns a copy of the current state.
    fn snapshot(&self) -> FilterState;

    /// Applies `change` to the stored state. Concurrent writers are resolved
    /// last-writer-wins.
    fn update(&self, change: &mut dyn FnMut(&mut FilterState));
}

/// Process-local store backed by an `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryFilterStore {
    state: RwLock<FilterState>,
}

impl InMemoryFilterStore {
    pub fn new(state: FilterState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Seeds the store from a request or location query string.
    pub fn from_query(query: &str) -> Self {
        Self::new(FilterState::from_query_str(query))
    }
}

impl FilterStore for InMemoryFilterStore {
    fn snapshot(&self) -> FilterState {
        match self.state.read() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, change: &mut dyn FnMut(&mut FilterState)) {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        change(&mut state);
    }
}

impl<T: FilterStore + ?Sized> FilterStore for &T {
    fn snapshot(&self) -> FilterState {
        (**self).snapshot()
    }

    fn update(&self, change: &mut dyn FnMut(&mut FilterState)) {
        (**self).update(change)
    }
}

impl<T: FilterStore + ?Sized> FilterStore for Arc<T> {
    fn snapshot(&self) -> FilterState {
        (**self).snapshot()
    }

    fn update(&self, change: &mut dyn FnMut(&mut FilterState)) {
        (**self).update(change)
    }
}
