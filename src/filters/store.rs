//! Holds the current filter state and commits actions to it.

use crate::date_range::ValidationError;

use super::state::{FilterAction, FilterState, PersistedFilters, ReduceContext};

/// Owns the dashboard filters for the lifetime of the server.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStore {
    state: FilterState,
    revision: u64,
}

impl FilterStore {
    /// Create a store holding `state`, at revision zero.
    pub fn new(state: FilterState) -> Self {
        Self { state, revision: 0 }
    }

    /// The current filters.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// The number of actions committed so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply `action` to the current state.
    ///
    /// On success the new state replaces the old one and the part of it that should
    /// be saved is returned. Saving is left to the caller.
    ///
    /// # Errors
    /// If the action is rejected the state is left as it was, apart from
    /// `last_validation_error` which is set to the returned error.
    pub fn dispatch(
        &mut self,
        action: FilterAction,
        context: &ReduceContext,
    ) -> Result<PersistedFilters, ValidationError> {
        match self.state.apply(&action, context) {
            Ok(next) => {
                self.state = next;
                self.revision += 1;
                Ok(self.state.to_persisted())
            }
            Err(error) => {
                tracing::warn!("rejected filter change {action:?}: {error}");
                self.state.last_validation_error = Some(error);
                Err(error)
            }
        }
    }
}
