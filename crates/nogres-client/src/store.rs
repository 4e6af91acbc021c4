//! The ordered expectation queue.

use std::collections::VecDeque;
use std::sync::Arc;

use nogres_core::{Error, Result};

use crate::expectation::{Expectation, ExpectationHandle, IntoParamConstraint, Pattern, Returns};

/// FIFO queue of pending expectations.
///
/// Expectations are consumed strictly in insertion order; once dequeued an
/// expectation is never put back, whether or not it matched.
#[derive(Debug, Default)]
pub struct ExpectationStore {
    pending: VecDeque<ExpectationHandle>,
}

impl ExpectationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an expectation and return a handle to the stored record.
    ///
    /// Fails with `Error::Configuration` when `params` is not a sequence.
    pub fn enqueue<C: IntoParamConstraint>(
        &mut self,
        pattern: Pattern,
        params: C,
        returns: Returns,
    ) -> Result<ExpectationHandle> {
        let params = params.into_param_constraint()?;
        let handle = Arc::new(Expectation::new(pattern, params, returns));
        tracing::debug!(
            pattern = %handle.pattern(),
            params = ?handle.params(),
            pending = self.pending.len() + 1,
            "Registered expectation"
        );
        self.pending.push_back(Arc::clone(&handle));
        Ok(handle)
    }

    /// Remove and return the head of the queue.
    pub fn dequeue_next(&mut self) -> Option<ExpectationHandle> {
        self.pending.pop_front()
    }

    pub fn count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending expectations, head first.
    pub fn snapshot(&self) -> Vec<ExpectationHandle> {
        self.pending.iter().cloned().collect()
    }

    /// Discard everything pending. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        discarded
    }

    /// Fail with a listing of every pending expectation unless the queue is empty.
    pub fn assert_drained(&self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let records: Vec<&Expectation> = self.pending.iter().map(|e| &**e).collect();
        let listing = serde_json::to_string_pretty(&records).unwrap_or_else(|e| e.to_string());
        Err(Error::UnresolvedExpectations {
            remaining: records.len(),
            listing,
        })
    }
}
