//! Search orchestrator: record, dispatch, assemble, deliver.
//!
//! [`Orchestrator::submit`] records the query in the history on the
//! caller's thread, then hands the rest to a worker task on the tokio
//! runtime and returns at once. The worker computes history suggestions,
//! runs the provider search, takes a fresh history snapshot and queues the
//! finished [`ResultBundle`] for the [`DeliveryContext`], which is the only
//! place completion callbacks run.
//!
//! Overlapping submissions are independent: nothing is cancelled,
//! serialised or coalesced.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use scout_search::{SearchExecutor, Transport};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::Instrument;

use crate::bundle::ResultBundle;
use crate::config::HistoryConfig;
use crate::delivery::{
    Delivery, DeliveryContext, DeliverySender, SubmissionState, delivery_channel,
};
use crate::error::{Result, ScoutError};
use crate::history::HistoryStore;
use crate::query::Query;

/// Handle to one in-flight (or finished) submission.
#[derive(Debug, Clone)]
pub struct Submission {
    id: u64,
    query: Query,
    state: watch::Receiver<SubmissionState>,
}

impl Submission {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubmissionState {
        *self.state.borrow()
    }

    /// Wait until the callback has run on the delivery context.
    ///
    /// Returns `false` if the submission can no longer be delivered
    /// (the delivery context was dropped).
    pub async fn delivered(&mut self) -> bool {
        self.state
            .wait_for(|state| *state == SubmissionState::Delivered)
            .await
            .is_ok()
    }
}

/// Warns if a worker is dropped before it hands off its bundle.
struct WorkerGuard {
    submission_id: u64,
    armed: bool,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(
                submission_id = self.submission_id,
                "search worker dropped before delivery; runtime shut down?"
            );
        }
    }
}

/// Owns the history and dispatches searches off the calling thread.
pub struct Orchestrator<T> {
    history: Arc<HistoryStore>,
    executor: Arc<SearchExecutor<T>>,
    matching: HistoryConfig,
    deliveries: DeliverySender,
    runtime: Handle,
    next_id: AtomicU64,
}

impl<T> std::fmt::Debug for Orchestrator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("history_len", &self.history.len())
            .field("matching", &self.matching)
            .finish_non_exhaustive()
    }
}

impl<T: Transport + 'static> Orchestrator<T> {
    /// Build an orchestrator on the current tokio runtime.
    ///
    /// Returns the orchestrator together with the [`DeliveryContext`] that
    /// must be drained for callbacks to run.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Config`] for an invalid `matching` section and
    /// [`ScoutError::Runtime`] when called outside a tokio runtime.
    pub fn new(
        executor: SearchExecutor<T>,
        matching: HistoryConfig,
    ) -> Result<(Self, DeliveryContext)> {
        let runtime = Handle::try_current().map_err(|e| ScoutError::Runtime(e.to_string()))?;
        Self::with_runtime(executor, matching, runtime)
    }

    /// Build an orchestrator that spawns its workers on `runtime`.
    ///
    /// Lets a non-async host (a UI thread) own the orchestrator while a
    /// separately managed runtime does the work.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Config`] for an invalid `matching` section.
    pub fn with_runtime(
        executor: SearchExecutor<T>,
        matching: HistoryConfig,
        runtime: Handle,
    ) -> Result<(Self, DeliveryContext)> {
        matching.validate()?;
        let (deliveries, context) = delivery_channel();
        let orchestrator = Self {
            history: Arc::new(HistoryStore::new()),
            executor: Arc::new(executor),
            matching,
            deliveries,
            runtime,
            next_id: AtomicU64::new(1),
        };
        Ok((orchestrator, context))
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn executor(&self) -> &SearchExecutor<T> {
        &self.executor
    }

    /// Submit `raw` for searching.
    ///
    /// Blank input is ignored: `None` is returned, history is untouched and
    /// `on_complete` never runs. Otherwise the trimmed query is recorded
    /// before this returns, and `on_complete` runs exactly once, on the
    /// delivery context, with the finished bundle.
    ///
    /// The one exception is a runtime that has shut down (possible with
    /// [`with_runtime`](Self::with_runtime)): the worker is dropped unrun,
    /// a warning is logged, `on_complete` never runs and
    /// [`Submission::delivered`] resolves to `false`.
    pub fn submit<F>(&self, raw: &str, on_complete: F) -> Option<Submission>
    where
        F: FnOnce(ResultBundle) + Send + 'static,
    {
        let query = Query::parse(raw)?;
        let count = self.history.record(&query);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(submission_id = id, query = %query, count, "query recorded");

        let (state_tx, state_rx) = watch::channel(SubmissionState::Idle);

        let history = Arc::clone(&self.history);
        let executor = Arc::clone(&self.executor);
        let deliveries = self.deliveries.clone();
        let matching = self.matching.clone();
        let worker_query = query.clone();
        let on_complete: crate::delivery::Callback = Box::new(on_complete);
        let mut guard = WorkerGuard {
            submission_id: id,
            armed: true,
        };

        state_tx.send_replace(SubmissionState::Dispatched);
        let worker = async move {
            state_tx.send_replace(SubmissionState::Running);

            let mut similar_terms = history.fuzzy_match(worker_query.as_str(), matching.cutoff);
            similar_terms.truncate(matching.max_suggestions);

            let items = executor.run(worker_query.as_str()).await;
            let bundle = ResultBundle::new(worker_query, items, history.snapshot(), similar_terms);

            if deliveries
                .send(Delivery::new(id, bundle, on_complete, state_tx))
                .is_err()
            {
                tracing::warn!(submission_id = id, "delivery context gone; dropping bundle");
            }
            guard.armed = false;
        };
        self.runtime
            .spawn(worker.instrument(tracing::debug_span!("search", submission_id = id)));

        Some(Submission {
            id,
            query,
            state: state_rx,
        })
    }
}
