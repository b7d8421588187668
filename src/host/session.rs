//! Command routing for one host bridge session.
//!
//! A [`HostSession`] owns the orchestrator and turns command envelopes into
//! response envelopes. Completed searches come back through the delivery
//! context as `search.completed` events on the session's event channel.
//!
//! The last few delivered bundles are kept, keyed by the `request_id` of the
//! `search.submit` that produced them, so `result.open` can name the listing
//! it is opening from while newer searches are still arriving.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use scout_search::{Transport, links};
use tokio::sync::mpsc;

use crate::bundle::ResultBundle;
use crate::config::OutputFormat;
use crate::error::{Result, ScoutError};
use crate::host::contract::{
    CommandEnvelope, CommandName, EVENT_VERSION, EventEnvelope, ResponseEnvelope,
    SEARCH_COMPLETED_EVENT,
};
use crate::orchestrator::Orchestrator;
use crate::render::render_text;

/// How many delivered bundles `result.open` can still refer to.
const RECENT_BUNDLES: usize = 16;

/// Delivered bundles by submitting request id, oldest first.
#[derive(Debug, Default)]
struct RecentBundles {
    entries: VecDeque<(String, ResultBundle)>,
}

impl RecentBundles {
    fn insert(&mut self, request_id: String, bundle: ResultBundle) {
        self.entries.retain(|(id, _)| *id != request_id);
        if self.entries.len() == RECENT_BUNDLES {
            self.entries.pop_front();
        }
        self.entries.push_back((request_id, bundle));
    }

    fn latest(&self) -> Option<&ResultBundle> {
        self.entries.back().map(|(_, bundle)| bundle)
    }

    fn get(&self, request_id: &str) -> Option<&ResultBundle> {
        self.entries
            .iter()
            .find(|(id, _)| id == request_id)
            .map(|(_, bundle)| bundle)
    }
}

/// Routes host commands for one connected frontend.
pub struct HostSession<T> {
    orchestrator: Orchestrator<T>,
    output: OutputFormat,
    events: mpsc::UnboundedSender<EventEnvelope>,
    recent: Arc<Mutex<RecentBundles>>,
}

impl<T: Transport + 'static> HostSession<T> {
    pub fn new(
        orchestrator: Orchestrator<T>,
        output: OutputFormat,
        events: mpsc::UnboundedSender<EventEnvelope>,
    ) -> Self {
        Self {
            orchestrator,
            output,
            events,
            recent: Arc::new(Mutex::new(RecentBundles::default())),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator<T> {
        &self.orchestrator
    }

    /// The most recently delivered bundle, if any.
    pub fn last_bundle(&self) -> Option<ResultBundle> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .latest()
            .cloned()
    }

    /// The bundle delivered for the `search.submit` with `request_id`, if it
    /// is still among the recent ones.
    pub fn bundle_for(&self, request_id: &str) -> Option<ResultBundle> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(request_id)
            .cloned()
    }

    /// Route a command envelope to the appropriate handler.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::InvalidCommand`] for envelopes that fail
    /// validation or carry an unusable payload.
    pub fn route(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        envelope
            .validate()
            .map_err(|e| ScoutError::InvalidCommand(e.to_string()))?;

        match envelope.command {
            CommandName::HostPing => Ok(ResponseEnvelope::ok(
                envelope.request_id.clone(),
                serde_json::json!({"pong": true}),
            )),
            CommandName::HostVersion => Ok(ResponseEnvelope::ok(
                envelope.request_id.clone(),
                serde_json::json!({
                    "contract_version": EVENT_VERSION,
                    "version": env!("CARGO_PKG_VERSION"),
                }),
            )),
            CommandName::SearchSubmit => self.handle_search_submit(envelope),
            CommandName::HistoryGet => self.handle_history_get(envelope),
            CommandName::ResultOpen => self.handle_result_open(envelope),
            CommandName::RuntimeStop => Ok(ResponseEnvelope::ok(
                envelope.request_id.clone(),
                serde_json::json!({"stopping": true}),
            )),
        }
    }

    fn handle_search_submit(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let query = envelope
            .payload
            .get("query")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ScoutError::InvalidCommand("missing required field: query".into()))?;

        let request_id = envelope.request_id.clone();
        let events = self.events.clone();
        let recent = Arc::clone(&self.recent);
        let output = self.output;

        let submission = self.orchestrator.submit(query, move |bundle| {
            let mut payload = serde_json::json!({
                "request_id": request_id,
                "bundle": bundle,
            });
            if output == OutputFormat::Text {
                payload["display"] = serde_json::Value::String(render_text(&bundle));
            }
            recent
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(request_id, bundle);

            if events
                .send(EventEnvelope::new(SEARCH_COMPLETED_EVENT, payload))
                .is_err()
            {
                tracing::warn!("event channel closed; search.completed not emitted");
            }
        });

        let payload = match submission {
            Some(submission) => serde_json::json!({
                "accepted": true,
                "submission_id": submission.id(),
                "query": submission.query(),
            }),
            None => serde_json::json!({"accepted": false}),
        };
        Ok(ResponseEnvelope::ok(envelope.request_id.clone(), payload))
    }

    fn handle_history_get(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let history = self.orchestrator.history().snapshot();
        Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            serde_json::json!({"history": history}),
        ))
    }

    fn handle_result_open(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let index = envelope
            .payload
            .get("index")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| ScoutError::InvalidCommand("missing required field: index".into()))?;
        let index = usize::try_from(index)
            .map_err(|_| ScoutError::InvalidCommand(format!("index {index} out of range")))?;

        let bundle = match envelope
            .payload
            .get("request_id")
            .and_then(serde_json::Value::as_str)
        {
            Some(search) => self.bundle_for(search).ok_or_else(|| {
                ScoutError::InvalidCommand(format!("no recent results for request {search}"))
            })?,
            None => self
                .last_bundle()
                .ok_or_else(|| ScoutError::InvalidCommand("no results to open yet".into()))?,
        };
        let link = bundle
            .link_at(index)
            .ok_or_else(|| ScoutError::InvalidCommand(format!("result {index} has no link")))?;

        let endpoint = &self.orchestrator.executor().config().endpoint;
        let url = links::resolve(endpoint, link).ok_or_else(|| {
            ScoutError::InvalidCommand(format!("result {index} link cannot be opened: {link}"))
        })?;

        Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            serde_json::json!({"index": index, "url": url}),
        ))
    }
}
