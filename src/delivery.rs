//! Marshalling completed searches onto the delivery context.
//!
//! Worker tasks never call a submission's completion callback themselves.
//! They push a [`Delivery`] onto an unbounded channel; whoever owns the
//! [`DeliveryContext`] (conceptually the UI thread) drains it and runs each
//! callback exactly once.

use tokio::sync::{mpsc, watch};

use crate::bundle::ResultBundle;

/// Lifecycle of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Accepted but not yet handed to a worker.
    Idle,
    /// Handed to the worker pool.
    Dispatched,
    /// A worker is matching history and querying the provider.
    Running,
    /// The callback has run on the delivery context.
    Delivered,
}

pub(crate) type Callback = Box<dyn FnOnce(ResultBundle) + Send + 'static>;

/// A finished bundle waiting for its callback to run.
pub struct Delivery {
    submission_id: u64,
    bundle: ResultBundle,
    on_complete: Callback,
    state: watch::Sender<SubmissionState>,
}

impl std::fmt::Debug for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delivery")
            .field("submission_id", &self.submission_id)
            .field("query", self.bundle.query())
            .finish_non_exhaustive()
    }
}

impl Delivery {
    pub(crate) fn new(
        submission_id: u64,
        bundle: ResultBundle,
        on_complete: Callback,
        state: watch::Sender<SubmissionState>,
    ) -> Self {
        Self {
            submission_id,
            bundle,
            on_complete,
            state,
        }
    }

    pub fn submission_id(&self) -> u64 {
        self.submission_id
    }

    fn deliver(self) {
        let Self {
            submission_id,
            bundle,
            on_complete,
            state,
        } = self;
        on_complete(bundle);
        state.send_replace(SubmissionState::Delivered);
        tracing::debug!(submission_id, "bundle delivered");
    }
}

/// Sending half, cloned into every worker task.
pub(crate) type DeliverySender = mpsc::UnboundedSender<Delivery>;

/// Create a connected delivery queue.
pub(crate) fn delivery_channel() -> (DeliverySender, DeliveryContext) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, DeliveryContext { rx })
}

/// The receiving end of completed searches.
///
/// Callbacks only ever run inside the methods below, on whichever thread
/// or task calls them.
#[derive(Debug)]
pub struct DeliveryContext {
    rx: mpsc::UnboundedReceiver<Delivery>,
}

impl DeliveryContext {
    /// Run every callback that is ready now, without waiting.
    ///
    /// Returns how many were delivered. Suited to a UI event loop's idle hook.
    pub fn drain(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(delivery) = self.rx.try_recv() {
            delivery.deliver();
            delivered += 1;
        }
        delivered
    }

    /// Wait for the next completed search and run its callback.
    ///
    /// Returns `false` once the orchestrator and all its in-flight workers
    /// are gone and nothing is left to deliver.
    pub async fn next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(delivery) => {
                delivery.deliver();
                true
            }
            None => false,
        }
    }

    /// Blocking variant of [`next`](Self::next) for a plain (non-async) thread.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async execution context.
    pub fn blocking_next(&mut self) -> bool {
        match self.rx.blocking_recv() {
            Some(delivery) => {
                delivery.deliver();
                true
            }
            None => false,
        }
    }

    /// Deliver until the queue closes.
    pub async fn run(mut self) {
        while self.next().await {}
        tracing::debug!("delivery queue closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bundle(query: &str) -> ResultBundle {
        ResultBundle::new(
            Query::parse(query).expect("non-empty"),
            vec![scout_search::ResultItem::no_results()],
            Vec::new(),
            Vec::new(),
        )
    }

    fn push(
        tx: &DeliverySender,
        id: u64,
        counter: &Arc<AtomicUsize>,
    ) -> watch::Receiver<SubmissionState> {
        let (state_tx, state_rx) = watch::channel(SubmissionState::Running);
        let counter = Arc::clone(counter);
        let delivery = Delivery::new(
            id,
            bundle("q"),
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            state_tx,
        );
        tx.send(delivery).expect("receiver alive");
        state_rx
    }

    #[test]
    fn drain_runs_ready_callbacks_once() {
        let (tx, mut ctx) = delivery_channel();
        let counter = Arc::new(AtomicUsize::new(0));
        let first = push(&tx, 1, &counter);
        let second = push(&tx, 2, &counter);

        assert_eq!(ctx.drain(), 2);
        assert_eq!(ctx.drain(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(*first.borrow(), SubmissionState::Delivered);
        assert_eq!(*second.borrow(), SubmissionState::Delivered);
    }

    #[tokio::test]
    async fn next_reports_closed_queue() {
        let (tx, mut ctx) = delivery_channel();
        let counter = Arc::new(AtomicUsize::new(0));
        push(&tx, 1, &counter);
        drop(tx);

        assert!(ctx.next().await);
        assert!(!ctx.next().await);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn blocking_next_on_plain_thread() {
        let (tx, mut ctx) = delivery_channel();
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = {
            let counter = Arc::clone(&counter);
            std::thread::spawn(move || {
                push(&tx, 7, &counter);
            })
        };
        assert!(ctx.blocking_next());
        handle.join().expect("producer thread");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
