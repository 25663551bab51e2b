//! Message-based tooltip analysis off the interactive thread.
//!
//! The simplification pipeline is too expensive for the interactive path, so
//! a [TooltipWorker] runs a [TooltipComputer] on its own thread and talks to
//! it over channels. The snapshot (space, opaque bits, requirement table) is
//! moved into the thread at spawn and never shared: replacing a snapshot
//! means dropping the handle and spawning a fresh worker, and results from a
//! dropped worker can never be observed because its response channel dies
//! with it. Consumers tell workers apart by [TooltipWorker::id], an identity
//! check, not a content check.
//!
//! Replies carry the structural [BooleanExpression] with raw identifiers;
//! logical-state coloring happens on the consumer side against the *current*
//! reachability ([tooltip::simplify](crate::tooltip::simplify)), which
//! changes far more often than the snapshot.

use crate::bool_expr::BooleanExpression;
use crate::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(0);

/// A reply to an analyze request.
///
/// A malformed check identifier is carried through as the error of the
/// operation that requested it; the worker itself keeps serving.
#[derive(Debug)]
pub struct WorkerResponse {
    pub check: String,
    pub expression: Result<BooleanExpression, TrackError>,
}

/// Handle to a background tooltip analysis thread.
///
/// ```no_run
/// use reachkit::{BitVector, LogicSpace, Requirements, TooltipWorker};
///
/// let worker = TooltipWorker::spawn(
///     LogicSpace::default(),
///     BitVector::default(),
///     Requirements::with_bits(0),
/// );
/// worker.request("Skyloft\\Fledge's Gift");
/// // poll from the render loop; None simply means "not computed yet"
/// let pending = worker.try_result().is_none();
/// ```
pub struct TooltipWorker {
    id: u64,
    requests: Sender<String>,
    responses: Receiver<WorkerResponse>,
    handle: Option<JoinHandle<()>>,
}

impl TooltipWorker {
    /// Move a requirements snapshot onto a fresh worker thread.
    ///
    /// The expensive pre-simplification runs on the worker before it serves
    /// its first request.
    pub fn spawn(space: LogicSpace, opaque_bits: BitVector, requirements: Requirements) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<String>();
        let (response_tx, response_rx) = mpsc::channel::<WorkerResponse>();

        let handle = thread::spawn(move || {
            let mut computer = TooltipComputer::new(space, opaque_bits, requirements);
            while let Ok(check) = request_rx.recv() {
                let start = Instant::now();
                let expression = computer.analyze_check(&check).map(|expr| expr.clone());
                log::debug!("worker: analyzing {} took {:?}", check, start.elapsed());
                if response_tx
                    .send(WorkerResponse { check, expression })
                    .is_err()
                {
                    // consumer is gone, nobody can observe further results
                    break;
                }
            }
        });

        Self {
            id: NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed),
            requests: request_tx,
            responses: response_rx,
            handle: Some(handle),
        }
    }

    /// Identity of this worker instance, used for staleness checks
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Queue a check for analysis.
    ///
    /// A dead worker thread makes the request permanently pending; the
    /// consumer's remedy is to spawn a fresh worker on the next state change,
    /// not to retry.
    pub fn request(&self, check: &str) {
        let _ = self.requests.send(check.to_string());
    }

    /// Collect one finished analysis, if any.
    ///
    /// None means "not computed yet" (or the worker is gone); it is never a
    /// failure and the consumer re-renders whenever a value arrives later.
    pub fn try_result(&self) -> Option<WorkerResponse> {
        match self.responses.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for one finished analysis (test support; the interactive path polls)
    pub fn wait_result(&self) -> Option<WorkerResponse> {
        self.responses.recv().ok()
    }

    /// Close the request channel and wait for the thread to wind down
    pub fn shutdown(mut self) {
        // replacing the sender closes the request channel, ending the loop
        let (dead_tx, _dead_rx) = mpsc::channel();
        self.requests = dead_tx;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
