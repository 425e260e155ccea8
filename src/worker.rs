use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::core::{Commit, Graph};
use crate::layout::GraphBuilder;

/// Notification sent to interested readers on publication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    /// A newly built graph became the published one
    Published { generation: u64 },
}

#[derive(Debug, Error)]
pub enum WorkerError {
    /// The worker thread is gone; nothing can be queued anymore
    #[error("graph worker has shut down")]
    Disconnected,
}

struct Job {
    generation: u64,
    commits: Vec<Commit>,
}

struct Shared {
    /// Generation handed to the most recent submit call
    submitted: AtomicU64,
    /// Generation of the graph currently in the slot
    published: AtomicU64,
    /// Single-slot latest graph, swapped whole and never mutated in place
    latest: Mutex<Option<Arc<Graph>>>,
}

impl Shared {
    fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
            published: AtomicU64::new(0),
            latest: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<Graph>>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap `graph` in unless a newer input has been submitted since
    fn publish_if_current(&self, generation: u64, graph: Arc<Graph>) -> bool {
        if generation != self.submitted.load(Ordering::Acquire) {
            return false;
        }

        *self.slot() = Some(graph);
        self.published.store(generation, Ordering::Release);
        true
    }
}

/// Runs [`GraphBuilder::parse`] off the interactive thread.
///
/// Each submitted commit list gets a monotonically increasing generation.
/// The worker parses inputs in submission order, collapsing its queue to
/// the most recent one, and publishes a result only while its generation is
/// still the latest submitted; the publish itself is a single reference
/// swap, so readers never observe a partially built graph and never take a
/// lock to use one. The last submitted input always wins.
pub struct GraphWorker {
    shared: Arc<Shared>,
    jobs: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl GraphWorker {
    pub fn spawn(builder: GraphBuilder) -> Self {
        Self::start(builder, None)
    }

    /// Like [`spawn`](Self::spawn), announcing every publication on
    /// `notify`
    pub fn with_notifier(builder: GraphBuilder, notify: Sender<GraphEvent>) -> Self {
        Self::start(builder, Some(notify))
    }

    fn start(builder: GraphBuilder, notify: Option<Sender<GraphEvent>>) -> Self {
        let shared = Arc::new(Shared::new());
        let (tx, rx) = channel();
        let worker_shared = Arc::clone(&shared);
        let handle = thread::spawn(move || run(builder, worker_shared, rx, notify));

        Self {
            shared,
            jobs: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue a new commit list for layout, returning its generation
    pub fn submit(&self, commits: Vec<Commit>) -> Result<u64, WorkerError> {
        let generation = self.shared.submitted.fetch_add(1, Ordering::AcqRel) + 1;
        let jobs = self.jobs.as_ref().ok_or(WorkerError::Disconnected)?;
        jobs.send(Job {
            generation,
            commits,
        })
        .map_err(|_| WorkerError::Disconnected)?;
        Ok(generation)
    }

    /// Latest published graph; a reference clone, never a deep copy
    pub fn latest(&self) -> Option<Arc<Graph>> {
        self.shared.slot().clone()
    }

    pub fn published_generation(&self) -> u64 {
        self.shared.published.load(Ordering::Acquire)
    }

    /// True while the most recent submission has not been published yet
    pub fn pending(&self) -> bool {
        self.shared.submitted.load(Ordering::Acquire) != self.published_generation()
    }
}

impl Drop for GraphWorker {
    fn drop(&mut self) {
        // Closing the queue lets the worker finish its current job and exit.
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(
    builder: GraphBuilder,
    shared: Arc<Shared>,
    jobs: Receiver<Job>,
    notify: Option<Sender<GraphEvent>>,
) {
    while let Ok(mut job) = jobs.recv() {
        // Collapse the queue: only the most recent input is worth parsing.
        while let Ok(newer) = jobs.try_recv() {
            tracing::debug!(generation = job.generation, "skipping superseded input");
            job = newer;
        }

        let graph = Arc::new(builder.parse(&job.commits));
        if shared.publish_if_current(job.generation, graph) {
            if let Some(notify) = &notify {
                let _ = notify.send(GraphEvent::Published {
                    generation: job.generation,
                });
            }
        } else {
            tracing::debug!(generation = job.generation, "discarding stale graph");
        }
    }
}
