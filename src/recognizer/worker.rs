//! Background recognizer
//!
//! The hand tracker delivers observations from its own callback thread and
//! must never block on us. Observations go through a small bounded channel
//! (newest are dropped when it is full) to a dedicated thread that owns the
//! classification work. The recognizer sits behind one mutex, so display
//! reads, resets and commits are serialized with transcript updates.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use serde::Serialize;

use super::Recognizer;
use crate::classifier::Label;
use crate::config::RecognizerConfig;
use crate::error::{FingerspellError, Result};
use crate::landmarks::Observation;

/// Point-in-time view for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognizerSnapshot {
    /// Label of the latest processed observation
    pub label: Label,
    /// Current transcript
    pub text: String,
    pub observations_processed: u64,
    /// Observations discarded because the queue was full
    pub observations_dropped: u64,
}

struct SharedState {
    recognizer: Recognizer,
    processed: u64,
}

/// Recognizer running on its own thread
pub struct RecognizerWorker {
    /// Pipeline state, shared with the worker thread
    shared: Arc<Mutex<SharedState>>,
    /// Channel to the worker thread
    observation_sender: Option<Sender<Observation>>,
    /// Whether the worker loop is running
    running: Arc<AtomicBool>,
    dropped: AtomicU64,
    /// Worker thread handle
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl RecognizerWorker {
    /// Start the worker thread
    pub fn spawn(config: &RecognizerConfig) -> Result<Self> {
        let shared = Arc::new(Mutex::new(SharedState {
            recognizer: Recognizer::new(config),
            processed: 0,
        }));
        // Live from the moment spawn returns, not from when the thread is scheduled
        let running = Arc::new(AtomicBool::new(true));

        let (observation_sender, observation_receiver) =
            crossbeam_channel::bounded::<Observation>(config.queue_capacity.max(1));

        let shared_clone = shared.clone();
        let running_clone = running.clone();

        let thread_handle = std::thread::Builder::new()
            .name("fingerspell-recognizer".to_string())
            .spawn(move || {
                Self::worker_thread(observation_receiver, shared_clone, running_clone);
            })
            .map_err(|e| {
                running.store(false, Ordering::Release);
                FingerspellError::WorkerSpawn(e.to_string())
            })?;

        Ok(Self {
            shared,
            observation_sender: Some(observation_sender),
            running,
            dropped: AtomicU64::new(0),
            thread_handle: Some(thread_handle),
        })
    }

    /// Worker thread main loop
    fn worker_thread(
        observation_receiver: Receiver<Observation>,
        shared: Arc<Mutex<SharedState>>,
        running: Arc<AtomicBool>,
    ) {
        log::info!("Recognizer thread started");

        // Ends once every sender is dropped and the queue is drained
        while let Ok(observation) = observation_receiver.recv() {
            let mut state = shared.lock();
            state.recognizer.process(&observation);
            state.processed += 1;
        }

        running.store(false, Ordering::Release);
        log::info!("Recognizer thread stopped");
    }

    /// Queue an observation without blocking. Returns `false` if it was
    /// dropped (queue full or worker stopped).
    pub fn submit(&self, observation: Observation) -> bool {
        let Some(ref sender) = self.observation_sender else {
            return false;
        };

        match sender.try_send(observation) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Queue an observation, waiting for room. For replaying recordings
    /// where every frame matters.
    pub fn submit_blocking(&self, observation: Observation) -> bool {
        match self.observation_sender {
            Some(ref sender) => sender.send(observation).is_ok(),
            None => false,
        }
    }

    pub fn snapshot(&self) -> RecognizerSnapshot {
        let state = self.shared.lock();
        RecognizerSnapshot {
            label: state.recognizer.last_label(),
            text: state.recognizer.text().to_string(),
            observations_processed: state.processed,
            observations_dropped: self.dropped.load(Ordering::Relaxed),
        }
    }

    pub fn text(&self) -> String {
        self.shared.lock().recognizer.text().to_string()
    }

    /// Clear the transcript and its cool-down
    pub fn reset(&self) {
        self.shared.lock().recognizer.reset();
    }

    /// Take the transcript and start over
    pub fn commit(&self) -> String {
        self.shared.lock().recognizer.commit()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the worker thread after it drains the queue
    pub fn stop(&mut self) {
        // Drop sender to signal thread to stop
        self.observation_sender = None;

        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::error!("Recognizer thread panicked");
            }
        }
    }
}

impl Drop for RecognizerWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
