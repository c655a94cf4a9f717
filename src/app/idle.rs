//! Deferred work queue drained by the host at idle points
//!
//! OS notifications arrive on whatever thread the OS picks. Handlers that
//! touch application state are posted here and run later, on the thread that
//! drains the queue.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// A job posted for later execution
pub type IdleJob = Box<dyn FnOnce() + Send>;

/// Single-consumer queue of idle jobs
pub struct IdleQueue {
    sender: Sender<IdleJob>,
    receiver: Receiver<IdleJob>,
}

/// Cloneable posting end of an [`IdleQueue`]
#[derive(Clone)]
pub struct IdleSender {
    sender: Sender<IdleJob>,
}

impl IdleSender {
    /// Queues `job`; false once the queue is gone
    pub fn post(&self, job: impl FnOnce() + Send + 'static) -> bool {
        self.sender.send(Box::new(job)).is_ok()
    }
}

impl Default for IdleQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> IdleSender {
        IdleSender {
            sender: self.sender.clone(),
        }
    }

    /// Runs every job already queued and returns how many ran
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Runs jobs as they arrive until `timeout` elapses
    pub fn wait_and_run(&self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut ran = 0;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(job) => {
                    job();
                    ran += 1;
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        ran
    }
}
