//! Display event loop
//!
//! The loop pumps events until the top-level window is gone, sleeping
//! whenever the queue runs dry.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

pub trait Display {
    /// Dispatch one pending event. Returns `false` when nothing was queued.
    fn read_and_dispatch(&self) -> bool;

    /// Block until more events may be available.
    fn sleep(&self);

    /// Whether the top-level window has been closed.
    fn is_disposed(&self) -> bool;
}

/// Pump `display` until its window is disposed. Returns the number of
/// events dispatched.
pub fn run(display: &dyn Display) -> usize {
    let mut dispatched = 0;
    while !display.is_disposed() {
        if display.read_and_dispatch() {
            dispatched += 1;
        } else {
            display.sleep();
        }
    }
    tracing::debug!(dispatched, "Event loop finished");
    dispatched
}

type Task = Box<dyn FnOnce() + Send>;

/// Display backed by an in-memory task queue.
///
/// Nothing outside the queue can produce events, so sleeping on an empty
/// queue closes the window.
#[derive(Clone, Default)]
pub struct HeadlessDisplay {
    queue: Arc<Mutex<VecDeque<Task>>>,
    closed: Arc<AtomicBool>,
    sleeps: Arc<AtomicUsize>,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task to run on the event loop.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.lock().push_back(Box::new(task));
    }

    /// Queue a request to close the window after the tasks already posted.
    pub fn close(&self) {
        let closed = Arc::clone(&self.closed);
        self.post(move || closed.store(true, Ordering::SeqCst));
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn sleeps(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Display for HeadlessDisplay {
    fn read_and_dispatch(&self) -> bool {
        // Released before running so tasks may post more work.
        let task = self.queue.lock().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    fn sleep(&self) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        if self.queue.lock().is_empty() {
            tracing::debug!("Headless display idle, closing");
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    fn is_disposed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for HeadlessDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessDisplay")
            .field("pending", &self.pending())
            .field("closed", &self.is_disposed())
            .finish()
    }
}
