//! Background execution of scans and encodes.
//!
//! A [`Dispatcher`] runs work on a rayon pool and hands the result to a
//! continuation exactly once, on the worker that ran the work. The
//! [`Task`] form sends the result over a one-shot channel instead.

use core::any::Any;
use core::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use crate::error::{Error, Result};

/// Settings for a dedicated worker pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    num_threads: Option<usize>,
    thread_name: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name: "imgview".into(),
        }
    }
}

impl DispatchConfig {
    /// Default pool settings: rayon-chosen size, threads named `imgview-N`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Worker count. `None` lets rayon choose (one per CPU, or
    /// `RAYON_NUM_THREADS`).
    pub fn with_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Worker names become `{name}-{index}`.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Configured worker count, if any.
    pub fn num_threads(&self) -> Option<usize> {
        self.num_threads
    }

    /// Prefix for worker thread names.
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }
}

/// Runs work off the calling thread.
///
/// The default dispatcher uses rayon's global pool. Clones share the same
/// pool.
#[derive(Clone, Default)]
pub struct Dispatcher {
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Dispatcher {
    /// Dispatcher over rayon's global pool.
    pub fn global() -> Self {
        Self::default()
    }

    /// Build a dedicated pool.
    pub fn new(config: &DispatchConfig) -> Result<Self> {
        let name = config.thread_name.clone();
        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(move |index| format!("{name}-{index}"))
            .panic_handler(|payload| {
                log::error!(
                    target: "imgview::dispatch",
                    "worker job panicked: {}",
                    panic_message(&*payload)
                );
            });
        if let Some(num_threads) = config.num_threads {
            builder = builder.num_threads(num_threads);
        }
        let pool = builder
            .build()
            .map_err(|err| Error::Internal(format!("failed to start worker pool: {err}")))?;
        log::debug!(
            target: "imgview::dispatch",
            "started pool {:?} with {} threads",
            config.thread_name,
            pool.current_num_threads()
        );
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }

    /// Worker count of the pool this dispatcher submits to.
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Run `work` on a worker, then call `done` with its result on that same
    /// worker.
    ///
    /// `done` is called exactly once. A panic in `work` is delivered as
    /// [`Error::Internal`]; a panic in `done` is logged and swallowed.
    pub fn spawn<T, W, C>(&self, label: &'static str, work: W, done: C)
    where
        T: Send + 'static,
        W: FnOnce() -> Result<T> + Send + 'static,
        C: FnOnce(Result<T>) + Send + 'static,
    {
        log::debug!(target: "imgview::dispatch", "dispatching {label}");
        let job = move || {
            let result = match panic::catch_unwind(AssertUnwindSafe(work)) {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(&*payload);
                    log::warn!(target: "imgview::dispatch", "{label} panicked: {message}");
                    Err(Error::Internal(format!("{label} panicked: {message}")))
                }
            };
            log::debug!(
                target: "imgview::dispatch",
                "{label} finished ({})",
                if result.is_ok() { "ok" } else { "error" }
            );
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || done(result))) {
                log::warn!(
                    target: "imgview::dispatch",
                    "continuation of {label} panicked: {}",
                    panic_message(&*payload)
                );
            }
        };
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
    }

    /// Run `work` on a worker and return a handle to its result.
    pub fn task<T, W>(&self, label: &'static str, work: W) -> Task<T>
    where
        T: Send + 'static,
        W: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        self.spawn(label, work, move |result| {
            // receiver gone means nobody is waiting
            let _ = tx.send(result);
        });
        Task { rx }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("dedicated", &self.pool.is_some())
            .field("num_threads", &self.num_threads())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// One-shot handle to a result computed on a worker.
#[must_use = "a task does nothing unless waited on"]
pub struct Task<T> {
    rx: Receiver<Result<T>>,
}

/// Result of a non-blocking or bounded wait.
#[derive(Debug)]
pub enum TaskState<T> {
    /// The work finished, or the task was dropped (`Error::Internal`).
    Done(Result<T>),
    /// Not finished yet; the handle is returned for another wait.
    Pending(Task<T>),
}

impl<T> TaskState<T> {
    /// Whether the result has arrived.
    pub fn is_done(&self) -> bool {
        matches!(self, TaskState::Done(_))
    }
}

impl<T> Task<T> {
    /// Block until the result arrives.
    pub fn wait(self) -> Result<T> {
        self.rx.recv().unwrap_or_else(|_| Err(dropped()))
    }

    /// Block for at most `timeout`. The work itself keeps running.
    pub fn wait_timeout(self, timeout: Duration) -> TaskState<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => TaskState::Done(result),
            Err(RecvTimeoutError::Timeout) => TaskState::Pending(self),
            Err(RecvTimeoutError::Disconnected) => TaskState::Done(Err(dropped())),
        }
    }

    /// Return immediately.
    pub fn try_wait(self) -> TaskState<T> {
        match self.rx.try_recv() {
            Ok(result) => TaskState::Done(result),
            Err(TryRecvError::Empty) => TaskState::Pending(self),
            Err(TryRecvError::Disconnected) => TaskState::Done(Err(dropped())),
        }
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

fn dropped() -> Error {
    Error::Internal("task was dropped before delivering a result".into())
}
