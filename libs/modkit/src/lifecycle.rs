use parking_lot::Mutex;
use std::future::Future;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

// ----- Results & aliases -----------------------------------------------------

/// Public result for lifecycle-level operations.
type LcResult<T = ()> = std::result::Result<T, LifecycleError>;

/// Result returned by the background task.
type TaskResult<T = ()> = anyhow::Result<T>;

// ----- Status model ----------------------------------------------------------

/// Coarse state of the background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Stopped,
    Running,
    Stopping,
}

impl Status {
    #[inline]
    pub const fn as_u8(self) -> u8 {
        match self {
            Status::Stopped => 0,
            Status::Running => 1,
            Status::Stopping => 2,
        }
    }
    #[inline]
    pub const fn from_u8(x: u8) -> Self {
        match x {
            1 => Status::Running,
            2 => Status::Stopping,
            _ => Status::Stopped,
        }
    }
}

/// Reason why a task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Finished,
    Cancelled,
    Timeout,
}

// ----- Errors ----------------------------------------------------------------

/// Library-level error for lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("already started")]
    AlreadyStarted,
}

// ----- Lifecycle -------------------------------------------------------------

/// Controller for a single cancellable background task.
///
/// Concurrency notes:
/// - Status lives in an atomic; completion is broadcast through `Notify`.
/// - `handle` / `cancel` sit behind short-lived `Mutex` sections.
/// - Cancellation is idempotent: the token is taken out of the slot the first time.
/// - Every start gets a new epoch; slots are tagged with it so a run never clears or joins
///   a later run's token or handle.
pub struct Lifecycle {
    status: Arc<AtomicU8>,
    epoch: AtomicU64,
    handle: Mutex<Option<(u64, JoinHandle<()>)>>,
    cancel: Arc<Mutex<Option<(u64, CancellationToken)>>>,
    /// `true` once the background task has fully finished.
    finished: Arc<AtomicBool>,
    /// Set when `cancel()`/`stop()` revoked the token.
    was_cancelled: Arc<AtomicBool>,
    finished_notify: Arc<Notify>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            status: Arc::new(AtomicU8::new(Status::Stopped.as_u8())),
            epoch: AtomicU64::new(0),
            handle: Mutex::new(None),
            cancel: Arc::new(Mutex::new(None)),
            finished: Arc::new(AtomicBool::new(true)),
            was_cancelled: Arc::new(AtomicBool::new(false)),
            finished_notify: Arc::new(Notify::new()),
        }
    }

    #[inline]
    fn load_status(&self) -> Status {
        Status::from_u8(self.status.load(Ordering::Acquire))
    }

    #[inline]
    fn store_status(&self, s: Status) {
        self.status.store(s.as_u8(), Ordering::Release);
    }

    /// Spawn the job with a fresh token.
    pub fn start<F, Fut>(&self, make: F) -> LcResult
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult<()>> + Send + 'static,
    {
        self.start_with_token(CancellationToken::new(), make)
    }

    /// Spawn the job using a caller-provided token.
    ///
    /// The future is built inside the spawned task so a panicking `make` cannot leave the
    /// controller stuck in `Running`.
    #[tracing::instrument(skip(self, make, token), level = "debug")]
    pub fn start_with_token<F, Fut>(&self, token: CancellationToken, make: F) -> LcResult
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult<()>> + Send + 'static,
    {
        // Stopped -> Running (via CAS)
        self.status
            .compare_exchange(
                Status::Stopped.as_u8(),
                Status::Running.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| LifecycleError::AlreadyStarted)?;

        self.finished.store(false, Ordering::Release);
        self.was_cancelled.store(false, Ordering::Release);
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;

        {
            let mut c = self.cancel.lock();
            *c = Some((epoch, token.clone()));
        }

        let cancel_slot = self.cancel.clone();
        let finished_flag = self.finished.clone();
        let finished_notify = self.finished_notify.clone();
        let status_on_finish = self.status.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = make(token).await {
                tracing::error!(error = %e, "lifecycle task error");
            }
            // Nothing left to revoke once the job is over.
            {
                let mut c = cancel_slot.lock();
                if matches!(c.as_ref(), Some((e, _)) if *e == epoch) {
                    c.take();
                }
            }
            finished_flag.store(true, Ordering::Release);
            finished_notify.notify_waiters();
            status_on_finish.store(Status::Stopped.as_u8(), Ordering::Release);
            tracing::debug!("lifecycle status -> stopped (finished)");
        });

        {
            let mut h = self.handle.lock();
            *h = Some((epoch, handle));
        }

        tracing::debug!("lifecycle status -> running");
        Ok(())
    }

    /// Revoke the running task's token without waiting for it to exit.
    ///
    /// Returns `true` if this call performed the revocation; repeated calls are no-ops.
    pub fn cancel(&self) -> bool {
        self.cancel_run(None)
    }

    /// Revoke the token held in the slot, restricted to run `epoch` when given.
    fn cancel_run(&self, epoch: Option<u64>) -> bool {
        let taken = {
            let mut c = self.cancel.lock();
            let other_run = matches!((c.as_ref(), epoch), (Some((e, _)), Some(want)) if *e != want);
            if other_run {
                None
            } else {
                c.take()
            }
        };
        match taken {
            Some((_, tok)) => {
                self.was_cancelled.store(true, Ordering::Release);
                tok.cancel();
                true
            }
            None => false,
        }
    }

    /// Request shutdown and wait up to `timeout` for the task to exit.
    #[tracing::instrument(skip(self, timeout), level = "debug")]
    pub async fn stop(&self, timeout: Duration) -> LcResult<StopReason> {
        if self.load_status() == Status::Stopped {
            // Not running => already finished; drop stale bookkeeping.
            self.cancel.lock().take();
            self.handle.lock().take();
            return Ok(StopReason::Finished);
        }

        let epoch = self.epoch.load(Ordering::Acquire);
        self.store_status(Status::Stopping);
        self.cancel_run(Some(epoch));

        let reason = tokio::select! {
            _ = self.wait_stopped() => {
                if self.was_cancelled.load(Ordering::Acquire) {
                    StopReason::Cancelled
                } else {
                    StopReason::Finished
                }
            }
            _ = tokio::time::sleep(timeout) => StopReason::Timeout,
        };

        // Only join the run this call revoked; a newer one belongs to its own caller.
        let handle_opt = {
            let mut h = self.handle.lock();
            if matches!(h.as_ref(), Some((e, _)) if *e == epoch) {
                h.take().map(|(_, handle)| handle)
            } else {
                None
            }
        };
        if let Some(handle) = handle_opt {
            if reason == StopReason::Timeout && !handle.is_finished() {
                tracing::warn!("lifecycle stop timed out; aborting task");
                handle.abort();
            }
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => tracing::debug!("task aborted"),
                Err(e) => tracing::warn!(error = %e, "task join error"),
            }

            self.finished.store(true, Ordering::Release);
            self.finished_notify.notify_waiters();
        }

        if self.epoch.load(Ordering::Acquire) == epoch {
            self.store_status(Status::Stopped);
        }
        tracing::debug!(?reason, "lifecycle stopped");
        Ok(reason)
    }

    /// Current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> Status {
        self.load_status()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status() == Status::Running
    }

    /// Wait until the task has fully finished. Returns immediately if nothing runs.
    pub async fn wait_stopped(&self) {
        let notified = self.finished_notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent finish is not missed.
        notified.as_mut().enable();
        if self.finished.load(Ordering::Acquire) {
            return;
        }
        notified.await;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        if let Some((_, tok)) = self.cancel.lock().take() {
            tok.cancel();
        }
        if let Some((_, handle)) = self.handle.get_mut().take() {
            handle.abort();
        }
    }
}

// ----- Tests -----------------------------------------------------------------
