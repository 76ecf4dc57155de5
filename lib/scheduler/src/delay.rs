//! One-shot delayed tasks with cancellation and joined shutdown.
//!
//! Every task is spawned onto the current tokio runtime and owned by the
//! scheduler's join set. Each task listens on a child of the scheduler's
//! root cancellation token, so a single task can be cancelled through its
//! [`ScheduledTask`] handle and everything pending is cancelled by
//! [`DelayScheduler::shutdown`].

use crate::error::ScheduleError;
use helpdesk_core::TaskId;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How a delayed task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The delay elapsed and the job ran to completion.
    Fired,
    /// The task was cancelled before its job finished.
    Cancelled,
}

/// Handle to a single pending task.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    id: TaskId,
    label: &'static str,
    token: CancellationToken,
}

impl ScheduledTask {
    /// Returns the task identifier.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the label the task was scheduled with.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Cancels the task. A no-op once the task has fired.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true if the task (or its scheduler) was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Counts of how pending tasks ended during shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Tasks whose job ran.
    pub fired: usize,
    /// Tasks cancelled before their job finished.
    pub cancelled: usize,
    /// Tasks that panicked.
    pub failed: usize,
}

/// Owner of all delayed work for one session.
#[derive(Debug)]
pub struct DelayScheduler {
    root: CancellationToken,
    tasks: Mutex<JoinSet<TaskOutcome>>,
}

impl Default for DelayScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: CancellationToken::new(),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Runs `job` after `delay`, unless cancelled first.
    ///
    /// Cancellation is observed both while waiting and while the job runs.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::ShutDown`] after [`Self::shutdown`], and
    /// [`ScheduleError::NoRuntime`] when called outside a tokio runtime.
    pub fn schedule<F>(
        &self,
        label: &'static str,
        delay: Duration,
        job: F,
    ) -> Result<ScheduledTask, ScheduleError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.root.is_cancelled() {
            return Err(ScheduleError::ShutDown);
        }
        let handle = tokio::runtime::Handle::try_current().map_err(|_| ScheduleError::NoRuntime)?;

        let id = TaskId::new();
        let token = self.root.child_token();
        let task_token = token.clone();

        let mut tasks = self.lock_tasks();
        reap_finished(&mut tasks);
        tasks.spawn_on(
            async move {
                tokio::select! {
                    biased;
                    () = task_token.cancelled() => {
                        debug!(task = %id, label, "delayed task cancelled before firing");
                        TaskOutcome::Cancelled
                    }
                    () = tokio::time::sleep(delay) => {
                        tokio::select! {
                            biased;
                            () = task_token.cancelled() => {
                                debug!(task = %id, label, "delayed task cancelled while running");
                                TaskOutcome::Cancelled
                            }
                            () = job => {
                                debug!(task = %id, label, "delayed task fired");
                                TaskOutcome::Fired
                            }
                        }
                    }
                }
            },
            &handle,
        );
        debug!(task = %id, label, ?delay, "scheduled delayed task");

        Ok(ScheduledTask { id, label, token })
    }

    /// Returns the number of tasks that have not been joined yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        let mut tasks = self.lock_tasks();
        reap_finished(&mut tasks);
        tasks.len()
    }

    /// Returns true once shutdown has started.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Cancels every pending task without waiting for them.
    ///
    /// Used where no async context is available, such as `Drop`. Later
    /// scheduling attempts fail with [`ScheduleError::ShutDown`].
    pub fn cancel_all(&self) {
        self.root.cancel();
    }

    /// Cancels every pending task and waits for all of them to finish.
    ///
    /// Calling this more than once is harmless; later calls find nothing
    /// left to join.
    pub async fn shutdown(&self) -> ShutdownReport {
        self.root.cancel();
        let mut tasks = std::mem::take(&mut *self.lock_tasks());

        let mut report = ShutdownReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(TaskOutcome::Fired) => report.fired += 1,
                Ok(TaskOutcome::Cancelled) => report.cancelled += 1,
                Err(e) => {
                    warn!(error = %e, "delayed task failed");
                    report.failed += 1;
                }
            }
        }
        debug!(?report, "scheduler shut down");
        report
    }

    fn lock_tasks(&self) -> MutexGuard<'_, JoinSet<TaskOutcome>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn reap_finished(tasks: &mut JoinSet<TaskOutcome>) {
    while let Some(done) = tasks.try_join_next() {
        if let Err(e) = done {
            warn!(error = %e, "delayed task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_job(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn task_fires_after_delay() {
        let scheduler = DelayScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule("test", Duration::from_millis(1500), counting_job(&counter))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        let report = scheduler.shutdown().await;
        assert_eq!(report.fired, 1);
        assert_eq!(report.cancelled, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_runs() {
        let scheduler = DelayScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let task = scheduler
            .schedule("test", Duration::from_secs(2), counting_job(&counter))
            .unwrap();
        task.cancel();
        assert!(task.is_cancelled());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        let report = scheduler.shutdown().await;
        assert_eq!(report.cancelled, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_tasks() {
        let scheduler = DelayScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            scheduler
                .schedule("test", Duration::from_secs(5), counting_job(&counter))
                .unwrap();
        }
        assert_eq!(scheduler.pending(), 3);

        let report = scheduler.shutdown().await;
        assert_eq!(report.cancelled, 3);
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn schedule_after_shutdown_fails() {
        let scheduler = DelayScheduler::new();
        scheduler.shutdown().await;

        assert!(scheduler.is_shut_down());
        let result = scheduler.schedule("late", Duration::ZERO, async {});
        assert_eq!(result.unwrap_err(), ScheduleError::ShutDown);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_stops_pending_tasks() {
        let scheduler = DelayScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let task = scheduler
            .schedule("test", Duration::from_secs(1), counting_job(&counter))
            .unwrap();
        scheduler.cancel_all();

        assert!(task.is_cancelled());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn schedule_without_runtime_fails() {
        let scheduler = DelayScheduler::new();
        let result = scheduler.schedule("orphan", Duration::ZERO, async {});
        assert_eq!(result.unwrap_err(), ScheduleError::NoRuntime);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_tasks_are_reaped() {
        let scheduler = DelayScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule("first", Duration::from_millis(10), counting_job(&counter))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(scheduler.pending(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
