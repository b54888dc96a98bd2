//! Fixed-delay loops on top of `tokio-cron-scheduler`.
//!
//! Each run of a loop is a one-shot job. The job schedules the next run only after
//! its callback has finished, so runs of the same loop never overlap and a slow run
//! pushes the next one back instead of piling up.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::error::AppError;

type LoopFuture = Pin<Box<dyn Future<Output = Result<(), AppError>> + Send>>;
type LoopCallback = Arc<dyn Fn() -> LoopFuture + Send + Sync>;

struct LoopTask {
    name: &'static str,
    interval: Duration,
    callback: LoopCallback,
    running: Arc<AtomicBool>,
}

/// Runs registered loops until shut down.
#[derive(Clone)]
pub struct LoopScheduler {
    scheduler: JobScheduler,
    running: Arc<AtomicBool>,
}

impl LoopScheduler {
    /// Creates and starts the underlying job scheduler.
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new().await?;
        scheduler.start().await?;

        Ok(Self {
            scheduler,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Registers a loop whose first run starts immediately.
    ///
    /// Errors returned by `callback` are logged and the loop keeps running.
    ///
    /// # Arguments
    /// - `name` - Loop name used in logs
    /// - `interval` - Delay between the end of one run and the start of the next
    /// - `callback` - Produces the future for a single run
    pub async fn register<F, Fut>(
        &self,
        name: &'static str,
        interval: Duration,
        callback: F,
    ) -> Result<(), AppError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        let task = Arc::new(LoopTask {
            name,
            interval,
            callback: Arc::new(move || Box::pin(callback()) as LoopFuture),
            running: self.running.clone(),
        });

        schedule_run(self.scheduler.clone(), task, Duration::ZERO).await?;

        tracing::info!("Registered loop '{}' every {:?}", name, interval);
        Ok(())
    }

    /// Stops scheduling further runs and shuts the job scheduler down.
    ///
    /// A run already in progress is not interrupted.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.running.store(false, Ordering::SeqCst);

        let mut scheduler = self.scheduler.clone();
        scheduler.shutdown().await?;

        tracing::info!("Loop scheduler stopped");
        Ok(())
    }
}

fn schedule_run(
    scheduler: JobScheduler,
    task: Arc<LoopTask>,
    delay: Duration,
) -> Pin<Box<dyn Future<Output = Result<(), JobSchedulerError>> + Send>> {
    Box::pin(async move {
        let job_task = task.clone();
        let job = Job::new_one_shot_async(delay, move |_uuid, scheduler| {
            let task = job_task.clone();

            Box::pin(async move {
                if !task.running.load(Ordering::SeqCst) {
                    return;
                }

                if let Err(e) = (task.callback)().await {
                    tracing::error!("Loop '{}' failed: {}", task.name, e);
                }

                if !task.running.load(Ordering::SeqCst) {
                    return;
                }

                let interval = task.interval;
                if let Err(e) = schedule_run(scheduler, task.clone(), interval).await {
                    tracing::error!("Failed to reschedule loop '{}': {}", task.name, e);
                }
            })
        })?;

        scheduler.add(job).await?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    async fn wait_for(counter: &AtomicUsize, target: usize) -> bool {
        for _ in 0..100 {
            if counter.load(Ordering::SeqCst) >= target {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        false
    }

    /// Tests that a registered loop runs repeatedly.
    ///
    /// Verifies that a failing run does not stop the loop.
    ///
    /// Expected: at least three runs although every run returns an error
    #[tokio::test(flavor = "multi_thread")]
    async fn loop_repeats_after_errors() {
        let scheduler = LoopScheduler::new().await.unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        scheduler
            .register("failing", Duration::from_millis(10), move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(AppError::InternalError("boom".to_string()))
                }
            })
            .await
            .unwrap();

        assert!(wait_for(&runs, 3).await);
        scheduler.shutdown().await.unwrap();
    }

    /// Tests that runs of a loop never overlap.
    ///
    /// Verifies that a run slower than the interval delays the next run.
    ///
    /// Expected: at most one run active at any time
    #[tokio::test(flavor = "multi_thread")]
    async fn runs_do_not_overlap() {
        let scheduler = LoopScheduler::new().await.unwrap();
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        let (a, m, r) = (active.clone(), max_active.clone(), runs.clone());
        scheduler
            .register("slow", Duration::from_millis(1), move || {
                let (active, max_active, runs) = (a.clone(), m.clone(), r.clone());
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_active.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), AppError>(())
                }
            })
            .await
            .unwrap();

        assert!(wait_for(&runs, 3).await);
        scheduler.shutdown().await.unwrap();

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
    }

    /// Tests that shutdown stops a loop.
    ///
    /// Expected: run count stays constant after shutdown
    #[tokio::test(flavor = "multi_thread")]
    async fn shutdown_stops_loop() {
        let scheduler = LoopScheduler::new().await.unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        scheduler
            .register("counter", Duration::from_millis(10), move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), AppError>(())
                }
            })
            .await
            .unwrap();

        assert!(wait_for(&runs, 1).await);
        scheduler.shutdown().await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        let after_shutdown = runs.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(runs.load(Ordering::SeqCst), after_shutdown);
    }
}
