//! Worker pool: waits for the booking window, then keeps up to `max_workers`
//! booking workers alive, launching them one stagger apart, until one books.
//!
//! The supervisor owns the registry, worker ids and cancellation tokens.
//! It never touches a worker's browser session.
mod config;
pub use config::PoolConfig;

mod registry;
pub use registry::{Registry, WorkerHandle};

mod report;
pub use report::PoolReport;

use std::{any::Any, sync::Arc, time::Duration};

use tee_model::{TargetTime, WorkerId, WorkerOutcome};
use time::OffsetDateTime;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    error::CoreError,
    runner::{BuildContext, Launch, Runner},
};

/// Live view of the pool, kept current by the launch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub active: usize,
    pub completed: bool,
    pub next_id: WorkerId,
}

impl Default for PoolState {
    fn default() -> Self {
        Self {
            active: 0,
            completed: false,
            next_id: WorkerId::new(1),
        }
    }
}

pub struct Supervisor {
    config: PoolConfig,
    opens_at: TargetTime,
    runner: Arc<dyn Runner>,
    ctx: BuildContext,
    root: CancellationToken,
}

impl Supervisor {
    /// Create a supervisor for the pool described by `config`.
    ///
    /// `opens_at` is the wall-clock time (per the context's clock) at which
    /// booking opens and launching starts.
    pub fn new(
        config: PoolConfig,
        opens_at: TargetTime,
        runner: Arc<dyn Runner>,
        ctx: BuildContext,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        opens_at.validate()?;
        Ok(Self {
            config,
            opens_at,
            runner,
            ctx,
            root: CancellationToken::new(),
        })
    }

    /// Use `root` as the parent of every worker token.
    pub fn with_cancel(mut self, root: CancellationToken) -> Self {
        self.root = root;
        self
    }

    /// Cancelling this token stops the pool and every worker.
    pub fn cancel_token(&self) -> CancellationToken {
        self.root.clone()
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Wait for the booking window, run the pool until a booking lands or the
    /// root token is cancelled, then cancel and join every worker.
    ///
    /// Fails only when a worker task cannot be built.
    #[instrument(level = "debug", skip(self), fields(runner = self.runner.name(), cap = self.config.max_workers))]
    pub async fn run(self) -> Result<PoolReport, CoreError> {
        let mut report = PoolReport::default();
        let Some(opened) = self.wait_for_opening().await else {
            info!("stopped before the booking window opened");
            return Ok(report);
        };
        info!(opens_at = %self.opens_at, "booking window open; launching workers");

        let mut registry = Registry::default();
        let result = self.launch_loop(&mut registry, &mut report).await;
        self.shutdown(&mut registry, &mut report).await;
        report.pool.active = registry.active();

        report.bookings = self.ctx.vault().bookings();
        report.elapsed = (self.ctx.clock().now() - opened).unsigned_abs();
        match &result {
            Ok(()) => info!(report = %report, "pool finished"),
            Err(e) => error!(error = %e, report = %report, "pool aborted"),
        }
        result.map(|()| report)
    }

    /// Poll the clock until it shows the opening time. `None` if cancelled first.
    async fn wait_for_opening(&self) -> Option<OffsetDateTime> {
        let clock = self.ctx.clock();
        debug!(opens_at = %self.opens_at, "waiting for the booking window");
        loop {
            let now = clock.now();
            if self.opens_at.matches(now.time()) {
                return Some(now);
            }
            tokio::select! {
                _ = self.root.cancelled() => return None,
                _ = tokio::time::sleep(self.config.target_poll()) => {}
            }
        }
    }

    async fn launch_loop(&self, registry: &mut Registry, report: &mut PoolReport) -> Result<(), CoreError> {
        let signal = self.ctx.signal();

        while !self.should_stop() {
            for handle in registry.take_finished() {
                self.settle(handle.join().await, report);
            }
            report.pool.active = registry.active();
            report.pool.completed = signal.is_set();
            if report.pool.active >= self.config.max_workers {
                self.pause(self.config.busy_poll()).await;
                continue;
            }

            let id = report.pool.next_id;
            report.pool.next_id = id.next();
            self.launch(id, registry)?;
            report.pool.active = registry.active();
            report.launched += 1;
            report.peak_active = report.peak_active.max(report.pool.active);
            debug!(state = ?report.pool, "pool state");

            self.wait_for_gate().await;
            self.pause(self.config.stagger()).await;
        }

        report.pool.completed = signal.is_set();
        if report.pool.completed {
            info!(launched = report.launched, "booking reported; stopping the pool");
        } else {
            info!("pool cancelled");
        }
        Ok(())
    }

    fn launch(&self, id: WorkerId, registry: &mut Registry) -> Result<(), CoreError> {
        let cancel = self.root.child_token();
        let (launch, state) = Launch::new(id, cancel.clone());
        let task = self.runner.build_task(launch, &self.ctx)?;
        let join = tokio::spawn(task);
        registry.insert(WorkerHandle::new(id, cancel, state, join));
        info!(worker = %id, active = registry.active(), "worker launched");
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.ctx.signal().is_set() || self.root.is_cancelled()
    }

    /// Sleep for `period` unless a booking lands or the pool is cancelled.
    async fn pause(&self, period: Duration) {
        tokio::select! {
            _ = tokio::time::sleep(period) => {}
            _ = self.ctx.signal().wait() => {}
            _ = self.root.cancelled() => {}
        }
    }

    /// Block until the operator's profile is usable.
    async fn wait_for_gate(&self) {
        let store = self.ctx.store();
        let mut warned = false;
        while !self.should_stop() && !store.is_ready() {
            if !warned {
                warn!("profile not ready (player count 1-4 and login required); holding launches");
                warned = true;
            }
            self.pause(self.config.gate_poll()).await;
        }
        if warned && !self.should_stop() {
            info!("profile ready; resuming launches");
        }
    }

    async fn shutdown(&self, registry: &mut Registry, report: &mut PoolReport) {
        debug!(workers = ?registry.records(), "shutting down pool");
        if let Some(last) = registry.take_last() {
            if !last.is_finished() {
                debug!(worker = %last.id, "cancelling most recent worker");
                last.cancel.cancel();
            }
            self.settle(last.join().await, report);
        }
        registry.cancel_all();
        for handle in registry.drain() {
            self.settle(handle.join().await, report);
        }
    }

    fn settle(&self, (id, joined): (WorkerId, Result<WorkerOutcome, JoinError>), report: &mut PoolReport) {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => {
                let reason = panic_message(e.into_panic());
                error!(worker = %id, %reason, "worker panicked");
                let crash = format!("panic: {reason}");
                if let Err(e) = self.ctx.store().record_crash(self.ctx.clock().now(), id, &crash) {
                    error!(worker = %id, error = %e, "failed to write crash record");
                }
                WorkerOutcome::Crashed
            }
            Err(_) => WorkerOutcome::Canceled,
        };
        debug!(worker = %id, outcome = outcome.as_label(), "worker settled");
        report.record(outcome);
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests;
