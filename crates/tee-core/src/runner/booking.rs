use std::sync::Arc;

use tracing::trace;

use super::{BuildContext, Launch, Runner, RunnerError, WorkerTask};
use crate::{
    browser::Browser,
    worker::{BookingPlan, BookingWorker},
};

/// Runner launching [`BookingWorker`]s against one browser backend.
#[derive(Clone)]
pub struct BookingRunner {
    browser: Arc<dyn Browser>,
    plan: BookingPlan,
}

impl BookingRunner {
    pub fn new(browser: Arc<dyn Browser>, plan: BookingPlan) -> Self {
        Self { browser, plan }
    }

    pub fn plan(&self) -> &BookingPlan {
        &self.plan
    }
}

impl Runner for BookingRunner {
    fn name(&self) -> &'static str {
        "booking"
    }

    fn build_task(&self, launch: Launch, ctx: &BuildContext) -> Result<WorkerTask, RunnerError> {
        if self.plan.profile.players.is_unset() {
            return Err(RunnerError::InvalidProfile {
                runner: self.name(),
                reason: format!("player count {} is not set", self.plan.profile.players),
            });
        }
        self.plan
            .target
            .validate()
            .map_err(|e| RunnerError::InvalidTarget(e.to_string()))?;

        trace!(worker = %launch.id, browser = self.browser.name(), "building booking task");
        let worker = BookingWorker::new(launch, ctx, Arc::clone(&self.browser), self.plan.clone());
        Ok(Box::pin(worker.run()))
    }
}
