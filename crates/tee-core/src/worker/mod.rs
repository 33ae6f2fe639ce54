//! Booking worker: one browser session driven through the booking stages.
//!
//! Stages run strictly in order (see [`WorkerState`]). The first failed guard
//! ends the run; nothing is retried inside a worker. Cancellation is checked
//! between stages and raced against every browser call.
mod error;
pub use error::BookingError;

mod stages;

use std::{future::Future, sync::Arc};

use tee_model::{BookingTarget, SlotOrder, WorkerId, WorkerOutcome, WorkerState};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    browser::{Browser, BrowserResult, Session},
    clock::Clock,
    page::PageMap,
    profile::Profile,
    runner::{BuildContext, Launch},
    signal::BookingSignal,
    store::ProfileStore,
    vault::SessionVault,
};

/// Everything a worker needs to know about what to book.
///
/// Cheap to clone; shared by all workers of a pool.
#[derive(Debug, Clone)]
pub struct BookingPlan {
    pub profile: Arc<Profile>,
    pub target: Arc<BookingTarget>,
    pub page: Arc<PageMap>,
    pub order: SlotOrder,
}

impl BookingPlan {
    pub fn new(profile: Profile, target: BookingTarget, page: PageMap, order: SlotOrder) -> Self {
        Self {
            profile: Arc::new(profile),
            target: Arc::new(target),
            page: Arc::new(page),
            order,
        }
    }
}

pub struct BookingWorker {
    id: WorkerId,
    plan: BookingPlan,
    browser: Arc<dyn Browser>,
    signal: BookingSignal,
    clock: Arc<dyn Clock>,
    store: Arc<dyn ProfileStore>,
    vault: SessionVault,
    cancel: CancellationToken,
    state: watch::Sender<WorkerState>,
}

impl BookingWorker {
    pub fn new(launch: Launch, ctx: &BuildContext, browser: Arc<dyn Browser>, plan: BookingPlan) -> Self {
        Self {
            id: launch.id,
            plan,
            browser,
            signal: ctx.signal().clone(),
            clock: Arc::clone(ctx.clock()),
            store: Arc::clone(ctx.store()),
            vault: ctx.vault().clone(),
            cancel: launch.cancel,
            state: launch.state,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Run the booking stages to the end.
    ///
    /// On success the session is handed to the [`SessionVault`]; on any other
    /// outcome it is closed before returning.
    pub async fn run(self) -> WorkerOutcome {
        info!(
            worker = %self.id,
            players = %self.plan.profile.players,
            course = %self.plan.target.course,
            "worker starting"
        );

        if self.cancel.is_cancelled() {
            return self.conclude_failure(BookingError::Canceled);
        }

        // Not raced against cancellation: the driver owns a browser as soon as
        // the request is sent, so the session must come back to be closed.
        let mut session = match self.browser.open().await {
            Ok(session) => session,
            Err(e) => return self.conclude_failure(e.into()),
        };
        debug!(worker = %self.id, browser = self.browser.name(), "browser session established");

        if self.cancel.is_cancelled() {
            let outcome = self.conclude_failure(BookingError::Canceled);
            self.release(session.as_mut()).await;
            return outcome;
        }

        match self.drive(session.as_mut()).await {
            Ok(label) => self.conclude_success(label, session),
            Err(e) => {
                let outcome = self.conclude_failure(e);
                self.release(session.as_mut()).await;
                outcome
            }
        }
    }

    async fn release(&self, s: &mut dyn Session) {
        match s.close().await {
            Ok(()) => debug!(worker = %self.id, "browser session closed"),
            Err(e) => warn!(worker = %self.id, error = %e, "failed to close browser session"),
        }
    }

    async fn drive(&self, s: &mut dyn Session) -> Result<String, BookingError> {
        self.enter(WorkerState::Connecting)?;
        self.connect(s).await?;

        self.enter(WorkerState::Authenticating)?;
        self.authenticate(s).await?;

        self.enter(WorkerState::ConfiguringSearch)?;
        self.configure_search(s).await?;

        self.enter(WorkerState::DiscoveringSlots)?;
        let label = self.discover(s).await?;

        self.enter(WorkerState::Booking)?;
        self.book(s).await?;
        Ok(label)
    }

    fn conclude_success(&self, label: String, session: Box<dyn Session>) -> WorkerOutcome {
        self.state.send_replace(WorkerState::Completed);
        let first = self.signal.mark();
        if !first {
            warn!(worker = %self.id, time = %label, "another worker had already booked; duplicate reservation likely");
        }
        info!(
            worker = %self.id,
            time = %label,
            email = self.plan.profile.credentials.email(),
            "tee time booked; check email for confirmation"
        );
        self.vault.keep(self.id, label, session);
        WorkerOutcome::Completed
    }

    fn conclude_failure(&self, e: BookingError) -> WorkerOutcome {
        let outcome = e.outcome();
        let stage = *self.state.borrow();
        match outcome {
            WorkerOutcome::Canceled => info!(worker = %self.id, %stage, "worker canceled"),
            WorkerOutcome::Crashed => {
                error!(worker = %self.id, %stage, error = %e, "worker crashed");
                let report = format!("stage: {stage}\nerror: {e}\ndetail: {e:?}");
                match self.store.record_crash(self.clock.now(), self.id, &report) {
                    Ok(path) => error!(worker = %self.id, path = %path, "crash record written"),
                    Err(err) => error!(worker = %self.id, error = %err, "failed to write crash record"),
                }
            }
            _ => warn!(worker = %self.id, %stage, error = %e, "worker aborted"),
        }
        self.state.send_replace(outcome.final_state());
        outcome
    }

    /// Move to `next` unless cancellation was requested.
    fn enter(&self, next: WorkerState) -> Result<(), BookingError> {
        if self.cancel.is_cancelled() {
            return Err(BookingError::Canceled);
        }
        self.state.send_replace(next);
        debug!(worker = %self.id, stage = %next, "stage entered");
        Ok(())
    }

    /// Await a browser call unless the worker gets cancelled first.
    async fn guarded<T, F>(&self, call: F) -> Result<T, BookingError>
    where
        F: Future<Output = BrowserResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(BookingError::Canceled),
            res = call => res.map_err(BookingError::from),
        }
    }
}
