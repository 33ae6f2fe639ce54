//! Runner abstraction used by the supervisor to build worker tasks.
//!
//! The supervisor owns ids, cancellation and state channels; a runner only
//! turns a [`Launch`] into a future that drives one worker to its outcome.
mod error;
pub use error::RunnerError;

mod context;
pub use context::BuildContext;

mod booking;
pub use booking::BookingRunner;

use std::{future::Future, pin::Pin};

use tee_model::{WorkerId, WorkerOutcome, WorkerState};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Future running a single worker.
pub type WorkerTask = Pin<Box<dyn Future<Output = WorkerOutcome> + Send + 'static>>;

/// Per-worker handles issued by the supervisor.
#[derive(Debug)]
pub struct Launch {
    pub id: WorkerId,
    /// Child of the supervisor's root token.
    pub cancel: CancellationToken,
    /// Stage reporting channel; the supervisor holds the receiver.
    pub state: watch::Sender<WorkerState>,
}

impl Launch {
    /// Fresh launch for `id` and the receiving end of its state channel.
    pub fn new(id: WorkerId, cancel: CancellationToken) -> (Self, watch::Receiver<WorkerState>) {
        let (state, rx) = watch::channel(WorkerState::Init);
        (Self { id, cancel, state }, rx)
    }
}

/// Builds worker tasks for the supervisor.
pub trait Runner: Send + Sync {
    /// Runner name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Build the task for one launch.
    ///
    /// The provided [`BuildContext`] carries the dependencies shared by the whole pool.
    fn build_task(&self, launch: Launch, ctx: &BuildContext) -> Result<WorkerTask, RunnerError>;
}
