use std::collections::HashMap;

use tee_model::{WorkerId, WorkerOutcome, WorkerRecord, WorkerState};
use tokio::{
    sync::watch,
    task::{JoinError, JoinHandle},
};
use tokio_util::sync::CancellationToken;

/// Supervisor-side handle of one running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    pub id: WorkerId,
    pub cancel: CancellationToken,
    state: watch::Receiver<WorkerState>,
    join: JoinHandle<WorkerOutcome>,
}

impl WorkerHandle {
    pub fn new(
        id: WorkerId,
        cancel: CancellationToken,
        state: watch::Receiver<WorkerState>,
        join: JoinHandle<WorkerOutcome>,
    ) -> Self {
        Self {
            id,
            cancel,
            state,
            join,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub fn record(&self) -> WorkerRecord {
        let state = *self.state.borrow();
        WorkerRecord {
            id: self.id,
            state,
            completed: state == WorkerState::Completed,
        }
    }

    /// Wait for the task to end.
    pub async fn join(self) -> (WorkerId, Result<WorkerOutcome, JoinError>) {
        (self.id, self.join.await)
    }
}

/// Workers launched and not yet reaped.
#[derive(Debug, Default)]
pub struct Registry {
    workers: HashMap<WorkerId, WorkerHandle>,
    last: Option<WorkerId>,
}

impl Registry {
    pub fn insert(&mut self, handle: WorkerHandle) {
        self.last = Some(handle.id);
        self.workers.insert(handle.id, handle);
    }

    pub fn active(&self) -> usize {
        self.workers.len()
    }

    pub fn records(&self) -> Vec<WorkerRecord> {
        let mut records: Vec<_> = self.workers.values().map(WorkerHandle::record).collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Remove and return every worker whose task has ended, oldest first.
    pub fn take_finished(&mut self) -> Vec<WorkerHandle> {
        let mut done: Vec<WorkerId> = self
            .workers
            .iter()
            .filter(|(_, h)| h.is_finished())
            .map(|(id, _)| *id)
            .collect();
        done.sort();
        done.into_iter()
            .filter_map(|id| self.workers.remove(&id))
            .collect()
    }

    /// Remove the most recently launched worker if it is still registered.
    pub fn take_last(&mut self) -> Option<WorkerHandle> {
        self.last.take().and_then(|id| self.workers.remove(&id))
    }

    pub fn cancel_all(&self) {
        for handle in self.workers.values() {
            handle.cancel.cancel();
        }
    }

    /// Remove every worker, oldest first.
    pub fn drain(&mut self) -> Vec<WorkerHandle> {
        self.last = None;
        let mut all: Vec<_> = self.workers.drain().map(|(_, h)| h).collect();
        all.sort_by_key(|h| h.id);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn spawn(reg: &mut Registry, id: u64, outcome: WorkerOutcome, after: Duration) -> CancellationToken {
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(WorkerState::Init);
        let token = cancel.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tx.send_replace(WorkerState::Canceled);
                    WorkerOutcome::Canceled
                }
                _ = tokio::time::sleep(after) => {
                    tx.send_replace(outcome.final_state());
                    outcome
                }
            }
        });
        reg.insert(WorkerHandle::new(WorkerId::new(id), cancel.clone(), rx, join));
        cancel
    }

    #[tokio::test(start_paused = true)]
    async fn finished_workers_are_taken_out() {
        let mut reg = Registry::default();
        spawn(&mut reg, 1, WorkerOutcome::Failed, Duration::from_millis(10));
        spawn(&mut reg, 2, WorkerOutcome::Failed, Duration::from_secs(10));
        assert_eq!(reg.active(), 2);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let done = reg.take_finished();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, WorkerId::new(1));
        assert_eq!(reg.active(), 1);

        let (id, res) = done.into_iter().next().unwrap().join().await;
        assert_eq!(id, WorkerId::new(1));
        assert_eq!(res.unwrap(), WorkerOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn last_launched_is_taken_once() {
        let mut reg = Registry::default();
        spawn(&mut reg, 1, WorkerOutcome::Failed, Duration::from_secs(10));
        spawn(&mut reg, 2, WorkerOutcome::Failed, Duration::from_secs(10));

        let last = reg.take_last().unwrap();
        assert_eq!(last.id, WorkerId::new(2));
        assert!(reg.take_last().is_none());
        assert_eq!(reg.active(), 1);
        reg.cancel_all();
        for h in reg.drain() {
            assert_eq!(h.join().await.1.unwrap(), WorkerOutcome::Canceled);
        }
        last.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn records_follow_worker_state() {
        let mut reg = Registry::default();
        spawn(&mut reg, 3, WorkerOutcome::Completed, Duration::from_millis(5));
        assert_eq!(reg.records()[0], WorkerRecord::launched(WorkerId::new(3)));

        tokio::time::sleep(Duration::from_millis(10)).await;
        let rec = reg.records()[0];
        assert_eq!(rec.state, WorkerState::Completed);
        assert!(rec.completed);
    }
}
