use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use tee_model::{
    BookingTarget, Credentials, PlayerCount, SlotOrder, TargetTime, WorkerId, WorkerOutcome,
};
use time::{OffsetDateTime, macros::datetime};
use tokio::time::Instant;

use super::{PoolConfig, PoolState, Supervisor};
use crate::{
    error::CoreError,
    page::PageMap,
    profile::Profile,
    runner::{BookingRunner, BuildContext, Launch, Runner, RunnerError, WorkerTask},
    testing::{FakeBrowser, FakeEvent, FakePage, MemoryStore, TokioClock},
    worker::BookingPlan,
};

const OPENING: OffsetDateTime = datetime!(2026-10-19 19:00:00 UTC);

/// Runner whose workers sleep for a while and then fail, complete or panic.
#[derive(Default)]
struct ScriptedRunner {
    run_for: Duration,
    complete_on: Option<u64>,
    panic_on: Option<u64>,
    fail_build: bool,
    live: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    built: Arc<Mutex<Vec<(WorkerId, Instant)>>>,
    marked: Arc<Mutex<Option<Instant>>>,
}

impl ScriptedRunner {
    fn built(&self) -> Vec<(WorkerId, Instant)> {
        self.built.lock().unwrap().clone()
    }
}

impl Runner for ScriptedRunner {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn build_task(&self, launch: Launch, ctx: &BuildContext) -> Result<WorkerTask, RunnerError> {
        if self.fail_build {
            return Err(RunnerError::Internal("scripted build failure".into()));
        }
        self.built.lock().unwrap().push((launch.id, Instant::now()));

        let id = launch.id.get();
        let run_for = self.run_for;
        let completes = self.complete_on == Some(id);
        let panics = self.panic_on == Some(id);
        let live = Arc::clone(&self.live);
        let peak = Arc::clone(&self.peak);
        let marked = Arc::clone(&self.marked);
        let signal = ctx.signal().clone();

        Ok(Box::pin(async move {
            let now_live = live.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now_live, Ordering::SeqCst);
            if panics {
                live.fetch_sub(1, Ordering::SeqCst);
                panic!("scripted failure in {}", launch.id);
            }
            let outcome = tokio::select! {
                _ = launch.cancel.cancelled() => WorkerOutcome::Canceled,
                _ = tokio::time::sleep(run_for) => {
                    if completes {
                        signal.mark();
                        *marked.lock().unwrap() = Some(Instant::now());
                        WorkerOutcome::Completed
                    } else {
                        WorkerOutcome::Failed
                    }
                }
            };
            launch.state.send_replace(outcome.final_state());
            live.fetch_sub(1, Ordering::SeqCst);
            outcome
        }))
    }
}

fn context(store: Arc<MemoryStore>, starts_at: OffsetDateTime) -> BuildContext {
    BuildContext::new(store).with_clock(Arc::new(TokioClock::starting_at(starts_at)))
}

fn pool(max_workers: usize, stagger_ms: u64) -> PoolConfig {
    PoolConfig {
        max_workers,
        stagger_ms,
        ..PoolConfig::default()
    }
}

fn supervisor(config: PoolConfig, runner: Arc<dyn Runner>, ctx: BuildContext) -> Supervisor {
    Supervisor::new(config, TargetTime::new(19, 0, 0), runner, ctx).unwrap()
}

#[tokio::test(start_paused = true)]
async fn never_exceeds_the_cap_and_stops_within_one_stagger() {
    let runner = Arc::new(ScriptedRunner {
        run_for: Duration::from_secs(1),
        complete_on: Some(6),
        ..ScriptedRunner::default()
    });
    let ctx = context(Arc::new(MemoryStore::ready(2)), OPENING);
    let config = pool(2, 100);
    let stagger = config.stagger();

    let report = supervisor(config, runner.clone(), ctx.clone()).run().await.unwrap();
    let finished = Instant::now();

    assert_eq!(runner.peak.load(Ordering::SeqCst), 2);
    assert_eq!(report.peak_active, 2);
    assert!(report.launched >= 6);
    assert_eq!(report.completed, 1);
    assert_eq!(report.settled() as u64, report.launched);
    assert!(ctx.signal().is_set());
    assert!(report.pool.completed);
    assert_eq!(report.pool.active, 0);
    assert_eq!(report.pool.next_id, WorkerId::new(report.launched + 1));
    assert_eq!(runner.live.load(Ordering::SeqCst), 0);

    let marked = (*runner.marked.lock().unwrap()).expect("worker 6 completed");
    assert!(finished - marked <= stagger);
    // Nothing launched after the booking landed.
    assert!(runner.built().iter().all(|(_, at)| *at <= marked));

    let ids: Vec<u64> = runner.built().iter().map(|(id, _)| id.get()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test(start_paused = true)]
async fn gate_holds_launches_until_profile_is_valid() {
    let store = Arc::new(MemoryStore::ready(2));
    store.set_players_raw("abc");
    let runner = Arc::new(ScriptedRunner {
        run_for: Duration::from_secs(3600),
        ..ScriptedRunner::default()
    });
    let sup = supervisor(PoolConfig::default(), runner.clone(), context(store.clone(), OPENING));
    let cancel = sup.cancel_token();
    let task = tokio::spawn(sup.run());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(runner.built().len(), 1);
    assert_eq!(store.players_raw().as_deref(), Some("-1"));

    store.set_players_raw("3");
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(runner.built().len(), 2);

    cancel.cancel();
    let report = task.await.unwrap().unwrap();
    assert_eq!(report.launched, 2);
    assert_eq!(report.canceled, 2);
    assert!(!report.is_booked());
    assert!(!report.pool.completed);
    assert_eq!(report.pool.next_id, WorkerId::new(3));
}

#[tokio::test(start_paused = true)]
async fn out_of_range_player_count_keeps_the_gate_closed() {
    let store = Arc::new(MemoryStore::ready(2));
    store.set_players_raw("5");
    let runner = Arc::new(ScriptedRunner {
        run_for: Duration::from_secs(3600),
        ..ScriptedRunner::default()
    });
    let sup = supervisor(PoolConfig::default(), runner.clone(), context(store.clone(), OPENING));
    let cancel = sup.cancel_token();
    let task = tokio::spawn(sup.run());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(runner.built().len(), 1);
    assert_eq!(store.players_raw().as_deref(), Some("5"));

    cancel.cancel();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn launching_starts_at_the_opening_second() {
    let start = Instant::now();
    let runner = Arc::new(ScriptedRunner {
        complete_on: Some(1),
        ..ScriptedRunner::default()
    });
    let ctx = context(Arc::new(MemoryStore::ready(2)), datetime!(2026-10-19 18:59:58 UTC));

    let report = supervisor(PoolConfig::default(), runner.clone(), ctx).run().await.unwrap();

    let built = runner.built();
    assert_eq!(built.len(), 1);
    let waited = built[0].1 - start;
    assert!(waited >= Duration::from_secs(2), "launched after {waited:?}");
    assert!(waited < Duration::from_millis(2100), "launched after {waited:?}");
    assert_eq!(report.completed, 1);
    assert!(report.elapsed < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn cancel_before_opening_launches_nothing() {
    let runner = Arc::new(ScriptedRunner::default());
    let ctx = context(Arc::new(MemoryStore::ready(2)), datetime!(2026-10-19 10:00:00 UTC));
    let sup = supervisor(PoolConfig::default(), runner.clone(), ctx);
    let cancel = sup.cancel_token();
    let task = tokio::spawn(sup.run());

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();

    let report = task.await.unwrap().unwrap();
    assert_eq!(report.launched, 0);
    assert_eq!(report.pool, PoolState::default());
    assert!(runner.built().is_empty());
}

#[tokio::test(start_paused = true)]
async fn panicking_worker_gets_a_crash_record() {
    let store = Arc::new(MemoryStore::ready(2));
    let runner = Arc::new(ScriptedRunner {
        run_for: Duration::from_millis(10),
        panic_on: Some(1),
        complete_on: Some(2),
        ..ScriptedRunner::default()
    });
    let ctx = context(store.clone(), OPENING);

    let report = supervisor(pool(5, 100), runner, ctx).run().await.unwrap();

    assert_eq!(report.crashed, 1);
    assert_eq!(report.completed, 1);
    let crashes = store.crashes();
    assert_eq!(crashes.len(), 1);
    assert_eq!(crashes[0], "worker-1: panic: scripted failure in worker-1");
}

#[tokio::test(start_paused = true)]
async fn build_failure_aborts_the_run() {
    let runner = Arc::new(ScriptedRunner {
        fail_build: true,
        ..ScriptedRunner::default()
    });
    let ctx = context(Arc::new(MemoryStore::ready(2)), OPENING);

    let err = supervisor(PoolConfig::default(), runner, ctx).run().await.unwrap_err();
    assert!(matches!(err, CoreError::Runner(RunnerError::Internal(_))));
}

#[test]
fn invalid_pool_is_rejected() {
    let ctx = BuildContext::new(Arc::new(MemoryStore::new()));
    let res = Supervisor::new(pool(0, 100), TargetTime::default(), Arc::new(ScriptedRunner::default()), ctx);
    assert!(matches!(res, Err(CoreError::InvalidConfig(_))));
}

#[tokio::test(start_paused = true)]
async fn booking_pool_keeps_the_winning_session() {
    let mut browser = FakeBrowser::new(FakePage::booking_site(&[
        ("8:00am", "4"),
        ("7:15am", "1"),
        ("11:30am", "2"),
    ]));
    browser.latency = Duration::from_millis(100);
    let log = browser.log();

    let creds = Credentials::new("golfer@example.com", "hunter2").unwrap();
    let plan = BookingPlan::new(
        Profile::new(creds, PlayerCount::raw(2)),
        BookingTarget::default(),
        PageMap::default(),
        SlotOrder::Legacy,
    );
    let runner = Arc::new(BookingRunner::new(Arc::new(browser), plan));
    let ctx = context(Arc::new(MemoryStore::ready(2)), OPENING);

    // The first worker needs about six seconds; the pool fills up before it books.
    let report = supervisor(pool(5, 1000), runner, ctx.clone()).run().await.unwrap();

    assert_eq!(report.launched, 5);
    assert_eq!(report.completed, 1);
    assert_eq!(report.canceled, 4);
    assert_eq!(report.winner(), Some((WorkerId::new(1), "8:00am")));
    assert_eq!(ctx.vault().len(), 1);
    // Every session but the winner's is closed.
    assert_eq!(log.count(|e| *e == FakeEvent::Closed), 4);
}
