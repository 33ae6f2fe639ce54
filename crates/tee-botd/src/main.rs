mod config;

use std::{sync::Arc, time::Duration};

use tee_core::prelude::*;
use tee_observe::{capture_local_offset, init_logging};
use tee_webdriver::WebDriverBrowser;
use time::UtcOffset;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::BotConfig;

fn main() -> anyhow::Result<()> {
    // 1) local offset, read while the process is still single-threaded
    let offset = capture_local_offset();

    // 2) configuration
    let (config, source) = BotConfig::load()?;

    // 3) logger
    init_logging(&config.logger.clone().with_env_override()?)?;
    info!(%source, "configuration loaded");

    // 4) runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(config, offset))
}

async fn run(config: BotConfig, offset: UtcOffset) -> anyhow::Result<()> {
    let root = CancellationToken::new();
    tokio::spawn(interrupt(root.clone()));

    // 5) operator profile
    let store = Arc::new(FileStore::new(config.store.clone()));
    if !wait_for_profile(&*store, config.pool.gate_poll(), &root).await {
        info!("interrupted before the profile was ready");
        return Ok(());
    }
    let profile = Profile::load(&*store)?;

    // 6) browser + runner
    let browser = Arc::new(WebDriverBrowser::new(config.webdriver.clone())?);
    let plan = BookingPlan::new(
        profile,
        config.target.clone(),
        config.page.clone(),
        config.slot_order,
    );
    let runner = Arc::new(BookingRunner::new(browser, plan));

    // 7) supervisor
    let ctx = BuildContext::new(store).with_clock(Arc::new(SystemClock::new(offset)));
    let vault = ctx.vault().clone();
    info!(
        url = %config.target.url,
        course = %config.target.course,
        day = %config.target.day,
        opens_at = %config.target.opens_at,
        order = %config.slot_order,
        "waiting to book"
    );
    let supervisor = Supervisor::new(config.pool.clone(), config.target.opens_at, runner, ctx)?
        .with_cancel(root.clone());
    let report = supervisor.run().await?;

    match report.winner() {
        Some((worker, time)) => info!(%worker, time, "tee time booked; check email for confirmation"),
        None => warn!("no tee time was booked"),
    }
    if report.bookings.len() > 1 {
        warn!(bookings = ?report.bookings, "more than one worker booked; cancel the extras on the site");
    }

    // 8) keep the confirmation pages open until the operator is done
    if !root.is_cancelled() && !vault.is_empty() {
        acknowledge().await;
    }
    let closed = vault.close_all().await;
    info!(closed, "browser sessions closed; exiting");
    Ok(())
}

/// Cancel `root` on Ctrl-C.
async fn interrupt(root: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            warn!("interrupt received; stopping workers");
            root.cancel();
        }
        Err(e) => error!(error = %e, "cannot listen for Ctrl-C"),
    }
}

/// Poll the readiness gate. Returns `false` when cancelled first.
async fn wait_for_profile(store: &dyn ProfileStore, poll: Duration, root: &CancellationToken) -> bool {
    let mut warned = false;
    while !store.is_ready() {
        if !warned {
            warn!("waiting for a player count (1-4) and login to be saved");
            warned = true;
        }
        tokio::select! {
            _ = root.cancelled() => return false,
            _ = tokio::time::sleep(poll) => {}
        }
    }
    true
}

async fn acknowledge() {
    println!("Booking finished. Press Enter to close the browser and exit.");
    let read = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)
    })
    .await;
    match read {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => warn!(error = %e, "cannot read from stdin"),
        Err(e) => warn!(error = %e, "stdin reader failed"),
    }
}
