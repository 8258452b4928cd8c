//! Tick task
//!
//! Owns the controller. Each tick drains pending input, then advances the
//! schedule, every control and the report journal.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::info;

use crate::controller::Controller;
use crate::tasks::input::InputEvent;

/// Run the tick loop until `shutdown` resolves
pub async fn tick_task(
    mut controller: Controller,
    mut input: mpsc::Receiver<InputEvent>,
    interval_ms: u64,
    shutdown: impl Future<Output = ()>,
) -> Controller {
    info!("Tick task started ({} ms)", interval_ms);

    let start = Instant::now();
    let mut ticker = time::interval(Duration::from_millis(interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    controller.start();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                while let Ok(event) = input.try_recv() {
                    controller.handle_input(event);
                }
                controller.tick(elapsed_ms(start));
            }
        }
    }

    controller.shutdown(elapsed_ms(start));
    controller
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
