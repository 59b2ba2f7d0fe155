//! The single dispatch loop.
//!
//! Events and timer deadlines are interleaved here and nowhere else. The
//! loop reads the clock from tokio so paused-time tests drive it
//! deterministically.

use crate::controller::MatchController;
use crate::event::Event;
use crate::presenter::Presenter;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Current time on tokio's clock.
pub fn clock_now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending::<()>().await,
    }
}

/// Runs until `Quit` arrives or every sender is dropped, then hands the
/// controller back.
pub async fn run<P: Presenter>(
    mut controller: MatchController<P>,
    mut events: mpsc::UnboundedReceiver<Event>,
) -> MatchController<P> {
    info!("Starting match loop");

    loop {
        let deadline = controller.next_deadline();
        tokio::select! {
            event = events.recv() => match event {
                Some(Event::Quit) | None => break,
                Some(event) => controller.handle(event, clock_now()),
            },
            _ = wait_until(deadline) => {
                debug!("Timer deadline reached");
                controller.fire_due(clock_now());
            }
        }
    }

    info!("Match loop finished");
    controller
}
