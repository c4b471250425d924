//! # engine::ticker
//!
//! Periodic context refresh, one task per asset selection.
//!
//! The task is owned through its `JoinHandle` by `AppState` and aborted on
//! the next selection. It also carries the epoch it was started for and stops
//! by itself once that epoch is no longer current, so a refresh that races
//! with a switch can never overwrite the new asset's context.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::state::SharedState;

pub fn spawn_ticker(state: SharedState, epoch: u64, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; the context was just assembled.
        interval.tick().await;

        loop {
            interval.tick().await;
            if !state.tick(epoch).await {
                debug!(epoch, "Ticker superseded — stopping");
                break;
            }
        }
    })
}
