//! 广播任务：按固定周期把整张 `LiveState` 推给所有监听者，与调度器节奏无关。

use std::time::Duration;

use market::Publisher;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

pub async fn run_broadcast(publisher: Publisher, period: Duration) {
	let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
	ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
	loop {
		ticker.tick().await;
		match publisher.tick() {
			Ok(Some(receivers)) => {
				let metrics = publisher.metrics();
				debug!(
					receivers,
					instruments = metrics.instruments,
					updates = metrics.updates,
					frames_pushed = metrics.frames_pushed,
					"snapshot pushed"
				);
			}
			Ok(None) => {}
			Err(err) => warn!(error = %err, "snapshot serialization failed"),
		}
	}
}

pub fn spawn_broadcast(publisher: Publisher, period: Duration) -> JoinHandle<()> {
	tokio::spawn(run_broadcast(publisher, period))
}
