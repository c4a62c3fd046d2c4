//! `Publisher`：聚合 `LiveState` 与 `Distributor`，供广播任务每个周期调用一次。

use std::sync::Arc;

use crate::{Distributor, Frame, LiveState, PublishMetrics};

#[derive(Debug, Clone)]
pub struct Publisher {
	state: Arc<LiveState>,
	distributor: Arc<Distributor>,
}

impl Publisher {
	pub fn new(state: Arc<LiveState>, distributor: Arc<Distributor>) -> Self {
		Self { state, distributor }
	}

	pub fn state(&self) -> &Arc<LiveState> {
		&self.state
	}

	pub fn distributor(&self) -> &Arc<Distributor> {
		&self.distributor
	}

	/// 状态非空时序列化并推送整张映射。
	///
	/// 返回 `Some(接收者数量)`；状态为空时返回 `None`，不推送。
	pub fn tick(&self) -> Result<Option<usize>, serde_json::Error> {
		let Some(payload) = self.state.to_json()? else {
			return Ok(None);
		};
		let frame: Frame = Arc::from(payload);
		Ok(Some(self.distributor.publish(frame)))
	}

	pub fn metrics(&self) -> PublishMetrics {
		PublishMetrics {
			instruments: self.state.len(),
			updates: self.state.updates(),
			frames_pushed: self.distributor.frames_pushed(),
			listeners: self.distributor.subscriber_count(),
		}
	}
}
