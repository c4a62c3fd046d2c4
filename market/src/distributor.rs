//! 分发模块（fan-out）。
//!
//! 单一 tokio broadcast 通道，把序列化后的快照推给所有在线监听者。
//! 监听者可随时加入或离开；没有接收者时发布不是错误。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// 推送给监听者的一帧（完整 JSON 文本）。
pub type Frame = Arc<str>;

#[derive(Debug)]
pub struct Distributor {
	sender: broadcast::Sender<Frame>,
	frames_pushed: AtomicU64,
}

impl Distributor {
	/// 创建分发器。`channel_capacity` 为每个监听者可积压的帧数。
	pub fn new(channel_capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(channel_capacity.max(1));
		Self {
			sender,
			frames_pushed: AtomicU64::new(0),
		}
	}

	pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
		self.sender.subscribe()
	}

	/// 广播一帧，返回收到该帧的监听者数量。
	pub fn publish(&self, frame: Frame) -> usize {
		match self.sender.send(frame) {
			Ok(receivers) => {
				self.frames_pushed.fetch_add(1, Ordering::Relaxed);
				receivers
			}
			Err(_) => 0,
		}
	}

	pub fn subscriber_count(&self) -> usize {
		self.sender.receiver_count()
	}

	/// 至少送达一个监听者的帧数。
	pub fn frames_pushed(&self) -> u64 {
		self.frames_pushed.load(Ordering::Relaxed)
	}
}

impl Default for Distributor {
	fn default() -> Self {
		Self::new(64)
	}
}
