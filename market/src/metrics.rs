//! 指标快照模块。

/// 发布侧运行指标快照。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishMetrics {
	/// 当前持有快照的标的数量。
	pub instruments: usize,
	/// 累计整体替换次数。
	pub updates: u64,
	/// 累计送达的帧数。
	pub frames_pushed: u64,
	/// 当前在线监听者数量。
	pub listeners: usize,
}
