//! 实时状态。
//!
//! 调度器是唯一写者，按标的整体替换；广播任务是唯一读者，
//! 在短暂的读锁内拷贝 `Arc` 引用，随后在锁外序列化。

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::snapshot::SnapshotRow;

pub type InstrumentRows = Arc<Vec<SnapshotRow>>;

#[derive(Debug, Default)]
pub struct LiveState {
	entries: RwLock<HashMap<String, InstrumentRows>>,
	updates: AtomicU64,
}

impl LiveState {
	pub fn new() -> Self {
		Self::default()
	}

	/// 整体替换某个标的的快照，从不做行级修改。
	pub fn replace(&self, instrument: &str, rows: Vec<SnapshotRow>) {
		let rows = Arc::new(rows);
		let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
		guard.insert(instrument.to_string(), rows);
		self.updates.fetch_add(1, Ordering::Relaxed);
	}

	pub fn get(&self, instrument: &str) -> Option<InstrumentRows> {
		let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
		guard.get(instrument).cloned()
	}

	/// 时点一致的只读快照，按标的代码排序。
	pub fn snapshot(&self) -> BTreeMap<String, InstrumentRows> {
		let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
		guard
			.iter()
			.map(|(code, rows)| (code.clone(), Arc::clone(rows)))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// 成功替换的累计次数。
	pub fn updates(&self) -> u64 {
		self.updates.load(Ordering::Relaxed)
	}

	/// 序列化整张映射；为空时返回 `None`。
	pub fn to_json(&self) -> Result<Option<String>, serde_json::Error> {
		let snapshot = self.snapshot();
		if snapshot.is_empty() {
			return Ok(None);
		}
		let view = snapshot
			.iter()
			.map(|(code, rows)| (code.as_str(), rows.as_slice()))
			.collect::<BTreeMap<_, _>>();
		serde_json::to_string(&view).map(Some)
	}
}
