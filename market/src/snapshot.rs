//! 对外发布的快照行。
//!
//! 每行对应一根 bar：时间（交易所时区 RFC 3339）、收盘价、KDJ/MACD 指标值、
//! 三列信号与 `realtime` 标记。未定义的指标值序列化为 `null`。

use chrono::{DateTime, FixedOffset};
use resonix::{Combo, ExchangeTz, Signal};
use serde::{Deserialize, Serialize};
use strategy::ClassifiedRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
	pub time: DateTime<FixedOffset>,
	pub close: f64,
	#[serde(rename = "K")]
	pub k: Option<f64>,
	#[serde(rename = "D")]
	pub d: Option<f64>,
	#[serde(rename = "J")]
	pub j: Option<f64>,
	#[serde(rename = "DIF")]
	pub dif: Option<f64>,
	#[serde(rename = "DEA")]
	pub dea: Option<f64>,
	#[serde(rename = "MACD")]
	pub macd: Option<f64>,
	pub kdj_signal: Signal,
	pub macd_signal: Signal,
	pub combo_signal: Combo,
	pub realtime: bool,
}

impl SnapshotRow {
	pub fn from_classified(row: &ClassifiedRow, timezone: &ExchangeTz) -> Self {
		let indicators = &row.row;
		Self {
			time: indicators.bar.local_datetime(timezone),
			close: indicators.bar.close_price,
			k: indicators.k(),
			d: indicators.d(),
			j: indicators.j(),
			dif: indicators.dif(),
			dea: indicators.dea(),
			macd: indicators.macd(),
			kdj_signal: row.kdj_signal,
			macd_signal: row.macd_signal,
			combo_signal: row.combo_signal,
			realtime: row.realtime,
		}
	}
}

/// 将一个标的的整段分类结果投影为快照行。
pub fn project(rows: &[ClassifiedRow], timezone: &ExchangeTz) -> Vec<SnapshotRow> {
	rows.iter()
		.map(|row| SnapshotRow::from_classified(row, timezone))
		.collect()
}
