use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use broker::{BarSource, BrokerError};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use market::LiveState;
use resonix::{Bar, Instrument, InstrumentList, SessionState, TradeDate, TradingSession, parse_timezone};
use runtime::{CycleReport, SchedulerSettings, SessionScheduler};
use strategy::{SellThreshold, SignalPipeline, Threshold, ThresholdBook};

/// 按标的返回预设结果的数据源。
#[derive(Clone, Default)]
struct ScriptedSource {
	replies: Arc<Mutex<HashMap<String, Result<Vec<Bar>, BrokerError>>>>,
}

impl ScriptedSource {
	fn set(&self, code: &str, reply: Result<Vec<Bar>, BrokerError>) {
		self.replies.lock().unwrap().insert(code.to_string(), reply);
	}
}

impl BarSource for ScriptedSource {
	fn name(&self) -> &str {
		"scripted"
	}

	async fn fetch(&self, instrument: &str, _date: NaiveDate) -> Result<Vec<Bar>, BrokerError> {
		self.replies
			.lock()
			.unwrap()
			.get(instrument)
			.cloned()
			.unwrap_or_else(|| Err(BrokerError::EmptyData(instrument.to_string())))
	}
}

fn trade_day() -> NaiveDate {
	NaiveDate::from_ymd_opt(2025, 7, 28).unwrap()
}

/// 北京时间 `hour:minute`。
fn local(hour: u32, minute: u32) -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2025, 7, 28, hour - 8, minute, 0).single().unwrap()
}

fn bars(code: &str, start_minute: u32, closes: &[f64]) -> Vec<Bar> {
	closes
		.iter()
		.enumerate()
		.map(|(i, close)| Bar {
			symbol: code.to_string(),
			datetime: local(9, start_minute + i as u32),
			open_price: *close,
			high_price: close + 0.05,
			low_price: close - 0.05,
			close_price: *close,
			volume: 100.0,
			amount: 100.0 * close,
		})
		.collect()
}

fn session() -> TradingSession {
	TradingSession::parse(
		parse_timezone("Asia/Shanghai").unwrap(),
		&["09:30-11:30".to_string(), "13:00-15:00".to_string()],
	)
	.unwrap()
}

fn sell_book() -> ThresholdBook {
	ThresholdBook::default().with_default(Threshold {
		buy: None,
		sell: Some(SellThreshold {
			k_min: 70.0,
			d_min: 60.0,
			j_min: 70.0,
			require_turn_down: false,
		}),
	})
}

fn scheduler(
	source: ScriptedSource,
	codes: &[&str],
	book: ThresholdBook,
	state: Arc<LiveState>,
) -> SessionScheduler<ScriptedSource> {
	SessionScheduler::new(
		source,
		SignalPipeline::with_defaults(book),
		session(),
		TradeDate::Fixed(trade_day()),
		InstrumentList::new(codes.iter().map(|x| Instrument::new(*x)).collect()),
		state,
		SchedulerSettings {
			poll_min: Duration::from_secs(3),
			poll_max: Duration::from_secs(6),
			off_session: Duration::from_secs(60),
		},
	)
}

#[tokio::test]
async fn failing_instrument_keeps_prior_snapshot_and_does_not_block_others() {
	let source = ScriptedSource::default();
	let state = Arc::new(LiveState::new());
	source.set("600000", Ok(bars("600000", 30, &[10.0, 10.3, 10.5])));
	source.set("600038", Ok(bars("600038", 30, &[20.0, 20.1])));
	let mut scheduler = scheduler(source.clone(), &["600000", "600038"], sell_book(), Arc::clone(&state));

	let first = scheduler.run_cycle(local(9, 33)).await;
	assert_eq!(first.updated, 2);
	let before = state.get("600000").expect("first snapshot");
	assert_eq!(before.len(), 3);

	source.set("600000", Err(BrokerError::HttpStatus(502)));
	source.set("600038", Ok(bars("600038", 30, &[20.0, 20.1, 20.2, 20.3])));
	let second = scheduler.run_cycle(local(9, 34)).await;

	assert_eq!(
		second,
		CycleReport {
			state: SessionState::InSession,
			trade_date: trade_day(),
			updated: 1,
			skipped: 0,
			failed: 1,
		}
	);
	let after = state.get("600000").expect("kept snapshot");
	assert!(Arc::ptr_eq(&before, &after));
	assert_eq!(state.get("600038").expect("updated").len(), 4);
}

#[tokio::test]
async fn snapshot_carries_classified_rows() {
	let source = ScriptedSource::default();
	let state = Arc::new(LiveState::new());
	source.set("600038", Ok(bars("600038", 30, &[10.0, 10.3, 10.5])));
	let mut scheduler = scheduler(source.clone(), &["600038"], sell_book(), Arc::clone(&state));

	scheduler.run_cycle(local(9, 33)).await;

	let rows = state.get("600038").expect("snapshot");
	assert_eq!(rows[2].kdj_signal, resonix::Signal::Sell);
	assert!(rows[2].realtime);
	assert_eq!(rows[0].time.to_rfc3339(), "2025-07-28T09:30:00+08:00");
}

#[tokio::test]
async fn off_session_cycle_still_processes() {
	let source = ScriptedSource::default();
	let state = Arc::new(LiveState::new());
	source.set("600038", Ok(bars("600038", 30, &[10.0, 10.1])));
	let mut scheduler = scheduler(source.clone(), &["600038"], sell_book(), Arc::clone(&state));

	let report = scheduler.run_cycle(local(12, 0)).await;

	assert_eq!(report.state, SessionState::OffSession);
	assert_eq!(report.updated, 1);
	assert_eq!(state.len(), 1);
}

#[tokio::test]
async fn bars_outside_session_are_skipped() {
	let source = ScriptedSource::default();
	let state = Arc::new(LiveState::new());
	// 09:20 至 09:22，早于开盘
	source.set("600038", Ok(bars("600038", 20, &[10.0, 10.1, 10.2])));
	let mut scheduler = scheduler(source.clone(), &["600038"], sell_book(), Arc::clone(&state));

	let report = scheduler.run_cycle(local(9, 25)).await;

	assert_eq!(report.skipped, 1);
	assert_eq!(report.updated, 0);
	assert!(state.is_empty());
}

#[tokio::test]
async fn empty_data_counts_as_skipped() {
	let source = ScriptedSource::default();
	let state = Arc::new(LiveState::new());
	let mut scheduler = scheduler(source.clone(), &["000001"], sell_book(), Arc::clone(&state));

	let report = scheduler.run_cycle(local(9, 31)).await;

	assert_eq!((report.updated, report.skipped, report.failed), (0, 1, 0));
}

#[tokio::test]
async fn missing_threshold_counts_as_failed() {
	let source = ScriptedSource::default();
	let state = Arc::new(LiveState::new());
	source.set("600038", Ok(bars("600038", 30, &[10.0, 10.1])));
	let mut scheduler = scheduler(source.clone(), &["600038"], ThresholdBook::default(), Arc::clone(&state));

	let report = scheduler.run_cycle(local(9, 32)).await;

	assert_eq!(report.failed, 1);
	assert!(state.get("600038").is_none());
}

#[test]
fn delay_depends_on_session_state() {
	let scheduler = scheduler(
		ScriptedSource::default(),
		&["600038"],
		sell_book(),
		Arc::new(LiveState::new()),
	);

	assert_eq!(scheduler.next_delay(SessionState::OffSession), Duration::from_secs(60));
	for _ in 0..20 {
		let delay = scheduler.next_delay(SessionState::InSession);
		assert!(delay >= Duration::from_secs(3) && delay <= Duration::from_secs(6));
	}
}

#[test]
fn unvalidated_huge_interval_falls_back_to_default() {
	let text = r#"{
		"stocks": ["600038"],
		"session": {"windows": ["09:30-11:30"]},
		"request": {"interval_sec_min": 2, "interval_sec_max": 1e20},
		"thresholds": {"default": {}}
	}"#;
	let config = config::AppConfig::from_json_str(text).unwrap();

	let settings = SchedulerSettings::from_config(&config);

	assert_eq!(settings.poll_min, Duration::from_secs(2));
	assert_eq!(settings.poll_max, SchedulerSettings::default().poll_max);
}
