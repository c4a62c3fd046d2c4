//! 交易时段调度。
//!
//! 每个周期开始时判断时段状态，然后逐个标的独立地拉取、过滤、重建并整体替换快照。
//! 单个标的失败只记日志，不影响同周期其它标的，也不改动它上一次成功发布的快照。
//! 时段状态只决定周期之间的休眠：盘中在 `[min, max]` 内随机，盘外固定 60 秒。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use broker::BarSource;
use chrono::{DateTime, NaiveDate, Utc};
use config::AppConfig;
use market::{project, LiveState};
use rand::Rng;
use resonix::{Const, InstrumentList, SessionState, TradeDate, TradingSession};
use strategy::{ClassifiedRow, SignalPipeline};
use tracing::{debug, info, warn};

use crate::error::RuntimeError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerSettings {
	pub poll_min: Duration,
	pub poll_max: Duration,
	pub off_session: Duration,
}

impl Default for SchedulerSettings {
	fn default() -> Self {
		Self {
			poll_min: Duration::from_secs(3),
			poll_max: Duration::from_secs(6),
			off_session: Duration::from_secs(Const::OFF_SESSION_SLEEP_SECS),
		}
	}
}

impl SchedulerSettings {
	pub fn from_config(config: &AppConfig) -> Self {
		let defaults = Self::default();
		let (min, max) = config.poll_interval_secs();
		let poll_min = Duration::try_from_secs_f64(min.max(0.0)).unwrap_or(defaults.poll_min);
		let poll_max = Duration::try_from_secs_f64(max.max(0.0))
			.unwrap_or(defaults.poll_max)
			.max(poll_min);
		Self {
			poll_min,
			poll_max,
			..defaults
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentOutcome {
	Updated,
	/// 没有当日时段内的 bar。
	Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
	pub state: SessionState,
	pub trade_date: NaiveDate,
	pub updated: usize,
	pub skipped: usize,
	pub failed: usize,
}

pub struct SessionScheduler<S: BarSource> {
	source: S,
	pipeline: SignalPipeline,
	session: TradingSession,
	trade_date: TradeDate,
	instruments: InstrumentList,
	state: Arc<LiveState>,
	settings: SchedulerSettings,
	last_signal_at: HashMap<String, DateTime<Utc>>,
}

impl<S: BarSource> SessionScheduler<S> {
	pub fn new(
		source: S,
		pipeline: SignalPipeline,
		session: TradingSession,
		trade_date: TradeDate,
		instruments: InstrumentList,
		state: Arc<LiveState>,
		settings: SchedulerSettings,
	) -> Self {
		Self {
			source,
			pipeline,
			session,
			trade_date,
			instruments,
			state,
			settings,
			last_signal_at: HashMap::new(),
		}
	}

	pub fn from_config(config: &AppConfig, source: S, state: Arc<LiveState>) -> Result<Self, RuntimeError> {
		Ok(Self::new(
			source,
			config.signal_pipeline(),
			config.trading_session()?,
			config.trade_date()?,
			config.stocks.clone(),
			state,
			SchedulerSettings::from_config(config),
		))
	}

	pub fn state(&self) -> &Arc<LiveState> {
		&self.state
	}

	pub fn session(&self) -> &TradingSession {
		&self.session
	}

	/// 处理一个完整周期。任何单标的错误都被吸收进 `failed` 计数。
	pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> CycleReport {
		let state = self.session.state_at(now);
		let trade_date = self.trade_date.resolve(self.session.local(now));
		let mut report = CycleReport {
			state,
			trade_date,
			updated: 0,
			skipped: 0,
			failed: 0,
		};

		let codes = self
			.instruments
			.codes()
			.into_iter()
			.map(str::to_string)
			.collect::<Vec<_>>();
		for code in codes {
			match self.process_instrument(&code, trade_date, now).await {
				Ok(InstrumentOutcome::Updated) => report.updated += 1,
				Ok(InstrumentOutcome::Skipped) => report.skipped += 1,
				Err(err) => {
					warn!(instrument = %code, error = %err, "instrument cycle failed, keeping last snapshot");
					report.failed += 1;
				}
			}
		}
		report
	}

	pub async fn process_instrument(
		&mut self,
		code: &str,
		trade_date: NaiveDate,
		now: DateTime<Utc>,
	) -> Result<InstrumentOutcome, RuntimeError> {
		let bars = match self.source.fetch(code, trade_date).await {
			Ok(bars) => bars,
			Err(err) if err.is_empty_data() => {
				debug!(instrument = code, "no bars yet");
				return Ok(InstrumentOutcome::Skipped);
			}
			Err(err) => return Err(err.into()),
		};

		let bars = self.session.filter_trading_day(bars, trade_date);
		let Some(last) = bars.last() else {
			debug!(instrument = code, "no in-session bars for trading day");
			return Ok(InstrumentOutcome::Skipped);
		};
		debug!(
			instrument = code,
			latest = %self.session.local(last.datetime),
			delay_secs = (now - last.datetime).num_seconds(),
			"feed delay"
		);

		let rows = self.pipeline.rebuild(code, &bars)?;
		self.log_realtime_signal(code, &rows);
		self.state.replace(code, project(&rows, &self.session.timezone()));
		Ok(InstrumentOutcome::Updated)
	}

	/// 下一个周期前的休眠时长。
	pub fn next_delay(&self, state: SessionState) -> Duration {
		match state {
			SessionState::OffSession => self.settings.off_session,
			SessionState::InSession => {
				let min = self.settings.poll_min.as_secs_f64();
				let max = self.settings.poll_max.as_secs_f64().max(min);
				Duration::from_secs_f64(rand::thread_rng().gen_range(min..=max))
			}
		}
	}

	pub async fn run(mut self) {
		loop {
			let report = self.run_cycle(Utc::now()).await;
			let delay = self.next_delay(report.state);
			info!(
				state = report.state.as_str(),
				trade_date = %report.trade_date,
				updated = report.updated,
				skipped = report.skipped,
				failed = report.failed,
				sleep_ms = delay.as_millis() as u64,
				"cycle done"
			);
			tokio::time::sleep(delay).await;
		}
	}

	/// 实时行变化时记一条 info，同一根 bar 不重复记录。
	fn log_realtime_signal(&mut self, code: &str, rows: &[ClassifiedRow]) {
		let Some(row) = rows.iter().rev().find(|x| x.realtime) else {
			return;
		};
		let at = row.time();
		if self.last_signal_at.get(code) == Some(&at) {
			return;
		}
		self.last_signal_at.insert(code.to_string(), at);
		info!(
			instrument = code,
			time = %self.session.local(at),
			close = row.row.bar.close_price,
			kdj = row.kdj_signal.as_str(),
			macd = row.macd_signal.as_str(),
			combo = row.combo_signal.as_str(),
			"signal"
		);
	}
}
