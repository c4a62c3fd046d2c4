mod classifier;
mod error;
mod resonance;
mod threshold;

use chrono::Duration;
use resonix::{Bar, IndicatorEngine, KdjParams, MacdParams};

pub use classifier::{
	classify_kdj, classify_macd, macd_band, macd_turn, MacdBand, MacdSignalParams, MacdTurn,
};
pub use error::StrategyError;
pub use resonance::{
	mark_realtime, ClassifiedRow, ResonanceCorrelator, ResonanceHit, ResonanceState,
};
pub use threshold::{BuyRule, BuyThreshold, SellThreshold, Threshold, ThresholdBook};

/// 单标的的全量信号重建。
///
/// 每次轮询都对当日全部 bar 重新计算，不依赖上一轮的任何状态。
#[derive(Debug, Clone)]
pub struct SignalPipeline {
	engine: IndicatorEngine,
	macd_signal: MacdSignalParams,
	resonance: ResonanceCorrelator,
	thresholds: ThresholdBook,
}

impl SignalPipeline {
	pub fn new(
		engine: IndicatorEngine,
		macd_signal: MacdSignalParams,
		resonance_window: Duration,
		thresholds: ThresholdBook,
	) -> Self {
		Self {
			engine,
			macd_signal,
			resonance: ResonanceCorrelator::new(resonance_window),
			thresholds,
		}
	}

	pub fn with_defaults(thresholds: ThresholdBook) -> Self {
		Self {
			engine: IndicatorEngine::new(KdjParams::default(), MacdParams::default()),
			macd_signal: MacdSignalParams::default(),
			resonance: ResonanceCorrelator::default(),
			thresholds,
		}
	}

	pub fn engine(&self) -> &IndicatorEngine {
		&self.engine
	}

	pub fn thresholds(&self) -> &ThresholdBook {
		&self.thresholds
	}

	pub fn rebuild(&self, instrument: &str, bars: &[Bar]) -> Result<Vec<ClassifiedRow>, StrategyError> {
		let threshold = self.thresholds.resolve(instrument)?;
		let rows = self.engine.compute(bars);

		let mut classified = self.resonance.scan(&rows, |index| {
			let previous = index.checked_sub(1).and_then(|i| rows[i].kdj);
			let kdj = classify_kdj(rows[index].kdj, previous, threshold);
			let macd = classify_macd(&rows, index, &self.macd_signal);
			(kdj, macd)
		});
		mark_realtime(&mut classified);
		Ok(classified)
	}
}
