use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use resonix::{Bar, ExchangeTz, SessionWindow};

use crate::{BarSource, BrokerError};

/// 确定性的合成分钟线，同一 `(code, date)` 总是得到同一条价格路径。
#[derive(Debug, Clone)]
pub struct MockSource {
    timezone: ExchangeTz,
    windows: Vec<SessionWindow>,
    start_price: f64,
    seed: u64,
}

impl MockSource {
    pub fn new(timezone: ExchangeTz, windows: Vec<SessionWindow>, start_price: f64) -> Self {
        Self {
            timezone,
            windows,
            start_price,
            seed: 7,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// 生成 `date` 当天各时段内的分钟线；`until` 给定时只生成不晚于该时刻的 bar。
    pub fn generate(&self, code: &str, date: NaiveDate, until: Option<NaiveTime>) -> Vec<Bar> {
        let seed = code
            .bytes()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
            ^ date.num_days_from_ce() as u64;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut price = self.start_price;
        let mut bars = Vec::new();

        for window in &self.windows {
            let mut minute = window.start;
            while minute <= window.end && until.is_none_or(|cutoff| minute <= cutoff) {
                let next = minute + Duration::minutes(1);
                let Some(datetime) = self.timezone.from_local(&date.and_time(minute)) else {
                    // 夏令时跳过的本地分钟
                    if next <= minute {
                        break;
                    }
                    minute = next;
                    continue;
                };
                let open = price;
                let close = (open * (1.0 + rng.gen_range(-0.003..=0.003))).max(0.01);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.001));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.001));
                let volume = rng.gen_range(100.0..2000.0_f64).round();
                bars.push(Bar {
                    symbol: code.to_string(),
                    datetime,
                    open_price: open,
                    high_price: high,
                    low_price: low,
                    close_price: close,
                    volume,
                    amount: volume * close,
                });
                price = close;

                if next <= minute {
                    break;
                }
                minute = next;
            }
        }
        bars
    }
}

impl BarSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, instrument: &str, date: NaiveDate) -> Result<Vec<Bar>, BrokerError> {
        let now = self.timezone.to_local(Utc::now());
        let until = (now.date_naive() == date).then(|| now.time());
        let bars = self.generate(instrument, date, until);
        if bars.is_empty() {
            return Err(BrokerError::EmptyData(instrument.to_string()));
        }
        Ok(bars)
    }
}
