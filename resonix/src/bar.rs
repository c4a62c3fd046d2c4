use chrono::{DateTime, FixedOffset, Utc};

use crate::timezone::ExchangeTz;

/// 分钟级 K 线。`datetime` 为该 bar 的收盘时刻。
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub symbol: String,
    pub datetime: DateTime<Utc>,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
    pub amount: f64,
}

impl Bar {
    pub fn local_datetime(&self, timezone: &ExchangeTz) -> DateTime<FixedOffset> {
        timezone.to_local(self.datetime)
    }
}
