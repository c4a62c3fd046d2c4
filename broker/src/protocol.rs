use std::future::Future;

use chrono::NaiveDate;
use resonix::Bar;

use crate::error::BrokerError;

/// 分钟 K 线数据源。
///
/// 返回的 bar 按时间升序，时间戳为该 bar 的收盘时刻。
pub trait BarSource: Send + Sync {
    fn name(&self) -> &str;

    fn fetch(
        &self,
        instrument: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Bar>, BrokerError>> + Send;
}
