pub mod eastmoney;
pub mod mock;
pub mod replay;

use chrono::{DateTime, NaiveDateTime, Utc};
use resonix::{Bar, ExchangeTz};

use crate::error::BrokerError;
use crate::protocol::BarSource;

pub use eastmoney::{EastMoneyConfig, EastMoneySource};
pub use mock::MockSource;
pub use replay::CsvSource;

/// 按配置选择的数据源。
pub enum AnySource {
    EastMoney(EastMoneySource),
    Csv(CsvSource),
    Mock(MockSource),
}

impl BarSource for AnySource {
    fn name(&self) -> &str {
        match self {
            AnySource::EastMoney(source) => source.name(),
            AnySource::Csv(source) => source.name(),
            AnySource::Mock(source) => source.name(),
        }
    }

    async fn fetch(&self, instrument: &str, date: chrono::NaiveDate) -> Result<Vec<Bar>, BrokerError> {
        match self {
            AnySource::EastMoney(source) => source.fetch(instrument, date).await,
            AnySource::Csv(source) => source.fetch(instrument, date).await,
            AnySource::Mock(source) => source.fetch(instrument, date).await,
        }
    }
}

/// 解析交易所本地时间 `YYYY-MM-DD HH:MM[:SS]`。
pub(crate) fn parse_local_time(text: &str, timezone: &ExchangeTz) -> Result<DateTime<Utc>, BrokerError> {
    let text = text.trim();
    let naive = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .ok_or_else(|| BrokerError::Malformed(format!("bad bar time {:?}", text)))?;
    timezone
        .from_local(&naive)
        .ok_or_else(|| BrokerError::Malformed(format!("nonexistent local bar time {:?}", text)))
}

pub(crate) fn parse_price(field: &str, name: &str) -> Result<f64, BrokerError> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| BrokerError::Malformed(format!("bad {} value {:?}", name, field)))
}
