//! 离线回放：读取 `<dir>/<code>_<YYYYMMDD>.csv`。
//!
//! 表头为 `time,open,close,high,low,volume,amount`，`time` 为交易所本地时间。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use resonix::{Bar, ExchangeTz};
use serde::Deserialize;

use crate::adapters::parse_local_time;
use crate::error::BrokerError;
use crate::protocol::BarSource;

#[derive(Debug, Deserialize)]
struct CsvRow {
    time: String,
    open: f64,
    close: f64,
    high: f64,
    low: f64,
    #[serde(default)]
    volume: f64,
    #[serde(default)]
    amount: f64,
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
    timezone: ExchangeTz,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>, timezone: ExchangeTz) -> Self {
        Self {
            dir: dir.into(),
            timezone,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, code: &str, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", code, date.format("%Y%m%d")))
    }
}

impl BarSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch(&self, instrument: &str, date: NaiveDate) -> Result<Vec<Bar>, BrokerError> {
        let path = self.path_for(instrument, date);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(BrokerError::EmptyData(instrument.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        parse_csv(instrument, &bytes, &self.timezone)
    }
}

pub fn parse_csv(code: &str, bytes: &[u8], timezone: &ExchangeTz) -> Result<Vec<Bar>, BrokerError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(bytes);
    let mut bars = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row?;
        bars.push(Bar {
            symbol: code.to_string(),
            datetime: parse_local_time(&row.time, timezone)?,
            open_price: row.open,
            high_price: row.high,
            low_price: row.low,
            close_price: row.close,
            volume: row.volume,
            amount: row.amount,
        });
    }
    if bars.is_empty() {
        return Err(BrokerError::EmptyData(code.to_string()));
    }
    bars.sort_by_key(|bar| bar.datetime);
    Ok(bars)
}
