//! 东方财富 push2his 分钟 K 线。
//!
//! `klt=1` 为 1 分钟，`fqt=0` 为不复权。返回的时间是该分钟的结束时刻（交易所本地时间）。

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use resonix::{Bar, ExchangeTz};
use serde::Deserialize;

use crate::adapters::{parse_local_time, parse_price};
use crate::error::BrokerError;
use crate::protocol::BarSource;
use crate::retry::RetryPolicy;

pub const KLINE_URL: &str = "https://push2his.eastmoney.com/api/qt/stock/kline/get";

const EM_REFERER: &str = "https://quote.eastmoney.com/";
const EM_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct EastMoneyConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub timezone: ExchangeTz,
}

impl EastMoneyConfig {
    pub fn new(timezone: ExchangeTz) -> Self {
        Self {
            base_url: KLINE_URL.to_string(),
            timeout: Duration::from_secs(8),
            retry: RetryPolicy::default(),
            timezone,
        }
    }
}

#[derive(Debug, Deserialize)]
struct KlineResponse {
    data: Option<KlineData>,
}

#[derive(Debug, Deserialize)]
struct KlineData {
    #[serde(default)]
    klines: Vec<String>,
}

pub struct EastMoneySource {
    client: reqwest::Client,
    config: EastMoneyConfig,
}

impl EastMoneySource {
    pub fn new(config: EastMoneyConfig) -> Result<Self, BrokerError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(EM_REFERER));
        headers.insert(USER_AGENT, HeaderValue::from_static(EM_USER_AGENT));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EastMoneyConfig {
        &self.config
    }

    async fn fetch_once(&self, code: &str, date: NaiveDate) -> Result<Vec<Bar>, BrokerError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&kline_query(code, date))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BrokerError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await?;
        parse_response(code, &body, &self.config.timezone)
    }
}

impl BarSource for EastMoneySource {
    fn name(&self) -> &str {
        "eastmoney"
    }

    async fn fetch(&self, instrument: &str, date: NaiveDate) -> Result<Vec<Bar>, BrokerError> {
        self.config
            .retry
            .run(instrument, move || self.fetch_once(instrument, date))
            .await
    }
}

/// 6 开头为沪市（`1.`），其余为深市（`0.`）。
pub fn secid(code: &str) -> String {
    if code.starts_with('6') {
        format!("1.{}", code)
    } else {
        format!("0.{}", code)
    }
}

pub fn kline_query(code: &str, date: NaiveDate) -> Vec<(&'static str, String)> {
    let day = date.format("%Y%m%d").to_string();
    vec![
        ("secid", secid(code)),
        ("klt", "1".to_string()),
        ("fqt", "0".to_string()),
        ("beg", day.clone()),
        ("end", day),
        ("fields1", "f1,f2,f3,f4,f5,f6".to_string()),
        ("fields2", "f51,f52,f53,f54,f55,f56,f57,f58,f59,f60,f61".to_string()),
    ]
}

/// 解析 `"时间,开,收,高,低,量,额,..."`。
pub fn parse_kline(code: &str, line: &str, timezone: &ExchangeTz) -> Result<Bar, BrokerError> {
    let fields = line.split(',').collect::<Vec<_>>();
    if fields.len() < 7 {
        return Err(BrokerError::Malformed(format!("short kline {:?}", line)));
    }
    Ok(Bar {
        symbol: code.to_string(),
        datetime: parse_local_time(fields[0], timezone)?,
        open_price: parse_price(fields[1], "open")?,
        close_price: parse_price(fields[2], "close")?,
        high_price: parse_price(fields[3], "high")?,
        low_price: parse_price(fields[4], "low")?,
        volume: parse_price(fields[5], "volume")?,
        amount: parse_price(fields[6], "amount")?,
    })
}

/// 解析接口返回体；`data` 为 `null` 或 `klines` 为空都视为无数据。
pub fn parse_response(code: &str, body: &str, timezone: &ExchangeTz) -> Result<Vec<Bar>, BrokerError> {
    let response = serde_json::from_str::<KlineResponse>(body)
        .map_err(|e| BrokerError::Malformed(format!("kline body: {}", e)))?;
    let klines = response.data.map(|x| x.klines).unwrap_or_default();
    parse_klines(code, &klines, timezone)
}

pub fn parse_klines(code: &str, lines: &[String], timezone: &ExchangeTz) -> Result<Vec<Bar>, BrokerError> {
    if lines.is_empty() {
        return Err(BrokerError::EmptyData(code.to_string()));
    }
    let mut bars = lines
        .iter()
        .map(|line| parse_kline(code, line, timezone))
        .collect::<Result<Vec<_>, _>>()?;
    bars.sort_by_key(|bar| bar.datetime);
    Ok(bars)
}
