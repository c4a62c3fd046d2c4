//! 应用配置。
//!
//! 启动时从 JSON 或 YAML 文件（按扩展名区分）加载一次，校验失败直接终止启动。
//! 除 `stocks`、`session.windows`、`thresholds` 外各段都有默认值。

mod error;

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use broker::{EastMoneyConfig, RetryPolicy};
use resonix::{
    parse_timezone, Const, ExchangeTz, IndicatorEngine, InstrumentList, KdjParams, MacdParams, TradeDate,
    TradingSession,
};
use serde::{Deserialize, Serialize};
use strategy::{MacdSignalParams, SignalPipeline, ThresholdBook};

pub use error::ConfigError;

pub const CONFIG_ENV: &str = "RESONIX_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_exchange_tz")]
    pub exchange_tz: String,
    pub windows: Vec<String>,
    /// `auto` 或 `YYYYMMDD` / `YYYY-MM-DD`。
    #[serde(default = "default_trade_date")]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub timeout_sec: f64,
    pub interval_sec_min: f64,
    pub interval_sec_max: f64,
    pub max_retry: u32,
    pub backoff_ms: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_sec: 8.0,
            interval_sec_min: 3.0,
            interval_sec_max: 6.0,
            max_retry: 3,
            backoff_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdBandConfig {
    pub win: usize,
    pub k_std: f64,
}

impl Default for MacdBandConfig {
    fn default() -> Self {
        Self {
            win: Const::MACD_BAND_WINDOW,
            k_std: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdTurnConfig {
    pub ratio: f64,
}

impl Default for MacdTurnConfig {
    fn default() -> Self {
        Self { ratio: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResonanceConfig {
    pub window_minutes: i64,
}

impl Default for ResonanceConfig {
    fn default() -> Self {
        Self {
            window_minutes: Const::RESONANCE_WINDOW_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub push_interval_ms: u64,
    /// 每个监听者可积压的帧数。
    pub channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8765".to_string(),
            push_interval_ms: Const::BROADCAST_PERIOD_MS,
            channel_capacity: 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Eastmoney,
    Csv,
    Mock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub csv_dir: PathBuf,
    pub mock_start_price: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Eastmoney,
            csv_dir: PathBuf::from("data"),
            mock_start_price: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub stocks: InstrumentList,
    pub session: SessionConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub kdj_param: KdjParams,
    #[serde(default)]
    pub macd_param: MacdParams,
    #[serde(default)]
    pub macd_band: MacdBandConfig,
    #[serde(default)]
    pub macd_turn: MacdTurnConfig,
    #[serde(default)]
    pub resonance: ResonanceConfig,
    pub thresholds: ThresholdBook,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

impl AppConfig {
    /// 按扩展名解析并校验配置文件。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|x| x.to_str()) {
            Some("json") => Self::from_json_str(&fs::read_to_string(path)?)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&fs::read_to_string(path)?)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stocks.is_empty() {
            return Err(ConfigError::Invalid("stocks must not be empty".to_string()));
        }
        if self.session.windows.is_empty() {
            return Err(ConfigError::Invalid("session.windows must not be empty".to_string()));
        }
        self.trading_session()?;
        self.trade_date()?;

        let request = &self.request;
        if !(request.timeout_sec > 0.0) {
            return Err(ConfigError::Invalid("request.timeout_sec must be positive".to_string()));
        }
        if !(request.interval_sec_min >= 0.0) || request.interval_sec_min > request.interval_sec_max {
            return Err(ConfigError::Invalid(format!(
                "request interval must satisfy 0 <= min <= max, got {}..{}",
                request.interval_sec_min, request.interval_sec_max
            )));
        }
        for (name, secs) in [
            ("request.timeout_sec", request.timeout_sec),
            ("request.interval_sec_min", request.interval_sec_min),
            ("request.interval_sec_max", request.interval_sec_max),
        ] {
            Duration::try_from_secs_f64(secs)
                .map_err(|_| ConfigError::Invalid(format!("{name} is out of range: {secs}")))?;
        }

        let kdj = &self.kdj_param;
        if kdj.n == 0 || kdj.m1 == 0 || kdj.m2 == 0 {
            return Err(ConfigError::Invalid("kdj_param spans must be positive".to_string()));
        }
        let macd = &self.macd_param;
        if macd.fast == 0 || macd.slow == 0 || macd.signal == 0 {
            return Err(ConfigError::Invalid("macd_param spans must be positive".to_string()));
        }
        if self.macd_band.win == 0 || !(self.macd_band.k_std >= 0.0) {
            return Err(ConfigError::Invalid(
                "macd_band needs win > 0 and k_std >= 0".to_string(),
            ));
        }
        if !(self.macd_turn.ratio >= 0.0) {
            return Err(ConfigError::Invalid("macd_turn.ratio must be >= 0".to_string()));
        }
        if self.resonance.window_minutes < 0 {
            return Err(ConfigError::Invalid(
                "resonance.window_minutes must be >= 0".to_string(),
            ));
        }

        for code in self.stocks.codes() {
            self.thresholds.resolve(code)?;
        }

        self.bind_addr()?;
        if self.server.push_interval_ms == 0 {
            return Err(ConfigError::Invalid("server.push_interval_ms must be positive".to_string()));
        }
        if self.source.kind == SourceKind::Csv && self.source.csv_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("source.csv_dir is required for csv source".to_string()));
        }
        Ok(())
    }

    pub fn timezone(&self) -> Result<ExchangeTz, ConfigError> {
        Ok(parse_timezone(&self.session.exchange_tz)?)
    }

    pub fn trading_session(&self) -> Result<TradingSession, ConfigError> {
        Ok(TradingSession::parse(self.timezone()?, &self.session.windows)?)
    }

    pub fn trade_date(&self) -> Result<TradeDate, ConfigError> {
        Ok(self.session.date.parse::<TradeDate>()?)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid(format!("server.bind {:?} is not host:port", self.server.bind)))
    }

    pub fn poll_interval_secs(&self) -> (f64, f64) {
        (self.request.interval_sec_min, self.request.interval_sec_max)
    }

    pub fn push_interval(&self) -> Duration {
        Duration::from_millis(self.server.push_interval_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.request.max_retry.max(1),
            initial_delay_ms: self.request.backoff_ms,
            ..RetryPolicy::default()
        }
    }

    pub fn eastmoney(&self) -> Result<EastMoneyConfig, ConfigError> {
        let mut config = EastMoneyConfig::new(self.timezone()?);
        if let Ok(timeout) = Duration::try_from_secs_f64(self.request.timeout_sec.max(0.1)) {
            config.timeout = timeout;
        }
        config.retry = self.retry_policy();
        Ok(config)
    }

    pub fn signal_pipeline(&self) -> SignalPipeline {
        SignalPipeline::new(
            IndicatorEngine::new(self.kdj_param, self.macd_param),
            MacdSignalParams {
                win: self.macd_band.win,
                k_std: self.macd_band.k_std,
                ratio: self.macd_turn.ratio,
            },
            chrono::Duration::minutes(self.resonance.window_minutes.max(0)),
            self.thresholds.clone(),
        )
    }
}

/// 配置文件路径：命令行第一个参数，其次 `RESONIX_CONFIG`，最后 `config.json`。
pub fn resolve_config_path(arg: Option<String>, env: Option<String>) -> PathBuf {
    let given = |x: &String| !x.trim().is_empty();
    arg.filter(given)
        .or(env.filter(given))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn config_path_from_env() -> PathBuf {
    resolve_config_path(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok())
}

fn default_exchange_tz() -> String {
    "Asia/Shanghai".to_string()
}

fn default_trade_date() -> String {
    "auto".to_string()
}
