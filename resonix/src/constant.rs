use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// 单一指标族的交易信号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    None,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::None => "NONE",
        }
    }

    pub fn is_fired(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// KDJ 与 MACD 共振标记。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combo {
    Yes,
    #[default]
    None,
}

impl Combo {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::None => "NONE",
        }
    }

    pub fn is_set(self) -> bool {
        matches!(self, Self::Yes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    InSession,
    OffSession,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InSession => "in_session",
            Self::OffSession => "off_session",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    InvalidSessionWindow(String),
    InvalidTimezone(String),
    InvalidTradeDate(String),
}

pub struct Const;

impl Const {
    pub const RESONANCE_WINDOW_MINUTES: i64 = 5;
    pub const OFF_SESSION_SLEEP_SECS: u64 = 60;
    pub const BROADCAST_PERIOD_MS: u64 = 1000;
    pub const MACD_BAND_WINDOW: usize = 48;
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSessionWindow(v) => write!(f, "invalid session window: {v}"),
            Self::InvalidTimezone(v) => write!(f, "invalid timezone: {v}"),
            Self::InvalidTradeDate(v) => write!(f, "invalid trade date: {v}"),
        }
    }
}

impl std::error::Error for DataError {}
