//! 交易时段。
//!
//! 时段以 `"HH:MM-HH:MM"` 描述，两端均为闭区间：`09:30-11:30` 包含 `11:30:00`，
//! 不包含 `11:30:01`。所有判断都在交易所时区的本地时间上进行。

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::bar::Bar;
use crate::constant::{DataError, SessionState};
use crate::timezone::ExchangeTz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SessionWindow {
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

impl FromStr for SessionWindow {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DataError::InvalidSessionWindow(value.to_string());
        let (start, end) = value.trim().split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").map_err(|_| invalid())?;
        if end < start {
            return Err(invalid());
        }
        Ok(Self { start, end })
    }
}

impl Display for SessionWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingSession {
    timezone: ExchangeTz,
    windows: Vec<SessionWindow>,
}

impl TradingSession {
    pub fn new(timezone: ExchangeTz, mut windows: Vec<SessionWindow>) -> Self {
        windows.sort_by_key(|w| w.start);
        Self { timezone, windows }
    }

    pub fn parse(timezone: ExchangeTz, sections: &[String]) -> Result<Self, DataError> {
        let windows = sections
            .iter()
            .map(|x| x.parse::<SessionWindow>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(timezone, windows))
    }

    pub fn timezone(&self) -> ExchangeTz {
        self.timezone
    }

    pub fn windows(&self) -> &[SessionWindow] {
        &self.windows
    }

    pub fn local(&self, datetime: DateTime<Utc>) -> DateTime<FixedOffset> {
        self.timezone.to_local(datetime)
    }

    pub fn contains_time(&self, time: NaiveTime) -> bool {
        self.windows.iter().any(|w| w.contains(time))
    }

    pub fn contains(&self, datetime: DateTime<Utc>) -> bool {
        self.contains_time(self.local(datetime).time())
    }

    pub fn state_at(&self, datetime: DateTime<Utc>) -> SessionState {
        if self.contains(datetime) {
            SessionState::InSession
        } else {
            SessionState::OffSession
        }
    }

    /// 过滤出指定交易日、且落在交易时段内的 bar，按时间排序并去重（同一时刻保留后到者）。
    pub fn filter_trading_day(&self, bars: Vec<Bar>, day: NaiveDate) -> Vec<Bar> {
        let mut kept = bars
            .into_iter()
            .filter(|bar| {
                let local = self.local(bar.datetime);
                local.date_naive() == day && self.contains_time(local.time())
            })
            .collect::<Vec<_>>();
        kept.sort_by_key(|bar| bar.datetime);

        let mut out: Vec<Bar> = Vec::with_capacity(kept.len());
        for bar in kept {
            match out.last_mut() {
                Some(last) if last.datetime == bar.datetime => *last = bar,
                _ => out.push(bar),
            }
        }
        out
    }
}

/// 交易日：`auto` 表示交易所时区的当天。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeDate {
    #[default]
    Auto,
    Fixed(NaiveDate),
}

impl TradeDate {
    pub fn resolve(&self, now: DateTime<FixedOffset>) -> NaiveDate {
        match self {
            Self::Auto => now.date_naive(),
            Self::Fixed(date) => *date,
        }
    }
}

impl FromStr for TradeDate {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        ["%Y%m%d", "%Y-%m-%d"]
            .iter()
            .find_map(|pattern| NaiveDate::parse_from_str(value, pattern).ok())
            .map(Self::Fixed)
            .ok_or_else(|| DataError::InvalidTradeDate(value.to_string()))
    }
}
