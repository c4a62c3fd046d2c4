//! 交易所时区。
//!
//! 优先按 IANA 名称解析（含夏令时规则），其次接受 `+08:00` / `-0500` 形式的固定偏移。

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constant::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeTz {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ExchangeTz {
    /// UTC 时刻在交易所本地的表示，偏移取该时刻实际生效的值。
    pub fn to_local(&self, datetime: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Named(tz) => datetime.with_timezone(tz).fixed_offset(),
            Self::Fixed(offset) => datetime.with_timezone(offset),
        }
    }

    /// 本地时间转 UTC。回拨产生的重复时刻取较早者；跳过的时刻返回 `None`。
    pub fn from_local(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|x| x.with_timezone(&Utc)),
            Self::Fixed(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|x| x.with_timezone(&Utc)),
        }
    }

    pub fn offset_at(&self, datetime: DateTime<Utc>) -> FixedOffset {
        *self.to_local(datetime).offset()
    }
}

impl From<Tz> for ExchangeTz {
    fn from(value: Tz) -> Self {
        Self::Named(value)
    }
}

impl From<FixedOffset> for ExchangeTz {
    fn from(value: FixedOffset) -> Self {
        Self::Fixed(value)
    }
}

impl Display for ExchangeTz {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(tz) => write!(f, "{}", tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for ExchangeTz {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_timezone(value)
    }
}

pub fn parse_timezone(value: &str) -> Result<ExchangeTz, DataError> {
    let invalid = || DataError::InvalidTimezone(value.to_string());
    let trimmed = value.trim();
    if let Ok(tz) = trimmed.parse::<Tz>() {
        return Ok(ExchangeTz::Named(tz));
    }
    if trimmed == "Z" {
        return Ok(ExchangeTz::Named(Tz::UTC));
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let digits = rest.replace(':', "");
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours = digits[..2].parse::<i32>().map_err(|_| invalid())?;
    let minutes = digits[2..].parse::<i32>().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .map(ExchangeTz::Fixed)
        .ok_or_else(invalid)
}
