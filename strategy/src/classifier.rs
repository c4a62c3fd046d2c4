use resonix::{Const, IndicatorRow, KdjValue, MacdValue, Signal};
use resonix::utils::mean_and_std;
use serde::{Deserialize, Serialize};

use crate::threshold::Threshold;

/// KDJ 信号：先判买，再判卖，都不满足为 NONE。
///
/// 拐头条件只比较 J；上一根没有 J 时拐头条件视为不满足。
pub fn classify_kdj(
    current: Option<KdjValue>,
    previous: Option<KdjValue>,
    threshold: &Threshold,
) -> Signal {
    let Some(current) = current else {
        return Signal::None;
    };
    let previous_j = previous.map(|x| x.j);

    if let Some(buy) = &threshold.buy {
        let turned_up = previous_j.is_some_and(|prev| current.j > prev);
        if buy.bounds_hold(&current) && (!buy.require_turn_up || turned_up) {
            return Signal::Buy;
        }
    }

    if let Some(sell) = &threshold.sell {
        let turned_down = previous_j.is_some_and(|prev| current.j < prev);
        if sell.bounds_hold(&current) && (!sell.require_turn_down || turned_down) {
            return Signal::Sell;
        }
    }

    Signal::None
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdSignalParams {
    /// 高低轨统计窗口（含当前 bar）。
    pub win: usize,
    pub k_std: f64,
    /// 柱体拐头幅度相对上一根柱体绝对值的最小比例。
    pub ratio: f64,
}

impl Default for MacdSignalParams {
    fn default() -> Self {
        Self {
            win: Const::MACD_BAND_WINDOW,
            k_std: 1.0,
            ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdBand {
    pub mean: f64,
    pub std: f64,
    pub high: f64,
    pub low: f64,
}

/// 以窗口内 DIF、DEA 合并后的均值与标准差构造高低轨。
pub fn macd_band(tail: &[IndicatorRow], k_std: f64) -> Option<MacdBand> {
    let pooled = tail
        .iter()
        .filter_map(|row| row.macd)
        .flat_map(|x| [x.dif, x.dea])
        .filter(|x| x.is_finite())
        .collect::<Vec<_>>();
    let (mean, std) = mean_and_std(&pooled)?;
    Some(MacdBand {
        mean,
        std,
        high: mean + k_std * std,
        low: mean - k_std * std,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdTurn {
    Up,
    Down,
    Flat,
}

pub fn macd_turn(previous: Option<MacdValue>, current: Option<MacdValue>, ratio: f64) -> MacdTurn {
    let (Some(previous), Some(current)) = (previous, current) else {
        return MacdTurn::Flat;
    };
    let prev_hist = previous.histogram();
    let delta = current.histogram() - prev_hist;
    let required = ratio * prev_hist.abs();

    if prev_hist < 0.0 && delta > 0.0 && delta >= required {
        MacdTurn::Up
    } else if prev_hist > 0.0 && delta < 0.0 && -delta >= required {
        MacdTurn::Down
    } else {
        MacdTurn::Flat
    }
}

/// 第 `index` 根 bar 的 MACD 信号：低轨下方上拐为 BUY，高轨上方下拐为 SELL。
pub fn classify_macd(rows: &[IndicatorRow], index: usize, params: &MacdSignalParams) -> Signal {
    let Some(current) = rows.get(index).and_then(|row| row.macd) else {
        return Signal::None;
    };
    let previous = index
        .checked_sub(1)
        .and_then(|i| rows.get(i))
        .and_then(|row| row.macd);
    let start = (index + 1).saturating_sub(params.win.max(1));
    let Some(band) = macd_band(&rows[start..=index], params.k_std) else {
        return Signal::None;
    };

    match macd_turn(previous, Some(current), params.ratio) {
        MacdTurn::Up if current.dif < band.low && current.dea < band.low => Signal::Buy,
        MacdTurn::Down if current.dif > band.high && current.dea > band.high => Signal::Sell,
        _ => Signal::None,
    }
}
