//! KDJ 与 MACD 共振。
//!
//! 顺序扫描一个交易日的行：任一指标触发（BUY 或 SELL 都算）时记录它的最近触发时刻；
//! 当某个指标在 `t` 触发，而另一个指标最近一次触发时刻 `t'` 满足 `0 <= t - t' <= 窗口`，
//! 当前行与 `t'` 所在行都记为 YES。共振不区分方向。

use chrono::{DateTime, Duration, Utc};
use resonix::{Combo, Const, IndicatorRow, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub row: IndicatorRow,
    pub kdj_signal: Signal,
    pub macd_signal: Signal,
    pub combo_signal: Combo,
    pub realtime: bool,
}

impl ClassifiedRow {
    pub fn time(&self) -> DateTime<Utc> {
        self.row.bar.datetime
    }

    pub fn has_signal(&self) -> bool {
        self.kdj_signal.is_fired() || self.macd_signal.is_fired() || self.combo_signal.is_set()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResonanceHit {
    pub combo: Combo,
    /// 当前 KDJ 触发时，配对的 MACD 行。
    pub macd_partner: Option<usize>,
    /// 当前 MACD 触发时，配对的 KDJ 行。
    pub kdj_partner: Option<usize>,
}

impl ResonanceHit {
    pub fn partners(&self) -> impl Iterator<Item = usize> {
        self.macd_partner.into_iter().chain(self.kdj_partner)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResonanceState {
    last_kdj: Option<(usize, DateTime<Utc>)>,
    last_macd: Option<(usize, DateTime<Utc>)>,
}

impl ResonanceState {
    pub fn observe(
        &mut self,
        index: usize,
        time: DateTime<Utc>,
        kdj: Signal,
        macd: Signal,
        window: Duration,
    ) -> ResonanceHit {
        if kdj.is_fired() {
            self.last_kdj = Some((index, time));
        }
        if macd.is_fired() {
            self.last_macd = Some((index, time));
        }

        let within = |last: Option<(usize, DateTime<Utc>)>| {
            last.filter(|(_, at)| {
                let gap = time - *at;
                gap >= Duration::zero() && gap <= window
            })
            .map(|(i, _)| i)
        };
        let macd_partner = if kdj.is_fired() { within(self.last_macd) } else { None };
        let kdj_partner = if macd.is_fired() { within(self.last_kdj) } else { None };

        if macd_partner.is_none() && kdj_partner.is_none() {
            return ResonanceHit::default();
        }
        ResonanceHit {
            combo: Combo::Yes,
            macd_partner: macd_partner.filter(|i| *i != index),
            kdj_partner: kdj_partner.filter(|i| *i != index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResonanceCorrelator {
    window: Duration,
}

impl Default for ResonanceCorrelator {
    fn default() -> Self {
        Self::with_minutes(Const::RESONANCE_WINDOW_MINUTES)
    }
}

impl ResonanceCorrelator {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn with_minutes(minutes: i64) -> Self {
        Self::new(Duration::minutes(minutes.max(0)))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 逐行调用 `classify` 得到 `(kdj, macd)` 信号，并顺带完成共振标记。
    pub fn scan<F>(&self, rows: &[IndicatorRow], mut classify: F) -> Vec<ClassifiedRow>
    where
        F: FnMut(usize) -> (Signal, Signal),
    {
        let (out, _) = rows.iter().enumerate().fold(
            (Vec::<ClassifiedRow>::with_capacity(rows.len()), ResonanceState::default()),
            |(mut out, mut state), (index, row)| {
                let (kdj_signal, macd_signal) = classify(index);
                let hit = state.observe(index, row.bar.datetime, kdj_signal, macd_signal, self.window);
                for partner in hit.partners() {
                    if let Some(earlier) = out.get_mut(partner) {
                        earlier.combo_signal = Combo::Yes;
                    }
                }
                out.push(ClassifiedRow {
                    row: row.clone(),
                    kdj_signal,
                    macd_signal,
                    combo_signal: hit.combo,
                    realtime: false,
                });
                (out, state)
            },
        );
        out
    }
}

/// 将时间等于最近一次 KDJ/MACD/共振信号时刻（三者取最大）的行标为实时。
pub fn mark_realtime(rows: &mut [ClassifiedRow]) -> Option<DateTime<Utc>> {
    let latest_of = |pred: fn(&ClassifiedRow) -> bool| {
        rows.iter().rev().find(|row| pred(row)).map(ClassifiedRow::time)
    };
    let latest = [
        latest_of(|row| row.kdj_signal.is_fired()),
        latest_of(|row| row.macd_signal.is_fired()),
        latest_of(|row| row.combo_signal.is_set()),
    ]
    .into_iter()
    .flatten()
    .max();

    for row in rows.iter_mut() {
        row.realtime = latest.is_some_and(|at| row.time() == at);
    }
    latest
}
