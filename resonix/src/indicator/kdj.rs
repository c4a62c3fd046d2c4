use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::bar::Bar;

use super::core::Indicator;
use super::ema::Ema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdjParams {
    pub n: usize,
    pub m1: usize,
    pub m2: usize,
}

impl Default for KdjParams {
    fn default() -> Self {
        Self { n: 9, m1: 3, m2: 3 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdjValue {
    pub rsv: f64,
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

/// KDJ 随机指标。
///
/// 滚动窗口不足 `n` 根时使用已有 bar（至少一根）。
/// 高低价区间为零时 RSV 无定义，该 bar 的 K/D/J 均为 `None`，
/// 平滑状态跨过该 bar 保持不变。
#[derive(Debug, Clone)]
pub struct Kdj {
    name: String,
    params: KdjParams,
    window: VecDeque<(f64, f64)>,
    k: Ema,
    d: Ema,
}

impl Kdj {
    pub fn new(params: KdjParams) -> Self {
        let params = KdjParams {
            n: params.n.max(1),
            m1: params.m1.max(1),
            m2: params.m2.max(1),
        };
        Self {
            name: format!("kdj_{}_{}_{}", params.n, params.m1, params.m2),
            params,
            window: VecDeque::with_capacity(params.n),
            k: Ema::smoothing("k", params.m1),
            d: Ema::smoothing("d", params.m2),
        }
    }

    pub fn params(&self) -> KdjParams {
        self.params
    }

    fn rsv(&self, close: f64) -> Option<f64> {
        let lowest = self
            .window
            .iter()
            .map(|(_, low)| *low)
            .fold(f64::INFINITY, f64::min);
        let highest = self
            .window
            .iter()
            .map(|(high, _)| *high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = highest - lowest;
        if !(range > 0.0) || !range.is_finite() || !close.is_finite() {
            return None;
        }
        Some((close - lowest) / range * 100.0)
    }
}

impl Indicator for Kdj {
    type Output = Option<KdjValue>;

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.window.clear();
        self.k.reset();
        self.d.reset();
    }

    fn update(&mut self, bar: &Bar) -> Option<KdjValue> {
        self.window.push_back((bar.high_price, bar.low_price));
        while self.window.len() > self.params.n {
            self.window.pop_front();
        }

        let rsv = self.rsv(bar.close_price)?;
        let k = self.k.next(rsv);
        let d = self.d.next(k);
        Some(KdjValue {
            rsv,
            k,
            d,
            j: 3.0 * k - 2.0 * d,
        })
    }
}
