use serde::{Deserialize, Serialize};

use crate::bar::Bar;

use super::core::Indicator;
use super::ema::Ema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 6,
            slow: 13,
            signal: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub dif: f64,
    pub dea: f64,
    pub macd: f64,
}

impl MacdValue {
    pub fn histogram(&self) -> f64 {
        self.dif - self.dea
    }
}

#[derive(Debug, Clone)]
pub struct Macd {
    name: String,
    params: MacdParams,
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new(params: MacdParams) -> Self {
        Self {
            name: format!("macd_{}_{}_{}", params.fast, params.slow, params.signal),
            params,
            fast: Ema::new(params.fast),
            slow: Ema::new(params.slow),
            signal: Ema::new(params.signal),
        }
    }

    pub fn params(&self) -> MacdParams {
        self.params
    }
}

impl Indicator for Macd {
    type Output = Option<MacdValue>;

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
    }

    fn update(&mut self, bar: &Bar) -> Option<MacdValue> {
        let close = Some(bar.close_price).filter(|x| x.is_finite())?;
        let dif = self.fast.next(close) - self.slow.next(close);
        let dea = self.signal.next(dif);
        Some(MacdValue {
            dif,
            dea,
            macd: dif - dea,
        })
    }
}
