//! 指标引擎。
//!
//! 对一整个交易日的 bar 序列做纯函数计算：每次调用都新建 KDJ/MACD 状态，
//! 相同输入必然得到相同输出，轮询之间不保留任何指标状态。

use crate::bar::Bar;
use crate::indicator::{Indicator, Kdj, KdjParams, KdjValue, Macd, MacdParams, MacdValue};

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub bar: Bar,
    pub kdj: Option<KdjValue>,
    pub macd: Option<MacdValue>,
}

impl IndicatorRow {
    pub fn k(&self) -> Option<f64> {
        self.kdj.map(|x| x.k)
    }

    pub fn d(&self) -> Option<f64> {
        self.kdj.map(|x| x.d)
    }

    pub fn j(&self) -> Option<f64> {
        self.kdj.map(|x| x.j)
    }

    pub fn dif(&self) -> Option<f64> {
        self.macd.map(|x| x.dif)
    }

    pub fn dea(&self) -> Option<f64> {
        self.macd.map(|x| x.dea)
    }

    pub fn macd(&self) -> Option<f64> {
        self.macd.map(|x| x.macd)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorEngine {
    kdj: KdjParams,
    macd: MacdParams,
}

impl IndicatorEngine {
    pub fn new(kdj: KdjParams, macd: MacdParams) -> Self {
        Self { kdj, macd }
    }

    pub fn kdj_params(&self) -> KdjParams {
        self.kdj
    }

    pub fn macd_params(&self) -> MacdParams {
        self.macd
    }

    pub fn compute(&self, bars: &[Bar]) -> Vec<IndicatorRow> {
        let mut kdj = Kdj::new(self.kdj);
        let mut macd = Macd::new(self.macd);
        bars.iter()
            .map(|bar| IndicatorRow {
                bar: bar.clone(),
                kdj: kdj.update(bar),
                macd: macd.update(bar),
            })
            .collect()
    }
}
