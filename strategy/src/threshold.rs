use std::collections::HashMap;

use resonix::KdjValue;
use serde::{Deserialize, Serialize};

use crate::error::StrategyError;

/// 买入边界的判定口径。
///
/// `Independent`：K、D、J 各自不超过上限。
/// `KdSum`：`K + D <= k_max + d_max` 且 `J <= j_max`，保留作可选口径。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyRule {
    #[default]
    Independent,
    KdSum,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuyThreshold {
    pub k_max: f64,
    pub d_max: f64,
    pub j_max: f64,
    #[serde(default)]
    pub require_turn_up: bool,
    #[serde(default)]
    pub rule: BuyRule,
}

impl BuyThreshold {
    pub fn bounds_hold(&self, value: &KdjValue) -> bool {
        match self.rule {
            BuyRule::Independent => {
                value.k <= self.k_max && value.d <= self.d_max && value.j <= self.j_max
            }
            BuyRule::KdSum => {
                value.k + value.d <= self.k_max + self.d_max && value.j <= self.j_max
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SellThreshold {
    pub k_min: f64,
    pub d_min: f64,
    pub j_min: f64,
    #[serde(default)]
    pub require_turn_down: bool,
}

impl SellThreshold {
    pub fn bounds_hold(&self, value: &KdjValue) -> bool {
        value.k >= self.k_min && value.d >= self.d_min && value.j >= self.j_min
    }
}

/// 单个标的的 KDJ 阈值。缺省的一侧永不触发。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    #[serde(default)]
    pub buy: Option<BuyThreshold>,
    #[serde(default)]
    pub sell: Option<SellThreshold>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdBook {
    entries: HashMap<String, Threshold>,
}

impl ThresholdBook {
    pub const DEFAULT_KEY: &'static str = "default";

    pub fn new(entries: HashMap<String, Threshold>) -> Self {
        Self { entries }
    }

    pub fn insert(&mut self, key: impl Into<String>, threshold: Threshold) {
        self.entries.insert(key.into(), threshold);
    }

    pub fn with_default(mut self, threshold: Threshold) -> Self {
        self.insert(Self::DEFAULT_KEY, threshold);
        self
    }

    pub fn has_default(&self) -> bool {
        self.entries.contains_key(Self::DEFAULT_KEY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 先查标的代码，再查 `default`。
    pub fn resolve(&self, instrument: &str) -> Result<&Threshold, StrategyError> {
        self.entries
            .get(instrument)
            .or_else(|| self.entries.get(Self::DEFAULT_KEY))
            .ok_or_else(|| StrategyError::MissingThreshold(instrument.to_string()))
    }
}
