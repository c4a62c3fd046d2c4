pub mod core;
pub mod ema;
pub mod kdj;
pub mod macd;

pub use core::Indicator;
pub use ema::Ema;
pub use kdj::{Kdj, KdjParams, KdjValue};
pub use macd::{Macd, MacdParams, MacdValue};
