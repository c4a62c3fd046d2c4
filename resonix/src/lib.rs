pub mod bar;
pub mod constant;
pub mod engine;
pub mod indicator;
pub mod logging;
pub mod session;
pub mod symbol;
pub mod timezone;
pub mod utils;

pub use bar::Bar;
pub use constant::{Combo, Const, DataError, SessionState, Signal};
pub use engine::{IndicatorEngine, IndicatorRow};
pub use indicator::{Ema, Indicator, Kdj, KdjParams, KdjValue, Macd, MacdParams, MacdValue};
pub use logging::init_logging;
pub use session::{SessionWindow, TradeDate, TradingSession};
pub use symbol::{Instrument, InstrumentList};
pub use timezone::{parse_timezone, ExchangeTz};
