use broker::BrokerError;
use config::ConfigError;
use strategy::StrategyError;

#[derive(Debug)]
pub enum RuntimeError {
	Config(ConfigError),
	Broker(BrokerError),
	Strategy(StrategyError),
	Io(std::io::Error),
	/// 常驻任务意外退出。
	TaskEnded(String),
}

impl std::fmt::Display for RuntimeError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RuntimeError::Config(err) => write!(f, "{}", err),
			RuntimeError::Broker(err) => write!(f, "{}", err),
			RuntimeError::Strategy(err) => write!(f, "{}", err),
			RuntimeError::Io(err) => write!(f, "io error: {}", err),
			RuntimeError::TaskEnded(name) => write!(f, "{} task ended unexpectedly", name),
		}
	}
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
	fn from(value: ConfigError) -> Self {
		RuntimeError::Config(value)
	}
}

impl From<BrokerError> for RuntimeError {
	fn from(value: BrokerError) -> Self {
		RuntimeError::Broker(value)
	}
}

impl From<StrategyError> for RuntimeError {
	fn from(value: StrategyError) -> Self {
		RuntimeError::Strategy(value)
	}
}

impl From<std::io::Error> for RuntimeError {
	fn from(value: std::io::Error) -> Self {
		RuntimeError::Io(value)
	}
}
