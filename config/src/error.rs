use resonix::DataError;
use strategy::StrategyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    UnsupportedFormat(String),
    Invalid(String),
    /// 标的既没有专属阈值，也没有 `default`。
    MissingThreshold(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "cannot read config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "cannot parse config: {}", msg),
            ConfigError::UnsupportedFormat(path) => {
                write!(f, "unsupported config format: {} (expected .json, .yaml or .yml)", path)
            }
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
            ConfigError::MissingThreshold(code) => {
                write!(f, "no threshold for instrument {} and no default entry", code)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        ConfigError::Parse(value.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        ConfigError::Parse(value.to_string())
    }
}

impl From<DataError> for ConfigError {
    fn from(value: DataError) -> Self {
        ConfigError::Invalid(value.to_string())
    }
}

impl From<StrategyError> for ConfigError {
    fn from(value: StrategyError) -> Self {
        match value {
            StrategyError::MissingThreshold(code) => ConfigError::MissingThreshold(code),
        }
    }
}
