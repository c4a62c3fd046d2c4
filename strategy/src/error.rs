#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// 标的既没有专属阈值，也没有 `default` 阈值。
    MissingThreshold(String),
}

impl std::fmt::Display for StrategyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyError::MissingThreshold(code) => {
                write!(f, "no threshold for instrument {} and no default entry", code)
            }
        }
    }
}

impl std::error::Error for StrategyError {}
