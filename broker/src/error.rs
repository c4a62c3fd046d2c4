#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// 连接失败、超时等传输层错误。
    Transport(String),
    HttpStatus(u16),
    Malformed(String),
    /// 数据源对该标的该日没有任何 bar。
    EmptyData(String),
    RetriesExhausted { attempts: u32, last: Box<BrokerError> },
    Io(String),
    Csv(String),
}

impl BrokerError {
    /// 是否值得在同一次请求内重试。
    pub fn is_retryable(&self) -> bool {
        match self {
            BrokerError::Transport(_) | BrokerError::Malformed(_) => true,
            BrokerError::HttpStatus(code) => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    pub fn is_empty_data(&self) -> bool {
        matches!(self, BrokerError::EmptyData(_))
    }
}

impl std::fmt::Display for BrokerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrokerError::Transport(msg) => write!(f, "transport error: {}", msg),
            BrokerError::HttpStatus(code) => write!(f, "unexpected http status {}", code),
            BrokerError::Malformed(msg) => write!(f, "malformed response: {}", msg),
            BrokerError::EmptyData(code) => write!(f, "no bars returned for {}", code),
            BrokerError::RetriesExhausted { attempts, last } => {
                write!(f, "gave up after {} attempts: {}", attempts, last)
            }
            BrokerError::Io(msg) => write!(f, "io error: {}", msg),
            BrokerError::Csv(msg) => write!(f, "csv error: {}", msg),
        }
    }
}

impl std::error::Error for BrokerError {}

impl From<reqwest::Error> for BrokerError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            BrokerError::Malformed(value.to_string())
        } else if let Some(status) = value.status() {
            BrokerError::HttpStatus(status.as_u16())
        } else {
            BrokerError::Transport(value.to_string())
        }
    }
}

impl From<std::io::Error> for BrokerError {
    fn from(value: std::io::Error) -> Self {
        BrokerError::Io(value.to_string())
    }
}

impl From<csv::Error> for BrokerError {
    fn from(value: csv::Error) -> Self {
        BrokerError::Csv(value.to_string())
    }
}
