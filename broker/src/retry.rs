use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::error::BrokerError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// 总尝试次数（含首次）。
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    /// 退避时长的随机抖动比例，取值 0~1。
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 300,
            max_delay_ms: 5000,
            jitter: 0.2,
        }
    }
}

impl RetryPolicy {
    pub fn no_delay(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            jitter: 0.0,
        }
    }

    /// 依次执行 `op`，可重试错误按指数退避加抖动等待后重来。
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, BrokerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BrokerError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) if attempt >= attempts => {
                    return Err(BrokerError::RetriesExhausted {
                        attempts,
                        last: Box::new(err),
                    });
                }
                Err(err) => {
                    let delay = self.jittered_backoff_ms(attempt);
                    debug!(label, attempt, delay_ms = delay, error = %err, "retrying request");
                    if delay > 0 {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }
    }

    fn jittered_backoff_ms(&self, attempt: u32) -> u64 {
        let base = compute_backoff_ms(self, attempt);
        let jitter = self.jitter.clamp(0.0, 1.0);
        if base == 0 || jitter == 0.0 {
            return base;
        }
        let factor = 1.0 + rand::thread_rng().gen_range(-jitter..=jitter);
        (base as f64 * factor).round().max(0.0) as u64
    }
}

pub fn compute_backoff_ms(policy: &RetryPolicy, attempt: u32) -> u64 {
    let shift = attempt.saturating_sub(1).min(10);
    let scaled = policy.initial_delay_ms.saturating_mul(1u64 << shift);
    scaled.min(policy.max_delay_ms.max(policy.initial_delay_ms))
}
