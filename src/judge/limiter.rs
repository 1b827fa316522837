// src/judge/limiter.rs

use std::time::Duration;

use async_trait::async_trait;

/// Pacing applied between consecutive Execution Service calls of one batch.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Waits until the next call may be issued.
    async fn acquire(&self);
}

/// Sleeps a fixed amount before each paced call (the public Piston API
/// throttles bursts).
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn acquire(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// No pacing at all.
#[derive(Debug, Clone, Default)]
pub struct Unpaced;

#[async_trait]
impl RateLimiter for Unpaced {
    async fn acquire(&self) {}
}
