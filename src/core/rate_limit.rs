use crate::domain::model::RateLimits;
use std::time::Duration;

/// Counts queries against the Steam budget and sleeps when it runs out.
///
/// The counter is shared by every app in a batch, so a batch never sends
/// more than `max_queries` requests between cooldowns.
#[derive(Debug)]
pub struct RateLimiter {
    limits: RateLimits,
    query_count: u32,
}

impl RateLimiter {
    pub fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            query_count: 0,
        }
    }

    pub fn limits(&self) -> &RateLimits {
        &self.limits
    }

    pub fn query_count(&self) -> u32 {
        self.query_count
    }

    /// Waits out the cooldown if the budget is spent, then counts one query.
    pub async fn acquire(&mut self) {
        if self.query_count >= self.limits.max_queries {
            tracing::info!(
                "⏳ {} queries sent, cooling down for {:?}",
                self.query_count,
                self.limits.cooldown
            );
            self.cooldown(self.limits.cooldown).await;
        }
        self.query_count += 1;
    }

    /// HTTP 429: Steam wants us to back off regardless of our own count.
    pub async fn on_rate_limited(&mut self) {
        tracing::warn!("⏳ Rate limited by Steam, cooling down for {:?}", self.limits.cooldown);
        self.cooldown(self.limits.cooldown).await;
    }

    pub async fn on_bad_gateway(&mut self) {
        tracing::warn!(
            "⏳ Bad gateway from Steam, retrying in {:?}",
            self.limits.bad_gateway_cooldown
        );
        tokio::time::sleep(self.limits.bad_gateway_cooldown).await;
    }

    async fn cooldown(&mut self, wait: Duration) {
        tokio::time::sleep(wait).await;
        self.query_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_limits(max_queries: u32) -> RateLimits {
        RateLimits {
            max_queries,
            cooldown: Duration::ZERO,
            bad_gateway_cooldown: Duration::ZERO,
            max_transient_retries: 3,
        }
    }

    #[tokio::test]
    async fn test_budget_resets_after_cooldown() {
        let mut limiter = RateLimiter::new(instant_limits(2));

        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(limiter.query_count(), 2);

        // 第三次會先冷卻再計數
        limiter.acquire().await;
        assert_eq!(limiter.query_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_resets_budget() {
        let mut limiter = RateLimiter::new(instant_limits(150));
        limiter.acquire().await;
        limiter.acquire().await;

        limiter.on_rate_limited().await;
        assert_eq!(limiter.query_count(), 0);
    }

    #[tokio::test]
    async fn test_bad_gateway_keeps_budget() {
        let mut limiter = RateLimiter::new(instant_limits(150));
        limiter.acquire().await;

        limiter.on_bad_gateway().await;
        assert_eq!(limiter.query_count(), 1);
    }
}
