//! Token-bucket rate limiter (MODULE C), grounded on
//! `original_source/.../infrastructure/http/rate_limiter.py`. The mutex is
//! held across the entire `acquire` path, including the sleep, exactly as
//! spec §4.2/§5 requires — this is the one place in the crate where that is
//! intentional rather than a lock-scoping smell.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

struct State {
    allowance: f64,
    last_check: Instant,
}

pub struct RateLimiter {
    rate: f64,
    per: f64,
    state: Mutex<State>,
}

impl RateLimiter {
    pub fn new(rate: f64, per: f64) -> Self {
        Self {
            rate,
            per,
            state: Mutex::new(State {
                allowance: rate,
                last_check: Instant::now(),
            }),
        }
    }

    fn refill(&self, state: &mut State) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_check).as_secs_f64();
        state.allowance = (state.allowance + elapsed * self.rate / self.per).min(self.rate);
        state.last_check = now;
    }

    /// Blocks until a token is available, then consumes one.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;
        self.refill(&mut state);
        if state.allowance < 1.0 {
            let wait_secs = (1.0 - state.allowance) * self.per / self.rate;
            tokio::time::sleep(Duration::from_secs_f64(wait_secs.max(0.0))).await;
            state.allowance = 0.0;
        } else {
            state.allowance -= 1.0;
        }
    }

    /// Non-blocking variant: returns `false` without consuming a token when
    /// none is available.
    pub async fn try_acquire(&self) -> bool {
        let mut state = self.state.lock().await;
        self.refill(&mut state);
        if state.allowance < 1.0 {
            false
        } else {
            state.allowance -= 1.0;
            true
        }
    }

    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.allowance = self.rate;
        state.last_check = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_immediate_burst_up_to_rate() {
        let limiter = RateLimiter::new(3.0, 1.0);
        for _ in 0..3 {
            assert!(limiter.try_acquire().await);
        }
        assert!(!limiter.try_acquire().await);
    }

    #[tokio::test]
    async fn reset_restores_full_allowance() {
        let limiter = RateLimiter::new(2.0, 1.0);
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
        limiter.reset().await;
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test]
    async fn acquire_eventually_succeeds_after_blocking() {
        let limiter = RateLimiter::new(1.0, 1.0);
        assert!(limiter.try_acquire().await);
        // This would block under real-time refill; bound the test by using a
        // fast rate/per ratio so the sleep is short rather than mocking time.
        let fast = RateLimiter::new(1000.0, 1.0);
        fast.acquire().await;
        fast.acquire().await;
    }
}
