// Control plane: admission control
//
// Concurrency limiting plus a one-second sliding-window rate limiter in front
// of every API handler.
//
// Numan Thabit 2025 Nov

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{AcquireError, Mutex, OwnedSemaphorePermit, Semaphore};
use tracing::debug;

const DEFAULT_RATE_PER_SEC: u32 = 200;

#[derive(Clone)]
pub struct AdmissionControl {
    max_inflight: Arc<Semaphore>,
    // Simple rate limiter: allow up to rate_per_sec within a 1s sliding window
    inner: Arc<Mutex<RateLimiter>>,
}

struct RateLimiter {
    rate_per_sec: u32,
    timestamps: VecDeque<Instant>,
    window: Duration,
}

impl RateLimiter {
    /// Record a request at `now` if the window has room.
    fn admit(&mut self, now: Instant) -> bool {
        while let Some(front) = self.timestamps.front() {
            if now.duration_since(*front) > self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
        if (self.timestamps.len() as u32) < self.rate_per_sec {
            self.timestamps.push_back(now);
            true
        } else {
            false
        }
    }
}

impl AdmissionControl {
    pub fn new(max_inflight: usize, rate_per_sec: Option<u32>) -> Self {
        let rl = RateLimiter {
            rate_per_sec: rate_per_sec.unwrap_or(DEFAULT_RATE_PER_SEC).max(1),
            timestamps: VecDeque::with_capacity(256),
            window: Duration::from_secs(1),
        };
        Self {
            max_inflight: Arc::new(Semaphore::new(max_inflight.max(1))),
            inner: Arc::new(Mutex::new(rl)),
        }
    }

    /// Acquire an admission permit respecting max inflight and rate limit.
    pub async fn acquire(&self) -> Result<AdmissionPermit, AcquireError> {
        loop {
            let admitted = self.inner.lock().await.admit(Instant::now());
            if admitted {
                break;
            }
            debug!("rate limit reached, waiting");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let permit = self.max_inflight.clone().acquire_owned().await?;
        Ok(AdmissionPermit { _permit: permit })
    }

    pub fn available_permits(&self) -> usize {
        self.max_inflight.available_permits()
    }
}

pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}
