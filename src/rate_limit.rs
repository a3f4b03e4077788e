//! Request gates for rate-limited services.

use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

use crate::traits::RequestGate;

/// Nominatim usage policy allows one request per second; keep a margin.
pub const GEOCODER_MIN_INTERVAL: Duration = Duration::from_millis(1100);

/// Blocks so that consecutive requests are at least `interval` apart.
///
/// The first request passes immediately.
pub struct IntervalGate {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
}

impl IntervalGate {
    pub fn new(interval: Duration) -> Self {
        let clock = DefaultClock::default();
        let quota = Quota::with_period(interval)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct_with_clock(quota, &clock),
            clock,
        }
    }
}

impl RequestGate for IntervalGate {
    fn acquire(&self) {
        while let Err(not_until) = self.limiter.check() {
            let wait = not_until.wait_time_from(self.clock.now());
            tracing::trace!(?wait, "waiting for rate limiter");
            thread::sleep(wait);
        }
    }
}

/// Gate that never waits. For local services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl RequestGate for Unlimited {
    fn acquire(&self) {}
}
