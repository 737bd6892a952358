use std::time::Duration;

/// Bounded retry with linearly growing delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, at least one is always made
    pub attempts: u32,
    /// Delay unit; attempt `n` (0-based) waits `base_delay * n` first
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 5, base_delay: Duration::from_secs(1) }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self { attempts, base_delay }
    }

    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Run `op` until it succeeds or the attempts are used up.
    ///
    /// `op` receives the 0-based attempt number. The error of the last attempt
    /// is returned.
    pub fn run<T, E>(&self, sleep: impl Fn(Duration), mut op: impl FnMut(u32) -> Result<T, E>) -> Result<T, E> {
        let attempts = self.attempts.max(1);
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                sleep(self.delay_before(attempt));
            }
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 >= attempts => return Err(e),
                Err(_) => attempt += 1,
            }
        }
    }
}
