use std::time::Duration;

/// Knobs for the interpreter session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// How many times `initialize` calls `Engine::init` before giving up. At least 1.
    pub init_attempts: u32,
    /// Pause between failed init attempts.
    pub init_backoff: Duration,
    /// Upper bound for one evaluation, canvas setup and teardown included.
    /// `None` waits forever.
    pub eval_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            init_attempts: 3,
            init_backoff: Duration::from_millis(500),
            eval_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_init_attempts(mut self, attempts: u32) -> Self {
        self.init_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_init_backoff(mut self, backoff: Duration) -> Self {
        self.init_backoff = backoff;
        self
    }

    #[must_use]
    pub fn with_eval_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.eval_timeout = timeout;
        self
    }
}
