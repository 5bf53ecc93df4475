//! Bounded retry with a fixed delay between attempts

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Outcome of an operation that did not succeed under a [`RetryPolicy`]
#[derive(Debug, Error)]
pub enum RetryError<E: std::error::Error + 'static> {
    /// Every attempt failed with a retryable error
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    /// An attempt failed with an error that is not worth retrying
    #[error("{0}")]
    Fatal(E),
}

/// Retry settings: how many attempts in total, and how long to wait between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one; always at least 1
    pub max_attempts: u32,

    /// Pause between consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` below 1 is treated as 1
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Runs `op` until it succeeds, fails fatally or runs out of attempts
    ///
    /// `is_retryable` classifies each error. Errors it rejects are returned
    /// at once as [`RetryError::Fatal`].
    ///
    /// # Example
    ///
    /// ```
    /// use stock_scraper::crawler::{RetryError, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let policy = RetryPolicy::new(3, Duration::ZERO);
    /// let result: Result<u32, RetryError<std::io::Error>> = policy
    ///     .run(|attempt| async move { Ok(attempt) }, |_| true)
    ///     .await;
    /// assert_eq!(result.unwrap(), 1);
    /// # }
    /// ```
    pub async fn run<T, E, F, Fut, P>(&self, mut op: F, is_retryable: P) -> Result<T, RetryError<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !is_retryable(&e) => return Err(RetryError::Fatal(e)),
                Err(e) if attempt >= max_attempts => {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        "Attempt {}/{} failed: {}; retrying in {:?}",
                        attempt,
                        max_attempts,
                        e,
                        self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
