//! Chat-model transport boundary.
//!
//! Stages talk to the model through the [`Lm`] wrapper, which owns the
//! retry policy and the empty-reply invariant. The underlying [`ChatModel`]
//! implementation only knows how to turn one prompt into one reply, which
//! keeps the transport swappable for tests.

mod deepseek;

pub use deepseek::{DeepSeekClient, API_KEY_ENV};

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use thiserror::Error;

/// One prompt in, one reply out.
pub trait ChatModel {
    fn complete(&self, prompt: &str) -> Result<String, TransportError>;
}

/// Failures at the transport boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The API credential was not configured; retrying cannot help.
    #[error("{0} is not set; export it before running")]
    MissingCredential(&'static str),
    /// The HTTP request failed outright.
    #[error("chat request failed: {0}")]
    Http(#[from] ureq::Error),
    /// The response stream could not be read or decoded.
    #[error("malformed chat response: {0}")]
    Malformed(String),
}

/// Retry policy applied to transport failures.
///
/// The default performs no retries; callers opting into hardening raise
/// `max_retries`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts after the first failed one.
    pub max_retries: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::from_secs(2),
        }
    }
}

/// The model handle the stages hold.
pub struct Lm {
    client: Box<dyn ChatModel>,
    retry: RetryPolicy,
    require_content: bool,
}

impl Lm {
    pub fn new(client: Box<dyn ChatModel>, retry: RetryPolicy, require_content: bool) -> Self {
        Self {
            client,
            retry,
            require_content,
        }
    }

    /// Ask the model for a completion.
    ///
    /// Transport failures are retried per the policy. Once every attempt has
    /// failed, `require_content` decides the outcome: a hard error in strict
    /// mode, otherwise an empty reply with a warning so the pipeline keeps
    /// its run-to-completion shape. A successful-but-empty reply follows the
    /// same rule.
    pub fn complete(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let mut last_error: Option<TransportError> = None;

        for attempt in 0..=self.retry.max_retries {
            if attempt > 0 {
                eprintln!("  chat retry {attempt}/{}", self.retry.max_retries);
                thread::sleep(self.retry.backoff);
            }
            match self.client.complete(prompt) {
                Ok(reply) => {
                    tracing::info!(
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        prompt_bytes = prompt.len(),
                        reply_bytes = reply.len(),
                        "chat call complete"
                    );
                    if self.require_content && reply.trim().is_empty() {
                        return Err(anyhow!("model returned an empty reply"));
                    }
                    return Ok(reply);
                }
                Err(err @ TransportError::MissingCredential(_)) => {
                    return Err(err.into());
                }
                Err(err) => last_error = Some(err),
            }
        }

        let failure = match last_error {
            Some(err) => err.to_string(),
            None => "no attempt was made".to_string(),
        };
        if self.require_content {
            return Err(anyhow!(
                "chat transport failed after {} attempt(s): {failure}",
                self.retry.max_retries + 1
            ));
        }
        tracing::warn!(error = %failure, "chat transport failed; continuing with empty reply");
        eprintln!("warning: chat transport failed ({failure}); continuing with empty reply");
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    /// Fails the first `fail_times` calls, then succeeds with `reply`.
    struct Flaky {
        fail_times: u32,
        reply: &'static str,
        calls: Rc<Cell<u32>>,
    }

    impl ChatModel for Flaky {
        fn complete(&self, _prompt: &str) -> Result<String, TransportError> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            if n <= self.fail_times {
                return Err(TransportError::Malformed("flaky".to_string()));
            }
            Ok(self.reply.to_string())
        }
    }

    struct NoCredential;

    impl ChatModel for NoCredential {
        fn complete(&self, _prompt: &str) -> Result<String, TransportError> {
            Err(TransportError::MissingCredential("TEST_KEY"))
        }
    }

    fn no_backoff(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff: Duration::ZERO,
        }
    }

    #[test]
    fn exhausted_retries_degrade_to_empty_reply() {
        let calls = Rc::new(Cell::new(0));
        let lm = Lm::new(
            Box::new(Flaky {
                fail_times: u32::MAX,
                reply: "",
                calls: Rc::clone(&calls),
            }),
            no_backoff(2),
            false,
        );

        let reply = lm.complete("hello").unwrap();
        assert_eq!(reply, "");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn retry_stops_at_first_success() {
        let calls = Rc::new(Cell::new(0));
        let lm = Lm::new(
            Box::new(Flaky {
                fail_times: 1,
                reply: "recovered",
                calls: Rc::clone(&calls),
            }),
            no_backoff(3),
            false,
        );

        assert_eq!(lm.complete("hello").unwrap(), "recovered");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn strict_mode_turns_exhaustion_into_an_error() {
        let calls = Rc::new(Cell::new(0));
        let lm = Lm::new(
            Box::new(Flaky {
                fail_times: u32::MAX,
                reply: "",
                calls: Rc::clone(&calls),
            }),
            no_backoff(1),
            true,
        );

        let err = lm.complete("hello").unwrap_err();
        assert!(err.to_string().contains("after 2 attempt(s)"));
    }

    #[test]
    fn strict_mode_rejects_an_empty_reply() {
        let calls = Rc::new(Cell::new(0));
        let lm = Lm::new(
            Box::new(Flaky {
                fail_times: 0,
                reply: "   ",
                calls: Rc::clone(&calls),
            }),
            no_backoff(0),
            true,
        );

        let err = lm.complete("hello").unwrap_err();
        assert!(err.to_string().contains("empty reply"));
    }

    #[test]
    fn missing_credential_is_never_retried() {
        let lm = Lm::new(Box::new(NoCredential), no_backoff(5), false);

        let err = lm.complete("hello").unwrap_err();
        assert!(err.to_string().contains("TEST_KEY"));
    }
}
