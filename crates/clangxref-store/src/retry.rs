//! Exponential-backoff retry helper for SQLite `busy`/`locked` contention.
//!
//! Replaces the original's exception-catching retry decorator with an
//! explicit loop over a `Result`: easier to reason about and to bound.

use std::thread;
use std::time::Duration;

use rand::Rng;
use rusqlite::ErrorCode;

use crate::error::StoreError;

/// Base delay for the first retry attempt.
const BASE_DELAY_MS: u64 = 50;
/// Maximum number of attempts (including the first) before giving up.
const MAX_ATTEMPTS: u32 = 10;
/// Upper bound on the random jitter added to each backoff sleep.
const MAX_JITTER_MS: u64 = 100;

fn is_retryable(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

/// Runs `f`, retrying with exponential backoff + jitter while it returns a
/// retryable `busy`/`locked` SQLite error, up to [`MAX_ATTEMPTS`] total
/// attempts.
///
/// Non-retryable errors are returned immediately. Exhausting the retry
/// budget surfaces as [`StoreError::Busy`].
pub fn with_retry<T>(mut f: impl FnMut() -> rusqlite::Result<T>) -> Result<T, StoreError> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match f() {
            Ok(value) => return Ok(value),
            Err(e) if is_retryable(&e) && attempt < MAX_ATTEMPTS => {
                let backoff_ms = BASE_DELAY_MS.saturating_mul(1u64 << (attempt - 1).min(20));
                let jitter_ms = rand::thread_rng().gen_range(0..=MAX_JITTER_MS);
                tracing::debug!(attempt, backoff_ms, jitter_ms, "store busy, retrying");
                thread::sleep(Duration::from_millis(backoff_ms + jitter_ms));
            }
            Err(e) if is_retryable(&e) => return Err(StoreError::Busy { attempts: attempt }),
            Err(e) => return Err(StoreError::Disk(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn succeeds_immediately_when_the_first_call_succeeds() {
        let calls = Cell::new(0);
        let result = with_retry(|| {
            calls.set(calls.get() + 1);
            Ok::<_, rusqlite::Error>(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn non_retryable_error_returns_immediately() {
        let calls = Cell::new(0);
        let result: Result<(), StoreError> = with_retry(|| {
            calls.set(calls.get() + 1);
            Err(rusqlite::Error::InvalidQuery)
        });
        assert!(matches!(result, Err(StoreError::Disk(_))));
        assert_eq!(calls.get(), 1);
    }
}
