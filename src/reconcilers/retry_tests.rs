// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `retry.rs`

#[cfg(test)]
mod tests {
    use crate::reconcilers::retry::{is_transient, retry_read, ExponentialBackoff};
    use std::cell::Cell;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "test".to_string(),
            reason: "Test".to_string(),
            code,
        })
    }

    #[test]
    fn test_backoff_intervals_grow() {
        let mut backoff = ExponentialBackoff::default();
        let first = backoff.next_backoff().unwrap();
        let second = backoff.next_backoff().unwrap();
        let third = backoff.next_backoff().unwrap();

        // Jitter is ±10%, growth is 2x, so each step clears the previous one.
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_is_transient_classification() {
        assert!(is_transient(&api_error(429)));
        assert!(is_transient(&api_error(500)));
        assert!(is_transient(&api_error(503)));

        assert!(!is_transient(&api_error(404)));
        assert!(!is_transient(&api_error(409)));
        assert!(!is_transient(&api_error(403)));
    }

    #[tokio::test]
    async fn test_retry_read_returns_first_success() {
        let calls = Cell::new(0u32);
        let result: Result<u32, kube::Error> = retry_read("test", || {
            calls.set(calls.get() + 1);
            async { Ok(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_retry_read_fails_fast_on_permanent_error() {
        let calls = Cell::new(0u32);
        let result: Result<u32, kube::Error> = retry_read("test", || {
            calls.set(calls.get() + 1);
            async { Err(api_error(409)) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_retry_read_retries_transient_then_succeeds() {
        let calls = Cell::new(0u32);
        let result: Result<u32, kube::Error> = retry_read("test", || {
            calls.set(calls.get() + 1);
            let attempt = calls.get();
            async move {
                if attempt < 3 {
                    Err(api_error(503))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }
}
