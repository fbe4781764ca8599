use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing;

pub async fn retry_with_backoff<F, Fut, T, E>(
    mut operation: F,
    max_retries: usize,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = initial_delay;
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    "Attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );
                sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let calls = Cell::new(0);
        let result: Result<usize, String> = retry_with_backoff(
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(format!("attempt {n}"))
                    } else {
                        Ok(n)
                    }
                }
            },
            5,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_with_last_error() {
        let calls = Cell::new(0);
        let result: Result<(), String> = retry_with_backoff(
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Err(format!("attempt {n}")) }
            },
            2,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result, Err("attempt 3".to_string()));
        assert_eq!(calls.get(), 3);
    }
}
