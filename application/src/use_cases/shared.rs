//! Shared utilities for use cases.
//!
//! Cancellation and deadline handling used by the planning loop and the
//! final synthesizer.

use deepcast_domain::AbortReason;
use std::future::Future;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Check whether the run must stop before the next step.
///
/// Cancellation wins over an expired deadline.
pub(crate) fn check_abort(
    token: &Option<CancellationToken>,
    deadline: Option<Instant>,
) -> Result<(), AbortReason> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(AbortReason::Cancelled);
    }
    if let Some(deadline) = deadline
        && Instant::now() >= deadline
    {
        return Err(AbortReason::DeadlineExceeded);
    }
    Ok(())
}

/// Drive `fut` to completion unless the token is cancelled or the deadline
/// passes first.
pub(crate) async fn race<T>(
    fut: impl Future<Output = T>,
    token: &Option<CancellationToken>,
    deadline: Option<Instant>,
) -> Result<T, AbortReason> {
    let cancelled = async {
        match token {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    };
    let expired = async {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancelled => Err(AbortReason::Cancelled),
        _ = expired => Err(AbortReason::DeadlineExceeded),
        value = fut => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_check_abort() {
        assert!(check_abort(&None, None).is_ok());

        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            check_abort(&Some(token), Some(Instant::now())),
            Err(AbortReason::Cancelled)
        );

        let past = Instant::now() - Duration::from_millis(1);
        assert_eq!(check_abort(&None, Some(past)), Err(AbortReason::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_race_completes() {
        let value = race(async { 7 }, &None, None).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn test_race_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let result = race(std::future::pending::<()>(), &Some(token), None).await;
        assert_eq!(result, Err(AbortReason::Cancelled));
    }

    #[tokio::test]
    async fn test_race_deadline() {
        let deadline = Instant::now() + Duration::from_millis(10);
        let result = race(std::future::pending::<()>(), &None, Some(deadline)).await;
        assert_eq!(result, Err(AbortReason::DeadlineExceeded));
    }
}
