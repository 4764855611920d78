// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deadline wrapper for calls to external collaborators.

use std::future::Future;
use std::time::Duration;

use crate::error::WaypointError;

/// Run `fut` with a deadline, mapping an elapsed deadline to
/// [`WaypointError::Timeout`] tagged with `service`.
pub async fn with_timeout<T, F>(
    service: &'static str,
    duration: Duration,
    fut: F,
) -> Result<T, WaypointError>
where
    F: Future<Output = Result<T, WaypointError>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(WaypointError::Timeout { service, duration }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn elapsed_deadline_becomes_timeout() {
        let result: Result<(), _> = with_timeout("slow", Duration::from_secs(1), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        match result {
            Err(WaypointError::Timeout { service, duration }) => {
                assert_eq!(service, "slow");
                assert_eq!(duration, Duration::from_secs(1));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn inner_result_passes_through() {
        let ok = with_timeout("fast", Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: Result<(), _> = with_timeout("fast", Duration::from_secs(1), async {
            Err(WaypointError::Internal("boom".into()))
        })
        .await;
        assert!(matches!(err, Err(WaypointError::Internal(_))));
    }
}
