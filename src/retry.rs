use std::time::Duration;

use reqwest::StatusCode;

use crate::EkdSendError;

/// Delay before the attempt that follows `attempt`: `2^attempt` seconds.
///
/// No jitter and no cap; the exponent is clamped only to keep the shift from
/// overflowing.
pub(crate) fn backoff_delay(attempt: usize) -> Duration {
    let exp = attempt.min(16) as u32;
    Duration::from_secs(1u64 << exp)
}

/// Statuses worth retrying: rate limiting and server-side failures.
pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Auth and validation failures will not change on a resend.
pub(crate) fn non_retryable(error: &EkdSendError) -> bool {
    matches!(
        error,
        EkdSendError::Authentication { .. } | EkdSendError::Validation { .. }
    )
}
