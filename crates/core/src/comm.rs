//! Device communication layer: operation dispatch and write/read sequencing.
//!
//! The keyboard acknowledges a write before its internal state catches up,
//! so a status read issued straight after a write can still report the old
//! color. Callers that want to observe a write must wait [`SETTLE_DELAY`]
//! first. The device gives no completion signal, so the wait is a plain
//! sleep with no early exit. Failed transfers are never retried.

use crate::error::{Error, Result};
use crate::protocol::Operation;
use crate::status::StatusResponse;
use crate::transport::{execute, UsbTransport};
use std::time::Duration;
use tracing::debug;

/// Minimum wait between a state-changing write and a status read.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Default timeout for a single control transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Timing knobs for a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Per-transfer timeout; zero waits forever.
    pub timeout: Duration,
    /// Wait between a write and the status read that observes it.
    pub settle_delay: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            settle_delay: SETTLE_DELAY,
        }
    }
}

/// Encode and execute one operation.
///
/// Transport failures come back as [`Error::TransferFailed`] naming the
/// operation that failed.
pub fn send(transport: &dyn UsbTransport, op: &Operation) -> Result<Vec<u8>> {
    debug!(operation = op.describe(), "Sending");
    execute(transport, &op.encode()).map_err(|e| match e {
        Error::TransferFailed { reason, .. } => Error::TransferFailed {
            operation: op.describe(),
            reason,
        },
        other => other,
    })
}

/// Query and decode the status block.
pub fn read_status(transport: &dyn UsbTransport) -> Result<StatusResponse> {
    let raw = send(transport, &Operation::ReadStatus)?;
    StatusResponse::decode(&raw)
}

/// Perform a write, wait for the device to settle, then read status back.
///
/// A failed write is the outer error and skips the read. The outcome of the
/// follow-up read is returned as-is, so callers can decide whether a failed
/// observation matters once the write itself went through.
pub fn apply(
    transport: &dyn UsbTransport,
    op: &Operation,
    settle: Duration,
) -> Result<Result<StatusResponse>> {
    send(transport, op)?;
    settle_after(op, settle);
    Ok(read_status(transport))
}

/// Sleep for `settle` if `op` changed device state.
pub fn settle_after(op: &Operation, settle: Duration) {
    if op.is_write() && !settle.is_zero() {
        debug!(
            operation = op.describe(),
            delay_ms = settle.as_millis() as u64,
            "Waiting for device to settle"
        );
        std::thread::sleep(settle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{AnimationKind, Color, ProfileTarget};
    use crate::protocol::{requests, Direction};
    use crate::transport::mock::MockTransport;
    use std::time::Instant;

    #[test]
    fn settle_delay_is_two_hundred_ms() {
        assert_eq!(SETTLE_DELAY, Duration::from_millis(200));
        assert_eq!(TransportConfig::default().settle_delay, SETTLE_DELAY);
    }

    #[test]
    fn send_tags_failures_with_operation() {
        let mock = MockTransport::new();
        mock.fail_request(requests::SET_ANIMATION);
        let err = send(
            &mock,
            &Operation::SetAnimation {
                anim: AnimationKind::Pulse,
            },
        )
        .unwrap_err();
        match err {
            Error::TransferFailed { operation, reason } => {
                assert_eq!(operation, "set animation");
                assert!(reason.contains("LIBUSB_ERROR_PIPE"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_status_decodes_color() {
        let mock = MockTransport::with_status(&[0, 0, 0, 0, 7, 8, 9, 0, 0, 0]);
        let status = read_status(&mock).unwrap();
        assert_eq!(status.rgb(), (7, 8, 9));
    }

    #[test]
    fn read_status_rejects_short_read() {
        let mock = MockTransport::with_status(&[0, 0, 0, 0, 7]);
        assert!(matches!(
            read_status(&mock),
            Err(Error::MalformedResponse { len: 5, .. })
        ));
    }

    #[test]
    fn apply_writes_then_reads() {
        let mock = MockTransport::with_status(&[0, 0, 0, 0, 1, 2, 3, 0, 0, 0]);
        let op = Operation::SetColor {
            color: Color::new(1, 2, 3),
            profile: ProfileTarget::Current,
        };
        let status = apply(&mock, &op, Duration::ZERO).unwrap().unwrap();
        assert_eq!(status.color, Color::new(1, 2, 3));

        let sent = mock.transfers();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].direction, Direction::Out);
        assert_eq!(sent[0].request, requests::SET_COLOR);
        assert_eq!(sent[1].direction, Direction::In);
        assert_eq!(sent[1].request, requests::STATUS);
    }

    #[test]
    fn apply_skips_read_when_write_fails() {
        let mock = MockTransport::new();
        mock.fail_request(requests::SET_COLOR);
        let op = Operation::SetColor {
            color: Color::new(1, 2, 3),
            profile: ProfileTarget::Current,
        };
        assert!(apply(&mock, &op, Duration::ZERO).is_err());
        assert_eq!(mock.transfers().len(), 1);
    }

    #[test]
    fn apply_waits_settle_delay() {
        let mock = MockTransport::new();
        let op = Operation::SetAnimation {
            anim: AnimationKind::Off,
        };
        let start = Instant::now();
        apply(&mock, &op, Duration::from_millis(20)).unwrap().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn apply_reports_failed_read_separately() {
        let mock = MockTransport::new();
        mock.fail_request(requests::STATUS);
        let op = Operation::SetAnimation {
            anim: AnimationKind::Cycle,
        };
        let observed = apply(&mock, &op, Duration::ZERO).unwrap();
        assert!(matches!(
            observed,
            Err(Error::TransferFailed {
                operation: "read status",
                ..
            })
        ));
        assert_eq!(mock.writes().len(), 1);
    }

    #[test]
    fn settle_after_read_does_not_sleep() {
        let start = Instant::now();
        settle_after(&Operation::ReadStatus, Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
