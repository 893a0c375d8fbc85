//! USB transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that a real libusb handle and
//! mock devices share the same interface. The opened handle is passed
//! explicitly to every call; nothing here holds a global session.

use crate::error::{Error, Result};
use crate::protocol::{Direction, TransferRequest};
use tracing::{trace, warn};

/// Abstraction over synchronous vendor control transfers.
///
/// Implementations address the device recipient with a vendor request type.
/// Every call is treated as a potentially failing, non-retriable operation.
pub trait UsbTransport {
    /// Perform one control transfer and return the number of bytes moved.
    ///
    /// For [`Direction::In`] the transport fills `buf`; for
    /// [`Direction::Out`] it sends `buf` (empty for every K40 write).
    fn control_transfer(
        &self,
        direction: Direction,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> Result<usize>;
}

/// Execute an encoded request.
///
/// Returns the bytes actually received for IN requests, which may be fewer
/// than requested; OUT requests return an empty vector.
pub fn execute(transport: &dyn UsbTransport, req: &TransferRequest) -> Result<Vec<u8>> {
    trace!(
        request = req.request,
        direction = ?req.direction,
        value = format_args!("0x{:04X}", req.value),
        index = format_args!("0x{:04X}", req.index),
        len = req.payload.len(),
        "USB control TX"
    );

    let mut buf = req.payload.clone();
    let n = transport
        .control_transfer(req.direction, req.request, req.value, req.index, &mut buf)
        .inspect_err(|e| warn!(request = req.request, error = %e, "Control transfer failed"))?;

    match req.direction {
        Direction::Out => Ok(Vec::new()),
        Direction::In => {
            if n > buf.len() {
                return Err(Error::TransferFailed {
                    operation: "control transfer",
                    reason: format!("transport reported {n} bytes for a {}-byte buffer", buf.len()),
                });
            }
            buf.truncate(n);
            trace!(data = format_args!("{:02X?}", buf), "USB control RX");
            Ok(buf)
        }
    }
}

/// A mock USB transport for testing.
///
/// Records every transfer and answers IN requests with a canned status block.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// One recorded control transfer.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Transfer {
        pub direction: Direction,
        pub request: u8,
        pub value: u16,
        pub index: u16,
        pub len: usize,
    }

    /// Mock transport that returns preconfigured responses.
    pub struct MockTransport {
        status: Mutex<Vec<u8>>,
        failing: Mutex<Vec<u8>>,
        log: Mutex<Vec<Transfer>>,
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockTransport {
        /// A device whose status block is all zeros.
        pub fn new() -> Self {
            Self::with_status(&[0u8; crate::protocol::STATUS_LEN])
        }

        /// A device that answers every status read with `status`.
        pub fn with_status(status: &[u8]) -> Self {
            Self {
                status: Mutex::new(status.to_vec()),
                failing: Mutex::new(Vec::new()),
                log: Mutex::new(Vec::new()),
            }
        }

        /// Replace the canned status block.
        pub fn set_status(&self, status: &[u8]) {
            *self.status.lock().unwrap() = status.to_vec();
        }

        /// Make every transfer with this request code fail.
        pub fn fail_request(&self, request: u8) {
            self.failing.lock().unwrap().push(request);
        }

        /// All transfers seen so far, in order.
        pub fn transfers(&self) -> Vec<Transfer> {
            self.log.lock().unwrap().clone()
        }

        /// Only the OUT transfers, in order.
        pub fn writes(&self) -> Vec<Transfer> {
            self.transfers()
                .into_iter()
                .filter(|t| t.direction == Direction::Out)
                .collect()
        }
    }

    impl UsbTransport for MockTransport {
        fn control_transfer(
            &self,
            direction: Direction,
            request: u8,
            value: u16,
            index: u16,
            buf: &mut [u8],
        ) -> Result<usize> {
            self.log.lock().unwrap().push(Transfer {
                direction,
                request,
                value,
                index,
                len: buf.len(),
            });

            if self.failing.lock().unwrap().contains(&request) {
                return Err(Error::TransferFailed {
                    operation: "control transfer",
                    reason: format!("mock: request {request} rejected (LIBUSB_ERROR_PIPE)"),
                });
            }

            match direction {
                Direction::Out => Ok(buf.len()),
                Direction::In => {
                    let status = self.status.lock().unwrap();
                    let n = status.len().min(buf.len());
                    buf[..n].copy_from_slice(&status[..n]);
                    Ok(n)
                }
            }
        }
    }
}
