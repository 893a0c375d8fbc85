//! k40-rgb-core: vendor request encoding, status decoding, and validation.
//!
//! This crate holds the pure protocol layer for driving the backlight of a
//! Corsair K40 keyboard through USB vendor control transfers. It performs no
//! I/O of its own; a [`transport::UsbTransport`] implementation is handed in
//! by the caller.

pub mod comm;
pub mod device;
pub mod error;
pub mod protocol;
pub mod safety;
pub mod status;
pub mod transport;

/// Corsair USB Vendor ID.
pub const CORSAIR_VID: u16 = 0x1B1C;

/// Known Corsair keyboard product IDs.
pub mod pids {
    /// K40 RGB gaming keyboard.
    pub const K40: u16 = 0x1B0E;
}
