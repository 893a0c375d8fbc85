//! Status block decoding.
//!
//! The status request returns 10 bytes. Bytes 4..=6 hold the red, green and
//! blue of the color currently shown; the rest is device state this layer
//! keeps only for diagnostic output.

use crate::device::Color;
use crate::error::{Error, Result};
use serde::Serialize;
use tracing::debug;

/// Offset of the red channel in the status block.
const RED_OFFSET: usize = 4;
/// Minimum number of bytes that still contain a full color.
pub const MIN_STATUS_LEN: usize = RED_OFFSET + 3;

/// A decoded status response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    /// Currently displayed color.
    pub color: Color,
    /// The full block as received.
    pub raw: Vec<u8>,
}

impl StatusResponse {
    /// Decode a raw status block.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_STATUS_LEN {
            return Err(Error::MalformedResponse {
                len: data.len(),
                min: MIN_STATUS_LEN,
            });
        }

        let color = Color::new(
            data[RED_OFFSET],
            data[RED_OFFSET + 1],
            data[RED_OFFSET + 2],
        );
        debug!(%color, raw = format_args!("{:02X?}", data), "Decoded status");

        Ok(Self {
            color,
            raw: data.to_vec(),
        })
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.color.red, self.color.green, self.color.blue)
    }

    /// All bytes as space-separated lowercase hex, e.g. `00 01 ff`.
    pub fn hex_dump(&self) -> String {
        self.raw
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
