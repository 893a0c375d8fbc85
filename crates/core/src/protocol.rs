//! K40 vendor request encoding.
//!
//! Every command is a vendor control transfer addressed to the device.
//! A command is fully described by a request code, a direction, the two
//! 16-bit parameter words (`wValue`, `wIndex`) and, for reads, the length
//! of the buffer to fill. Only the status query carries data back.
//!
//! | Operation        | Code | Dir | wValue          | wIndex            |
//! |------------------|------|-----|-----------------|-------------------|
//! | read status      | 4    | IN  | 0               | 0                 |
//! | set animation    | 49   | OUT | 0               | animation         |
//! | set color mode   | 50   | OUT | mode            | 0                 |
//! | set color        | 51   | OUT | green<<8 \| red | profile<<8 \| blue |
//! | set color control| 56   | OUT | control word    | 0                 |

use crate::device::{AnimationKind, Color, ColorMode, ControlMode, ProfileTarget};

/// Length of the status block returned by [`requests::STATUS`].
pub const STATUS_LEN: usize = 10;

/// Vendor request codes.
pub mod requests {
    /// Read the 10-byte status block.
    pub const STATUS: u8 = 4;
    /// Select the backlight animation.
    pub const SET_ANIMATION: u8 = 49;
    /// Select true color or max brightness.
    pub const SET_COLOR_MODE: u8 = 50;
    /// Write a color to the active color or a stored profile.
    pub const SET_COLOR: u8 = 51;
    /// Hand color control to software or back to the keyboard.
    pub const SET_COLOR_CONTROL: u8 = 56;
}

/// Transfer direction, from the host's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Host to device.
    Out,
    /// Device to host.
    In,
}

/// A logical keyboard operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadStatus,
    SetColor {
        color: Color,
        profile: ProfileTarget,
    },
    SetColorMode {
        mode: ColorMode,
    },
    SetAnimation {
        anim: AnimationKind,
    },
    SetColorControl {
        control: ControlMode,
    },
}

impl Operation {
    /// Short verb phrase used in logs and error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ReadStatus => "read status",
            Self::SetColor { .. } => "set color",
            Self::SetColorMode { .. } => "set color mode",
            Self::SetAnimation { .. } => "set animation",
            Self::SetColorControl { .. } => "set color control",
        }
    }

    /// Whether this operation changes device-visible state.
    ///
    /// Status reads issued after a write must wait [`crate::comm::SETTLE_DELAY`].
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::ReadStatus)
    }

    /// Encode into the control transfer parameters.
    pub fn encode(&self) -> TransferRequest {
        match *self {
            Self::ReadStatus => TransferRequest::read(requests::STATUS, STATUS_LEN),
            Self::SetColor { color, profile } => TransferRequest::write(
                requests::SET_COLOR,
                pack(color.green, color.red),
                pack(profile.selector(), color.blue),
            ),
            Self::SetColorMode { mode } => {
                TransferRequest::write(requests::SET_COLOR_MODE, mode.word(), 0)
            }
            Self::SetAnimation { anim } => {
                TransferRequest::write(requests::SET_ANIMATION, 0, anim.word())
            }
            Self::SetColorControl { control } => {
                TransferRequest::write(requests::SET_COLOR_CONTROL, control.word(), 0)
            }
        }
    }
}

/// High byte / low byte into one parameter word.
fn pack(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Parameters for a single vendor control transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub request: u8,
    pub direction: Direction,
    /// First parameter word (`wValue`).
    pub value: u16,
    /// Second parameter word (`wIndex`).
    pub index: u16,
    /// Zeroed buffer the transport fills for IN requests; empty for OUT.
    pub payload: Vec<u8>,
}

impl TransferRequest {
    fn write(request: u8, value: u16, index: u16) -> Self {
        Self {
            request,
            direction: Direction::Out,
            value,
            index,
            payload: Vec::new(),
        }
    }

    fn read(request: u8, len: usize) -> Self {
        Self {
            request,
            direction: Direction::In,
            value: 0,
            index: 0,
            payload: vec![0u8; len],
        }
    }
}
