//! Device model: colors, profile targets, and lighting modes.

use crate::error::{Error, Result};
use serde::Serialize;

/// An RGB color as sent to and reported by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Renders as six uppercase hex digits, e.g. `FF0080`.
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// Number of stored profile slots on the K40.
pub const PROFILE_COUNT: u8 = 3;

/// A stored profile slot number, always in `1..=PROFILE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileSlot(u8);

impl ProfileSlot {
    /// Build a slot, rejecting anything outside `1..=3`.
    ///
    /// Slot 0 is not a stored profile; it is how the device addresses the
    /// active color, which callers express as [`ProfileTarget::Current`].
    pub fn new(number: u8) -> Result<Self> {
        if (1..=PROFILE_COUNT).contains(&number) {
            Ok(Self(number))
        } else {
            Err(Error::InvalidArgument(format!(
                "profile {number} out of range (allowed 1..={PROFILE_COUNT})"
            )))
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }
}

/// Where a color write lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileTarget {
    /// The currently displayed color.
    #[default]
    Current,
    /// One of the stored profile slots.
    Profile(ProfileSlot),
}

impl ProfileTarget {
    /// Selector byte placed in the high byte of the second parameter word.
    pub fn selector(&self) -> u8 {
        match self {
            Self::Current => 0,
            Self::Profile(slot) => slot.number(),
        }
    }
}

/// Color rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum ColorMode {
    TrueColor = 0,
    MaxBrightness = 1,
}

impl ColorMode {
    pub const ALL: &'static [ColorMode] = &[ColorMode::TrueColor, ColorMode::MaxBrightness];

    /// Parse the CLI spelling: `true` or `max`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "true" => Some(Self::TrueColor),
            "max" => Some(Self::MaxBrightness),
            _ => None,
        }
    }

    pub fn word(&self) -> u16 {
        *self as u16
    }
}

/// Backlight animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum AnimationKind {
    Off = 0,
    Pulse = 1,
    Cycle = 2,
}

impl AnimationKind {
    pub const ALL: &'static [AnimationKind] = &[
        AnimationKind::Off,
        AnimationKind::Pulse,
        AnimationKind::Cycle,
    ];

    /// Parse the CLI spelling: `off`, `pulse` or `cycle`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "off" => Some(Self::Off),
            "pulse" => Some(Self::Pulse),
            "cycle" => Some(Self::Cycle),
            _ => None,
        }
    }

    pub fn word(&self) -> u16 {
        *self as u16
    }
}

/// Who drives the backlight color.
///
/// The discriminants are the complete 16-bit words the firmware expects,
/// not flags to be shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum ControlMode {
    Software = 0x0600,
    Hardware = 0x0A00,
}

impl ControlMode {
    pub const ALL: &'static [ControlMode] = &[ControlMode::Software, ControlMode::Hardware];

    /// Parse the CLI spelling: `sw` or `hw`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sw" => Some(Self::Software),
            "hw" => Some(Self::Hardware),
            _ => None,
        }
    }

    pub fn word(&self) -> u16 {
        *self as u16
    }
}
