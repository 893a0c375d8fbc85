//! Safety layer: validates all user input before a device is even opened.
//!
//! ## Color channels
//! - **Range**: 0 – 255 per channel
//! - **Syntax**: decimal (`128`) or hexadecimal with a `0x`/`0X` prefix (`0x80`)
//!
//! ## Profiles
//! - **Range**: 1 – 3, decimal only
//! - **Note**: 0 addresses the active color on the wire and is never a valid
//!   user-supplied profile; omit the option to target the active color.
//!
//! ## Modes
//! - Color mode: `true`, `max`
//! - Animation: `off`, `pulse`, `cycle`
//! - Control: `sw`, `hw`
//!
//! Every invalid value is rejected here as [`Error::InvalidArgument`], so no
//! invalid data ever reaches a control transfer.

use crate::device::{AnimationKind, Color, ColorMode, ControlMode, ProfileSlot, ProfileTarget};
use crate::error::{Error, Result};

/// Parse one color channel.
pub fn parse_channel(text: &str) -> Result<u8> {
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) if hex.starts_with(|c: char| c.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).ok()
        }
        Some(_) => None,
        None if text.starts_with(|c: char| c.is_ascii_digit()) => text.parse::<u32>().ok(),
        None => None,
    };

    parsed
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| Error::InvalidArgument(format!("invalid color value: {text}")))
}

/// Parse three channels in red, green, blue order.
pub fn parse_color(red: &str, green: &str, blue: &str) -> Result<Color> {
    Ok(Color::new(
        parse_channel(red)?,
        parse_channel(green)?,
        parse_channel(blue)?,
    ))
}

/// Parse a user-supplied profile number.
pub fn parse_profile(text: &str) -> Result<ProfileTarget> {
    let number = text
        .parse::<u8>()
        .map_err(|_| Error::InvalidArgument(format!("invalid profile value: {text}")))?;
    let slot = ProfileSlot::new(number)
        .map_err(|_| Error::InvalidArgument(format!("invalid profile value: {text}")))?;
    Ok(ProfileTarget::Profile(slot))
}

pub fn parse_color_mode(text: &str) -> Result<ColorMode> {
    ColorMode::from_name(text)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid color mode: {text}")))
}

pub fn parse_animation(text: &str) -> Result<AnimationKind> {
    AnimationKind::from_name(text)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid animation: {text}")))
}

pub fn parse_control(text: &str) -> Result<ControlMode> {
    ControlMode::from_name(text)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid control mode: {text}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_channel_decimal() {
        assert_eq!(parse_channel("0").unwrap(), 0);
        assert_eq!(parse_channel("128").unwrap(), 128);
        assert_eq!(parse_channel("255").unwrap(), 255);
    }

    #[test]
    fn parse_channel_hex() {
        assert_eq!(parse_channel("0xff").unwrap(), 255);
        assert_eq!(parse_channel("0XFF").unwrap(), 255);
        assert_eq!(parse_channel("0x10").unwrap(), 16);
        assert_eq!(parse_channel("0x0").unwrap(), 0);
    }

    #[test]
    fn parse_channel_rejects_out_of_range() {
        assert!(parse_channel("256").is_err());
        assert!(parse_channel("0x100").is_err());
        assert!(parse_channel("-1").is_err());
        assert!(parse_channel("99999999999").is_err());
    }

    #[test]
    fn parse_channel_rejects_garbage() {
        assert!(parse_channel("").is_err());
        assert!(parse_channel("0x").is_err());
        assert!(parse_channel("12a").is_err());
        assert!(parse_channel("red").is_err());
        assert!(parse_channel(" 12").is_err());
    }

    #[test]
    fn parse_channel_rejects_signs() {
        assert!(parse_channel("0x+5").is_err());
        assert!(parse_channel("0x-5").is_err());
        assert!(parse_channel("+5").is_err());
        assert!(parse_channel("0X+ff").is_err());
    }

    #[test]
    fn parse_channel_error_names_input() {
        let err = parse_channel("300").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("300"));
    }

    #[test]
    fn parse_color_keeps_channel_order() {
        assert_eq!(
            parse_color("255", "0", "0x80").unwrap(),
            Color::new(255, 0, 128)
        );
        assert!(parse_color("1", "2", "x").is_err());
    }

    #[test]
    fn parse_profile_accepts_one_to_three() {
        for n in 1..=3u8 {
            let target = parse_profile(&n.to_string()).unwrap();
            assert_eq!(target.selector(), n);
        }
    }

    #[test]
    fn parse_profile_rejects_zero() {
        assert!(matches!(parse_profile("0"), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn parse_profile_rejects_out_of_range_and_garbage() {
        assert!(parse_profile("4").is_err());
        assert!(parse_profile("-1").is_err());
        assert!(parse_profile("0x2").is_err());
        assert!(parse_profile("two").is_err());
        assert!(parse_profile("").is_err());
    }

    #[test]
    fn parse_modes() {
        assert_eq!(parse_color_mode("max").unwrap(), ColorMode::MaxBrightness);
        assert_eq!(parse_animation("cycle").unwrap(), AnimationKind::Cycle);
        assert_eq!(parse_control("hw").unwrap(), ControlMode::Hardware);
        assert!(parse_color_mode("dim").is_err());
        assert!(parse_animation("strobe").is_err());
        assert!(parse_control("auto").is_err());
    }
}
