use smart_leds::RGB8;
use thiserror_no_std::Error;

pub type Rgb = RGB8;

/// Errors produced while converting a hex string into a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HexColorError {
    #[error("hex color must have 6 digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

/// Convert a `#RRGGBB` (or bare `RRGGBB`) string into a color.
///
/// Surrounding whitespace is ignored and digits are case-insensitive.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, HexColorError> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(HexColorError::InvalidLength(digits.chars().count()));
    }

    let bytes = digits.as_bytes();
    Ok(Rgb::new(
        hex_pair(bytes[0], bytes[1])?,
        hex_pair(bytes[2], bytes[3])?,
        hex_pair(bytes[4], bytes[5])?,
    ))
}

fn hex_pair(high: u8, low: u8) -> Result<u8, HexColorError> {
    Ok((hex_digit(high)? << 4) | hex_digit(low)?)
}

fn hex_digit(digit: u8) -> Result<u8, HexColorError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(HexColorError::InvalidDigit(char::from(digit))),
    }
}
