//! `#RRGGBB` palette colors.

use crate::foundation::math::scale_u8;

/// Straight (non-premultiplied) 8-bit RGB triple, one byte per output channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// All channels off.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// All channels full; also the fallback for unparseable colors.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Build a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (case-insensitive, `#` optional), falling back to white.
    pub fn from_hex_or_white(s: &str) -> Self {
        parse_hex(s).unwrap_or(Self::WHITE)
    }

    /// Multiply every component by `intensity` (clamped to `[0, 1]`), flooring the result.
    pub fn scaled(self, intensity: f64) -> Self {
        Self {
            r: scale_u8(self.r, intensity),
            g: scale_u8(self.g, intensity),
            b: scale_u8(self.b, intensity),
        }
    }

    /// Components in channel order.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Parse a `#RRGGBB` color string.
pub fn parse_hex(s: &str) -> Result<Rgb8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }

    Ok(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

#[cfg(test)]
#[path = "../tests/unit/color.rs"]
mod tests;
