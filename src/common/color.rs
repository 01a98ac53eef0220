//! RGB colors and literal-color parsing.
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// RGB color representation.
///
/// Represents a color using red, green, and blue components, each in the range 0-255.
///
/// # Examples
///
/// ```rust
/// use slidecraft::common::RGBColor;
///
/// let red = RGBColor::new(255, 0, 0);
/// let short: RGBColor = "#1a2".parse().unwrap();
/// assert_eq!(short, RGBColor::from_hex("#11aa22").unwrap());
/// assert_eq!(RGBColor::from_components(&[255, 0, 0]).unwrap(), red);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    pub const BLACK: RGBColor = RGBColor::new(0, 0, 0);
    pub const WHITE: RGBColor = RGBColor::new(255, 255, 255);

    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an RGB color from a hex literal.
    ///
    /// The literal must start with `#` and be either `#RGB` (each nibble is
    /// doubled, so `#1a2` is `#11aa22`) or `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || Error::InvalidColorFormat(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        match digits.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|n| n * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
            },
            6 => Self::from_rrggbb(digits).ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }

    /// Parse the bare `RRGGBB` form DrawingML stores in `srgbClr/@val`.
    pub fn from_rrggbb(digits: &str) -> Option<Self> {
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }

    /// Create a color from an RGB or RGBA component slice.
    ///
    /// The alpha component of an RGBA tuple is validated but not kept.
    pub fn from_components(components: &[i64]) -> Result<Self> {
        if !(3..=4).contains(&components.len()) {
            return Err(Error::InvalidColorTupleSize(components.len()));
        }
        let mut channels = [0u8; 4];
        for (slot, &value) in channels.iter_mut().zip(components) {
            *slot = u8::try_from(value).map_err(|_| Error::InvalidColorValue(value))?;
        }
        Ok(Self::new(channels[0], channels[1], channels[2]))
    }

    /// Convert to the uppercase `RRGGBB` form used in DrawingML.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for RGBColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<&str> for RGBColor {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<(i64, i64, i64)> for RGBColor {
    type Error = Error;

    fn try_from((r, g, b): (i64, i64, i64)) -> Result<Self> {
        Self::from_components(&[r, g, b])
    }
}

impl TryFrom<(i64, i64, i64, i64)> for RGBColor {
    type Error = Error;

    fn try_from((r, g, b, a): (i64, i64, i64, i64)) -> Result<Self> {
        Self::from_components(&[r, g, b, a])
    }
}

impl TryFrom<&[i64]> for RGBColor {
    type Error = Error;

    fn try_from(components: &[i64]) -> Result<Self> {
        Self::from_components(components)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Anything accepted where a color is expected: an [`RGBColor`], a hex
/// literal, or a component tuple.
pub trait IntoColor {
    fn into_color(self) -> Result<RGBColor>;
}

impl<T> IntoColor for T
where
    T: TryInto<RGBColor>,
    Error: From<T::Error>,
{
    #[inline]
    fn into_color(self) -> Result<RGBColor> {
        Ok(self.try_into()?)
    }
}
