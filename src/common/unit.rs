//! Length units and conversions.
//!
//! A [`Length`] is one of five variants (inches, points, centimeters,
//! millimeters, EMU). Every non-identity conversion goes through English
//! Metric Units, the integer unit DrawingML stores geometry in:
//! 1in = 914,400 EMU = 72pt = 2.54cm = 25.4mm.
//!
//! Anywhere a length is expected, a literal `(value, unit)` tuple is accepted
//! as well:
//!
//! ```rust
//! use slidecraft::common::unit::{Length, IN, PT, to_emu, to_points};
//!
//! assert_eq!(to_emu((1, IN)), Length::Emu(914_400));
//! assert_eq!(to_points(Length::Inches(1.0)), Length::Points(72));
//! assert_eq!(Length::Points(72), (1, IN).into());
//! assert_eq!(Length::Points(10) + (2, PT), Length::Points(12));
//! ```

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_MM: i64 = 36_000;
pub const EMUS_PER_PT: i64 = 12_700;

/// Font sizes are stored in hundredths of a point.
pub const CENTIPOINTS_PER_PT: i64 = 100;

/// Shorthand unit tags for literal lengths, e.g. `(1, IN)`.
pub const PT: Unit = Unit::Points;
pub const IN: Unit = Unit::Inches;
pub const CM: Unit = Unit::Centimeters;
pub const MM: Unit = Unit::Millimeters;
pub const EMU: Unit = Unit::Emu;

// Values this close to an integer are taken as that integer when an
// integral variant is produced, so 2.54cm -> 72pt survives float error.
const SNAP_EPSILON: f64 = 1e-9;

#[inline]
pub fn px_to_emu(px: u32, dpi: u32) -> i64 {
    ((px as f64) * EMUS_PER_INCH as f64 / dpi.max(1) as f64) as i64
}

#[inline]
pub fn emu_to_pt_f64(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

/// The unit tag of a [`Length`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Point (1/72 inch), integral
    Points,
    /// Inch
    Inches,
    /// Centimeter
    Centimeters,
    /// Millimeter
    Millimeters,
    /// English Metric Unit (1/914400 inch), integral
    Emu,
}

impl Unit {
    /// Get the unit abbreviation
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "pt",
            Self::Inches => "in",
            Self::Centimeters => "cm",
            Self::Millimeters => "mm",
            Self::Emu => "emu",
        }
    }

    #[inline]
    fn emus_per_unit(&self) -> f64 {
        match self {
            Self::Points => EMUS_PER_PT as f64,
            Self::Inches => EMUS_PER_INCH as f64,
            Self::Centimeters => EMUS_PER_CM as f64,
            Self::Millimeters => EMUS_PER_MM as f64,
            Self::Emu => 1.0,
        }
    }

    /// Whether lengths in this unit carry an integral value.
    #[inline]
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Points | Self::Emu)
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pt" => Ok(Self::Points),
            "in" => Ok(Self::Inches),
            "cm" => Ok(Self::Centimeters),
            "mm" => Ok(Self::Millimeters),
            "emu" => Ok(Self::Emu),
            other => Err(Error::UnsupportedUnit(other.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A length in one of the five supported units.
///
/// Equality and ordering compare the physical length, so
/// `Length::Inches(1.0) == Length::Points(72)`.
#[derive(Debug, Clone, Copy)]
pub enum Length {
    Inches(f64),
    Points(i64),
    Centimeters(f64),
    Millimeters(f64),
    Emu(i64),
}

/// Truncate toward zero, snapping values within rounding noise of an integer.
#[inline]
fn to_integral(value: f64) -> i64 {
    let nearest = value.round();
    if (value - nearest).abs() <= SNAP_EPSILON * nearest.abs().max(1.0) {
        nearest as i64
    } else {
        value.trunc() as i64
    }
}

impl Length {
    /// Create a length of `value` in `unit`.
    ///
    /// Integral units truncate fractional values toward zero.
    pub fn new(value: f64, unit: Unit) -> Self {
        match unit {
            Unit::Points => Self::Points(to_integral(value)),
            Unit::Inches => Self::Inches(value),
            Unit::Centimeters => Self::Centimeters(value),
            Unit::Millimeters => Self::Millimeters(value),
            Unit::Emu => Self::Emu(to_integral(value)),
        }
    }

    /// Create a length from a literal whose unit tag is a string.
    pub fn from_literal(value: f64, unit: &str) -> Result<Self> {
        Ok(Self::new(value, unit.parse()?))
    }

    #[inline]
    pub fn unit(&self) -> Unit {
        match self {
            Self::Inches(_) => Unit::Inches,
            Self::Points(_) => Unit::Points,
            Self::Centimeters(_) => Unit::Centimeters,
            Self::Millimeters(_) => Unit::Millimeters,
            Self::Emu(_) => Unit::Emu,
        }
    }

    /// The scalar carried by the variant.
    #[inline]
    pub fn value(&self) -> f64 {
        match *self {
            Self::Inches(v) | Self::Centimeters(v) | Self::Millimeters(v) => v,
            Self::Points(v) | Self::Emu(v) => v as f64,
        }
    }

    /// The length in EMU without truncation.
    #[inline]
    pub fn emu_f64(&self) -> f64 {
        match *self {
            Self::Emu(v) => v as f64,
            _ => self.value() * self.unit().emus_per_unit(),
        }
    }

    /// The length as an integral EMU count, the backend's unit.
    #[inline]
    pub fn emu(&self) -> i64 {
        match *self {
            Self::Emu(v) => v,
            _ => to_integral(self.emu_f64()),
        }
    }

    /// The length in points without truncation.
    #[inline]
    pub fn points_f64(&self) -> f64 {
        self.emu_f64() / EMUS_PER_PT as f64
    }

    /// Convert to the given unit. Converting to the current unit is the identity.
    pub fn to_unit(self, unit: Unit) -> Self {
        if self.unit() == unit {
            return self;
        }
        Self::new(self.emu_f64() / unit.emus_per_unit(), unit)
    }

    #[inline]
    pub fn to_points(self) -> Self {
        self.to_unit(Unit::Points)
    }

    #[inline]
    pub fn to_inches(self) -> Self {
        self.to_unit(Unit::Inches)
    }

    #[inline]
    pub fn to_centimeters(self) -> Self {
        self.to_unit(Unit::Centimeters)
    }

    #[inline]
    pub fn to_millimeters(self) -> Self {
        self.to_unit(Unit::Millimeters)
    }

    #[inline]
    pub fn to_emu(self) -> Self {
        self.to_unit(Unit::Emu)
    }

    /// The `(value, unit)` literal of this length.
    #[inline]
    pub fn to_literal(self) -> (f64, Unit) {
        (self.value(), self.unit())
    }

    fn with_value(self, value: f64) -> Self {
        Self::new(value, self.unit())
    }
}

/// Convert any length or literal to points.
#[inline]
pub fn to_points(length: impl Into<Length>) -> Length {
    length.into().to_points()
}

/// Convert any length or literal to inches.
#[inline]
pub fn to_inches(length: impl Into<Length>) -> Length {
    length.into().to_inches()
}

/// Convert any length or literal to centimeters.
#[inline]
pub fn to_centimeters(length: impl Into<Length>) -> Length {
    length.into().to_centimeters()
}

/// Convert any length or literal to millimeters.
#[inline]
pub fn to_millimeters(length: impl Into<Length>) -> Length {
    length.into().to_millimeters()
}

/// Convert any length or literal to EMU.
#[inline]
pub fn to_emu(length: impl Into<Length>) -> Length {
    length.into().to_emu()
}

impl Default for Length {
    fn default() -> Self {
        Self::Emu(0)
    }
}

macro_rules! impl_literal {
    ($($t:ty),*) => {
        $(
            impl From<($t, Unit)> for Length {
                #[inline]
                fn from((value, unit): ($t, Unit)) -> Self {
                    Length::new(value as f64, unit)
                }
            }

            impl TryFrom<($t, &str)> for Length {
                type Error = Error;

                #[inline]
                fn try_from((value, unit): ($t, &str)) -> Result<Self> {
                    Length::from_literal(value as f64, unit)
                }
            }
        )*
    };
}

impl_literal!(i32, i64, u32, f32, f64);

impl PartialEq for Length {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.emu_f64(), other.emu_f64());
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
    }
}

impl PartialOrd for Length {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        self.emu_f64().partial_cmp(&other.emu_f64())
    }
}

impl<T: Into<Length>> Add<T> for Length {
    type Output = Length;

    fn add(self, rhs: T) -> Length {
        let rhs = rhs.into().to_unit(self.unit());
        self.with_value(self.value() + rhs.value())
    }
}

impl<T: Into<Length>> Sub<T> for Length {
    type Output = Length;

    fn sub(self, rhs: T) -> Length {
        let rhs = rhs.into().to_unit(self.unit());
        self.with_value(self.value() - rhs.value())
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, rhs: f64) -> Length {
        self.with_value(self.value() * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;

    fn div(self, rhs: f64) -> Length {
        self.with_value(self.value() / rhs)
    }
}

impl Neg for Length {
    type Output = Length;

    fn neg(self) -> Length {
        self.with_value(-self.value())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Points(v) | Self::Emu(v) => write!(f, "{}{}", v, self.unit()),
            _ => write!(f, "{}{}", self.value(), self.unit()),
        }
    }
}

impl FromStr for Length {
    type Err = Error;

    /// Parse `"1in"`, `"72pt"`, `"2.54 cm"` and the like.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| Error::UnsupportedUnit(s.to_string()))?;
        let (number, unit) = s.split_at(split);
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| Error::UnsupportedUnit(s.to_string()))?;
        Length::from_literal(value, unit.trim())
    }
}

/// Anything accepted where a length is expected: a [`Length`], a
/// `(value, Unit)` pair, or a `(value, "unit")` literal checked on conversion.
pub trait IntoLength {
    fn into_length(self) -> Result<Length>;
}

impl<T> IntoLength for T
where
    T: TryInto<Length>,
    Error: From<T::Error>,
{
    #[inline]
    fn into_length(self) -> Result<Length> {
        Ok(self.try_into()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_conversions() {
        assert_eq!(to_emu(Length::Inches(1.0)), Length::Emu(914_400));
        assert_eq!(to_emu((1, IN)).emu(), 914_400);
        assert_eq!(to_points(to_centimeters(Length::Inches(1.0))), Length::Points(72));
        assert!(matches!(to_points(to_centimeters(Length::Inches(1.0))), Length::Points(72)));
        assert!(matches!(to_emu(Length::Points(1)), Length::Emu(12_700)));
        assert!(matches!(to_millimeters(Length::Centimeters(1.0)), Length::Millimeters(v) if (v - 10.0).abs() < 1e-9));
    }

    #[test]
    fn test_identity_conversion_returns_input() {
        let length = Length::Inches(1.234_567);
        match to_inches(length) {
            Length::Inches(v) => assert_eq!(v, 1.234_567),
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_integral_variants_truncate() {
        // 1mm = 2.834645...pt
        assert!(matches!(to_points(Length::Millimeters(1.0)), Length::Points(2)));
        assert!(matches!(to_points(Length::Millimeters(-1.0)), Length::Points(-2)));
        assert!(matches!(Length::new(10.9, PT), Length::Points(10)));
    }

    #[test]
    fn test_string_unit_tags() {
        assert_eq!(Length::try_from((1, "in")).unwrap().emu(), 914_400);
        assert!(matches!(Length::try_from((72, "pt")).unwrap(), Length::Points(72)));
        let err = Length::try_from((1, "furlong")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedUnit(ref u) if u == "furlong"));
    }

    #[test]
    fn test_parse_length() {
        assert_eq!("1in".parse::<Length>().unwrap(), Length::Points(72));
        assert!(matches!("2.54 cm".parse::<Length>().unwrap(), Length::Centimeters(_)));
        assert!("12".parse::<Length>().is_err());
        assert!("12px".parse::<Length>().is_err());
    }

    #[test]
    fn test_arithmetic_normalizes_to_left_variant() {
        let sum = Length::Inches(1.0) + (72, PT);
        assert!(matches!(sum, Length::Inches(v) if (v - 2.0).abs() < 1e-9));

        let diff = Length::Points(100) - Length::Inches(1.0);
        assert!(matches!(diff, Length::Points(28)));

        assert!(matches!(Length::Emu(10) * 2.5, Length::Emu(25)));
        assert!(matches!(Length::Centimeters(3.0) / 2.0, Length::Centimeters(v) if (v - 1.5).abs() < 1e-12));
        assert!(matches!(-Length::Points(5), Length::Points(-5)));
    }

    #[test]
    fn test_cross_variant_equality_and_order() {
        assert_eq!(Length::Centimeters(2.54), Length::Inches(1.0));
        assert_eq!(Length::Millimeters(25.4), Length::Emu(914_400));
        assert_ne!(Length::Points(1), Length::Emu(1));
        assert!(Length::Points(73) > Length::Inches(1.0));
        assert!(Length::Millimeters(1.0) < Length::Centimeters(1.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Length::Points(72).to_string(), "72pt");
        assert_eq!(Length::Inches(1.5).to_string(), "1.5in");
        assert_eq!(Length::Emu(5).to_string(), "5emu");
    }

    #[test]
    fn test_px_to_emu() {
        assert_eq!(px_to_emu(72, 72), EMUS_PER_INCH);
        assert_eq!(px_to_emu(96, 96), EMUS_PER_INCH);
        assert_eq!(px_to_emu(100, 72), 1_270_000);
    }

    #[test]
    fn test_into_length() {
        assert_eq!((1, "in").into_length().unwrap().emu(), EMUS_PER_INCH);
        assert_eq!((2.0, CM).into_length().unwrap(), Length::Centimeters(2.0));
        assert_eq!(Length::Points(3).into_length().unwrap(), Length::Points(3));
        assert!(matches!((1, "furlong").into_length(), Err(Error::UnsupportedUnit(_))));
    }

    fn any_length() -> impl Strategy<Value = Length> {
        prop_oneof![
            (-1000.0f64..1000.0).prop_map(Length::Inches),
            (-100_000i64..100_000).prop_map(Length::Points),
            (-1000.0f64..1000.0).prop_map(Length::Centimeters),
            (-10_000.0f64..10_000.0).prop_map(Length::Millimeters),
            (-10_000_000_000i64..10_000_000_000).prop_map(Length::Emu),
        ]
    }

    fn fractional_length() -> impl Strategy<Value = Length> {
        prop_oneof![
            (-1000.0f64..1000.0).prop_map(Length::Inches),
            (-1000.0f64..1000.0).prop_map(Length::Centimeters),
            (-10_000.0f64..10_000.0).prop_map(Length::Millimeters),
        ]
    }

    fn any_unit() -> impl Strategy<Value = Unit> {
        prop_oneof![Just(PT), Just(IN), Just(CM), Just(MM), Just(EMU)]
    }

    proptest! {
        #[test]
        fn conversion_is_idempotent(length in any_length(), unit in any_unit()) {
            let once = length.to_unit(unit);
            let twice = once.to_unit(unit);
            prop_assert_eq!(once.value(), twice.value());
            prop_assert_eq!(once.unit(), twice.unit());
        }

        #[test]
        fn addition_is_additive_through_emu(a in fractional_length(), b in any_length()) {
            let lhs = (a + b).emu_f64();
            let rhs = a.emu_f64() + b.emu_f64();
            prop_assert!((lhs - rhs).abs() <= 1e-6 * lhs.abs().max(rhs.abs()).max(1.0));
        }

        #[test]
        fn integral_addition_is_exact(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            prop_assert_eq!(to_emu(Length::Points(a) + Length::Points(b)).emu(), (a + b) * EMUS_PER_PT);
            prop_assert_eq!((Length::Emu(a) + Length::Points(b)).emu(), a + b * EMUS_PER_PT);
        }

        #[test]
        fn integral_literals_round_trip(value in -1_000_000i64..1_000_000) {
            prop_assert_eq!(Length::from((value, PT)).to_literal(), (value as f64, PT));
            prop_assert_eq!(Length::from((value, EMU)).to_literal(), (value as f64, EMU));
        }

        #[test]
        fn fractional_literals_round_trip(value in -1000.0f64..1000.0, unit in prop_oneof![Just(IN), Just(CM), Just(MM)]) {
            let length = Length::from((value, unit));
            let back = to_emu(length).to_unit(unit);
            prop_assert!((back.value() - value).abs() < 1e-4);
        }
    }
}
