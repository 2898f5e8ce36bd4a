//! Fixed-point price and quantity types
//!
//! Prices are 64-bit signed integers interpreted as fixed-point values with
//! scale 10^6 (`1.234567` <-> `1234567`). Integer arithmetic keeps matching
//! deterministic; conversions to and from IEEE-754 doubles truncate toward
//! zero and exist only for the gateway boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Default fixed-point scale: six decimal places
pub const PRICE_SCALE: i64 = 1_000_000;

/// Sum of `price * quantity` over fills, in raw fixed-point units
pub type ExecutedValue = i64;

/// Limit price with fixed-point representation
///
/// Serialized as its raw integer value to avoid any floating-point loss.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Wrap a raw fixed-point value
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Convert from a double, truncating toward zero at the default scale
    pub fn from_f64(value: f64) -> Self {
        Self::from_f64_with_scale(value, PRICE_SCALE)
    }

    /// Convert from a double, truncating toward zero at the given scale
    pub fn from_f64_with_scale(value: f64, scale: i64) -> Self {
        Self((value * scale as f64).trunc() as i64)
    }

    /// Convert to a double at the default scale
    pub fn to_f64(&self) -> f64 {
        self.to_f64_with_scale(PRICE_SCALE)
    }

    /// Convert to a double at the given scale
    pub fn to_f64_with_scale(&self, scale: i64) -> f64 {
        self.0 as f64 / scale as f64
    }

    /// Get the raw fixed-point value
    pub const fn raw(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// `price * quantity` in raw fixed-point units
    pub fn notional(&self, quantity: Quantity) -> ExecutedValue {
        self.0 * quantity.raw() as i64
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{}{}.{:06}",
            sign,
            abs / PRICE_SCALE as u64,
            abs % PRICE_SCALE as u64
        )
    }
}

/// Order quantity
///
/// Non-negative for all orders in valid states.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(i32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
