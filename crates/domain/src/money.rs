//! Exact monetary values.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

/// Builds a reduced rational from a numerator and denominator.
///
/// A zero denominator is treated as 1, mirroring [`Money::new`].
pub fn rational(numerator: i64, denominator: i64) -> BigRational {
    let denominator = if denominator == 0 { 1 } else { denominator };
    BigRational::new(BigInt::from(numerator), BigInt::from(denominator))
}

fn hundred() -> BigRational {
    BigRational::from_integer(BigInt::from(100))
}

/// Money amount held as a reduced rational number.
///
/// No operation ever rounds; rounding happens only when a display string is
/// requested. `Money::new(1999, 100)` is 19.99 and equals
/// `Money::new(3998, 200)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    amount: BigRational,
}

impl Money {
    /// Creates a Money amount from a numerator and denominator.
    ///
    /// A zero denominator is silently corrected to 1.
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            amount: rational(numerator, denominator),
        }
    }

    /// Creates a Money amount from an existing rational.
    pub fn from_ratio(amount: BigRational) -> Self {
        Self { amount }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self {
            amount: BigRational::zero(),
        }
    }

    /// Returns the underlying rational.
    pub fn amount(&self) -> &BigRational {
        &self.amount
    }

    /// Returns the reduced numerator, if it fits in an `i64`.
    pub fn numerator(&self) -> Option<i64> {
        self.amount.numer().to_i64()
    }

    /// Returns the reduced (always positive) denominator, if it fits in an `i64`.
    pub fn denominator(&self) -> Option<i64> {
        self.amount.denom().to_i64()
    }

    /// Returns `(numerator, denominator)` when both fit in an `i64`.
    pub fn parts(&self) -> Option<(i64, i64)> {
        Some((self.numerator()?, self.denominator()?))
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    /// Adds another money amount.
    pub fn add(&self, other: &Money) -> Money {
        Money::from_ratio(&self.amount + &other.amount)
    }

    /// Subtracts another money amount.
    pub fn subtract(&self, other: &Money) -> Money {
        Money::from_ratio(&self.amount - &other.amount)
    }

    /// Multiplies by a rational factor.
    pub fn multiply(&self, factor: &BigRational) -> Money {
        Money::from_ratio(&self.amount * factor)
    }

    /// Returns `percentage` percent of this amount (20 means 20%).
    pub fn calculate_percentage(&self, percentage: &BigRational) -> Money {
        self.multiply(&(percentage / hundred()))
    }

    /// Returns this amount reduced by `percentage` percent.
    pub fn apply_discount(&self, percentage: &BigRational) -> Money {
        self.subtract(&self.calculate_percentage(percentage))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

/// Two-decimal rendering, rounded half away from zero.
impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cents = (&self.amount * hundred()).round().to_integer();
        let sign = if cents.is_negative() { "-" } else { "" };
        let cents = cents.abs();
        let whole = &cents / BigInt::from(100);
        let fraction = (&cents % BigInt::from(100)).to_u8().unwrap_or(0);
        write!(f, "{sign}{whole}.{fraction:02}")
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money::from_ratio(self.amount + rhs.amount)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::from_ratio(self.amount - rhs.amount)
    }
}
