//! Time-bounded percentage discounts.

use chrono::{DateTime, Utc};
use common::to_stored_precision;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::error::ProductError;
use crate::money::Money;

/// A percentage discount valid over the half-open interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    percentage: BigRational,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Discount {
    /// Creates a discount.
    ///
    /// The percentage must lie in `(0, 100]`. Both bounds are truncated to
    /// microseconds, after which `end` must be strictly after `start`.
    pub fn new(
        percentage: BigRational,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ProductError> {
        if percentage.is_zero()
            || percentage.is_negative()
            || percentage > BigRational::from_integer(BigInt::from(100))
        {
            return Err(ProductError::InvalidDiscountPercentage);
        }
        let start = to_stored_precision(start);
        let end = to_stored_precision(end);
        if end <= start {
            return Err(ProductError::InvalidDiscountPeriod);
        }
        Ok(Self {
            percentage,
            start,
            end,
        })
    }

    pub fn percentage(&self) -> &BigRational {
        &self.percentage
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns true if `at` falls inside `[start, end)`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// Returns true once `at` has reached the end of the period.
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        at >= self.end
    }

    pub fn has_started(&self, at: DateTime<Utc>) -> bool {
        at >= self.start
    }

    /// Applies the percentage to `price`, regardless of the period.
    pub fn apply_to(&self, price: &Money) -> Money {
        price.apply_discount(&self.percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::rational;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn week_long(percent: i64) -> Discount {
        Discount::new(rational(percent, 1), t0(), t0() + Duration::days(7)).unwrap()
    }

    #[test]
    fn test_percentage_bounds() {
        let end = t0() + Duration::days(1);
        assert_eq!(
            Discount::new(rational(0, 1), t0(), end),
            Err(ProductError::InvalidDiscountPercentage)
        );
        assert_eq!(
            Discount::new(rational(-5, 1), t0(), end),
            Err(ProductError::InvalidDiscountPercentage)
        );
        assert_eq!(
            Discount::new(rational(10001, 100), t0(), end),
            Err(ProductError::InvalidDiscountPercentage)
        );
        assert!(Discount::new(rational(100, 1), t0(), end).is_ok());
        assert!(Discount::new(rational(1, 1000), t0(), end).is_ok());
    }

    #[test]
    fn test_end_must_follow_start() {
        assert_eq!(
            Discount::new(rational(10, 1), t0(), t0()),
            Err(ProductError::InvalidDiscountPeriod)
        );
        assert_eq!(
            Discount::new(rational(10, 1), t0(), t0() - Duration::seconds(1)),
            Err(ProductError::InvalidDiscountPeriod)
        );
    }

    #[test]
    fn test_sub_microsecond_window_is_rejected() {
        assert_eq!(
            Discount::new(rational(10, 1), t0(), t0() + Duration::nanoseconds(500)),
            Err(ProductError::InvalidDiscountPeriod)
        );
        assert_eq!(
            Discount::new(
                rational(10, 1),
                t0() + Duration::nanoseconds(100),
                t0() + Duration::nanoseconds(900)
            ),
            Err(ProductError::InvalidDiscountPeriod)
        );
    }

    #[test]
    fn test_bounds_are_kept_at_microsecond_precision() {
        let discount = Discount::new(
            rational(10, 1),
            t0() + Duration::nanoseconds(1_999),
            t0() + Duration::microseconds(5) + Duration::nanoseconds(1),
        )
        .unwrap();

        assert_eq!(discount.start(), t0() + Duration::microseconds(1));
        assert_eq!(discount.end(), t0() + Duration::microseconds(5));
    }

    #[test]
    fn test_validity_is_half_open() {
        let discount = week_long(20);
        let end = t0() + Duration::days(7);

        assert!(discount.is_valid_at(t0()));
        assert!(discount.is_valid_at(t0() + Duration::days(3)));
        assert!(!discount.is_valid_at(end));
        assert!(!discount.is_valid_at(t0() - Duration::seconds(1)));
        assert!(!discount.is_valid_at(end + Duration::days(1)));
    }

    #[test]
    fn test_expired_and_started() {
        let discount = week_long(20);
        let end = t0() + Duration::days(7);

        assert!(!discount.has_started(t0() - Duration::seconds(1)));
        assert!(discount.has_started(t0()));
        assert!(!discount.is_expired(end - Duration::seconds(1)));
        assert!(discount.is_expired(end));
    }

    #[test]
    fn test_apply_to_price() {
        let discount = week_long(20);
        assert_eq!(
            discount.apply_to(&Money::new(10000, 100)),
            Money::new(8000, 100)
        );
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(week_long(20), week_long(20));
        assert_ne!(week_long(20), week_long(25));
        assert_eq!(
            Discount::new(rational(25, 2), t0(), t0() + Duration::days(7)).unwrap(),
            Discount::new(rational(50, 4), t0(), t0() + Duration::days(7)).unwrap()
        );
    }
}
