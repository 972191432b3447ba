//! Stateless pricing helpers.

use chrono::{DateTime, Utc};
use num_rational::BigRational;

use crate::money::Money;
use crate::product::Product;

/// Returns `base_price` reduced by `percentage` percent, or unchanged when no
/// percentage is given.
pub fn discounted_price(base_price: &Money, percentage: Option<&BigRational>) -> Money {
    match percentage {
        Some(percentage) => base_price.apply_discount(percentage),
        None => base_price.clone(),
    }
}

/// Returns how much `percentage` percent takes off `base_price`.
pub fn discount_amount(base_price: &Money, percentage: Option<&BigRational>) -> Money {
    match percentage {
        Some(percentage) => base_price.calculate_percentage(percentage),
        None => Money::zero(),
    }
}

/// Returns what a customer saves on `product` at `at`; zero when no discount
/// is valid then.
pub fn savings(product: &Product, at: DateTime<Utc>) -> Money {
    match product.discount() {
        Some(discount) if discount.is_valid_at(at) => {
            discount_amount(product.base_price(), Some(discount.percentage()))
        }
        _ => Money::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateRoot;
    use crate::discount::Discount;
    use crate::money::rational;
    use chrono::{Duration, TimeZone};
    use common::ProductId;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 10, 8, 0, 0).unwrap()
    }

    fn discounted_product() -> Product {
        let mut product = Product::new(
            ProductId::new("p-1"),
            "Lamp",
            "",
            "Home",
            Money::new(4999, 100),
            t0(),
        )
        .unwrap();
        product.activate(t0()).unwrap();
        let discount = Discount::new(rational(10, 1), t0(), t0() + Duration::days(2)).unwrap();
        product.apply_discount(discount, t0()).unwrap();
        product.mark_committed();
        product
    }

    #[test]
    fn test_discounted_price() {
        let base = Money::new(200, 1);
        assert_eq!(
            discounted_price(&base, Some(&rational(25, 1))),
            Money::new(150, 1)
        );
        assert_eq!(discounted_price(&base, None), base);
    }

    #[test]
    fn test_discount_amount() {
        let base = Money::new(200, 1);
        assert_eq!(
            discount_amount(&base, Some(&rational(25, 1))),
            Money::new(50, 1)
        );
        assert!(discount_amount(&base, None).is_zero());
    }

    #[test]
    fn test_savings_inside_and_outside_window() {
        let product = discounted_product();

        assert_eq!(savings(&product, t0()), Money::new(4999, 1000));
        assert!(savings(&product, t0() + Duration::days(2)).is_zero());
        assert_eq!(
            product.effective_price(t0()).add(&savings(&product, t0())),
            *product.base_price()
        );
    }
}
