//! Cart totals and free-shipping progress.

use super::optimistic::OptimisticCart;
use crate::domain::Money;

/// Distance to the free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeShippingProgress {
    pub threshold: Money,
    pub remaining: Money,
    pub qualified: bool,
    /// Progress toward the threshold, 0–100.
    pub percent: u8,
}

impl FreeShippingProgress {
    #[must_use]
    pub fn compute(subtotal: Money, threshold: Money) -> Self {
        let remaining = threshold.saturating_sub(subtotal);
        let qualified = remaining == Money::ZERO;

        let percent = if qualified || threshold.minor() <= 0 {
            100
        } else {
            let ratio = subtotal.minor().max(0) * 100 / threshold.minor();
            u8::try_from(ratio.min(100)).unwrap_or(100)
        };

        Self {
            threshold,
            remaining,
            qualified,
            percent,
        }
    }
}

/// Display totals for the cart drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub subtotal: Money,
    pub currency_code: String,
    /// Visible lines.
    pub line_count: usize,
    /// Sum of visible quantities.
    pub item_count: u32,
    /// Applicable discount codes only.
    pub applied_discounts: Vec<String>,
    pub free_shipping: FreeShippingProgress,
}

impl CartSummary {
    /// Summarizes the displayed (optimistic) cart.
    ///
    /// `fallback_currency` is used until the first server cart arrives.
    #[must_use]
    pub fn of(cart: &OptimisticCart, threshold: Money, fallback_currency: &str) -> Self {
        let lines = cart.display_lines();
        let subtotal = cart.subtotal();

        let currency_code = if cart.currency_code().is_empty() {
            fallback_currency.to_string()
        } else {
            cart.currency_code().to_string()
        };

        Self {
            subtotal,
            currency_code,
            line_count: lines.len(),
            item_count: lines.iter().map(|l| l.line.quantity).sum(),
            applied_discounts: cart.applied_discounts().map(|d| d.code.clone()).collect(),
            free_shipping: FreeShippingProgress::compute(subtotal, threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{LineEdit, OptimisticCart};
    use crate::domain::{Cart, CartLine, DiscountCode, LineId};
    use std::time::Instant;

    fn sample_cart() -> Cart {
        Cart {
            id: "c".into(),
            lines: vec![
                CartLine {
                    id: LineId::new("a"),
                    merchandise_id: "v1".into(),
                    title: "Scarf".into(),
                    quantity: 2,
                    unit_price: Money::from_major(60),
                    quantity_available: None,
                },
                CartLine {
                    id: LineId::new("b"),
                    merchandise_id: "v2".into(),
                    title: "Bag".into(),
                    quantity: 1,
                    unit_price: Money::from_major(150),
                    quantity_available: None,
                },
            ],
            discount_codes: vec![
                DiscountCode { code: "SPRING".into(), applicable: true },
                DiscountCode { code: "EXPIRED".into(), applicable: false },
            ],
            currency_code: "SAR".into(),
            checkout_url: None,
        }
    }

    #[test]
    fn progress_below_and_above_threshold() {
        let below = FreeShippingProgress::compute(Money::from_major(150), Money::from_major(300));
        assert!(!below.qualified);
        assert_eq!(below.remaining, Money::from_major(150));
        assert_eq!(below.percent, 50);

        let above = FreeShippingProgress::compute(Money::from_major(420), Money::from_major(300));
        assert!(above.qualified);
        assert_eq!(above.remaining, Money::ZERO);
        assert_eq!(above.percent, 100);
    }

    #[test]
    fn summary_follows_optimistic_display() {
        let mut cart = OptimisticCart::from_cart(sample_cart());
        let summary = CartSummary::of(&cart, Money::from_major(300), "SAR");
        assert_eq!(summary.subtotal, Money::from_major(270));
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.applied_discounts, vec!["SPRING".to_string()]);
        assert!(!summary.free_shipping.qualified);

        cart.submit(&LineId::new("b"), LineEdit::Remove, Instant::now()).unwrap();
        let summary = CartSummary::of(&cart, Money::from_major(300), "SAR");
        assert_eq!(summary.line_count, 1);
        assert_eq!(summary.subtotal, Money::from_major(120));
    }

    #[test]
    fn falls_back_to_configured_currency() {
        let summary = CartSummary::of(&OptimisticCart::new(), Money::from_major(300), "SAR");
        assert_eq!(summary.currency_code, "SAR");
        assert_eq!(summary.line_count, 0);
    }
}
