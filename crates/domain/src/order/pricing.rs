//! GST pricing engine.
//!
//! Catalog prices are GST-inclusive at a fixed 18% rate, so the base price
//! has to be back-calculated from the gross: `base = gross / 1.18`. The
//! gross total is the literal sum of line totals and is what actually gets
//! charged; only the display-facing base/tax split is rounded.

use serde::{Deserialize, Serialize};

use super::{Money, OrderItem};

/// GST rate as a rational: gross = base * 118 / 100.
const GST_RATE_NUM: i64 = 118;
const GST_RATE_DEN: i64 = 100;

/// Result of splitting a GST-inclusive total into its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Base price excluding GST, rounded half-up to the paisa.
    pub base_price: Money,

    /// GST amount: gross minus base.
    pub tax_amount: Money,

    /// GST-inclusive total. Never rounded away from the literal sum.
    pub gross_total: Money,
}

/// Computes the price breakdown for a sequence of order items.
///
/// Pure and idempotent: the same items always yield the same breakdown, and
/// `base_price + tax_amount == gross_total` exactly.
pub fn compute_totals(items: &[OrderItem]) -> PriceBreakdown {
    let gross: Money = items
        .iter()
        .fold(Money::zero(), |sum, item| sum + item.total_price());

    let base_price = Money::from_paise(div_round_half_up(
        gross.paise() * GST_RATE_DEN,
        GST_RATE_NUM,
    ));
    let tax_amount = gross - base_price;

    PriceBreakdown {
        base_price,
        tax_amount,
        gross_total: gross,
    }
}

/// Integer division rounding half away from zero (round-half-up for the
/// non-negative amounts used here).
fn div_round_half_up(num: i64, den: i64) -> i64 {
    debug_assert!(den > 0);
    if num >= 0 {
        (2 * num + den) / (2 * den)
    } else {
        -((2 * -num + den) / (2 * den))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(lines: &[(i64, u32)]) -> Vec<OrderItem> {
        lines
            .iter()
            .enumerate()
            .map(|(i, (price, qty))| {
                OrderItem::new(
                    format!("SKU-{i:03}"),
                    format!("Product {i}"),
                    *qty,
                    Money::from_paise(*price),
                )
            })
            .collect()
    }

    #[test]
    fn gst_split_for_118_rupees() {
        let breakdown = compute_totals(&items(&[(11800, 1)]));
        assert_eq!(breakdown.base_price, Money::from_paise(10000));
        assert_eq!(breakdown.tax_amount, Money::from_paise(1800));
        assert_eq!(breakdown.gross_total, Money::from_paise(11800));
    }

    #[test]
    fn gross_is_literal_sum_of_line_totals() {
        let breakdown = compute_totals(&items(&[(9999, 3), (1500, 2)]));
        assert_eq!(breakdown.gross_total.paise(), 9999 * 3 + 1500 * 2);
    }

    #[test]
    fn base_plus_tax_equals_gross() {
        for paise in [1, 99, 100, 117, 118, 119, 9999, 123_456_789] {
            let breakdown = compute_totals(&items(&[(paise, 1)]));
            assert_eq!(
                breakdown.base_price + breakdown.tax_amount,
                breakdown.gross_total,
                "failed for {paise} paise"
            );
        }
    }

    #[test]
    fn compute_totals_is_idempotent() {
        let lines = items(&[(11800, 2), (2360, 1)]);
        let first = compute_totals(&lines);
        let second = compute_totals(&lines);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_items_yield_zero_breakdown() {
        let breakdown = compute_totals(&[]);
        assert!(breakdown.gross_total.is_zero());
        assert!(breakdown.base_price.is_zero());
        assert!(breakdown.tax_amount.is_zero());
    }

    #[test]
    fn rounding_is_half_up() {
        // 100 paise gross: base = 100/1.18 = 84.745.. rounds to 85
        let breakdown = compute_totals(&items(&[(100, 1)]));
        assert_eq!(breakdown.base_price.paise(), 85);
        assert_eq!(breakdown.tax_amount.paise(), 15);
    }

    #[test]
    fn div_round_half_up_at_midpoint() {
        assert_eq!(div_round_half_up(5, 2), 3);
        assert_eq!(div_round_half_up(3, 2), 2);
        assert_eq!(div_round_half_up(4, 2), 2);
    }
}
