//! Proportional discount distribution
//!
//! Splits an order-level discount across lines by current line value. The
//! last line takes the exact remainder instead of a rounded share, so the
//! allocated sum always equals the requested amount with no rounding
//! drift.

use rust_decimal::Decimal;

use super::line_state::LineBook;
use crate::money::round_money;

/// Distribute `amount` across all lines in the book, weighted by each
/// line's current value. Returns the total actually allocated.
///
/// The amount is capped at the remaining total line value. Free or
/// zero-value lines get no rounded share and no tag, except that the
/// last line in iteration order takes the exact remainder and so can
/// absorb leftover rounding cents even when its own value is zero. No
/// line ever receives a negative share.
pub fn distribute_discount(
    book: &mut LineBook,
    amount: Decimal,
    campaign: Option<(&str, &str)>,
) -> Decimal {
    if amount <= Decimal::ZERO || book.is_empty() {
        return Decimal::ZERO;
    }

    let total_value: Decimal = book.lines().iter().map(|line| line.line_value()).sum();
    if total_value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let capped = amount.min(total_value);
    let mut remaining = capped;
    let last = book.lines().len() - 1;

    for idx in 0..=last {
        let line_value = book.get(idx).line_value();
        let share = if idx == last {
            remaining
        } else {
            round_money(capped * line_value / total_value)
        };
        let share = share.min(remaining).max(Decimal::ZERO);

        if share > Decimal::ZERO {
            let line = book.get_mut(idx);
            line.discount_total += share;
            if let Some((id, label)) = campaign {
                line.tag_campaign(id, label);
            }
        }
        remaining -= share;
    }

    capped - remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::line_state::PriceMap;
    use shared::models::pricing::VariantPrice;
    use shared::util::variant_gid;

    fn book_with(prices: &[(&str, f64, u32)]) -> LineBook {
        let map: PriceMap = prices
            .iter()
            .map(|(id, amount, _)| {
                (
                    variant_gid(id),
                    VariantPrice {
                        amount: *amount,
                        currency_code: "EUR".into(),
                    },
                )
            })
            .collect();
        let mut book = LineBook::new();
        for (id, _, qty) in prices {
            book.ensure_line(id, *qty, &map);
        }
        book
    }

    #[test]
    fn test_allocation_sums_exactly() {
        // Weights 0.33 / 0.33 / 0.34 of 10.00 must land on 10.00 exactly.
        let mut book = book_with(&[("a", 33.0, 1), ("b", 33.0, 1), ("c", 34.0, 1)]);
        let allocated = distribute_discount(&mut book, Decimal::from(10), None);
        assert_eq!(allocated, Decimal::from(10));
        assert_eq!(book.discount_sum(), Decimal::from(10));
        assert_eq!(book.get(0).discount_total, Decimal::new(330, 2));
        assert_eq!(book.get(1).discount_total, Decimal::new(330, 2));
        assert_eq!(book.get(2).discount_total, Decimal::new(340, 2));
    }

    #[test]
    fn test_amount_capped_at_total_value() {
        let mut book = book_with(&[("a", 5.0, 1)]);
        let allocated = distribute_discount(&mut book, Decimal::from(50), None);
        assert_eq!(allocated, Decimal::from(5));
        assert_eq!(book.get(0).line_value(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_value_lines_get_no_share_or_tag() {
        let mut book = book_with(&[("a", 0.0, 1), ("b", 10.0, 1)]);
        let allocated =
            distribute_discount(&mut book, Decimal::from(4), Some(("camp", "Camp")));
        assert_eq!(allocated, Decimal::from(4));
        assert_eq!(book.get(0).discount_total, Decimal::ZERO);
        assert!(book.get(0).applied_campaign_ids.is_empty());
        assert_eq!(book.get(1).discount_total, Decimal::from(4));
        assert_eq!(book.get(1).applied_campaign_ids, vec!["camp".to_string()]);
    }

    #[test]
    fn test_fully_discounted_book_is_noop() {
        let mut book = book_with(&[("a", 5.0, 1)]);
        distribute_discount(&mut book, Decimal::from(5), None);
        let allocated = distribute_discount(&mut book, Decimal::from(3), None);
        assert_eq!(allocated, Decimal::ZERO);
    }

    #[test]
    fn test_nonpositive_amount_is_noop() {
        let mut book = book_with(&[("a", 5.0, 1)]);
        assert_eq!(distribute_discount(&mut book, Decimal::ZERO, None), Decimal::ZERO);
        assert_eq!(
            distribute_discount(&mut book, Decimal::from(-3), None),
            Decimal::ZERO
        );
    }
}
