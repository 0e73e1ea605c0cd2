//! Free-unit allocation
//!
//! Marks the cheapest currently-paid units across a set of lines as free.
//! One pool entry per paid unit, stable sort by unit price ascending, so
//! ties keep line order then unit order.

use rust_decimal::Decimal;

use super::line_state::LineBook;

/// Mark `free_count` cheapest paid units free across `line_indices`.
/// Returns the number of units actually freed.
///
/// Each freed unit adds its current unit price to the line's discount
/// total, bumps the line's free-unit count and tags the campaign.
pub fn apply_free_units(
    book: &mut LineBook,
    line_indices: &[usize],
    free_count: u32,
    campaign_id: &str,
    campaign_label: &str,
) -> u32 {
    if free_count == 0 {
        return 0;
    }

    let mut unit_pool: Vec<(usize, Decimal)> = Vec::new();
    for &idx in line_indices {
        let line = book.get(idx);
        for _ in 0..line.paid_units() {
            unit_pool.push((idx, line.unit_price));
        }
    }

    unit_pool.sort_by(|a, b| a.1.cmp(&b.1));

    let mut freed = 0;
    for &(idx, unit_price) in unit_pool.iter().take(free_count as usize) {
        let line = book.get_mut(idx);
        line.discount_total += unit_price;
        line.free_units += 1;
        line.tag_campaign(campaign_id, campaign_label);
        freed += 1;
    }
    freed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::line_state::PriceMap;
    use shared::models::pricing::VariantPrice;
    use shared::util::variant_gid;

    fn book_with(prices: &[(&str, f64, u32)]) -> (LineBook, Vec<usize>) {
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
        let indices = prices
            .iter()
            .map(|(id, _, qty)| book.ensure_line(id, *qty, &map))
            .collect();
        (book, indices)
    }

    #[test]
    fn test_cheapest_units_freed_first() {
        // Prices [5, 3, 8, 3]: freeing 2 units must pick the two 3s.
        let (mut book, indices) = book_with(&[("a", 5.0, 1), ("b", 3.0, 1), ("c", 8.0, 1), ("d", 3.0, 1)]);
        apply_free_units(&mut book, &indices, 2, "camp", "Camp");

        assert_eq!(book.get(indices[1]).free_units, 1);
        assert_eq!(book.get(indices[3]).free_units, 1);
        assert_eq!(book.get(indices[0]).free_units, 0);
        assert_eq!(book.get(indices[2]).free_units, 0);
        assert_eq!(book.discount_sum(), Decimal::from(6));
    }

    #[test]
    fn test_already_free_units_are_not_pooled() {
        let (mut book, indices) = book_with(&[("a", 2.0, 2)]);
        apply_free_units(&mut book, &indices, 1, "c1", "C1");
        apply_free_units(&mut book, &indices, 1, "c2", "C2");
        // Second pass only sees one remaining paid unit.
        assert_eq!(book.get(indices[0]).free_units, 2);
        assert_eq!(book.discount_sum(), Decimal::from(4));

        apply_free_units(&mut book, &indices, 1, "c3", "C3");
        assert_eq!(book.get(indices[0]).free_units, 2);
    }

    #[test]
    fn test_equal_prices_keep_line_order() {
        let (mut book, indices) = book_with(&[("a", 3.0, 1), ("b", 3.0, 1)]);
        apply_free_units(&mut book, &indices, 1, "camp", "Camp");
        assert_eq!(book.get(indices[0]).free_units, 1);
        assert_eq!(book.get(indices[1]).free_units, 0);
    }

    #[test]
    fn test_zero_free_count_is_noop() {
        let (mut book, indices) = book_with(&[("a", 3.0, 2)]);
        apply_free_units(&mut book, &indices, 0, "camp", "Camp");
        assert_eq!(book.discount_sum(), Decimal::ZERO);
        assert!(book.get(indices[0]).applied_campaign_ids.is_empty());
    }
}
