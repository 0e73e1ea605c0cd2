//! Mutable per-request line state
//!
//! One pricing run accumulates all of its mutations here. Lines live in a
//! dense vector, first-referenced order, with an id lookup on the side so
//! hot-loop discount application mutates by index instead of re-hashing.
//! Nothing in this module survives the request.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use shared::models::pricing::VariantPrice;
use shared::util::variant_gid;

use crate::money::to_decimal;

/// Batch price lookup result, keyed by fully-qualified item id.
pub type PriceMap = HashMap<String, VariantPrice>;

/// Working state for one cart line (or one granted gift line).
#[derive(Debug, Clone)]
pub struct LineState {
    pub item_id: String,
    pub quantity: u32,
    pub base_unit_price: Decimal,
    /// Identity-adjusted working price; campaigns read this, never base
    pub unit_price: Decimal,
    /// Money subtracted from this line so far (campaigns + promo)
    pub discount_total: Decimal,
    pub free_units: u32,
    pub applied_campaign_ids: Vec<String>,
    pub applied_campaign_labels: Vec<String>,
    pub applied_promo_code: Option<String>,
}

impl LineState {
    /// Current value of the line: working price × quantity − discounts.
    pub fn line_value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity) - self.discount_total
    }

    /// Units not yet marked free.
    pub fn paid_units(&self) -> u32 {
        self.quantity.saturating_sub(self.free_units)
    }

    /// Record a campaign on this line (id and label deduplicated).
    pub fn tag_campaign(&mut self, id: &str, label: &str) {
        if !self.applied_campaign_ids.iter().any(|c| c == id) {
            self.applied_campaign_ids.push(id.to_string());
        }
        if !label.is_empty() && !self.applied_campaign_labels.iter().any(|l| l == label) {
            self.applied_campaign_labels.push(label.to_string());
        }
    }
}

/// Arena of line state for one engine invocation.
#[derive(Debug, Default)]
pub struct LineBook {
    lines: Vec<LineState>,
    index: HashMap<String, usize>,
}

impl LineBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch-or-create the line for an item id, merging duplicate ids by
    /// summing quantity. New lines take their unit price from the resolved
    /// price map; an unresolved id prices at zero (degraded, not fatal).
    pub fn ensure_line(&mut self, raw_id: &str, quantity: u32, prices: &PriceMap) -> usize {
        let item_id = variant_gid(raw_id);
        if let Some(&idx) = self.index.get(&item_id) {
            self.lines[idx].quantity += quantity;
            return idx;
        }

        let amount = match prices.get(&item_id) {
            Some(price) => to_decimal(price.amount),
            None => {
                tracing::warn!(item_id = %item_id, "No price resolved for item, pricing at zero");
                Decimal::ZERO
            }
        };

        let idx = self.lines.len();
        self.lines.push(LineState {
            item_id: item_id.clone(),
            quantity,
            base_unit_price: amount,
            unit_price: amount,
            discount_total: Decimal::ZERO,
            free_units: 0,
            applied_campaign_ids: Vec::new(),
            applied_campaign_labels: Vec::new(),
            applied_promo_code: None,
        });
        self.index.insert(item_id, idx);
        idx
    }

    /// Index of an existing line for an item id, if any. Never creates.
    pub fn find(&self, raw_id: &str) -> Option<usize> {
        self.index.get(&variant_gid(raw_id)).copied()
    }

    pub fn get(&self, idx: usize) -> &LineState {
        &self.lines[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut LineState {
        &mut self.lines[idx]
    }

    pub fn lines(&self) -> &[LineState] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [LineState] {
        &mut self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Indices of lines whose item id is in the given set, in line order.
    /// Ids are normalized before matching; an empty set matches nothing.
    pub fn indices_matching(&self, item_ids: &[String]) -> Vec<usize> {
        if item_ids.is_empty() {
            return Vec::new();
        }
        let wanted: HashSet<String> = item_ids.iter().map(|id| variant_gid(id)).collect();
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| wanted.contains(&line.item_id))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Subtotal at working (identity-adjusted) prices, no discounts.
    pub fn working_subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum()
    }

    /// Subtotal at base prices.
    pub fn base_subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.base_unit_price * Decimal::from(line.quantity))
            .sum()
    }

    /// Sum of per-line accumulated discounts.
    pub fn discount_sum(&self) -> Decimal {
        self.lines.iter().map(|line| line.discount_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_map(entries: &[(&str, f64)]) -> PriceMap {
        entries
            .iter()
            .map(|(id, amount)| {
                (
                    variant_gid(id),
                    VariantPrice {
                        amount: *amount,
                        currency_code: "EUR".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_duplicate_ids_merge_quantity() {
        let prices = price_map(&[("1", 10.0)]);
        let mut book = LineBook::new();
        let a = book.ensure_line("1", 2, &prices);
        let b = book.ensure_line("gid://shop/ProductVariant/1", 3, &prices);
        assert_eq!(a, b);
        assert_eq!(book.get(a).quantity, 5);
        assert_eq!(book.lines().len(), 1);
    }

    #[test]
    fn test_missing_price_defaults_to_zero() {
        let prices = price_map(&[]);
        let mut book = LineBook::new();
        let idx = book.ensure_line("77", 1, &prices);
        assert_eq!(book.get(idx).unit_price, Decimal::ZERO);
    }

    #[test]
    fn test_indices_matching_normalizes_and_keeps_order() {
        let prices = price_map(&[("1", 1.0), ("2", 2.0), ("3", 3.0)]);
        let mut book = LineBook::new();
        book.ensure_line("1", 1, &prices);
        book.ensure_line("2", 1, &prices);
        book.ensure_line("3", 1, &prices);

        let matched = book.indices_matching(&["3".to_string(), "1".to_string()]);
        assert_eq!(matched, vec![0, 2]);
        assert!(book.indices_matching(&[]).is_empty());
    }

    #[test]
    fn test_line_value_subtracts_discounts() {
        let prices = price_map(&[("1", 10.0)]);
        let mut book = LineBook::new();
        let idx = book.ensure_line("1", 3, &prices);
        book.get_mut(idx).discount_total = Decimal::from(10);
        assert_eq!(book.get(idx).line_value(), Decimal::from(20));
    }
}
