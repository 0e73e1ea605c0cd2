//! Pricing input and output types
//!
//! Request-scoped value objects: created for one pricing computation and
//! discarded after the response is built. Money values are `f64` rounded
//! to 2 decimal places by the engine.

use serde::{Deserialize, Serialize};

/// Raw cart line as submitted by the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// Bare numeric id or fully-qualified variant gid
    pub item_id: String,
    pub quantity: u32,
}

/// Everything the engine needs for one pricing run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PricingInput {
    pub items: Vec<LineItem>,
    /// Present for signed-in members; triggers the identity discount
    pub customer_id: Option<String>,
    pub promo_code: Option<String>,
    /// Gift picked by the shopper for a choice campaign, if any
    pub chosen_gift_item_id: Option<String>,
}

/// Unit price resolved by the price oracle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantPrice {
    pub amount: f64,
    pub currency_code: String,
}

/// One priced output line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedLine {
    pub item_id: String,
    pub quantity: u32,
    pub base_unit_price: f64,
    /// Unit price after the identity discount, before campaigns
    pub unit_price: f64,
    pub final_unit_price: f64,
    pub is_free: bool,
    pub free_units: u32,
    pub applied_campaign_ids: Vec<String>,
    pub applied_campaign_labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_promo_code: Option<String>,
}

/// Aggregate money breakdown; each total is independently rounded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PricingBreakdown {
    pub base_subtotal: f64,
    pub identity_discount_total: f64,
    pub campaign_discount_total: f64,
    pub promo_discount_total: f64,
    pub final_subtotal: f64,
}

/// Campaign that changed at least one line, in application order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedCampaign {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub label: String,
}

/// Pending gift choice: evaluation halted at this campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChoiceContext {
    pub campaign_id: String,
    pub label: String,
    pub valid_choice_ids: Vec<String>,
}

/// Engine output.
///
/// `needs_choice` is a first-class mid-flow state, not an error: the
/// caller re-submits with a chosen gift id to complete the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingResult {
    pub lines: Vec<PricedLine>,
    pub breakdown: PricingBreakdown,
    pub applied_campaigns: Vec<AppliedCampaign>,
    pub needs_choice: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_context: Option<ChoiceContext>,
    pub currency_code: String,
}
