//! Draft order exchange types
//!
//! The order assembly gateway consumes the engine's output plus the
//! delivery selection and returns a handle to the created draft.

use serde::{Deserialize, Serialize};

use super::pricing::{AppliedCampaign, PricedLine, PricingBreakdown};
use super::shipping::{ShippingLine, ShippingSelection};

/// Everything attached to a platform draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrderRequest {
    /// Existing draft to update in place, if the client already holds one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_order_id: Option<String>,
    pub lines: Vec<PricedLine>,
    pub currency_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_line: Option<ShippingLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_selection: Option<ShippingSelection>,
    pub breakdown: PricingBreakdown,
    pub applied_campaigns: Vec<AppliedCampaign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

/// Handle returned by the platform once the draft exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftOrderHandle {
    pub draft_order_id: Option<String>,
    pub invoice_url: Option<String>,
}
