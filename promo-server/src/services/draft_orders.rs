//! Order assembly gateway
//!
//! Consumes the engine's output plus the delivery selection and turns it
//! into a platform draft order. Creation and update-in-place share one
//! seam; the request carries the existing draft id when the client
//! already holds one.

use async_trait::async_trait;
use shared::models::draft::{DraftOrderHandle, DraftOrderRequest};
use shared::models::pricing::PricingResult;
use shared::models::shipping::{ShippingLine, ShippingSelection};

use super::PlatformError;

#[async_trait]
pub trait DraftOrderGateway: Send + Sync {
    /// Create the draft, or update it in place when the request names an
    /// existing draft order id.
    async fn upsert(&self, request: &DraftOrderRequest) -> Result<DraftOrderHandle, PlatformError>;
}

/// Assemble the gateway request from a completed pricing run.
pub fn build_draft_request(
    draft_order_id: Option<String>,
    pricing: &PricingResult,
    shipping_line: Option<ShippingLine>,
    shipping_selection: Option<ShippingSelection>,
    promo_code: Option<String>,
) -> DraftOrderRequest {
    DraftOrderRequest {
        draft_order_id,
        lines: pricing.lines.clone(),
        currency_code: pricing.currency_code.clone(),
        shipping_line,
        shipping_selection,
        breakdown: pricing.breakdown,
        applied_campaigns: pricing.applied_campaigns.clone(),
        promo_code,
    }
}
