//! Shared types for the promotions service
//!
//! Data models exchanged between the server, the admin surface and the
//! storefront widgets: campaign definitions, pricing input/output types,
//! promo descriptors and shipping/pickup configuration.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::campaign::{Campaign, CampaignKind, DiscountKind, DiscountTerms};
pub use models::draft::{DraftOrderHandle, DraftOrderRequest};
pub use models::pricing::{
    AppliedCampaign, ChoiceContext, LineItem, PricedLine, PricingBreakdown, PricingInput,
    PricingResult, VariantPrice,
};
pub use models::promo::PromoDiscount;
pub use models::shipping::{PickupConfig, ShippingLine, ShippingMethod, ShippingSelection};
