//! Promo code descriptor
//!
//! Normalized form of whatever the platform's discount API returns for a
//! code. The promo oracle resolves a code string to this or nothing.

use serde::{Deserialize, Serialize};

use super::campaign::DiscountKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromoDiscount {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    /// Percent (10 = 10%) or fixed amount in store currency
    pub value: f64,
    /// Whether the platform allows combining with other discounts
    pub stackable: bool,
}
