//! Shipping and pickup configuration models
//!
//! Delivery selection is independent from campaign logic: a shipping
//! method maps to a flat-rate line, and pickup availability is a per-shop
//! settings document edited from the admin surface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Delivery methods offered at checkout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    Smartposti,
    Wolt,
    Pickup,
}

/// What the shopper picked in the delivery widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingSelection {
    pub method: ShippingMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_point_id: Option<String>,
}

/// Flat shipping line attached to the draft order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingLine {
    pub title: String,
    pub price: f64,
}

/// Display metadata for a pickup provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderMeta {
    pub title: String,
    pub logo: String,
}

/// Per-shop pickup configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickupConfig {
    /// Country codes the picker offers (ISO 3166-1 alpha-2)
    pub countries: Vec<String>,
    pub providers_by_country: HashMap<String, Vec<String>>,
    pub provider_meta: HashMap<String, ProviderMeta>,
}

impl Default for PickupConfig {
    fn default() -> Self {
        let countries: Vec<String> =
            ["EE", "LV", "LT", "FI"].into_iter().map(str::to_string).collect();
        let providers_by_country = countries
            .iter()
            .map(|c| (c.clone(), vec!["smartposti".to_string()]))
            .collect();
        let provider_meta = HashMap::from([(
            "smartposti".to_string(),
            ProviderMeta {
                title: "Smartposti parcel lockers".to_string(),
                logo: "https://production.parcely.app/images/itella.png".to_string(),
            },
        )]);

        Self {
            countries,
            providers_by_country,
            provider_meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_covers_all_countries() {
        let config = PickupConfig::default();
        assert_eq!(config.countries.len(), 4);
        for country in &config.countries {
            let providers = config.providers_by_country.get(country).unwrap();
            assert_eq!(providers, &vec!["smartposti".to_string()]);
        }
        assert!(config.provider_meta.contains_key("smartposti"));
    }

    #[test]
    fn test_shipping_method_serde_is_lowercase() {
        let json = serde_json::to_string(&ShippingMethod::Smartposti).unwrap();
        assert_eq!(json, "\"smartposti\"");
        let back: ShippingMethod = serde_json::from_str("\"pickup\"").unwrap();
        assert_eq!(back, ShippingMethod::Pickup);
    }
}
