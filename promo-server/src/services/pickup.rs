//! Pickup configuration service
//!
//! The pickup document (countries, providers, provider metadata) is read
//! by the storefront widget on every cart render, so successful reads are
//! cached per shop domain. A failed read serves the built-in default and
//! flags the response as degraded.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use shared::models::shipping::PickupConfig;

use super::{PlatformError, SettingsStore};

const PICKUP_KEY: &str = "pickup.config";

pub struct PickupService {
    store: Arc<dyn SettingsStore>,
    shop_domain: String,
    cache: DashMap<String, PickupConfig>,
}

impl PickupService {
    pub fn new(store: Arc<dyn SettingsStore>, shop_domain: impl Into<String>) -> Self {
        Self {
            store,
            shop_domain: shop_domain.into(),
            cache: DashMap::new(),
        }
    }

    /// Current pickup config. The second value is true when the store
    /// could not be read and the default is served instead.
    pub async fn load(&self) -> (PickupConfig, bool) {
        if let Some(cached) = self.cache.get(&self.shop_domain) {
            return (cached.clone(), false);
        }

        match self.store.read_document(PICKUP_KEY).await {
            Ok(Some(raw)) => {
                let config = parse_config(&raw);
                self.cache.insert(self.shop_domain.clone(), config.clone());
                (config, false)
            }
            Ok(None) => {
                let config = PickupConfig::default();
                self.cache.insert(self.shop_domain.clone(), config.clone());
                (config, false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Pickup config read failed, serving default");
                (PickupConfig::default(), true)
            }
        }
    }

    pub async fn save(&self, config: &PickupConfig) -> Result<(), PlatformError> {
        let document =
            serde_json::to_value(config).map_err(|e| PlatformError::Decode(e.to_string()))?;
        self.store.write_document(PICKUP_KEY, &document).await?;
        self.cache.insert(self.shop_domain.clone(), config.clone());
        tracing::info!(countries = config.countries.len(), "Pickup config saved");
        Ok(())
    }
}

fn parse_config(raw: &Value) -> PickupConfig {
    match serde_json::from_value(raw.clone()) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Stored pickup config is malformed, using default");
            PickupConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::MemorySettings;
    use super::*;

    #[tokio::test]
    async fn test_missing_document_serves_default_without_degradation() {
        let service = PickupService::new(Arc::new(MemorySettings::default()), "shop.example");
        let (config, degraded) = service.load().await;
        assert_eq!(config, PickupConfig::default());
        assert!(!degraded);
    }

    #[tokio::test]
    async fn test_read_failure_is_flagged_degraded() {
        let settings = MemorySettings {
            fail_reads: true,
            ..Default::default()
        };
        let service = PickupService::new(Arc::new(settings), "shop.example");
        let (config, degraded) = service.load().await;
        assert_eq!(config, PickupConfig::default());
        assert!(degraded);
    }

    #[tokio::test]
    async fn test_malformed_document_falls_back_to_default() {
        let settings = MemorySettings::with_document(PICKUP_KEY, json!("not an object"));
        let service = PickupService::new(Arc::new(settings), "shop.example");
        let (config, degraded) = service.load().await;
        assert_eq!(config, PickupConfig::default());
        assert!(!degraded);
    }

    #[tokio::test]
    async fn test_save_updates_cache() {
        let service = PickupService::new(Arc::new(MemorySettings::default()), "shop.example");
        let mut config = PickupConfig::default();
        config.countries.push("SE".to_string());
        service.save(&config).await.unwrap();

        let (loaded, degraded) = service.load().await;
        assert_eq!(loaded, config);
        assert!(!degraded);
    }
}
