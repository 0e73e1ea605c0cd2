//! Campaign catalog persistence
//!
//! The catalog lives as one JSON document in the shop settings store and
//! is read fresh per pricing request. Any read failure degrades to the
//! seeded defaults; a broken document must never block checkout.

use std::sync::Arc;

use serde_json::Value;
use shared::models::campaign::{Campaign, default_campaigns, normalize_campaigns};

use super::{PlatformError, SettingsStore};

const CAMPAIGNS_KEY: &str = "promo.campaigns";

pub struct CampaignStore {
    store: Arc<dyn SettingsStore>,
}

impl CampaignStore {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Current catalog, priority-sorted. Missing document seeds the
    /// defaults; a failed read degrades to the defaults with a warning.
    pub async fn load(&self) -> Vec<Campaign> {
        match self.store.read_document(CAMPAIGNS_KEY).await {
            Ok(Some(raw)) => normalize_campaigns(&raw),
            Ok(None) => default_campaigns(),
            Err(e) => {
                tracing::warn!(error = %e, "Campaign catalog read failed, using defaults");
                default_campaigns()
            }
        }
    }

    /// Replace the catalog: sanitize the submitted document, persist the
    /// normalized form, return it.
    pub async fn save(&self, raw: &Value) -> Result<Vec<Campaign>, PlatformError> {
        let campaigns = normalize_campaigns(raw);
        let document = serde_json::to_value(&campaigns)
            .map_err(|e| PlatformError::Decode(e.to_string()))?;
        self.store.write_document(CAMPAIGNS_KEY, &document).await?;
        tracing::info!(count = campaigns.len(), "Campaign catalog saved");
        Ok(campaigns)
    }
}
