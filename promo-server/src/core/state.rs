//! Application state
//!
//! Shared handles for everything the request handlers need. Cloning is
//! cheap: every field is behind an `Arc`.

use std::sync::Arc;

use crate::core::Config;
use crate::pricing::PricingEngine;
use crate::services::{
    CampaignStore, DraftOrderGateway, PickupService, PlatformClient, PlatformError,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<PricingEngine>,
    pub campaigns: Arc<CampaignStore>,
    pub pickup: Arc<PickupService>,
    pub drafts: Arc<dyn DraftOrderGateway>,
}

impl AppState {
    /// Wire the production collaborators: one platform client serves as
    /// price source, promo source, draft gateway and settings store.
    pub fn initialize(config: &Config) -> Result<Self, PlatformError> {
        let platform = Arc::new(PlatformClient::new(config)?);

        let engine = Arc::new(PricingEngine::new(
            platform.clone(),
            platform.clone(),
            config.fallback_currency.clone(),
        ));
        let campaigns = Arc::new(CampaignStore::new(platform.clone()));
        let pickup = Arc::new(PickupService::new(
            platform.clone(),
            config.shop_domain.clone(),
        ));

        Ok(Self {
            config: Arc::new(config.clone()),
            engine,
            campaigns,
            pickup,
            drafts: platform,
        })
    }

    /// Assemble state from explicit collaborators; used by tests to plug
    /// in doubles.
    pub fn with_collaborators(
        config: Config,
        engine: Arc<PricingEngine>,
        campaigns: Arc<CampaignStore>,
        pickup: Arc<PickupService>,
        drafts: Arc<dyn DraftOrderGateway>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            campaigns,
            pickup,
            drafts,
        }
    }
}
