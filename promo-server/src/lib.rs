//! Promo Server - promotions and delivery-selection service
//!
//! # Overview
//!
//! Server-side pricing for a hosted commerce shop:
//!
//! - **Pricing engine** (`pricing`): campaign evaluation, free-unit
//!   allocation, discount distribution
//! - **Platform services** (`services`): price/promo lookup, draft
//!   orders, settings documents
//! - **Delivery selection** (`shipping`): flat-rate shipping lines
//! - **HTTP API** (`api`): storefront and admin routes
//!
//! # Module structure
//!
//! ```text
//! promo-server/src/
//! ├── core/          # Config, state, server
//! ├── pricing/       # The pricing engine
//! ├── services/      # Platform client and stores
//! ├── api/           # HTTP routes and handlers
//! ├── shipping.rs    # Delivery selection lookup
//! ├── money.rs       # Decimal money helpers
//! └── utils/         # Errors, logging
//! ```

pub mod api;
pub mod core;
pub mod money;
pub mod pricing;
pub mod services;
pub mod shipping;
pub mod utils;

// Re-export public types
pub use crate::core::{AppState, Config, Server, build_app, build_router};
pub use pricing::{PriceSource, PricingEngine, PricingError, PromoSource};
pub use services::{CampaignStore, DraftOrderGateway, PickupService, PlatformClient};
pub use utils::{AppError, AppResponse};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
