//! Promotions pricing engine and its building blocks.

pub mod distribution;
pub mod engine;
pub mod free_units;
pub mod line_state;

pub use engine::{PriceSource, PricingEngine, PricingError, PromoSource};
