//! Data models
//!
//! Shared between promo-server and its API clients. Campaign records are
//! persisted as JSON documents in the platform's shop settings, so every
//! type here keeps a stable serde shape.

pub mod campaign;
pub mod draft;
pub mod pricing;
pub mod promo;
pub mod shipping;

// Re-exports
pub use campaign::*;
pub use draft::*;
pub use pricing::*;
pub use promo::*;
pub use shipping::*;
