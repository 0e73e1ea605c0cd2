//! Platform-facing services
//!
//! Everything that talks to the hosted commerce platform lives here. The
//! traits are the seams: [`PlatformClient`] implements all of them for
//! production, in-memory doubles implement them for tests.

use async_trait::async_trait;
use serde_json::Value;

pub mod catalog;
pub mod draft_orders;
pub mod pickup;
pub mod platform;

pub use catalog::CampaignStore;
pub use draft_orders::DraftOrderGateway;
pub use pickup::PickupService;
pub use platform::{PlatformClient, PlatformError};

/// Opaque key/value document store for shop-level settings.
///
/// Backed by the platform's shop metadata; documents are free-form JSON
/// and callers own their schema (campaign catalog, pickup config).
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a document. `None` when the key has never been written.
    async fn read_document(&self, key: &str) -> Result<Option<Value>, PlatformError>;

    async fn write_document(&self, key: &str, value: &Value) -> Result<(), PlatformError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use shared::models::draft::{DraftOrderHandle, DraftOrderRequest};

    use super::*;

    /// In-memory settings store; `fail_reads` simulates platform outage.
    #[derive(Default)]
    pub struct MemorySettings {
        pub documents: Mutex<std::collections::HashMap<String, Value>>,
        pub fail_reads: bool,
    }

    impl MemorySettings {
        pub fn with_document(key: &str, value: Value) -> Self {
            let store = Self::default();
            store
                .documents
                .lock()
                .unwrap()
                .insert(key.to_string(), value);
            store
        }
    }

    #[async_trait]
    impl SettingsStore for MemorySettings {
        async fn read_document(&self, key: &str) -> Result<Option<Value>, PlatformError> {
            if self.fail_reads {
                return Err(PlatformError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(self.documents.lock().unwrap().get(key).cloned())
        }

        async fn write_document(&self, key: &str, value: &Value) -> Result<(), PlatformError> {
            self.documents
                .lock()
                .unwrap()
                .insert(key.to_string(), value.clone());
            Ok(())
        }
    }

    /// Records draft-order requests and answers with a fixed handle.
    #[derive(Default)]
    pub struct RecordingDrafts {
        pub requests: Mutex<Vec<DraftOrderRequest>>,
    }

    #[async_trait]
    impl DraftOrderGateway for RecordingDrafts {
        async fn upsert(
            &self,
            request: &DraftOrderRequest,
        ) -> Result<DraftOrderHandle, PlatformError> {
            let id = request
                .draft_order_id
                .clone()
                .unwrap_or_else(|| "draft-1".to_string());
            self.requests.lock().unwrap().push(request.clone());
            Ok(DraftOrderHandle {
                draft_order_id: Some(id.clone()),
                invoice_url: Some(format!("https://checkout.example/{id}")),
            })
        }
    }
}
