//! PlatformClient — authenticated HTTP client for the hosted commerce
//! platform's admin API.
//!
//! One client implements every platform-facing seam: variant price lookup,
//! promo-code resolution, draft-order create/update and the shop settings
//! document store. Tests swap in in-memory doubles instead.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::models::draft::{DraftOrderHandle, DraftOrderRequest};
use shared::models::pricing::VariantPrice;
use shared::models::promo::PromoDiscount;

use super::SettingsStore;
use super::draft_orders::DraftOrderGateway;
use crate::core::Config;
use crate::pricing::{PriceSource, PricingError, PromoSource};
use crate::pricing::line_state::PriceMap;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Platform returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

/// Admin API client for one shop.
pub struct PlatformClient {
    http: Client,
    api_url: String,
    shop_domain: String,
}

impl PlatformClient {
    pub fn new(config: &Config) -> Result<Self, PlatformError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut token = reqwest::header::HeaderValue::from_str(&config.platform_api_token)
            .map_err(|e| PlatformError::Decode(format!("Invalid access token: {e}")))?;
        token.set_sensitive(true);
        headers.insert("X-Platform-Access-Token", token);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            api_url: config.platform_api_url.trim_end_matches('/').to_string(),
            shop_domain: config.shop_domain.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// POST, decode JSON, map non-2xx to [`PlatformError::Status`].
    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, PlatformError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn put_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, PlatformError> {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, PlatformError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))
    }

    fn draft_payload(request: &DraftOrderRequest) -> Value {
        let line_items: Vec<Value> = request
            .lines
            .iter()
            .map(|line| {
                json!({
                    "variant_id": line.item_id,
                    "quantity": line.quantity,
                    "price": format!("{:.2}", line.final_unit_price),
                })
            })
            .collect();

        json!({
            "draft_order": {
                "line_items": line_items,
                "currency": request.currency_code,
                "shipping_line": request.shipping_line,
                "metadata": {
                    "breakdown": request.breakdown,
                    "applied_campaigns": request.applied_campaigns,
                    "promo_code": request.promo_code,
                    "shipping_selection": request.shipping_selection,
                },
            }
        })
    }
}

#[derive(Deserialize)]
struct PriceBatchResponse {
    prices: HashMap<String, VariantPrice>,
}

#[async_trait]
impl PriceSource for PlatformClient {
    async fn resolve_prices(&self, item_ids: &[String]) -> Result<PriceMap, PricingError> {
        if item_ids.is_empty() {
            return Ok(PriceMap::new());
        }
        let body = json!({ "ids": item_ids });
        let response: PriceBatchResponse = self
            .post_json("/variants/prices", &body)
            .await
            .map_err(|e| PricingError::PriceLookup(e.to_string()))?;
        Ok(response.prices)
    }
}

#[derive(Deserialize)]
struct PromoResponse {
    discount: Option<PromoDiscount>,
}

#[async_trait]
impl PromoSource for PlatformClient {
    async fn resolve_promo(&self, code: &str) -> Option<PromoDiscount> {
        let result = self
            .http
            .get(self.url(&format!("/discounts/{}", code.trim())))
            .send()
            .await;

        let response = match result {
            Ok(r) if r.status() == reqwest::StatusCode::NOT_FOUND => return None,
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "Promo lookup failed, treating as not found");
                return None;
            }
        };

        match Self::decode::<PromoResponse>(response).await {
            Ok(body) => body.discount,
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "Promo response unusable, treating as not found");
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct DraftOrderResponse {
    draft_order: DraftOrderHandle,
}

#[async_trait]
impl DraftOrderGateway for PlatformClient {
    async fn upsert(&self, request: &DraftOrderRequest) -> Result<DraftOrderHandle, PlatformError> {
        let payload = Self::draft_payload(request);
        let response: DraftOrderResponse = match &request.draft_order_id {
            Some(id) => self.put_json(&format!("/draft_orders/{id}"), &payload).await?,
            None => self.post_json("/draft_orders", &payload).await?,
        };
        tracing::info!(
            draft_order_id = ?response.draft_order.draft_order_id,
            "Draft order upserted"
        );
        Ok(response.draft_order)
    }
}

#[derive(Deserialize)]
struct SettingsResponse {
    value: Option<Value>,
}

#[async_trait]
impl SettingsStore for PlatformClient {
    async fn read_document(&self, key: &str) -> Result<Option<Value>, PlatformError> {
        let response = self
            .http
            .get(self.url(&format!("/shops/{}/settings/{key}", self.shop_domain)))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: SettingsResponse = Self::decode(response).await?;
        Ok(body.value)
    }

    async fn write_document(&self, key: &str, value: &Value) -> Result<(), PlatformError> {
        let path = format!("/shops/{}/settings/{key}", self.shop_domain);
        let _: Value = self.put_json(&path, &json!({ "value": value })).await?;
        Ok(())
    }
}
