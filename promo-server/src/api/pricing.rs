//! Pricing preparation route
//!
//! One endpoint serves both the live cart preview and checkout: the
//! engine runs either way, checkout additionally assembles the draft
//! order with the selected delivery. A pending gift choice is a 200 with
//! `needs_choice` set, never an error.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use shared::models::pricing::{LineItem, PricingInput, PricingResult};
use shared::models::shipping::ShippingSelection;

use crate::core::AppState;
use crate::services::draft_orders::build_draft_request;
use crate::shipping;
use crate::utils::AppError;

pub fn router() -> Router<AppState> {
    Router::new().route("/pricing/prepare", post(prepare))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrepareMode {
    #[default]
    Preview,
    Checkout,
}

#[derive(Debug, Deserialize)]
pub struct PreparePayload {
    #[serde(default)]
    pub mode: PrepareMode,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub shipping: Option<ShippingSelection>,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub chosen_gift_item_id: Option<String>,
    /// Existing draft to update instead of creating a new one
    #[serde(default)]
    pub draft_order_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PrepareResponse {
    pub pricing: PricingResult,
    pub needs_choice: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
}

pub async fn prepare(
    State(state): State<AppState>,
    Json(payload): Json<PreparePayload>,
) -> Result<Json<PrepareResponse>, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::Validation("items must not be empty".to_string()));
    }
    if payload.items.iter().any(|item| item.quantity == 0) {
        return Err(AppError::Validation(
            "item quantity must be positive".to_string(),
        ));
    }

    let catalog = state.campaigns.load().await;
    let input = PricingInput {
        items: payload.items,
        customer_id: payload.customer_id,
        promo_code: payload.promo_code.clone(),
        chosen_gift_item_id: payload.chosen_gift_item_id,
    };

    let pricing = state.engine.compute(&catalog, &input).await?;
    let needs_choice = pricing.needs_choice;

    // Preview, or a mid-flow halt: no draft order yet.
    if needs_choice || payload.mode == PrepareMode::Preview {
        return Ok(Json(PrepareResponse {
            pricing,
            needs_choice,
            draft_order_id: None,
            invoice_url: None,
        }));
    }

    let shipping_line = shipping::shipping_line(payload.shipping.as_ref());
    let request = build_draft_request(
        payload.draft_order_id,
        &pricing,
        shipping_line,
        payload.shipping,
        payload.promo_code,
    );
    let handle = state.drafts.upsert(&request).await?;

    Ok(Json(PrepareResponse {
        pricing,
        needs_choice: false,
        draft_order_id: handle.draft_order_id,
        invoice_url: handle.invoice_url,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use shared::models::pricing::VariantPrice;
    use shared::models::promo::PromoDiscount;
    use shared::util::variant_gid;
    use tower::ServiceExt;

    use super::*;
    use crate::core::{Config, build_app};
    use crate::pricing::line_state::PriceMap;
    use crate::pricing::{PriceSource, PricingEngine, PricingError, PromoSource};
    use crate::services::testing::{MemorySettings, RecordingDrafts};
    use crate::services::{CampaignStore, PickupService};

    struct StaticPrices(PriceMap);

    #[async_trait]
    impl PriceSource for StaticPrices {
        async fn resolve_prices(&self, _ids: &[String]) -> Result<PriceMap, PricingError> {
            Ok(self.0.clone())
        }
    }

    struct NoPromos;

    #[async_trait]
    impl PromoSource for NoPromos {
        async fn resolve_promo(&self, _code: &str) -> Option<PromoDiscount> {
            None
        }
    }

    fn test_state(prices: &[(&str, f64)], campaigns_doc: Value) -> (AppState, Arc<RecordingDrafts>) {
        let price_map: PriceMap = prices
            .iter()
            .map(|(id, amount)| {
                (
                    variant_gid(id),
                    VariantPrice {
                        amount: *amount,
                        currency_code: "EUR".to_string(),
                    },
                )
            })
            .collect();
        let engine = Arc::new(PricingEngine::new(
            Arc::new(StaticPrices(price_map)),
            Arc::new(NoPromos),
            "EUR",
        ));
        let settings = Arc::new(MemorySettings::with_document("promo.campaigns", campaigns_doc));
        let drafts = Arc::new(RecordingDrafts::default());
        let state = AppState::with_collaborators(
            Config::with_overrides("http://localhost:4000", 0),
            engine,
            Arc::new(CampaignStore::new(settings.clone())),
            Arc::new(PickupService::new(settings, "shop.example")),
            drafts.clone(),
        );
        (state, drafts)
    }

    async fn post_prepare(state: AppState, payload: Value) -> (StatusCode, Value) {
        let app = build_app(state);
        let request = Request::builder()
            .method("POST")
            .uri("/pricing/prepare")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn bxgo_catalog() -> Value {
        json!([{
            "id": "c1",
            "type": "BuyXGetOneFree",
            "label": "Buy 2 get 1 free",
            "priority": 10,
            "stackable": true,
            "buy_quantity": 2,
            "eligible_item_ids": [variant_gid("a")],
        }])
    }

    #[tokio::test]
    async fn test_empty_items_rejected_before_engine() {
        let (state, _) = test_state(&[("a", 10.0)], json!([]));
        let (status, body) = post_prepare(state, json!({ "items": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "E0002");
    }

    #[tokio::test]
    async fn test_preview_returns_pricing_without_draft() {
        let (state, drafts) = test_state(&[("a", 10.0)], bxgo_catalog());
        let payload = json!({
            "mode": "preview",
            "items": [{ "item_id": "a", "quantity": 3 }],
        });
        let (status, body) = post_prepare(state, payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pricing"]["breakdown"]["final_subtotal"], 20.0);
        assert_eq!(body["needs_choice"], false);
        assert!(body.get("draft_order_id").is_none());
        assert!(drafts.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_creates_draft_with_shipping_line() {
        let (state, drafts) = test_state(&[("a", 10.0)], bxgo_catalog());
        let payload = json!({
            "mode": "checkout",
            "items": [{ "item_id": "a", "quantity": 3 }],
            "shipping": { "method": "wolt" },
        });
        let (status, body) = post_prepare(state, payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["draft_order_id"], "draft-1");
        assert_eq!(body["invoice_url"], "https://checkout.example/draft-1");

        let requests = drafts.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let line = requests[0].shipping_line.as_ref().unwrap();
        assert_eq!(line.title, "Wolt delivery");
        assert_eq!(line.price, 8.99);
    }

    #[tokio::test]
    async fn test_checkout_reuses_existing_draft_id() {
        let (state, drafts) = test_state(&[("a", 10.0)], json!([]));
        let payload = json!({
            "mode": "checkout",
            "items": [{ "item_id": "a", "quantity": 1 }],
            "draft_order_id": "draft-42",
        });
        let (_, body) = post_prepare(state, payload).await;

        assert_eq!(body["draft_order_id"], "draft-42");
        assert_eq!(
            drafts.requests.lock().unwrap()[0].draft_order_id.as_deref(),
            Some("draft-42")
        );
    }

    #[tokio::test]
    async fn test_pending_choice_is_200_and_skips_draft() {
        let catalog = json!([{
            "id": "gift",
            "type": "BuyXGetZChoice",
            "label": "Choose a gift",
            "priority": 5,
            "stackable": false,
            "buy_quantity": 1,
            "trigger_item_ids": [variant_gid("a")],
            "choice_item_ids": [variant_gid("g1")],
        }]);
        let (state, drafts) = test_state(&[("a", 10.0), ("g1", 5.0)], catalog);
        let payload = json!({
            "mode": "checkout",
            "items": [{ "item_id": "a", "quantity": 2 }],
        });
        let (status, body) = post_prepare(state, payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["needs_choice"], true);
        assert_eq!(body["pricing"]["choice_context"]["campaign_id"], "gift");
        assert!(drafts.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resubmission_with_choice_completes() {
        let catalog = json!([{
            "id": "gift",
            "type": "BuyXGetZChoice",
            "label": "Choose a gift",
            "priority": 5,
            "stackable": false,
            "buy_quantity": 1,
            "trigger_item_ids": [variant_gid("a")],
            "choice_item_ids": [variant_gid("g1")],
        }]);
        let (state, _) = test_state(&[("a", 10.0), ("g1", 5.0)], catalog);
        let payload = json!({
            "items": [{ "item_id": "a", "quantity": 2 }],
            "chosen_gift_item_id": "g1",
        });
        let (status, body) = post_prepare(state, payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["needs_choice"], false);
        let lines = body["pricing"]["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l["is_free"] == true));
    }
}
