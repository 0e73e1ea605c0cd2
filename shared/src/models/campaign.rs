//! Campaign Model
//!
//! Merchant-configured promotion campaigns. The catalog is stored as a
//! single JSON document in the platform's shop settings and read fresh per
//! pricing request; [`normalize_campaigns`] is the lenient sanitizer that
//! keeps a half-broken document from bricking checkout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discount flavour for amount-based campaigns and promo codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

/// Discount terms: percentage of subtotal (value = 10 means 10%) or a
/// fixed amount in store currency units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DiscountTerms {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: f64,
}

/// Type-specific campaign parameters.
///
/// Closed variant set: adding a campaign type is a compile-time exercise,
/// the evaluation loop matches exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CampaignKind {
    /// Among eligible items, every (buy_quantity+1)-th unit is free,
    /// cheapest first.
    BuyXGetOneFree {
        buy_quantity: u32,
        eligible_item_ids: Vec<String>,
    },
    /// Buying buy_quantity trigger units grants one unit of a fixed item.
    BuyXGetZFree {
        buy_quantity: u32,
        trigger_item_ids: Vec<String>,
        free_item_id: String,
    },
    /// Same trigger, but the shopper picks the gift from a choice set.
    BuyXGetZChoice {
        buy_quantity: u32,
        trigger_item_ids: Vec<String>,
        choice_item_ids: Vec<String>,
    },
    /// Cart subtotal threshold unlocks a percentage or fixed discount.
    CartThresholdDiscount {
        threshold_amount: f64,
        discount: DiscountTerms,
    },
    /// Cart subtotal threshold unlocks a gift chosen by the shopper.
    CartThresholdFreeChoice {
        threshold_amount: f64,
        choice_item_ids: Vec<String>,
    },
}

impl CampaignKind {
    /// Stable type name, as stored in the JSON document.
    pub fn type_name(&self) -> &'static str {
        match self {
            CampaignKind::BuyXGetOneFree { .. } => "BuyXGetOneFree",
            CampaignKind::BuyXGetZFree { .. } => "BuyXGetZFree",
            CampaignKind::BuyXGetZChoice { .. } => "BuyXGetZChoice",
            CampaignKind::CartThresholdDiscount { .. } => "CartThresholdDiscount",
            CampaignKind::CartThresholdFreeChoice { .. } => "CartThresholdFreeChoice",
        }
    }
}

/// Campaign entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    /// Unique, stable identifier within the catalog
    pub id: String,
    /// Display text shown to shoppers
    pub label: String,
    /// Lower priority evaluates first; ties keep catalog order
    pub priority: i32,
    /// Non-stackable campaigns are mutually exclusive with each other
    pub stackable: bool,
    #[serde(flatten)]
    pub kind: CampaignKind,
}

impl Campaign {
    /// Item ids this campaign may grant as a free unit (free/choice sets).
    ///
    /// Used to batch their prices into the same oracle round-trip as the
    /// cart lines, so granting a gift never needs a second lookup.
    pub fn gift_item_ids(&self) -> Vec<&str> {
        match &self.kind {
            CampaignKind::BuyXGetOneFree { .. } | CampaignKind::CartThresholdDiscount { .. } => {
                Vec::new()
            }
            CampaignKind::BuyXGetZFree { free_item_id, .. } => {
                if free_item_id.is_empty() {
                    Vec::new()
                } else {
                    vec![free_item_id.as_str()]
                }
            }
            CampaignKind::BuyXGetZChoice {
                choice_item_ids, ..
            }
            | CampaignKind::CartThresholdFreeChoice {
                choice_item_ids, ..
            } => choice_item_ids.iter().map(String::as_str).collect(),
        }
    }
}

/// Seeded catalog used when the shop has no stored document yet.
pub fn default_campaigns() -> Vec<Campaign> {
    vec![
        Campaign {
            id: "bxgo-default".into(),
            label: "Buy 2 get 1 free".into(),
            priority: 10,
            stackable: true,
            kind: CampaignKind::BuyXGetOneFree {
                buy_quantity: 2,
                eligible_item_ids: Vec::new(),
            },
        },
        Campaign {
            id: "bxg-free-choice".into(),
            label: "Buy 3 and choose a free gift".into(),
            priority: 20,
            stackable: false,
            kind: CampaignKind::BuyXGetZChoice {
                buy_quantity: 3,
                trigger_item_ids: Vec::new(),
                choice_item_ids: Vec::new(),
            },
        },
        Campaign {
            id: "threshold-10".into(),
            label: "Spend 100 and save 10%".into(),
            priority: 30,
            stackable: true,
            kind: CampaignKind::CartThresholdDiscount {
                threshold_amount: 100.0,
                discount: DiscountTerms {
                    kind: DiscountKind::Percentage,
                    value: 10.0,
                },
            },
        },
        Campaign {
            id: "threshold-free".into(),
            label: "Spend 150 and choose a free gift".into(),
            priority: 40,
            stackable: false,
            kind: CampaignKind::CartThresholdFreeChoice {
                threshold_amount: 150.0,
                choice_item_ids: Vec::new(),
            },
        },
        Campaign {
            id: "bxg-z-free".into(),
            label: "Buy 2 and get a free add-on".into(),
            priority: 50,
            stackable: true,
            kind: CampaignKind::BuyXGetZFree {
                buy_quantity: 2,
                trigger_item_ids: Vec::new(),
                free_item_id: String::new(),
            },
        },
    ]
}

// ========== Lenient document sanitizers ==========
//
// The admin UI writes the catalog as free-form JSON. Broken entries are
// dropped, missing fields fall back to defaults; a malformed document must
// degrade the promotion, never break pricing.

fn as_f64(value: &Value, fallback: f64) -> f64 {
    value.as_f64().filter(|n| n.is_finite()).unwrap_or(fallback)
}

fn as_u32(value: &Value, fallback: u32) -> u32 {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(fallback)
}

fn as_i32(value: &Value, fallback: i32) -> i32 {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(fallback)
}

fn as_bool(value: &Value, fallback: bool) -> bool {
    value.as_bool().unwrap_or(fallback)
}

fn as_string(value: &Value) -> String {
    value.as_str().unwrap_or_default().trim().to_string()
}

fn as_string_vec(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn normalize_entry(entry: &Value) -> Option<Campaign> {
    let obj = entry.as_object()?;

    let id = as_string(obj.get("id").unwrap_or(&Value::Null));
    let type_name = as_string(obj.get("type").unwrap_or(&Value::Null));
    if id.is_empty() || type_name.is_empty() {
        return None;
    }

    let field = |name: &str| obj.get(name).cloned().unwrap_or(Value::Null);

    let kind = match type_name.as_str() {
        "BuyXGetOneFree" => CampaignKind::BuyXGetOneFree {
            buy_quantity: as_u32(&field("buy_quantity"), 2),
            eligible_item_ids: as_string_vec(&field("eligible_item_ids")),
        },
        "BuyXGetZFree" => CampaignKind::BuyXGetZFree {
            buy_quantity: as_u32(&field("buy_quantity"), 2),
            trigger_item_ids: as_string_vec(&field("trigger_item_ids")),
            free_item_id: as_string(&field("free_item_id")),
        },
        "BuyXGetZChoice" => CampaignKind::BuyXGetZChoice {
            buy_quantity: as_u32(&field("buy_quantity"), 3),
            trigger_item_ids: as_string_vec(&field("trigger_item_ids")),
            choice_item_ids: as_string_vec(&field("choice_item_ids")),
        },
        "CartThresholdDiscount" => {
            let discount = field("discount");
            let kind = if discount.get("type").and_then(Value::as_str) == Some("fixed") {
                DiscountKind::Fixed
            } else {
                DiscountKind::Percentage
            };
            CampaignKind::CartThresholdDiscount {
                threshold_amount: as_f64(&field("threshold_amount"), 100.0),
                discount: DiscountTerms {
                    kind,
                    value: as_f64(discount.get("value").unwrap_or(&Value::Null), 10.0),
                },
            }
        }
        "CartThresholdFreeChoice" => CampaignKind::CartThresholdFreeChoice {
            threshold_amount: as_f64(&field("threshold_amount"), 150.0),
            choice_item_ids: as_string_vec(&field("choice_item_ids")),
        },
        _ => return None,
    };

    Some(Campaign {
        id,
        label: as_string(&field("label")),
        priority: as_i32(&field("priority"), 100),
        stackable: as_bool(&field("stackable"), true),
        kind,
    })
}

/// Sanitize a raw catalog document into a priority-sorted campaign list.
///
/// Non-array input yields the seeded defaults. Entries without an id or a
/// known type are dropped. The sort is stable, so equal priorities keep
/// document order.
pub fn normalize_campaigns(raw: &Value) -> Vec<Campaign> {
    let Some(entries) = raw.as_array() else {
        return default_campaigns();
    };

    let mut out: Vec<Campaign> = entries.iter().filter_map(normalize_entry).collect();
    out.sort_by_key(|c| c.priority);
    out
}
