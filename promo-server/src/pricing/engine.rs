//! Pricing engine
//!
//! Single entry point for one pricing run: resolve prices, apply the
//! identity discount, walk the campaign catalog in priority order, apply
//! the promo code, assemble the result. Everything mutates the request's
//! [`LineBook`] and nothing survives the call.
//!
//! Campaign evaluation is order-dependent by design: each campaign sees
//! the line state left by the ones before it, so the loop is strictly
//! sequential.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::campaign::{Campaign, CampaignKind, DiscountKind, DiscountTerms};
use shared::models::pricing::{
    AppliedCampaign, ChoiceContext, PricedLine, PricingBreakdown, PricingInput, PricingResult,
};
use shared::models::promo::PromoDiscount;
use shared::util::variant_gid;

use super::distribution::distribute_discount;
use super::free_units::apply_free_units;
use super::line_state::{LineBook, PriceMap};
use crate::money::{round_money, to_decimal, to_f64};

/// Members pay 85% of the base unit price.
const MEMBER_PRICE_RATE: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

const PERCENT_BASE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Batch unit-price lookup. Ids with no resolvable price are absent from
/// the returned map; only transport failure is an error.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn resolve_prices(&self, item_ids: &[String]) -> Result<PriceMap, PricingError>;
}

/// Promo-code lookup. Unknown or unusable codes resolve to `None`; lookup
/// failure is reported by the implementation and also degrades to `None`.
#[async_trait]
pub trait PromoSource: Send + Sync {
    async fn resolve_promo(&self, code: &str) -> Option<PromoDiscount>;
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Price lookup failed: {0}")]
    PriceLookup(String),
}

/// What one campaign did to the line state.
enum CampaignOutcome {
    /// Changed at least one line
    Applied,
    /// Condition not met, malformed, or suppressed
    Skipped,
    /// Gift choice required; the whole loop halts here
    NeedsChoice(ChoiceContext),
}

pub struct PricingEngine {
    prices: Arc<dyn PriceSource>,
    promos: Arc<dyn PromoSource>,
    fallback_currency: String,
}

impl PricingEngine {
    pub fn new(
        prices: Arc<dyn PriceSource>,
        promos: Arc<dyn PromoSource>,
        fallback_currency: impl Into<String>,
    ) -> Self {
        Self {
            prices,
            promos,
            fallback_currency: fallback_currency.into(),
        }
    }

    /// Price a cart against the given catalog.
    ///
    /// The catalog is a per-call input owned by the caller; the engine
    /// never caches or mutates it. A pending gift choice is a normal
    /// result with `needs_choice` set, not an error.
    pub async fn compute(
        &self,
        catalog: &[Campaign],
        input: &PricingInput,
    ) -> Result<PricingResult, PricingError> {
        let wanted_ids = collect_price_ids(catalog, input);
        let prices = self.prices.resolve_prices(&wanted_ids).await?;

        let currency_code = wanted_ids
            .iter()
            .find_map(|id| prices.get(id))
            .map(|price| price.currency_code.clone())
            .unwrap_or_else(|| self.fallback_currency.clone());

        let mut book = LineBook::new();
        for item in &input.items {
            if item.quantity == 0 {
                continue;
            }
            book.ensure_line(&item.item_id, item.quantity, &prices);
        }

        // Identity discount: once, before any campaign, off the base price.
        let is_member = input
            .customer_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());
        if is_member {
            for line in book.lines_mut() {
                line.unit_price = round_money(line.base_unit_price * MEMBER_PRICE_RATE);
            }
        }

        let mut order: Vec<&Campaign> = catalog.iter().collect();
        order.sort_by_key(|c| c.priority);

        let mut applied_campaigns: Vec<AppliedCampaign> = Vec::new();
        let mut exclusive_applied = false;
        let mut pending_choice: Option<ChoiceContext> = None;

        for campaign in order {
            if exclusive_applied && !campaign.stackable {
                tracing::debug!(campaign_id = %campaign.id, "Suppressed by earlier exclusive campaign");
                continue;
            }

            match evaluate_campaign(&mut book, campaign, &prices, input) {
                CampaignOutcome::Applied => {
                    applied_campaigns.push(AppliedCampaign {
                        id: campaign.id.clone(),
                        type_name: campaign.kind.type_name().to_string(),
                        label: campaign.label.clone(),
                    });
                    if !campaign.stackable {
                        exclusive_applied = true;
                    }
                }
                CampaignOutcome::Skipped => {}
                CampaignOutcome::NeedsChoice(context) => {
                    tracing::info!(campaign_id = %campaign.id, "Halting for gift choice");
                    pending_choice = Some(context);
                    break;
                }
            }
        }

        let campaign_discount = book.discount_sum();

        // Promo code: global policy, combinable or no campaign applied.
        let mut promo_discount = Decimal::ZERO;
        if pending_choice.is_none() {
            if let Some(code) = input.promo_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                promo_discount =
                    self.apply_promo(&mut book, code, !applied_campaigns.is_empty()).await;
            }
        }

        Ok(assemble_result(
            &book,
            campaign_discount,
            promo_discount,
            applied_campaigns,
            pending_choice,
            currency_code,
        ))
    }

    async fn apply_promo(
        &self,
        book: &mut LineBook,
        code: &str,
        campaigns_applied: bool,
    ) -> Decimal {
        let Some(promo) = self.promos.resolve_promo(code).await else {
            tracing::info!(code = %code, "Promo code did not resolve, ignoring");
            return Decimal::ZERO;
        };
        if !promo.stackable && campaigns_applied {
            tracing::info!(code = %code, "Promo code not combinable with applied campaigns, ignoring");
            return Decimal::ZERO;
        }

        let remaining = book.working_subtotal() - book.discount_sum();
        let amount = match promo.kind {
            DiscountKind::Percentage => {
                round_money(remaining * to_decimal(promo.value) / PERCENT_BASE)
            }
            DiscountKind::Fixed => to_decimal(promo.value),
        };

        let allocated = distribute_discount(book, amount, None);
        if allocated > Decimal::ZERO {
            for line in book.lines_mut() {
                line.applied_promo_code = Some(promo.code.clone());
            }
        }
        allocated
    }
}

/// Every id whose price one run can need: cart lines plus every gift the
/// catalog might grant, plus the shopper's chosen gift. One oracle call.
fn collect_price_ids(catalog: &[Campaign], input: &PricingInput) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    let mut push = |raw: &str| {
        if raw.trim().is_empty() {
            return;
        }
        let id = variant_gid(raw);
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    };

    for item in &input.items {
        push(&item.item_id);
    }
    for campaign in catalog {
        for gift_id in campaign.gift_item_ids() {
            push(gift_id);
        }
    }
    if let Some(chosen) = &input.chosen_gift_item_id {
        push(chosen);
    }
    ids
}

fn evaluate_campaign(
    book: &mut LineBook,
    campaign: &Campaign,
    prices: &PriceMap,
    input: &PricingInput,
) -> CampaignOutcome {
    match &campaign.kind {
        CampaignKind::BuyXGetOneFree {
            buy_quantity,
            eligible_item_ids,
        } => {
            if *buy_quantity == 0 || eligible_item_ids.is_empty() {
                return CampaignOutcome::Skipped;
            }
            let indices = book.indices_matching(eligible_item_ids);
            // Widened arithmetic: a stored buy_quantity of u32::MAX (or a
            // pathological cart) must degrade, not overflow.
            let total: u64 = indices
                .iter()
                .map(|&idx| u64::from(book.get(idx).quantity))
                .sum();
            let group = u64::from(*buy_quantity) + 1;
            if total < group {
                return CampaignOutcome::Skipped;
            }
            let free_count = u32::try_from(total / group).unwrap_or(u32::MAX);
            let freed = apply_free_units(book, &indices, free_count, &campaign.id, &campaign.label);
            if freed > 0 {
                CampaignOutcome::Applied
            } else {
                CampaignOutcome::Skipped
            }
        }

        CampaignKind::BuyXGetZFree {
            buy_quantity,
            trigger_item_ids,
            free_item_id,
        } => {
            if *buy_quantity == 0 || trigger_item_ids.is_empty() || free_item_id.is_empty() {
                return CampaignOutcome::Skipped;
            }
            if trigger_quantity(book, trigger_item_ids) < u64::from(*buy_quantity) {
                return CampaignOutcome::Skipped;
            }
            grant_free_unit(book, free_item_id, prices, campaign)
        }

        CampaignKind::BuyXGetZChoice {
            buy_quantity,
            trigger_item_ids,
            choice_item_ids,
        } => {
            if *buy_quantity == 0 || trigger_item_ids.is_empty() || choice_item_ids.is_empty() {
                return CampaignOutcome::Skipped;
            }
            if trigger_quantity(book, trigger_item_ids) < u64::from(*buy_quantity) {
                return CampaignOutcome::Skipped;
            }
            resolve_gift_choice(book, choice_item_ids, prices, campaign, input)
        }

        CampaignKind::CartThresholdDiscount {
            threshold_amount,
            discount,
        } => {
            if book.working_subtotal() < to_decimal(*threshold_amount) {
                return CampaignOutcome::Skipped;
            }
            apply_threshold_discount(book, discount, campaign)
        }

        CampaignKind::CartThresholdFreeChoice {
            threshold_amount,
            choice_item_ids,
        } => {
            if choice_item_ids.is_empty() {
                return CampaignOutcome::Skipped;
            }
            if book.working_subtotal() < to_decimal(*threshold_amount) {
                return CampaignOutcome::Skipped;
            }
            resolve_gift_choice(book, choice_item_ids, prices, campaign, input)
        }
    }
}

fn trigger_quantity(book: &LineBook, trigger_item_ids: &[String]) -> u64 {
    book.indices_matching(trigger_item_ids)
        .iter()
        .map(|&idx| u64::from(book.get(idx).quantity))
        .sum()
}

/// Triggered gift-choice campaign: halt when no choice was supplied, skip
/// when the supplied choice belongs to a different campaign's set.
fn resolve_gift_choice(
    book: &mut LineBook,
    choice_item_ids: &[String],
    prices: &PriceMap,
    campaign: &Campaign,
    input: &PricingInput,
) -> CampaignOutcome {
    let Some(chosen) = input
        .chosen_gift_item_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return CampaignOutcome::NeedsChoice(ChoiceContext {
            campaign_id: campaign.id.clone(),
            label: campaign.label.clone(),
            valid_choice_ids: choice_item_ids.to_vec(),
        });
    };

    let chosen_id = variant_gid(chosen);
    let is_valid = choice_item_ids.iter().any(|id| variant_gid(id) == chosen_id);
    if !is_valid {
        return CampaignOutcome::Skipped;
    }
    grant_free_unit(book, &chosen_id, prices, campaign)
}

/// Free one unit of the given item, adding a quantity-1 line when the item
/// is not in the cart. An unpriced gift skips the campaign rather than
/// granting a worthless unit.
fn grant_free_unit(
    book: &mut LineBook,
    raw_id: &str,
    prices: &PriceMap,
    campaign: &Campaign,
) -> CampaignOutcome {
    let gift_id = variant_gid(raw_id);
    if !prices.contains_key(&gift_id) {
        tracing::warn!(campaign_id = %campaign.id, gift_id = %gift_id, "Gift item has no resolved price, skipping campaign");
        return CampaignOutcome::Skipped;
    }

    let idx = match book.find(&gift_id) {
        Some(idx) => idx,
        None => book.ensure_line(&gift_id, 1, prices),
    };
    let line = book.get_mut(idx);
    if line.paid_units() == 0 {
        return CampaignOutcome::Skipped;
    }
    line.discount_total += line.unit_price;
    line.free_units += 1;
    line.tag_campaign(&campaign.id, &campaign.label);
    CampaignOutcome::Applied
}

fn apply_threshold_discount(
    book: &mut LineBook,
    discount: &DiscountTerms,
    campaign: &Campaign,
) -> CampaignOutcome {
    let amount = match discount.kind {
        DiscountKind::Percentage => {
            round_money(book.working_subtotal() * to_decimal(discount.value) / PERCENT_BASE)
        }
        DiscountKind::Fixed => to_decimal(discount.value),
    };

    let allocated = distribute_discount(book, amount, Some((&campaign.id, &campaign.label)));
    if allocated > Decimal::ZERO {
        CampaignOutcome::Applied
    } else {
        CampaignOutcome::Skipped
    }
}

fn assemble_result(
    book: &LineBook,
    campaign_discount: Decimal,
    promo_discount: Decimal,
    applied_campaigns: Vec<AppliedCampaign>,
    pending_choice: Option<ChoiceContext>,
    currency_code: String,
) -> PricingResult {
    let lines = book
        .lines()
        .iter()
        .map(|line| {
            let quantity = Decimal::from(line.quantity);
            let final_unit_price = if line.quantity == 0 {
                Decimal::ZERO
            } else {
                round_money((line.unit_price * quantity - line.discount_total) / quantity)
            };
            PricedLine {
                item_id: line.item_id.clone(),
                quantity: line.quantity,
                base_unit_price: to_f64(line.base_unit_price),
                unit_price: to_f64(line.unit_price),
                final_unit_price: to_f64(final_unit_price),
                is_free: final_unit_price <= Decimal::ZERO,
                free_units: line.free_units,
                applied_campaign_ids: line.applied_campaign_ids.clone(),
                applied_campaign_labels: line.applied_campaign_labels.clone(),
                applied_promo_code: line.applied_promo_code.clone(),
            }
        })
        .collect();

    let base_subtotal = book.base_subtotal();
    let working_subtotal = book.working_subtotal();
    let breakdown = PricingBreakdown {
        base_subtotal: to_f64(base_subtotal),
        identity_discount_total: to_f64(base_subtotal - working_subtotal),
        campaign_discount_total: to_f64(campaign_discount),
        promo_discount_total: to_f64(promo_discount),
        final_subtotal: to_f64(working_subtotal - book.discount_sum()),
    };

    let needs_choice = pending_choice.is_some();
    PricingResult {
        lines,
        breakdown,
        applied_campaigns,
        needs_choice,
        choice_context: pending_choice,
        currency_code,
    }
}
