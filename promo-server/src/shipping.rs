//! Flat-rate delivery selection
//!
//! Maps the shopper's delivery method to a fixed shipping line. Entirely
//! independent of campaign logic.

use shared::models::shipping::{ShippingLine, ShippingMethod, ShippingSelection};

/// Shipping line for a delivery selection; `None` when nothing was picked.
pub fn shipping_line(selection: Option<&ShippingSelection>) -> Option<ShippingLine> {
    let selection = selection?;
    let (title, price) = match selection.method {
        ShippingMethod::Smartposti => ("Smartposti delivery", 4.99),
        ShippingMethod::Wolt => ("Wolt delivery", 8.99),
        ShippingMethod::Pickup => ("Pickup", 0.0),
    };
    Some(ShippingLine {
        title: title.to_string(),
        price,
    })
}
