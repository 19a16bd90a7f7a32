//! Order quantity clamping.
//!
//! The same clamp backs both the +/- stepper and raw typed input on the
//! listing and checkout screens, so the two paths can never disagree about
//! what a legal quantity is.

use crate::models::listing::QuantityConstraint;

/// Clamp a requested quantity into the listing's bounds.
///
/// Non-finite or non-positive requests resolve to `min_order`; fractional
/// requests are floored before clamping. The result always lies in
/// `[min_order, effective_max]` (see [`QuantityConstraint::effective_max`]).
pub fn clamp(requested: f64, constraint: &QuantityConstraint) -> u32 {
    let min = constraint.min_order.max(1);
    if !requested.is_finite() || requested < 1.0 {
        return min;
    }

    // u32::MAX guard keeps the f64 -> u32 cast in range for huge requests.
    let floored = requested.floor().min(u32::MAX as f64) as u32;
    let capped = match constraint.effective_max() {
        Some(max) => floored.min(max),
        None => floored,
    };
    capped.max(min)
}
