use serde::{Deserialize, Serialize};

/// Per-listing order quantity bounds.
///
/// Recomputed whenever the listing or its stock changes; never persisted on
/// its own. `available` is live stock and caps `max_order` when both are
/// known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityConstraint {
    /// Minimum order size; at least 1.
    pub min_order: u32,

    pub max_order: Option<u32>,

    /// Current stock, when the listing tracks it.
    pub available: Option<u32>,
}

impl QuantityConstraint {
    pub fn new(min_order: u32, max_order: Option<u32>, available: Option<u32>) -> Self {
        Self {
            min_order: min_order.max(1),
            max_order,
            available,
        }
    }

    /// Upper bound actually in force: the lesser of `max_order` and
    /// `available` when both are present. Raised to `min_order` when the
    /// bounds would otherwise cross, so the range is never impossible.
    pub fn effective_max(&self) -> Option<u32> {
        let raw = match (self.max_order, self.available) {
            (Some(max), Some(avail)) => Some(max.min(avail)),
            (Some(max), None) => Some(max),
            (None, Some(avail)) => Some(avail),
            (None, None) => None,
        };
        raw.map(|m| m.max(self.min_order.max(1)))
    }
}

impl Default for QuantityConstraint {
    fn default() -> Self {
        Self {
            min_order: 1,
            max_order: None,
            available: None,
        }
    }
}
