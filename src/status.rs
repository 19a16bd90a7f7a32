//! Status normalization boundary.
//!
//! The backend reports shipment status as free text in several vocabularies
//! (older transporter app strings, newer order API strings, manual entries).
//! Everything is mapped here, once, into [`CanonicalStatus`]; no other module
//! interprets raw status strings.

use tracing::warn;

use crate::models::shipment::CanonicalStatus;

/// Map a raw backend status string to its canonical lifecycle state.
///
/// Input is trimmed and lower-cased; `-`, `_`, and runs of whitespace are
/// treated as the same separator. Empty and unrecognized input falls back to
/// `Pending`: on unknown vocabulary the display must never advance a
/// shipment beyond what is confirmed, even though this can regress the shown
/// progress of a shipment whose backend uses an unanticipated synonym.
pub fn normalize(raw: &str) -> CanonicalStatus {
    let key = canonical_key(raw);
    match key.as_str() {
        "" => CanonicalStatus::Pending,

        "pending" | "assigned" | "not_started" | "queued" => CanonicalStatus::Pending,

        "collecting" | "collecting_from_farmer" | "on_the_way" | "on_the_way_to_pickup"
        | "coming_to_pickup" => CanonicalStatus::Collecting,

        "collected" | "collected_from_farmer" | "picked_up" | "in_progress" | "inprogress"
        | "delivering" | "out_for_delivery" => CanonicalStatus::InProgress,

        "completed" | "delivered" => CanonicalStatus::Completed,

        other => {
            warn!(raw_status = %other, "unrecognized shipment status, defaulting to pending");
            CanonicalStatus::Pending
        }
    }
}

/// Re-express a canonical state in the backend's vocabulary, using one
/// representative synonym per state. Used when requesting a transition; the
/// inverse of [`normalize`] in the sense that `normalize(to_raw(s)) == s`.
pub fn to_raw(status: CanonicalStatus) -> &'static str {
    match status {
        CanonicalStatus::Pending => "pending",
        CanonicalStatus::Collecting => "collecting",
        CanonicalStatus::InProgress => "collected",
        CanonicalStatus::Completed => "completed",
    }
}

fn canonical_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.trim().chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            pending_sep = !key.is_empty();
        } else {
            if pending_sep {
                key.push('_');
                pending_sep = false;
            }
            key.extend(c.to_lowercase());
        }
    }
    key
}
