//! Shipment list aggregation: bucket merge, filtering, sorting, and summary
//! counts. Pure functions over snapshots; nothing here mutates a shipment or
//! keeps state between calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::models::shipment::{CanonicalStatus, Shipment};

/// List filters. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentFilters {
    /// Exact canonical status match.
    pub status: Option<CanonicalStatus>,

    /// Case-sensitive exact match against the pickup or delivery district
    /// label as stored.
    pub district: Option<String>,

    /// Case-insensitive substring search over order id, product name, party
    /// names, and both location strings. Blank matches everything.
    pub search_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    Newest,
    Oldest,
    Distance,
}

/// Number of shipments per canonical state, for the list header chips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub collecting: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.collecting + self.in_progress + self.completed
    }
}

/// Merge source buckets and apply filters and sort order.
///
/// Buckets are concatenated in the order given, preserving each bucket's
/// internal order; all sorts are stable, so ties keep that concatenation
/// order. Missing `created_at` sorts as the oldest possible instant; missing
/// `distance_km` sorts last under the distance order.
pub fn aggregate(
    buckets: &[Vec<Shipment>],
    filters: &ShipmentFilters,
    sort: SortOrder,
) -> Vec<Shipment> {
    let mut merged: Vec<Shipment> = buckets
        .iter()
        .flatten()
        .filter(|s| matches_filters(s, filters))
        .cloned()
        .collect();

    match sort {
        SortOrder::Newest => {
            merged.sort_by_key(|s| std::cmp::Reverse(created_at_or_epoch(s)));
        }
        SortOrder::Oldest => {
            merged.sort_by_key(created_at_or_epoch);
        }
        SortOrder::Distance => {
            merged.sort_by(|a, b| {
                distance_or_infinity(a).total_cmp(&distance_or_infinity(b))
            });
        }
    }

    merged
}

/// Count shipments per canonical state.
pub fn status_counts(shipments: &[Shipment]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for shipment in shipments {
        match shipment.canonical_status {
            CanonicalStatus::Pending => counts.pending += 1,
            CanonicalStatus::Collecting => counts.collecting += 1,
            CanonicalStatus::InProgress => counts.in_progress += 1,
            CanonicalStatus::Completed => counts.completed += 1,
        }
    }
    counts
}

fn matches_filters(shipment: &Shipment, filters: &ShipmentFilters) -> bool {
    if let Some(status) = filters.status {
        if shipment.canonical_status != status {
            return false;
        }
    }

    if let Some(district) = filters.district.as_deref() {
        let pickup = shipment.pickup_district() == Some(district);
        let delivery = shipment.delivery_district() == Some(district);
        if !pickup && !delivery {
            return false;
        }
    }

    if let Some(needle) = filters.search_text.as_deref() {
        let needle = needle.trim().to_lowercase();
        if !needle.is_empty() && !search_haystack(shipment).contains(&needle) {
            return false;
        }
    }

    true
}

fn search_haystack(shipment: &Shipment) -> String {
    [
        shipment.external_order_id.as_str(),
        shipment.product.name.as_str(),
        shipment.farmer.name.as_str(),
        shipment.buyer.name.as_str(),
        shipment.pickup_address().unwrap_or(""),
        shipment.delivery_address().unwrap_or(""),
    ]
    .join(" ")
    .to_lowercase()
}

fn created_at_or_epoch(shipment: &Shipment) -> DateTime<Utc> {
    shipment.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn distance_or_infinity(shipment: &Shipment) -> f64 {
    shipment.distance_km.unwrap_or(f64::INFINITY)
}
