use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, EnumString};
use uuid::Uuid;

/// Canonical shipment lifecycle status.
///
/// The backend reports status as free text with many synonyms; every record
/// is normalized into one of these four states on fetch. The derived `Ord`
/// follows lifecycle position, so transitions must be monotonically
/// non-decreasing in this ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    Pending,
    Collecting,
    InProgress,
    Completed,
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalStatus::Pending => write!(f, "Pending"),
            CanonicalStatus::Collecting => write!(f, "Collecting from farmer"),
            CanonicalStatus::InProgress => write!(f, "In progress"),
            CanonicalStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl CanonicalStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CanonicalStatus::Completed)
    }
}

/// User role as understood by the permission evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Buyer,
    Farmer,
    ShopOwner,
    Transporter,
    Admin,
    Moderator,
    MainModerator,
    Other,
}

impl Role {
    /// Parse a backend role string, defaulting to `Other` for anything
    /// unrecognized. Unknown roles carry no privileges.
    pub fn from_raw(raw: &str) -> Self {
        Role::from_str(raw.trim()).unwrap_or(Role::Other)
    }

    /// Privileged roles get cross-cutting permission overrides.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::Moderator | Role::MainModerator)
    }
}

/// The acting user's identity, passed explicitly into every core function.
/// The core never reads session state from ambient storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub id: Uuid,
    pub role: Role,
}

impl UserContext {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// One party to a shipment: the farmer, the buyer, or an assigned
/// transporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: Uuid,

    pub name: String,

    pub phone: Option<String>,

    /// Free-text address as entered by the party.
    pub address: Option<String>,

    /// District label used by the list filters; compared verbatim.
    pub district: Option<String>,

    pub coords: Option<GeoPoint>,
}

impl Party {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone: None,
            address: None,
            district: None,
            coords: None,
        }
    }
}

/// The ordered product line a shipment carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub name: String,

    pub quantity: u32,

    /// Unit of sale, e.g. "kg" or "crate".
    pub unit: String,
}

/// One order line's physical fulfillment record.
///
/// `canonical_status` is derived from `raw_status` on every fetch and is
/// never ground truth; the backend owns the status. A shipment with no
/// transporter is a self-pickup shipment: the buyer, farmer, or shop owner
/// hands the goods over directly and the transporter-only states are
/// unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Mutation key used against the backend.
    pub id: Uuid,

    /// User-facing order reference.
    pub external_order_id: String,

    /// Status exactly as received; opaque after normalization.
    pub raw_status: String,

    pub canonical_status: CanonicalStatus,

    pub product: ProductLine,

    pub farmer: Party,

    pub buyer: Party,

    pub transporter: Option<Party>,

    /// Owner of the shop the product was listed under, when the listing
    /// belongs to a shop rather than a lone farmer.
    pub shop_owner_id: Option<Uuid>,

    pub transport_cost: Option<Decimal>,

    pub distance_km: Option<f64>,

    pub scheduled_date: Option<NaiveDate>,

    pub scheduled_time: Option<NaiveTime>,

    pub created_at: Option<DateTime<Utc>>,
}

impl Shipment {
    /// No transporter assigned: buyer/farmer/shop owner hand off directly.
    pub fn is_self_pickup(&self) -> bool {
        self.transporter.is_none()
    }

    pub fn pickup_address(&self) -> Option<&str> {
        self.farmer.address.as_deref()
    }

    pub fn delivery_address(&self) -> Option<&str> {
        self.buyer.address.as_deref()
    }

    pub fn pickup_district(&self) -> Option<&str> {
        self.farmer.district.as_deref()
    }

    pub fn delivery_district(&self) -> Option<&str> {
        self.buyer.district.as_deref()
    }

    /// Human-readable status label for list rows.
    pub fn status_label(&self) -> String {
        self.canonical_status.to_string()
    }
}
