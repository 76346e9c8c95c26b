//! Generated row types.
//!
//! These mirror the backend tables without depending on backend domain
//! types. Enumerations serialise to the strings stored in the database.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role stored on a user row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleSeed {
    /// Regular marketplace user.
    #[default]
    User,
    /// Moderator with access to the admin surface.
    Admin,
    /// Administrator who may also change roles.
    SuperAdmin,
}

impl RoleSeed {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPERADMIN",
        }
    }
}

/// Carrier tier planned by the owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TierSeed {
    /// Entry tier.
    #[default]
    Basic,
    /// Mid tier.
    Gold,
    /// Top tier.
    Platinum,
}

impl TierSeed {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
        }
    }
}

/// Product condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionSeed {
    /// Never used.
    #[serde(rename = "brand new")]
    BrandNew,
    /// Previously owned.
    #[serde(rename = "pre-owned")]
    PreOwned,
}

impl ConditionSeed {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrandNew => "brand new",
            Self::PreOwned => "pre-owned",
        }
    }
}

/// How a service is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateTypeSeed {
    /// Per hour.
    Hour,
    /// Per day.
    Day,
    /// One-off price.
    Fixed,
}

impl RateTypeSeed {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Fixed => "fixed",
        }
    }
}

/// A user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSeed {
    /// Primary key.
    pub id: Uuid,
    /// Lowercase email address.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Public handle.
    pub username: Option<String>,
    /// Stored role.
    pub role: RoleSeed,
}

/// A product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSeed {
    /// Primary key.
    pub id: Uuid,
    /// Listing title.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Top-level category.
    pub category: String,
    /// Subcategory within `category`.
    pub subcategory: String,
    /// Brand, when known.
    pub brand: Option<String>,
    /// Item condition, when known.
    pub condition: Option<ConditionSeed>,
    /// Whole KES; `None` means "contact for price".
    pub price: Option<i32>,
    /// Cover image URL.
    pub image: String,
    /// Gallery image URLs, cover first.
    pub gallery: Vec<String>,
    /// Town or area.
    pub location: Option<String>,
    /// Whether the price is negotiable.
    pub negotiable: bool,
    /// Whether the listing is promoted.
    pub featured: bool,
    /// Owning user.
    pub seller_id: Uuid,
    /// Seller name denormalised onto the listing.
    pub seller_name: Option<String>,
    /// Seller phone denormalised onto the listing.
    pub seller_phone: Option<String>,
    /// How long before the seeding time the listing was created.
    pub age_minutes: u32,
}

/// A service row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSeed {
    /// Primary key.
    pub id: Uuid,
    /// Listing title.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Top-level category.
    pub category: String,
    /// Subcategory within `category`.
    pub subcategory: String,
    /// Whole KES; `None` means "contact for price".
    pub price: Option<i32>,
    /// Pricing unit.
    pub rate_type: Option<RateTypeSeed>,
    /// Area the provider covers.
    pub service_area: Option<String>,
    /// Free-text availability.
    pub availability: Option<String>,
    /// Cover image URL.
    pub image: String,
    /// Gallery image URLs, cover first.
    pub gallery: Vec<String>,
    /// Town or area.
    pub location: Option<String>,
    /// Whether the listing is promoted.
    pub featured: bool,
    /// Owning user.
    pub seller_id: Uuid,
    /// Seller name denormalised onto the listing.
    pub seller_name: Option<String>,
    /// Seller phone denormalised onto the listing.
    pub seller_phone: Option<String>,
    /// How long before the seeding time the listing was created.
    pub age_minutes: u32,
}

/// A carrier vehicle row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSeed {
    /// Primary key.
    pub id: Uuid,
    /// Vehicle kind, for example `motorbike`.
    pub kind: String,
    /// Registration plate.
    pub plate: Option<String>,
}

/// A carrier profile row with its vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierSeed {
    /// Primary key.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Contact phone.
    pub phone: Option<String>,
    /// Base station.
    pub station: Option<String>,
    /// Planned tier.
    pub tier: TierSeed,
    /// Registered vehicles.
    pub vehicles: Vec<VehicleSeed>,
}

/// Everything a seeding run inserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedDataset {
    /// Catalogue users followed by demo users.
    pub users: Vec<UserSeed>,
    /// Base products followed by clones.
    pub products: Vec<ProductSeed>,
    /// Base services.
    pub services: Vec<ServiceSeed>,
    /// Carrier profiles.
    pub carriers: Vec<CarrierSeed>,
}
