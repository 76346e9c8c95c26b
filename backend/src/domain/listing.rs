//! Marketplace listings: products and services behind one normalised shape.
//!
//! Products and services live in separate tables with different columns.
//! Everything that crosses the admin or search surface is flattened into
//! [`Listing`] so handlers never care which table a row came from.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use pagination::Keyed;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Unknown enum value supplied by a client or read from a row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value: {value}")]
pub struct ListingValueError {
    /// Name of the field as seen by clients.
    pub field: &'static str,
    /// Raw value that failed to parse.
    pub value: String,
}

impl ListingValueError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}

/// Table a listing lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// Row from `products`.
    Product,
    /// Row from `services`.
    Service,
}

impl ListingKind {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingKind {
    type Err = ListingValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" | "products" => Ok(Self::Product),
            "service" | "services" => Ok(Self::Service),
            _ => Err(ListingValueError::new("kind", s)),
        }
    }
}

/// Which tables a listing query spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    /// Products and services.
    #[default]
    All,
    /// One table only.
    Only(ListingKind),
}

impl KindFilter {
    /// Whether rows of `kind` are requested.
    pub fn includes(self, kind: ListingKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == kind,
        }
    }
}

impl FromStr for KindFilter {
    type Err = ListingValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<ListingKind>()
            .map(Self::Only)
            .map_err(|_| ListingValueError::new("type", s))
    }
}

/// Publication state of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListingStatus {
    /// Visible in public search.
    #[default]
    Active,
    /// Not yet published by the seller.
    Draft,
    /// Hidden by a moderator.
    Hidden,
    /// Sold and kept for history.
    Sold,
}

impl ListingStatus {
    /// Database and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Draft => "DRAFT",
            Self::Hidden => "HIDDEN",
            Self::Sold => "SOLD",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = ListingValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "DRAFT" => Ok(Self::Draft),
            "HIDDEN" => Ok(Self::Hidden),
            "SOLD" => Ok(Self::Sold),
            _ => Err(ListingValueError::new("status", s)),
        }
    }
}

/// Item condition, products only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Condition {
    /// Never used.
    #[serde(rename = "brand new")]
    BrandNew,
    /// Used before.
    #[serde(rename = "pre-owned")]
    PreOwned,
}

impl Condition {
    /// Database and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrandNew => "brand new",
            Self::PreOwned => "pre-owned",
        }
    }
}

impl FromStr for Condition {
    type Err = ListingValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match folded.as_str() {
            "brand new" | "new" => Ok(Self::BrandNew),
            "pre owned" | "used" => Ok(Self::PreOwned),
            _ => Err(ListingValueError::new("condition", s)),
        }
    }
}

/// Result ordering for listing queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ListingSort {
    /// `created_at desc, id desc`.
    #[default]
    Newest,
    /// Cheapest first; unpriced rows last.
    PriceAsc,
    /// Most expensive first; unpriced rows last.
    PriceDesc,
    /// Featured first, then newest.
    Featured,
}

impl FromStr for ListingSort {
    type Err = ListingValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "newest" | "top" => Ok(Self::Newest),
            "price_asc" | "price-asc" => Ok(Self::PriceAsc),
            "price_desc" | "price-desc" => Ok(Self::PriceDesc),
            "featured" => Ok(Self::Featured),
            _ => Err(ListingValueError::new("sort", s)),
        }
    }
}

impl ListingSort {
    /// Total order used to merge rows from several sources.
    ///
    /// Within one source this agrees with the SQL ordering, so merging two
    /// sorted slices keeps each slice in order. Rows that tie on the sort
    /// key are ordered by kind and then by descending id.
    pub fn compare(self, a: &Listing, b: &Listing) -> Ordering {
        let newest = || b.created_at.cmp(&a.created_at);
        let primary = match self {
            Self::Newest => newest(),
            Self::PriceAsc => price_nulls_last(a.price, b.price, |x, y| x.cmp(&y)).then_with(newest),
            Self::PriceDesc => price_nulls_last(a.price, b.price, |x, y| y.cmp(&x)).then_with(newest),
            Self::Featured => b.featured.cmp(&a.featured).then_with(newest),
        };
        primary
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| b.id.cmp(&a.id))
    }
}

fn price_nulls_last(
    a: Option<i32>,
    b: Option<i32>,
    order: impl Fn(i32, i32) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => order(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filters shared by the admin listings view and public search.
///
/// Text fields are trimmed; blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Tables to query.
    pub kind: KindFilter,
    /// Case-insensitive substring over name, description, category and
    /// brand (products) or service area (services).
    pub q: Option<String>,
    /// Exact category, case-insensitive.
    pub category: Option<String>,
    /// Exact subcategory, case-insensitive.
    pub subcategory: Option<String>,
    /// Exact brand, case-insensitive. Products only.
    pub brand: Option<String>,
    /// Item condition. Products only.
    pub condition: Option<Condition>,
    /// Publication state.
    pub status: Option<ListingStatus>,
    /// Featured flag.
    pub featured: Option<bool>,
    /// Owning seller.
    pub seller_id: Option<UserId>,
    /// Inclusive lower price bound in KES.
    pub min_price: Option<i32>,
    /// Inclusive upper price bound in KES.
    pub max_price: Option<i32>,
}

impl ListingFilter {
    /// Whether a product-only constraint is set, which rules services out.
    pub fn is_product_only(&self) -> bool {
        self.brand.is_some() || self.condition.is_some()
    }

    /// Check price bounds.
    pub fn validate(&self) -> Result<(), ListingFilterError> {
        for (field, value) in [("minPrice", self.min_price), ("maxPrice", self.max_price)] {
            if value.is_some_and(|price| price < 0) {
                return Err(ListingFilterError::NegativePrice { field });
            }
        }
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) if min > max => {
                Err(ListingFilterError::InvertedPriceRange { min, max })
            }
            _ => Ok(()),
        }
    }

    /// Apply the filter to a row held in memory.
    ///
    /// Mirrors the SQL adapters: `q` looks at name, description, category and
    /// the brand or service area carried in [`ListingDetails`].
    pub fn matches(&self, listing: &Listing) -> bool {
        let eq = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .is_none_or(|wanted| wanted.eq_ignore_ascii_case(actual))
        };
        let details = &listing.details;
        let q_matches = self.q.as_deref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            [
                Some(listing.name.as_str()),
                Some(details.description.as_str()),
                Some(listing.category.as_str()),
                details.brand.as_deref(),
                details.service_area.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
        });
        let brand_matches = self.brand.as_deref().is_none_or(|wanted| {
            details
                .brand
                .as_deref()
                .is_some_and(|brand| brand.eq_ignore_ascii_case(wanted))
        });
        self.kind.includes(listing.kind)
            && !(self.is_product_only() && listing.kind == ListingKind::Service)
            && q_matches
            && brand_matches
            && self
                .condition
                .is_none_or(|condition| details.condition == Some(condition))
            && eq(&self.category, &listing.category)
            && eq(&self.subcategory, &listing.subcategory)
            && self.status.is_none_or(|status| status == listing.status)
            && self.featured.is_none_or(|featured| featured == listing.featured)
            && self
                .seller_id
                .as_ref()
                .is_none_or(|seller| listing.seller_id.as_ref() == Some(seller))
            && self
                .min_price
                .is_none_or(|min| listing.price.is_some_and(|price| price >= min))
            && self
                .max_price
                .is_none_or(|max| listing.price.is_some_and(|price| price <= max))
    }
}

/// Invalid combinations of listing filters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingFilterError {
    /// A price bound was negative.
    #[error("{field} must not be negative")]
    NegativePrice {
        /// Offending parameter.
        field: &'static str,
    },
    /// `minPrice` exceeded `maxPrice`.
    #[error("minPrice ({min}) must not exceed maxPrice ({max})")]
    InvertedPriceRange {
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },
}

/// Searchable attributes that stay off the served row.
///
/// SQL adapters filter on the columns directly and leave this empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDetails {
    /// Free-text description.
    pub description: String,
    /// Manufacturer. Products only.
    pub brand: Option<String>,
    /// Item condition. Products only.
    pub condition: Option<Condition>,
    /// Area covered. Services only.
    pub service_area: Option<String>,
}

/// Flat listing row served by admin and search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Row identifier, unique within its table.
    pub id: Uuid,
    /// Source table.
    pub kind: ListingKind,
    /// Title.
    pub name: String,
    /// Top-level category.
    pub category: String,
    /// Second-level category.
    pub subcategory: String,
    /// Whole KES; `null` means contact for price.
    pub price: Option<i32>,
    /// Promoted listing.
    pub featured: bool,
    /// Publication state.
    pub status: ListingStatus,
    /// Cover image URL.
    pub image: Option<String>,
    /// Town or area.
    pub location: Option<String>,
    /// Owning seller.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub seller_id: Option<UserId>,
    /// Seller display name at publication time.
    pub seller_name: Option<String>,
    /// Publication time.
    pub created_at: DateTime<Utc>,
    /// Filterable attributes for in-memory sources.
    #[serde(skip)]
    pub details: ListingDetails,
}

impl Keyed for Listing {
    type Key = (ListingKind, Uuid);

    fn key(&self) -> Self::Key {
        (self.kind, self.id)
    }
}

/// Moderator change applied to one listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerationChange {
    /// New publication state.
    pub status: Option<ListingStatus>,
    /// New featured flag.
    pub featured: Option<bool>,
}

impl ModerationChange {
    /// Whether the change sets nothing.
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.featured.is_none()
    }
}
