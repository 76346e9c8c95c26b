//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types parse the
//! stored enum strings and fail with a message on unknown values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    CarrierProfile, CarrierStatus, CarrierTier, Email, Listing, ListingDetails, ListingKind, ListingStatus,
    Role, UserAccount, UserId,
};

use super::schema::{
    carrier_profiles, carrier_vehicles, products, seed_runs, services, users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub role: String,
    pub banned: bool,
    pub suspended: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(&row.email)
            .map_err(|err| format!("user {} has an invalid email: {err}", row.id))?;
        let role = row
            .role
            .parse::<Role>()
            .map_err(|err| format!("user {} has an invalid role: {err}", row.id))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email,
            name: row.name,
            username: row.username,
            role,
            banned: row.banned,
            suspended: row.suspended,
            created_at: row.created_at,
        })
    }
}

/// Changeset for admin updates; `None` fields are left alone.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub role: Option<&'a str>,
    pub banned: Option<bool>,
    pub suspended: Option<bool>,
}

/// Insertable struct for seeded users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Generates the read row and moderation changeset for one listings table.
///
/// Both tables share the columns [`Listing`] needs, so the two row types are
/// identical apart from their table.
macro_rules! listing_rows {
    ($row:ident, $changeset:ident, $table:ident) => {
        #[derive(Debug, Clone, Queryable, Selectable)]
        #[diesel(table_name = $table)]
        #[diesel(check_for_backend(diesel::pg::Pg))]
        pub(crate) struct $row {
            pub id: Uuid,
            pub name: String,
            pub category: String,
            pub subcategory: String,
            pub price: Option<i32>,
            pub featured: bool,
            pub status: String,
            pub image: Option<String>,
            pub location: Option<String>,
            pub seller_id: Option<Uuid>,
            pub seller_name: Option<String>,
            pub created_at: DateTime<Utc>,
        }

        impl $row {
            pub(crate) fn into_listing(self, kind: ListingKind) -> Result<Listing, String> {
                let status = self
                    .status
                    .parse::<ListingStatus>()
                    .map_err(|err| format!("{kind} {} has an invalid status: {err}", self.id))?;
                Ok(Listing {
                    id: self.id,
                    kind,
                    name: self.name,
                    category: self.category,
                    subcategory: self.subcategory,
                    price: self.price,
                    featured: self.featured,
                    status,
                    image: self.image,
                    location: self.location,
                    seller_id: self.seller_id.map(UserId::from_uuid),
                    seller_name: self.seller_name,
                    created_at: self.created_at,
                    details: ListingDetails::default(),
                })
            }
        }

        #[derive(Debug, Clone, AsChangeset)]
        #[diesel(table_name = $table)]
        pub(crate) struct $changeset<'a> {
            pub status: Option<&'a str>,
            pub featured: Option<bool>,
        }
    };
}

listing_rows!(ProductListingRow, ProductModeration, products);
listing_rows!(ServiceListingRow, ServiceModeration, services);

/// Insertable struct for seeded products.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub subcategory: &'a str,
    pub brand: Option<&'a str>,
    pub condition: Option<&'a str>,
    pub price: Option<i32>,
    pub image: Option<&'a str>,
    pub gallery: &'a [String],
    pub location: Option<&'a str>,
    pub negotiable: bool,
    pub featured: bool,
    pub status: &'a str,
    pub seller_id: Option<Uuid>,
    pub seller_name: Option<&'a str>,
    pub seller_phone: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for seeded services.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = services)]
pub(crate) struct NewServiceRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub subcategory: &'a str,
    pub price: Option<i32>,
    pub rate_type: Option<&'a str>,
    pub service_area: Option<&'a str>,
    pub availability: Option<&'a str>,
    pub image: Option<&'a str>,
    pub gallery: &'a [String],
    pub location: Option<&'a str>,
    pub featured: bool,
    pub status: &'a str,
    pub seller_id: Option<Uuid>,
    pub seller_name: Option<&'a str>,
    pub seller_phone: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Carriers
// ---------------------------------------------------------------------------

/// Row struct for reading from the carrier_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = carrier_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CarrierRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone: Option<String>,
    pub station: Option<String>,
    pub planned_tier: String,
    pub status: String,
    pub suspended_until: Option<DateTime<Utc>>,
    pub banned_at: Option<DateTime<Utc>>,
    pub ban_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CarrierRow> for CarrierProfile {
    type Error = String;

    fn try_from(row: CarrierRow) -> Result<Self, Self::Error> {
        let tier = row
            .planned_tier
            .parse::<CarrierTier>()
            .map_err(|err| format!("carrier {}: {err}", row.id))?;
        let status = row
            .status
            .parse::<CarrierStatus>()
            .map_err(|err| format!("carrier {}: {err}", row.id))?;
        Ok(Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            phone: row.phone,
            station: row.station,
            tier,
            status,
            suspended_until: row.suspended_until,
            banned_at: row.banned_at,
            ban_reason: row.ban_reason,
            created_at: row.created_at,
        })
    }
}

/// Every enforcement column, written as a whole so cleared fields become
/// `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = carrier_profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CarrierEnforcement<'a> {
    pub planned_tier: &'a str,
    pub status: &'a str,
    pub suspended_until: Option<DateTime<Utc>>,
    pub banned_at: Option<DateTime<Utc>>,
    pub ban_reason: Option<&'a str>,
}

impl<'a> From<&'a CarrierProfile> for CarrierEnforcement<'a> {
    fn from(carrier: &'a CarrierProfile) -> Self {
        Self {
            planned_tier: carrier.tier.as_str(),
            status: carrier.status.as_str(),
            suspended_until: carrier.suspended_until,
            banned_at: carrier.banned_at,
            ban_reason: carrier.ban_reason.as_deref(),
        }
    }
}

/// Insertable struct for seeded carriers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = carrier_profiles)]
pub(crate) struct NewCarrierRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone: Option<&'a str>,
    pub station: Option<&'a str>,
    pub planned_tier: &'a str,
}

/// Insertable struct for seeded vehicles.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = carrier_vehicles)]
pub(crate) struct NewVehicleRow<'a> {
    pub id: Uuid,
    pub carrier_id: Uuid,
    pub kind: &'a str,
    pub plate: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Seed runs
// ---------------------------------------------------------------------------

/// Insertable struct for recording a seed run.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = seed_runs)]
pub(crate) struct NewSeedRunRow<'a> {
    pub seed_key: &'a str,
    pub seed: i64,
}
