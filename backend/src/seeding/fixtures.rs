//! In-memory rows built from a generated dataset.
//!
//! Without `DATABASE_URL` the server runs on fixture adapters; these rows
//! give them the same catalogue a seeded database would hold.

use chrono::{DateTime, Duration, Utc};
use seed_data::{CarrierSeed, ConditionSeed, SeedDataset, UserSeed};
use uuid::Uuid;

use crate::domain::{
    CarrierProfile, CarrierStatus, CarrierSummary, Condition, Email, Listing, ListingDetails,
    ListingKind, ListingStatus, Role, UserAccount, UserId,
};

/// Rows for the fixture adapters.
#[derive(Debug, Clone, Default)]
pub struct FixtureRows {
    /// Directory accounts.
    pub users: Vec<UserAccount>,
    /// Products and services, tagged by kind.
    pub listings: Vec<Listing>,
    /// Carrier directory rows.
    pub carriers: Vec<CarrierSummary>,
}

/// Errors raised when a seed row does not form a valid domain value.
#[derive(Debug, thiserror::Error)]
#[error("seed row {id} is invalid: {message}")]
pub struct FixtureRowError {
    id: Uuid,
    message: String,
}

fn invalid(id: Uuid, message: impl ToString) -> FixtureRowError {
    FixtureRowError {
        id,
        message: message.to_string(),
    }
}

const fn condition(seed: ConditionSeed) -> Condition {
    match seed {
        ConditionSeed::BrandNew => Condition::BrandNew,
        ConditionSeed::PreOwned => Condition::PreOwned,
    }
}

fn aged(now: DateTime<Utc>, age_minutes: u32) -> DateTime<Utc> {
    now - Duration::minutes(i64::from(age_minutes))
}

fn account(seed: &UserSeed, now: DateTime<Utc>) -> Result<UserAccount, FixtureRowError> {
    Ok(UserAccount {
        id: UserId::from_uuid(seed.id),
        email: Email::new(&seed.email).map_err(|err| invalid(seed.id, err))?,
        name: seed.name.clone(),
        username: seed.username.clone(),
        role: seed
            .role
            .as_str()
            .parse::<Role>()
            .map_err(|err| invalid(seed.id, err))?,
        banned: false,
        suspended: false,
        created_at: now,
    })
}

fn carrier(
    seed: &CarrierSeed,
    owners: &[UserAccount],
    now: DateTime<Utc>,
) -> Result<CarrierSummary, FixtureRowError> {
    let owner = owners
        .iter()
        .find(|user| user.id.as_uuid() == &seed.user_id)
        .ok_or_else(|| invalid(seed.id, "owner is not a seeded user"))?;
    Ok(CarrierSummary {
        carrier: CarrierProfile {
            id: seed.id,
            user_id: owner.id.clone(),
            phone: seed.phone.clone(),
            station: seed.station.clone(),
            tier: seed
                .tier
                .as_str()
                .parse()
                .map_err(|err| invalid(seed.id, err))?,
            status: CarrierStatus::Active,
            suspended_until: None,
            banned_at: None,
            ban_reason: None,
            created_at: now,
        },
        user_email: owner.email.clone(),
        user_name: owner.name.clone(),
    })
}

impl FixtureRows {
    /// Convert `dataset`, stamping listings relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureRowError`] when a row carries a value the domain
    /// rejects, such as an implausible email.
    pub fn from_dataset(dataset: &SeedDataset, now: DateTime<Utc>) -> Result<Self, FixtureRowError> {
        let users = dataset
            .users
            .iter()
            .map(|seed| account(seed, now))
            .collect::<Result<Vec<_>, _>>()?;

        let products = dataset.products.iter().map(|seed| Listing {
            id: seed.id,
            kind: ListingKind::Product,
            name: seed.name.clone(),
            category: seed.category.clone(),
            subcategory: seed.subcategory.clone(),
            price: seed.price,
            featured: seed.featured,
            status: ListingStatus::Active,
            image: Some(seed.image.clone()),
            location: seed.location.clone(),
            seller_id: Some(UserId::from_uuid(seed.seller_id)),
            seller_name: seed.seller_name.clone(),
            created_at: aged(now, seed.age_minutes),
            details: ListingDetails {
                description: seed.description.clone(),
                brand: seed.brand.clone(),
                condition: seed.condition.map(condition),
                service_area: None,
            },
        });
        let services = dataset.services.iter().map(|seed| Listing {
            id: seed.id,
            kind: ListingKind::Service,
            name: seed.name.clone(),
            category: seed.category.clone(),
            subcategory: seed.subcategory.clone(),
            price: seed.price,
            featured: seed.featured,
            status: ListingStatus::Active,
            image: Some(seed.image.clone()),
            location: seed.location.clone(),
            seller_id: Some(UserId::from_uuid(seed.seller_id)),
            seller_name: seed.seller_name.clone(),
            created_at: aged(now, seed.age_minutes),
            details: ListingDetails {
                description: seed.description.clone(),
                brand: None,
                condition: None,
                service_area: seed.service_area.clone(),
            },
        });
        let listings = products.chain(services).collect();

        let carriers = dataset
            .carriers
            .iter()
            .map(|seed| carrier(seed, &users, now))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            users,
            listings,
            carriers,
        })
    }
}
