//! Seed catalogue types and JSON parsing.
//!
//! The catalogue is the hand-curated part of the seed data: real-looking
//! users, one row per product or service type, and carriers. Expansion
//! happens later in [`crate::generate_dataset`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::CatalogueError;
use crate::seed::{ConditionSeed, RateTypeSeed, RoleSeed, TierSeed};
use crate::validation::{is_plausible_email, normalise_email};

/// Current supported catalogue version.
const SUPPORTED_VERSION: u32 = 1;

/// A validated seed catalogue.
///
/// Emails are normalised to lowercase and every seller or carrier reference
/// is known to resolve to a catalogue user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    users: Vec<CatalogueUser>,
    products: Vec<CatalogueProduct>,
    services: Vec<CatalogueService>,
    carriers: Vec<CatalogueCarrier>,
}

/// A user declared in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueUser {
    /// Fixed identifier so repeated seeding keeps references stable.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Public handle.
    #[serde(default)]
    pub username: Option<String>,
    /// Stored role.
    #[serde(default)]
    pub role: RoleSeed,
    /// Phone copied onto the user's listings.
    #[serde(default)]
    pub phone: Option<String>,
}

/// A base product that expansion clones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueProduct {
    /// Listing title.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Top-level category.
    pub category: String,
    /// Subcategory within `category`.
    pub subcategory: String,
    /// Brand, when known.
    #[serde(default)]
    pub brand: Option<String>,
    /// Item condition, when known.
    #[serde(default)]
    pub condition: Option<ConditionSeed>,
    /// Whole KES; absent means "contact for price".
    #[serde(default)]
    pub price: Option<i32>,
    /// Cover image URL; a placeholder is used when absent.
    #[serde(default)]
    pub image: Option<String>,
    /// Extra gallery URLs.
    #[serde(default)]
    pub gallery: Vec<String>,
    /// Town or area.
    #[serde(default)]
    pub location: Option<String>,
    /// Whether the price is negotiable.
    #[serde(default)]
    pub negotiable: bool,
    /// Whether the listing is promoted.
    #[serde(default)]
    pub featured: bool,
    /// Seller email; a seller is picked when absent.
    #[serde(default)]
    pub seller_email: Option<String>,
}

/// A base service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueService {
    /// Listing title.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Top-level category.
    pub category: String,
    /// Subcategory within `category`.
    pub subcategory: String,
    /// Whole KES; absent means "contact for price".
    #[serde(default)]
    pub price: Option<i32>,
    /// Pricing unit.
    #[serde(default)]
    pub rate_type: Option<RateTypeSeed>,
    /// Area the provider covers.
    #[serde(default)]
    pub service_area: Option<String>,
    /// Free-text availability.
    #[serde(default)]
    pub availability: Option<String>,
    /// Cover image URL; a placeholder is used when absent.
    #[serde(default)]
    pub image: Option<String>,
    /// Town or area.
    #[serde(default)]
    pub location: Option<String>,
    /// Whether the listing is promoted.
    #[serde(default)]
    pub featured: bool,
    /// Seller email; a seller is picked when absent.
    #[serde(default)]
    pub seller_email: Option<String>,
}

/// A vehicle registered to a catalogue carrier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueVehicle {
    /// Vehicle kind, for example `motorbike`.
    pub kind: String,
    /// Registration plate.
    #[serde(default)]
    pub plate: Option<String>,
}

/// A carrier profile declared in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueCarrier {
    /// Email of the owning user.
    pub user_email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Base station.
    #[serde(default)]
    pub station: Option<String>,
    /// Planned tier.
    #[serde(default)]
    pub tier: TierSeed,
    /// Registered vehicles.
    #[serde(default)]
    pub vehicles: Vec<CatalogueVehicle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalogue {
    version: u32,
    #[serde(default)]
    users: Vec<CatalogueUser>,
    #[serde(default)]
    products: Vec<CatalogueProduct>,
    #[serde(default)]
    services: Vec<CatalogueService>,
    #[serde(default)]
    carriers: Vec<CatalogueCarrier>,
}

impl Catalogue {
    /// Parses and validates a catalogue from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if:
    /// - The JSON is malformed or the version is unsupported
    /// - A user email is implausible or repeated
    /// - A listing has a blank name or a negative price
    /// - A seller or carrier references an unknown user
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let raw: RawCatalogue =
            serde_json::from_str(json).map_err(|e| CatalogueError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a catalogue from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CatalogueError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogueError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawCatalogue) -> Result<Self, CatalogueError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(CatalogueError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        let users = normalise_users(raw.users)?;
        let known: HashSet<&str> = users.iter().map(|user| user.email.as_str()).collect();

        let products = raw
            .products
            .into_iter()
            .enumerate()
            .map(|(index, mut product)| {
                check_listing("product", index, &product.name, product.price)?;
                product.seller_email =
                    resolve_seller("product", &product.name, product.seller_email, &known)?;
                Ok(product)
            })
            .collect::<Result<Vec<_>, CatalogueError>>()?;

        let services = raw
            .services
            .into_iter()
            .enumerate()
            .map(|(index, mut service)| {
                check_listing("service", index, &service.name, service.price)?;
                service.seller_email =
                    resolve_seller("service", &service.name, service.seller_email, &known)?;
                Ok(service)
            })
            .collect::<Result<Vec<_>, CatalogueError>>()?;

        let mut carrier_owners = HashSet::new();
        let carriers = raw
            .carriers
            .into_iter()
            .enumerate()
            .map(|(index, mut carrier)| {
                let email = normalise_email(&carrier.user_email);
                if !known.contains(email.as_str()) {
                    return Err(CatalogueError::UnknownCarrierUser { index, email });
                }
                if !carrier_owners.insert(email.clone()) {
                    return Err(CatalogueError::DuplicateCarrier { email });
                }
                carrier.user_email = email;
                Ok(carrier)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            users,
            products,
            services,
            carriers,
        })
    }

    /// Returns the catalogue users.
    #[must_use]
    pub fn users(&self) -> &[CatalogueUser] {
        &self.users
    }

    /// Returns the base products.
    #[must_use]
    pub fn products(&self) -> &[CatalogueProduct] {
        &self.products
    }

    /// Returns the base services.
    #[must_use]
    pub fn services(&self) -> &[CatalogueService] {
        &self.services
    }

    /// Returns the carrier profiles.
    #[must_use]
    pub fn carriers(&self) -> &[CatalogueCarrier] {
        &self.carriers
    }

    /// Finds a catalogue user by email, ignoring case.
    #[must_use]
    pub fn find_user(&self, email: &str) -> Option<&CatalogueUser> {
        let wanted = normalise_email(email);
        self.users.iter().find(|user| user.email == wanted)
    }
}

fn normalise_users(users: Vec<CatalogueUser>) -> Result<Vec<CatalogueUser>, CatalogueError> {
    let mut seen = HashSet::new();
    users
        .into_iter()
        .enumerate()
        .map(|(index, mut user)| {
            let email = normalise_email(&user.email);
            if !is_plausible_email(&email) {
                return Err(CatalogueError::InvalidEmail {
                    index,
                    value: user.email,
                });
            }
            if !seen.insert(email.clone()) {
                return Err(CatalogueError::DuplicateEmail { email });
            }
            user.email = email;
            Ok(user)
        })
        .collect()
}

fn check_listing(
    kind: &'static str,
    index: usize,
    name: &str,
    price: Option<i32>,
) -> Result<(), CatalogueError> {
    if name.trim().is_empty() {
        return Err(CatalogueError::EmptyName { kind, index });
    }
    if price.is_some_and(|value| value < 0) {
        return Err(CatalogueError::NegativePrice {
            kind,
            listing: name.to_owned(),
        });
    }
    Ok(())
}

fn resolve_seller(
    kind: &'static str,
    listing: &str,
    seller_email: Option<String>,
    known: &HashSet<&str>,
) -> Result<Option<String>, CatalogueError> {
    let Some(raw) = seller_email else {
        return Ok(None);
    };
    let email = normalise_email(&raw);
    if known.contains(email.as_str()) {
        Ok(Some(email))
    } else {
        Err(CatalogueError::UnknownSeller {
            kind,
            listing: listing.to_owned(),
            email,
        })
    }
}
