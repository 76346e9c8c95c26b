//! Deterministic dataset generation from a catalogue.
//!
//! Every function seeds a `ChaCha8Rng` from the caller's seed, so output is
//! reproducible across runs and platforms.

use std::collections::HashMap;

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::catalogue::{Catalogue, CatalogueProduct, CatalogueService, CatalogueUser};
use crate::error::GenerationError;
use crate::seed::{
    CarrierSeed, ProductSeed, RoleSeed, SeedDataset, ServiceSeed, UserSeed, VehicleSeed,
};
use crate::validation::{ascii_slug, kebab_slug};

/// Largest price adjustment applied to clones, in basis points.
const JITTER_BASIS_POINTS: i64 = 1_500;

/// Basis points in one whole.
const BASIS: i64 = 10_000;

/// Prices are rounded to the nearest multiple of this many shillings.
const PRICE_STEP: i64 = 10;

/// Listings are backdated by up to thirty days.
const MAX_AGE_MINUTES: u32 = 30 * 24 * 60;

/// One clone in this many is featured.
const CLONE_FEATURED_ODDS: u32 = 8;

/// Domain used for generated demo accounts.
const DEMO_EMAIL_DOMAIN: &str = "demo.qwiksale.test";

/// Towns used when a base listing has no location.
const FALLBACK_LOCATIONS: [&str; 6] = [
    "Nairobi", "Mombasa", "Kisumu", "Nakuru", "Eldoret", "Thika",
];

/// Options for [`generate_dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetOptions {
    /// RNG seed; equal seeds give equal datasets.
    pub seed: u64,
    /// Minimum number of product rows.
    pub min_products: usize,
    /// Number of generated demo users.
    pub demo_users: usize,
}

/// A user that listings can be attributed to.
#[derive(Debug, Clone)]
struct Seller {
    id: Uuid,
    name: Option<String>,
    phone: Option<String>,
}

impl Seller {
    fn from_catalogue(user: &CatalogueUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            phone: user.phone.clone(),
        }
    }

    fn from_seed(user: &UserSeed) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            phone: None,
        }
    }
}

/// Sellers indexed by email plus the pool used for unattributed listings.
struct SellerBook {
    by_email: HashMap<String, Seller>,
    pool: Vec<Seller>,
}

impl SellerBook {
    fn new(catalogue: &Catalogue, demo_users: &[UserSeed]) -> Self {
        let by_email = catalogue
            .users()
            .iter()
            .map(|user| (user.email.clone(), Seller::from_catalogue(user)))
            .collect();

        // Staff accounts only sell when nobody else can.
        let mut pool: Vec<Seller> = catalogue
            .users()
            .iter()
            .filter(|user| user.role == RoleSeed::User)
            .map(Seller::from_catalogue)
            .chain(demo_users.iter().map(Seller::from_seed))
            .collect();
        if pool.is_empty() {
            pool = catalogue.users().iter().map(Seller::from_catalogue).collect();
        }

        Self { by_email, pool }
    }

    fn pick(
        &self,
        rng: &mut ChaCha8Rng,
        seller_email: Option<&str>,
    ) -> Result<Seller, GenerationError> {
        if let Some(seller) = seller_email.and_then(|email| self.by_email.get(email)) {
            return Ok(seller.clone());
        }
        if self.pool.is_empty() {
            return Err(GenerationError::NoSellers);
        }
        let index = rng.random_range(0..self.pool.len());
        self.pool.get(index).cloned().ok_or(GenerationError::NoSellers)
    }
}

/// Applies a deterministic price jitter of at most ±15 %.
///
/// The result is rounded to the nearest 10 and is never negative.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use seed_data::jitter_price;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let price = jitter_price(10_000, &mut rng);
/// assert!((8_500..=11_500).contains(&price));
/// assert_eq!(price % 10, 0);
/// ```
pub fn jitter_price<R: Rng + ?Sized>(price: i32, rng: &mut R) -> i32 {
    let basis_points = rng.random_range(-JITTER_BASIS_POINTS..=JITTER_BASIS_POINTS);
    let scaled = i64::from(price.max(0)).saturating_mul(BASIS + basis_points);
    let unit = BASIS * PRICE_STEP;
    let rounded = scaled
        .saturating_add(unit.div_euclid(2))
        .div_euclid(unit)
        .saturating_mul(PRICE_STEP);
    i32::try_from(rounded.max(0)).unwrap_or(i32::MAX)
}

/// Placeholder image URL for the `index`-th row of a category.
///
/// # Examples
///
/// ```
/// use seed_data::placeholder_image;
///
/// assert_eq!(
///     placeholder_image("Home & Living", 3),
///     "https://picsum.photos/seed/qwiksale-home-living-3/800/600",
/// );
/// ```
#[must_use]
pub fn placeholder_image(category: &str, index: usize) -> String {
    let slug = kebab_slug(category);
    let slug = if slug.is_empty() { "listing".to_owned() } else { slug };
    format!("https://picsum.photos/seed/qwiksale-{slug}-{index}/800/600")
}

/// Generates `count` demo users with fake names and deterministic emails.
///
/// # Examples
///
/// ```
/// use seed_data::generate_demo_users;
///
/// let users = generate_demo_users(3, 99);
/// assert_eq!(users.len(), 3);
/// assert!(users.iter().all(|u| u.email.ends_with("@demo.qwiksale.test")));
/// assert_eq!(users, generate_demo_users(3, 99));
/// ```
#[must_use]
pub fn generate_demo_users(count: usize, seed: u64) -> Vec<UserSeed> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    demo_users(&mut rng, count)
}

fn demo_users(rng: &mut ChaCha8Rng, count: usize) -> Vec<UserSeed> {
    (1..=count)
        .map(|number| {
            let id = Uuid::from_u128(rng.random());
            let first: String = FirstName(EN).fake_with_rng(rng);
            let last: String = LastName(EN).fake_with_rng(rng);
            let handle = non_empty_or(ascii_slug(&first), "demo");
            let family = non_empty_or(ascii_slug(&last), "user");
            UserSeed {
                id,
                email: format!("{handle}.{family}{number}@{DEMO_EMAIL_DOMAIN}"),
                name: Some(format!("{first} {last}")),
                username: Some(format!("{handle}{family}{number}")),
                role: RoleSeed::User,
            }
        })
        .collect()
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_owned()
    } else {
        value
    }
}

/// Expands the catalogue's base products to at least `min_rows` rows.
///
/// Base products come first, unchanged apart from seller attribution and
/// placeholder images. Clones follow round-robin over the base products,
/// named `"<name> #<n>"` with `n` starting at 2, with jittered prices and a
/// seller picked from the catalogue users. Asking for fewer rows than the
/// catalogue holds returns the base products alone.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyCatalogue`] when rows are requested from
/// a catalogue without products, and [`GenerationError::NoSellers`] when a
/// product needs a seller but the catalogue has no users.
pub fn expand_products(
    catalogue: &Catalogue,
    min_rows: usize,
    seed: u64,
) -> Result<Vec<ProductSeed>, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let sellers = SellerBook::new(catalogue, &[]);
    expand_with(&mut rng, catalogue.products(), &sellers, min_rows)
}

fn expand_with(
    rng: &mut ChaCha8Rng,
    base: &[CatalogueProduct],
    sellers: &SellerBook,
    min_rows: usize,
) -> Result<Vec<ProductSeed>, GenerationError> {
    if base.is_empty() {
        return if min_rows == 0 {
            Ok(Vec::new())
        } else {
            Err(GenerationError::EmptyCatalogue { min_rows })
        };
    }

    let mut rows = Vec::with_capacity(min_rows.max(base.len()));
    for (index, product) in base.iter().enumerate() {
        let seller = sellers.pick(rng, product.seller_email.as_deref())?;
        let image = product
            .image
            .clone()
            .unwrap_or_else(|| placeholder_image(&product.category, index));
        let mut gallery = vec![image.clone()];
        gallery.extend(product.gallery.iter().filter(|url| **url != image).cloned());
        rows.push(ProductSeed {
            id: Uuid::from_u128(rng.random()),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
            brand: product.brand.clone(),
            condition: product.condition,
            price: product.price,
            image,
            gallery,
            location: product.location.clone().or_else(|| pick_location(rng)),
            negotiable: product.negotiable,
            featured: product.featured,
            seller_id: seller.id,
            seller_name: seller.name,
            seller_phone: seller.phone,
            age_minutes: rng.random_range(0..MAX_AGE_MINUTES),
        });
    }

    for clone_index in 0..min_rows.saturating_sub(base.len()) {
        let Some(product) = base.get(clone_index.rem_euclid(base.len())) else {
            break;
        };
        let copy_number = clone_index.div_euclid(base.len()) + 2;
        let row_index = base.len() + clone_index;
        let seller = sellers.pick(rng, None)?;
        let image = placeholder_image(&product.category, row_index);
        rows.push(ProductSeed {
            id: Uuid::from_u128(rng.random()),
            name: format!("{} #{copy_number}", product.name),
            description: product.description.clone(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
            brand: product.brand.clone(),
            condition: product.condition,
            price: product.price.map(|price| jitter_price(price, rng)),
            gallery: vec![image.clone()],
            image,
            location: pick_location(rng),
            negotiable: rng.random_bool(0.5),
            featured: rng.random_ratio(1, CLONE_FEATURED_ODDS),
            seller_id: seller.id,
            seller_name: seller.name,
            seller_phone: seller.phone,
            age_minutes: rng.random_range(0..MAX_AGE_MINUTES),
        });
    }

    Ok(rows)
}

fn pick_location(rng: &mut ChaCha8Rng) -> Option<String> {
    let index = rng.random_range(0..FALLBACK_LOCATIONS.len());
    FALLBACK_LOCATIONS.get(index).map(|town| (*town).to_owned())
}

fn services_with(
    rng: &mut ChaCha8Rng,
    base: &[CatalogueService],
    sellers: &SellerBook,
) -> Result<Vec<ServiceSeed>, GenerationError> {
    base.iter()
        .enumerate()
        .map(|(index, service)| {
            let seller = sellers.pick(rng, service.seller_email.as_deref())?;
            let image = service
                .image
                .clone()
                .unwrap_or_else(|| placeholder_image(&service.category, index));
            Ok(ServiceSeed {
                id: Uuid::from_u128(rng.random()),
                name: service.name.clone(),
                description: service.description.clone(),
                category: service.category.clone(),
                subcategory: service.subcategory.clone(),
                price: service.price,
                rate_type: service.rate_type,
                service_area: service.service_area.clone(),
                availability: service.availability.clone(),
                gallery: vec![image.clone()],
                image,
                location: service.location.clone().or_else(|| pick_location(rng)),
                featured: service.featured,
                seller_id: seller.id,
                seller_name: seller.name,
                seller_phone: seller.phone,
                age_minutes: rng.random_range(0..MAX_AGE_MINUTES),
            })
        })
        .collect()
}

fn carriers_with(rng: &mut ChaCha8Rng, catalogue: &Catalogue) -> Vec<CarrierSeed> {
    catalogue
        .carriers()
        .iter()
        .filter_map(|carrier| {
            let owner = catalogue.find_user(&carrier.user_email)?;
            let id = Uuid::from_u128(rng.random());
            let vehicles = carrier
                .vehicles
                .iter()
                .map(|vehicle| VehicleSeed {
                    id: Uuid::from_u128(rng.random()),
                    kind: vehicle.kind.clone(),
                    plate: vehicle.plate.clone(),
                })
                .collect();
            Some(CarrierSeed {
                id,
                user_id: owner.id,
                phone: carrier.phone.clone().or_else(|| owner.phone.clone()),
                station: carrier.station.clone(),
                tier: carrier.tier,
                vehicles,
            })
        })
        .collect()
}

/// Generates the full dataset for one seeding run.
///
/// Demo users are generated first and join the seller pool, so clones may be
/// attributed to them.
///
/// # Errors
///
/// Propagates [`GenerationError`] from product expansion and seller
/// attribution.
pub fn generate_dataset(
    catalogue: &Catalogue,
    options: &DatasetOptions,
) -> Result<SeedDataset, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let demo = demo_users(&mut rng, options.demo_users);
    let sellers = SellerBook::new(catalogue, &demo);

    let products = expand_with(&mut rng, catalogue.products(), &sellers, options.min_products)?;
    let services = services_with(&mut rng, catalogue.services(), &sellers)?;
    let carriers = carriers_with(&mut rng, catalogue);

    let users = catalogue
        .users()
        .iter()
        .map(|user| UserSeed {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            role: user.role,
        })
        .chain(demo)
        .collect();

    Ok(SeedDataset {
        users,
        products,
        services,
        carriers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};

    const CATALOGUE: &str = r#"{
        "version": 1,
        "users": [
            {"id": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "email": "admin@qwiksale.test", "role": "ADMIN"},
            {"id": "4fa85f64-5717-4562-b3fc-2c963f66afa7", "email": "akinyi@qwiksale.test", "name": "Akinyi", "phone": "0712000000"}
        ],
        "products": [
            {"name": "Sofa", "description": "Three seater", "category": "Home & Living", "subcategory": "Furniture", "price": 24000},
            {"name": "Old radio", "description": "Works", "category": "Electronics", "subcategory": "Audio"}
        ]
    }"#;

    #[given("a catalogue with two base products")]
    fn a_catalogue_with_two_base_products() -> Catalogue {
        Catalogue::from_json(CATALOGUE).expect("valid catalogue")
    }

    #[when("seven products are requested")]
    fn seven_products_are_requested(catalogue: Catalogue) -> Vec<ProductSeed> {
        expand_products(&catalogue, 7, 2026).expect("expansion succeeds")
    }

    #[then("clones are numbered round-robin")]
    fn clones_are_numbered_round_robin(rows: Vec<ProductSeed>) {
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Sofa",
                "Old radio",
                "Sofa #2",
                "Old radio #2",
                "Sofa #3",
                "Old radio #3",
                "Sofa #4",
            ]
        );
    }

    #[then("unpriced products stay unpriced")]
    fn unpriced_products_stay_unpriced(rows: Vec<ProductSeed>) {
        for row in rows.iter().filter(|row| row.name.starts_with("Old radio")) {
            assert_eq!(row.price, None, "{} gained a price", row.name);
        }
    }

    #[then("products are sold by regular users")]
    fn products_are_sold_by_regular_users(rows: Vec<ProductSeed>) {
        let akinyi = Uuid::parse_str("4fa85f64-5717-4562-b3fc-2c963f66afa7").expect("uuid");
        assert!(rows.iter().all(|row| row.seller_id == akinyi));
        assert!(rows.iter().all(|row| row.seller_phone.as_deref() == Some("0712000000")));
    }

    #[rstest]
    fn expansion_clones_round_robin() {
        let catalogue = a_catalogue_with_two_base_products();
        let rows = seven_products_are_requested(catalogue);
        clones_are_numbered_round_robin(rows.clone());
        unpriced_products_stay_unpriced(rows.clone());
        products_are_sold_by_regular_users(rows);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn small_requests_return_the_base_catalogue(#[case] min_rows: usize) {
        let catalogue = a_catalogue_with_two_base_products();
        let rows = expand_products(&catalogue, min_rows, 1).expect("expansion succeeds");
        assert_eq!(rows.len(), 2);
    }

    #[rstest]
    fn jitter_stays_within_fifteen_percent() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            let price = jitter_price(24_000, &mut rng);
            assert!((20_400..=27_600).contains(&price), "{price} out of range");
            assert_eq!(price.rem_euclid(10), 0);
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(i32::MAX, i32::MAX)]
    fn jitter_handles_extremes(#[case] price: i32, #[case] ceiling: i32) {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let jittered = jitter_price(price, &mut rng);
        assert!(jittered >= 0);
        assert!(jittered <= ceiling);
    }

    #[rstest]
    fn placeholder_falls_back_for_blank_categories() {
        assert_eq!(
            placeholder_image("  ", 0),
            "https://picsum.photos/seed/qwiksale-listing-0/800/600"
        );
    }

    #[rstest]
    fn demo_users_have_unique_emails() {
        let users = generate_demo_users(40, 5);
        let mut emails: Vec<&str> = users.iter().map(|user| user.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), 40);
    }
}
