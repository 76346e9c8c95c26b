//! Behaviour tests for the admin moderation endpoints.
//!
//! Scenarios sign in through `POST /api/auth/login` and drive the admin
//! routes against fixture adapters, checking that guards, moderation writes
//! and carrier enforcement are visible through the public surface.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// The harness carries helpers only some suites use.
#[allow(dead_code)]
mod support;

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use uuid::Uuid;

use support::{Marketplace, Recorded, SHOPPER_ID};

struct AdminWorld {
    market: RefCell<Marketplace>,
    last: RefCell<Option<Recorded>>,
}

impl AdminWorld {
    fn record(&self, recorded: Recorded) {
        *self.last.borrow_mut() = Some(recorded);
    }

    fn last(&self) -> Recorded {
        self.last.borrow().clone().expect("a response was recorded")
    }
}

#[fixture]
fn world() -> AdminWorld {
    AdminWorld {
        market: RefCell::new(Marketplace::default()),
        last: RefCell::new(None),
    }
}

#[given("a marketplace with fixture data")]
fn a_marketplace_with_fixture_data(world: &AdminWorld) {
    world.market.borrow_mut().forget_session();
}

#[given("the client signed in as {identifier}")]
fn the_client_signed_in_as(world: &AdminWorld, identifier: String) {
    let recorded = world.market.borrow_mut().sign_in(&identifier);
    assert_eq!(recorded.status, 200, "sign-in failed: {:?}", recorded.body);
}

#[when("the client signs in as {identifier}")]
fn the_client_signs_in_as(world: &AdminWorld, identifier: String) {
    let recorded = world.market.borrow_mut().sign_in(&identifier);
    world.record(recorded);
}

#[when("the client lists admin listings")]
fn the_client_lists_admin_listings(world: &AdminWorld) {
    let recorded = world.market.borrow().get("/api/admin/listings");
    world.record(recorded);
}

#[when("the admin sets product {n} to status {status}")]
fn the_admin_sets_product_status(world: &AdminWorld, n: u128, status: String) {
    let uri = format!("/api/admin/listings/product/{}", Uuid::from_u128(n));
    let recorded = world.market.borrow().patch(&uri, json!({ "status": status }));
    world.record(recorded);
}

#[when("the client searches public products")]
fn the_client_searches_public_products(world: &AdminWorld) {
    let recorded = world.market.borrow().get("/api/products");
    world.record(recorded);
}

#[when("the admin applies {action} to the carrier of {email}")]
fn the_admin_applies_action_to_carrier(world: &AdminWorld, action: String, email: String) {
    let uri = format!("/api/admin/carriers/{email}/{action}");
    let recorded = world
        .market
        .borrow()
        .post(&uri, Some(json!({ "reason": "chargeback fraud" })));
    world.record(recorded);
}

#[when("the admin sets the role of the shopper to {role}")]
fn the_admin_sets_the_role_of_the_shopper(world: &AdminWorld, role: String) {
    let uri = format!("/api/admin/users/{SHOPPER_ID}");
    let recorded = world.market.borrow().patch(&uri, json!({ "role": role }));
    world.record(recorded);
}

#[when("the client requests the admin metrics")]
fn the_client_requests_the_admin_metrics(world: &AdminWorld) {
    let recorded = world.market.borrow().get("/api/admin/metrics");
    world.record(recorded);
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &AdminWorld, status: u16) {
    let last = world.last();
    assert_eq!(last.status, status, "unexpected body: {:?}", last.body);
}

#[then("the error body echoes the trace id")]
fn the_error_body_echoes_the_trace_id(world: &AdminWorld) {
    let last = world.last();
    let trace_id = last.trace_id.as_deref().expect("trace id header");
    assert_eq!(
        last.body.get("traceId").and_then(Value::as_str),
        Some(trace_id)
    );
}

#[then("the error code is {code}")]
fn the_error_code_is(world: &AdminWorld, code: String) {
    let last = world.last();
    assert_eq!(
        last.body.get("code").and_then(Value::as_str),
        Some(code.as_str())
    );
}

#[then("the listing status is {status}")]
fn the_listing_status_is(world: &AdminWorld, status: String) {
    let last = world.last();
    assert_eq!(
        last.body.get("status").and_then(Value::as_str),
        Some(status.as_str())
    );
    assert_eq!(last.cache_control.as_deref(), Some("no-store"));
}

#[then("product {n} is not in the results")]
fn product_is_not_in_the_results(world: &AdminWorld, n: u128) {
    let ids = world.last().item_ids();
    assert!(!ids.is_empty(), "public search returned nothing");
    assert!(!ids.contains(&Uuid::from_u128(n).to_string()));
}

#[then("the admin listings still include product {n}")]
fn the_admin_listings_still_include_product(world: &AdminWorld, n: u128) {
    let recorded = world
        .market
        .borrow()
        .get("/api/admin/listings?type=product&status=HIDDEN");
    assert_eq!(recorded.status, 200);
    assert!(recorded.item_ids().contains(&Uuid::from_u128(n).to_string()));
}

#[then("the carrier status is {status}")]
fn the_carrier_status_is(world: &AdminWorld, status: String) {
    let last = world.last();
    let carrier = last.body.get("carrier").expect("carrier in outcome");
    assert_eq!(
        carrier.get("status").and_then(Value::as_str),
        Some(status.as_str())
    );
    assert_eq!(last.body.get("changed").and_then(Value::as_bool), Some(true));
}

#[then("the user role is {role}")]
fn the_user_role_is(world: &AdminWorld, role: String) {
    let last = world.last();
    assert_eq!(
        last.body.get("role").and_then(Value::as_str),
        Some(role.as_str())
    );
}

#[then("the metrics report {products} products and {services} services")]
fn the_metrics_report(world: &AdminWorld, products: u64, services: u64) {
    let last = world.last();
    assert_eq!(last.body.get("products").and_then(Value::as_u64), Some(products));
    assert_eq!(last.body.get("services").and_then(Value::as_u64), Some(services));
    assert!(last.body.get("generatedAt").is_some());
}

#[scenario(
    path = "tests/features/admin_moderation.feature",
    name = "Anonymous visitors are turned away from admin listings"
)]
fn anonymous_visitors_are_turned_away(world: AdminWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/admin_moderation.feature",
    name = "Shoppers cannot reach admin listings"
)]
fn shoppers_cannot_reach_admin_listings(world: AdminWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/admin_moderation.feature",
    name = "Banned accounts cannot sign in"
)]
fn banned_accounts_cannot_sign_in(world: AdminWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/admin_moderation.feature",
    name = "Hiding a product removes it from public search"
)]
fn hiding_a_product_removes_it_from_public_search(world: AdminWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/admin_moderation.feature",
    name = "Banned carriers cannot be suspended"
)]
fn banned_carriers_cannot_be_suspended(world: AdminWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/admin_moderation.feature",
    name = "Moderators cannot change roles"
)]
fn moderators_cannot_change_roles(world: AdminWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/admin_moderation.feature",
    name = "Super admins promote users"
)]
fn super_admins_promote_users(world: AdminWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/admin_moderation.feature",
    name = "Dashboard metrics are served to admins"
)]
fn dashboard_metrics_are_served_to_admins(world: AdminWorld) {
    drop(world);
}
