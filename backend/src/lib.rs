//! QwikSale marketplace backend library.
//!
//! Hexagonal layout: `domain` holds types, services and ports; `inbound`
//! exposes them over HTTP; `outbound` implements the driven ports on
//! PostgreSQL; `seeding` expands and writes the catalogue.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod seeding;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
