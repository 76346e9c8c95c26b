//! OpenAPI schema definitions for paginated envelopes.
//!
//! `pagination::Envelope` is generic and lives in a crate without utoipa, so
//! each concrete page shape used by the API gets a mirror struct here that
//! only exists for documentation.

use utoipa::ToSchema;

use crate::domain::Listing;

/// One page of listings.
#[derive(ToSchema)]
#[schema(as = ListingPage, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ListingPageSchema {
    /// 1-based page number that was served.
    #[schema(example = 1)]
    page: u32,
    /// Requested page size.
    #[schema(example = 24)]
    page_size: u32,
    /// Total number of matching rows across all pages.
    #[schema(example = 57)]
    total: u64,
    /// Total number of pages, at least one.
    #[schema(example = 3)]
    total_pages: u64,
    /// Rows on this page.
    items: Vec<Listing>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    #[test]
    fn listing_page_uses_camel_case_fields() {
        let RefOr::T(Schema::Object(object)) = ListingPageSchema::schema() else {
            panic!("expected object schema");
        };
        for field in ["page", "pageSize", "total", "totalPages", "items"] {
            assert!(object.properties.contains_key(field), "missing {field}");
        }
    }
}
