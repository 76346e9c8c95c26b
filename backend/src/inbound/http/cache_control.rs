//! Shared cache-control policies for HTTP handlers.

/// Public search results may be served from shared caches briefly.
pub const PUBLIC_SHORT_LIVED: &str = "public, max-age=30, stale-while-revalidate=60";

/// Admin responses must never be stored.
pub const NO_STORE: &str = "no-store";

/// Header tuple for public search responses.
pub const fn public_search_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_SHORT_LIVED)
}

/// Header tuple for admin responses.
pub const fn admin_header() -> (&'static str, &'static str) {
    ("Cache-Control", NO_STORE)
}
