//! Flat-array responses for admin directories.
//!
//! The users and carriers views return the page's rows as a bare JSON array
//! and report the unpaged total in `X-Total-Count`.

use actix_web::HttpResponse;
use pagination::Envelope;
use serde::Serialize;

use crate::inbound::http::cache_control::admin_header;

/// Header carrying the total number of matching rows.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Render `envelope` as a flat array with the total in a header.
pub fn flat_page<T: Serialize>(envelope: Envelope<T>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(admin_header())
        .insert_header((TOTAL_COUNT_HEADER, envelope.total.to_string()))
        .json(envelope.items)
}
