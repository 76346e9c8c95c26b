//! Shared validation helpers for inbound HTTP adapters.
//!
//! Query parameters arrive as optional strings; blank values mean "not
//! supplied". Every rejection is an `invalid_request` error whose details
//! name the offending `field` and a machine-readable `code`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use pagination::{PageLimits, PageParamError, PageRequest};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Admin listings and combined search.
pub(crate) const LISTING_PAGE_LIMITS: PageLimits = PageLimits::new(24, 100);
/// Public product and service search.
pub(crate) const PUBLIC_PAGE_LIMITS: PageLimits = PageLimits::new(24, 48);
/// Admin users and carriers.
pub(crate) const DIRECTORY_PAGE_LIMITS: PageLimits = PageLimits::new(50, 100);

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidNumber,
    InvalidValue,
    InvalidUuid,
    InvalidTimestamp,
    MissingField,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidNumber => "invalid_number",
            Self::InvalidValue => "invalid_value",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::MissingField => "missing_field",
        }
    }
}

pub(crate) fn field_error(field: &str, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

fn field_error_with_value(field: &str, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": code.as_str(),
    }))
}

/// Trim a raw parameter, mapping blanks to `None`.
pub(crate) fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Parse `page` and `pageSize` into a clamped request.
pub(crate) fn parse_page(
    page: Option<&str>,
    page_size: Option<&str>,
    limits: PageLimits,
) -> Result<PageRequest, Error> {
    PageRequest::parse(page, page_size, limits).map_err(|err| match err {
        PageParamError::InvalidNumber { field, value } => field_error_with_value(
            field,
            ErrorCode::InvalidNumber,
            format!("{field} must be an integer"),
            &value,
        ),
    })
}

/// Parse an optional enum-like value via its `FromStr` implementation.
pub(crate) fn parse_choice<T: FromStr>(field: &str, raw: Option<String>) -> Result<Option<T>, Error> {
    non_blank(raw)
        .map(|value| {
            value.parse::<T>().map_err(|_| {
                field_error_with_value(
                    field,
                    ErrorCode::InvalidValue,
                    format!("{field} has an unsupported value"),
                    &value,
                )
            })
        })
        .transpose()
}

/// Parse an optional whole-shilling price.
pub(crate) fn parse_price(field: &str, raw: Option<String>) -> Result<Option<i32>, Error> {
    non_blank(raw)
        .map(|value| {
            value.parse::<i32>().map_err(|_| {
                field_error_with_value(
                    field,
                    ErrorCode::InvalidNumber,
                    format!("{field} must be an integer"),
                    &value,
                )
            })
        })
        .transpose()
}

/// Parse an optional boolean flag (`true`/`false`/`1`/`0`).
pub(crate) fn parse_flag(field: &str, raw: Option<String>) -> Result<Option<bool>, Error> {
    non_blank(raw)
        .map(|value| match value.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(field_error_with_value(
                field,
                ErrorCode::InvalidValue,
                format!("{field} must be true or false"),
                &value,
            )),
        })
        .transpose()
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        field_error_with_value(
            field,
            ErrorCode::InvalidUuid,
            format!("{field} must be a valid UUID"),
            value,
        )
    })
}

pub(crate) fn parse_user_id(field: &str, value: &str) -> Result<UserId, Error> {
    parse_uuid(field, value).map(UserId::from_uuid)
}

pub(crate) fn parse_optional_user_id(
    field: &str,
    raw: Option<String>,
) -> Result<Option<UserId>, Error> {
    non_blank(raw)
        .map(|value| parse_user_id(field, &value))
        .transpose()
}

pub(crate) fn parse_optional_timestamp(
    field: &str,
    raw: Option<String>,
) -> Result<Option<DateTime<Utc>>, Error> {
    non_blank(raw)
        .map(|value| {
            DateTime::parse_from_rfc3339(&value)
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|_| {
                    field_error_with_value(
                        field,
                        ErrorCode::InvalidTimestamp,
                        format!("{field} must be an RFC 3339 timestamp"),
                        &value,
                    )
                })
        })
        .transpose()
}
