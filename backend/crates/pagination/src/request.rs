//! Page request parsing and clamping.

use thiserror::Error;

/// Errors raised while parsing raw paging parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageParamError {
    /// The parameter is present but not an integer.
    #[error("{field} must be an integer")]
    InvalidNumber {
        /// Query parameter name as seen by clients.
        field: &'static str,
        /// Raw value supplied by the client.
        value: String,
    },
}

/// Default and maximum page sizes for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default_size: u32,
    max_size: u32,
}

impl PageLimits {
    /// Build limits, forcing both sizes to be at least one and the default to
    /// stay within the maximum.
    #[must_use]
    pub const fn new(default_size: u32, max_size: u32) -> Self {
        let max_size = if max_size == 0 { 1 } else { max_size };
        let default_size = if default_size == 0 {
            1
        } else if default_size > max_size {
            max_size
        } else {
            default_size
        };
        Self {
            default_size,
            max_size,
        }
    }

    /// Page size used when the client omits `pageSize`.
    #[must_use]
    pub const fn default_size(&self) -> u32 {
        self.default_size
    }

    /// Largest page size a client may request.
    #[must_use]
    pub const fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// A validated, 1-based page request.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= page_size <= limits.max_size()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Build a request, clamping out-of-range values into the limits.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageLimits, PageRequest};
    ///
    /// let request = PageRequest::new(0, 500, PageLimits::new(24, 100));
    /// assert_eq!(request.page(), 1);
    /// assert_eq!(request.page_size(), 100);
    /// ```
    #[must_use]
    pub fn new(page: u32, page_size: u32, limits: PageLimits) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, limits.max_size()),
        }
    }

    /// First page with the endpoint's default size.
    #[must_use]
    pub fn first(limits: PageLimits) -> Self {
        Self::new(1, limits.default_size(), limits)
    }

    /// Parse raw `page` and `pageSize` query values.
    ///
    /// Missing or blank values fall back to defaults; integers outside the
    /// allowed range are clamped; anything else is rejected.
    ///
    /// # Errors
    /// Returns [`PageParamError::InvalidNumber`] naming the offending field.
    pub fn parse(
        raw_page: Option<&str>,
        raw_page_size: Option<&str>,
        limits: PageLimits,
    ) -> Result<Self, PageParamError> {
        let page = parse_param("page", raw_page)?.unwrap_or(1);
        let page_size =
            parse_param("pageSize", raw_page_size)?.unwrap_or(i64::from(limits.default_size()));
        Ok(Self::new(
            saturate_u32(page),
            saturate_u32(page_size),
            limits,
        ))
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)).saturating_mul(u64::from(self.page_size))
    }
}

fn parse_param(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, PageParamError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| PageParamError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
}

fn saturate_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
