//! Query parameters shared by the admin listings view and public search.

use pagination::{PageLimits, PageRequest};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{
    Condition, Error, KindFilter, ListingFilter, ListingKind, ListingSort, ListingStatus,
};
use crate::inbound::http::validation::{
    non_blank, parse_choice, parse_flag, parse_optional_user_id, parse_page, parse_price,
};

/// Raw listing query string. Every field is optional; blanks are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// `all` (default), `product` or `service`.
    #[serde(alias = "type")]
    pub kind: Option<String>,
    /// Case-insensitive text search.
    pub q: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Exact subcategory.
    pub subcategory: Option<String>,
    /// Exact brand; products only.
    pub brand: Option<String>,
    /// `brand new` or `pre-owned`; products only.
    pub condition: Option<String>,
    /// `ACTIVE`, `DRAFT`, `HIDDEN` or `SOLD`.
    pub status: Option<String>,
    /// `true` or `false`.
    pub featured: Option<String>,
    /// Seller user id.
    pub seller_id: Option<String>,
    /// Lower price bound in KES.
    pub min_price: Option<String>,
    /// Upper price bound in KES.
    pub max_price: Option<String>,
    /// `newest` (default), `price_asc`, `price_desc` or `featured`.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Rows per page.
    pub page_size: Option<String>,
}

/// Parsed listing query ready for the listings port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    pub sort: ListingSort,
    pub page: PageRequest,
}

impl ListingParams {
    /// Parse every parameter, failing on the first invalid one.
    pub fn parse(self, limits: PageLimits) -> Result<ListingQuery, Error> {
        let page = parse_page(self.page.as_deref(), self.page_size.as_deref(), limits)?;
        let filter = ListingFilter {
            kind: parse_choice::<KindFilter>("type", self.kind)?.unwrap_or_default(),
            q: non_blank(self.q),
            category: non_blank(self.category),
            subcategory: non_blank(self.subcategory),
            brand: non_blank(self.brand),
            condition: parse_choice::<Condition>("condition", self.condition)?,
            status: parse_choice::<ListingStatus>("status", self.status)?,
            featured: parse_flag("featured", self.featured)?,
            seller_id: parse_optional_user_id("sellerId", self.seller_id)?,
            min_price: parse_price("minPrice", self.min_price)?,
            max_price: parse_price("maxPrice", self.max_price)?,
        };
        let sort = parse_choice::<ListingSort>("sort", self.sort)?.unwrap_or_default();
        Ok(ListingQuery { filter, sort, page })
    }
}

impl ListingQuery {
    /// Restrict to what anonymous visitors may see: active rows of `kind`.
    ///
    /// Product-only filters are dropped for service searches.
    pub fn public(mut self, kind: Option<ListingKind>) -> Self {
        self.filter.status = Some(ListingStatus::Active);
        if let Some(kind) = kind {
            self.filter.kind = KindFilter::Only(kind);
            if kind == ListingKind::Service {
                self.filter.brand = None;
                self.filter.condition = None;
            }
        }
        self
    }
}
