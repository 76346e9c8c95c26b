//! Page-number pagination primitives shared by QwikSale endpoints.
//!
//! The crate is transport agnostic: it knows nothing about Actix or Diesel.
//! It provides:
//!
//! - [`PageRequest`] and [`PageLimits`] for parsing and clamping `page` /
//!   `pageSize` query parameters.
//! - [`Envelope`] for the `{page, pageSize, total, totalPages, items}`
//!   response shape.
//! - [`split_page`] for serving one page out of two independently counted
//!   sources without duplicates or gaps across pages.
//! - [`PageAccumulator`] for clients that walk pages (infinite scroll) and
//!   must de-duplicate rows by identifier.
//!
//! # Example
//!
//! ```
//! use pagination::{Envelope, PageLimits, PageRequest};
//!
//! let limits = PageLimits::new(24, 100);
//! let request = PageRequest::parse(Some("2"), Some("10"), limits).expect("valid params");
//! assert_eq!(request.offset(), 10);
//!
//! let envelope = Envelope::new(request, 25, vec!["a", "b"]);
//! assert_eq!(envelope.total_pages, 3);
//! ```

mod accumulator;
mod allocation;
mod envelope;
mod request;

pub use accumulator::{Keyed, PageAccumulator};
pub use allocation::{SourceSlice, SplitPage, split_page};
pub use envelope::{Envelope, total_pages};
pub use request::{PageLimits, PageParamError, PageRequest};
