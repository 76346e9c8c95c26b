//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, currently the
//! trace identifier used to correlate logs and error payloads.

pub mod trace;

pub use trace::Trace;
