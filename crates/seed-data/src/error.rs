//! Error types for the seed-data crate.
//!
//! Catalogue errors describe a document that cannot be used at all;
//! generation errors describe a valid catalogue that cannot satisfy the
//! requested options.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a seed catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    /// The catalogue file could not be read.
    #[error("failed to read catalogue file at '{path}': {message}")]
    IoError {
        /// Path to the catalogue file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The catalogue JSON is malformed or missing required fields.
    #[error("invalid catalogue JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The catalogue version is not supported.
    #[error("unsupported catalogue version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the catalogue.
        actual: u32,
    },

    /// A user email is not a plausible address.
    #[error("invalid email for user at index {index}: {value}")]
    InvalidEmail {
        /// Index of the user in the `users` array.
        index: usize,
        /// The rejected address.
        value: String,
    },

    /// Two users share an email address.
    #[error("duplicate user email: {email}")]
    DuplicateEmail {
        /// The repeated address, normalised.
        email: String,
    },

    /// A listing names a seller that is not among the catalogue users.
    #[error("{kind} '{listing}' references unknown seller {email}")]
    UnknownSeller {
        /// `product` or `service`.
        kind: &'static str,
        /// Listing name.
        listing: String,
        /// The unmatched seller email.
        email: String,
    },

    /// A carrier references a user that is not among the catalogue users.
    #[error("carrier at index {index} references unknown user {email}")]
    UnknownCarrierUser {
        /// Index of the carrier in the `carriers` array.
        index: usize,
        /// The unmatched user email.
        email: String,
    },

    /// Two carriers belong to the same user.
    #[error("user {email} has more than one carrier profile")]
    DuplicateCarrier {
        /// Email of the owning user.
        email: String,
    },

    /// A listing carries a negative price.
    #[error("{kind} '{listing}' has a negative price")]
    NegativePrice {
        /// `product` or `service`.
        kind: &'static str,
        /// Listing name.
        listing: String,
    },

    /// A listing has a blank name.
    #[error("{kind} at index {index} has an empty name")]
    EmptyName {
        /// `product` or `service`.
        kind: &'static str,
        /// Index of the listing in its array.
        index: usize,
    },
}

/// Errors raised while generating rows from a valid catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// More products were requested than can be cloned from nothing.
    #[error("cannot generate {min_rows} products from an empty base catalogue")]
    EmptyCatalogue {
        /// Requested minimum row count.
        min_rows: usize,
    },

    /// A listing needs a seller but the catalogue has no users.
    #[error("no users are available to attribute listings to")]
    NoSellers,
}
