//! Reading the seed catalogue from disk.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use seed_data::{Catalogue, CatalogueError};
use thiserror::Error;

/// Errors raised while loading a catalogue file.
#[derive(Debug, Error)]
pub enum CatalogueLoadError {
    /// The file could not be read.
    #[error("failed to read catalogue at {path}: {source}")]
    Read {
        /// Catalogue path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file was read but is not a valid catalogue.
    #[error("invalid catalogue at {path}: {source}")]
    Invalid {
        /// Catalogue path.
        path: PathBuf,
        /// Validation failure.
        #[source]
        source: CatalogueError,
    },
}

fn read_error(path: &Path, source: std::io::Error) -> CatalogueLoadError {
    CatalogueLoadError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Load and validate the catalogue at `path`.
///
/// Only the parent directory is opened with ambient authority.
///
/// # Errors
///
/// Returns [`CatalogueLoadError`] when the file cannot be read or fails
/// validation.
pub fn load_catalogue(path: &Path) -> Result<Catalogue, CatalogueLoadError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "catalogue path must be a file",
            ),
        )
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|source| read_error(path, source))?;
    let contents = dir
        .read_to_string(Path::new(file_name))
        .map_err(|source| read_error(path, source))?;
    Catalogue::from_json(&contents).map_err(|source| CatalogueLoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeding::config::default_catalogue_path;
    use rstest::rstest;

    #[rstest]
    fn bundled_catalogue_is_valid() {
        let catalogue = load_catalogue(&default_catalogue_path()).expect("bundled catalogue");
        assert!(!catalogue.users().is_empty());
        assert!(!catalogue.products().is_empty());
    }

    #[rstest]
    fn missing_file_is_a_read_error() {
        let path = default_catalogue_path().with_file_name("missing.json");
        let error = load_catalogue(&path).expect_err("file is missing");
        assert!(matches!(error, CatalogueLoadError::Read { .. }));
    }

    #[rstest]
    fn directory_without_file_name_is_rejected() {
        let error = load_catalogue(Path::new("/")).expect_err("not a file");
        assert!(matches!(error, CatalogueLoadError::Read { .. }));
    }
}
