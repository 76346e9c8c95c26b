//! Email checks mirroring the backend's `Email` type.
//!
//! The backend rejects addresses that fail these rules, so the catalogue is
//! validated with the same rules before anything is generated from it.

/// Returns `true` if `email` has the shape `local@domain.tld`.
///
/// # Examples
///
/// ```
/// use seed_data::is_plausible_email;
///
/// assert!(is_plausible_email("admin@qwiksale.co.ke"));
/// assert!(!is_plausible_email("admin"));
/// assert!(!is_plausible_email("a b@example.com"));
/// assert!(!is_plausible_email("admin@localhost"));
/// ```
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Trims and lowercases an email address.
#[must_use]
pub fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Reduces `raw` to lowercase ASCII alphanumerics.
pub(crate) fn ascii_slug(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Lowercases `raw`, replacing runs of other characters with a single `-`.
pub(crate) fn kebab_slug(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_owned()
}
