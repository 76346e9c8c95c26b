//! Login credentials accepted by the dev sign-in contract.
//!
//! Users sign in with either their email or their username. The handler
//! validates shape only; lookup and password checks happen behind the
//! [`LoginService`](crate::domain::ports::LoginService) port.

use zeroize::Zeroizing;

use super::user::Email;

/// Password accepted for every seeded account outside production auth.
pub const DEV_PASSWORD: &str = "password";

/// Login payload values that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Identifier was missing or blank once trimmed.
    #[error("email or username must not be empty")]
    EmptyIdentifier,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// How the caller identified themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    /// Lowercased email address.
    Email(Email),
    /// Username as typed, trimmed.
    Username(String),
}

/// Validated login credentials.
///
/// ## Invariants
/// - The identifier is trimmed and non-empty. Anything that parses as an
///   email is treated as one.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use qwiksale::domain::{LoginCredentials, LoginIdentifier};
///
/// let creds = LoginCredentials::try_from_parts(" Admin@QwikSale.test ", "password")
///     .expect("valid credentials");
/// assert!(matches!(creds.identifier(), LoginIdentifier::Email(_)));
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: LoginIdentifier,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    pub fn try_from_parts(identifier: &str, password: &str) -> Result<Self, LoginValidationError> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return Err(LoginValidationError::EmptyIdentifier);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        let identifier = Email::new(trimmed).map_or_else(
            |_| LoginIdentifier::Username(trimmed.to_owned()),
            LoginIdentifier::Email,
        );
        Ok(Self {
            identifier,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email or username used for the lookup.
    pub fn identifier(&self) -> &LoginIdentifier {
        &self.identifier
    }

    /// Raw identifier text, for logging and fixture matching.
    pub fn identifier_str(&self) -> &str {
        match &self.identifier {
            LoginIdentifier::Email(email) => email.as_ref(),
            LoginIdentifier::Username(name) => name.as_str(),
        }
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Whether the password matches the dev contract.
    pub fn has_dev_password(&self) -> bool {
        self.password() == DEV_PASSWORD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyIdentifier)]
    #[case("   ", "pw", LoginValidationError::EmptyIdentifier)]
    #[case("admin", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] identifier: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(identifier, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn email_identifiers_are_lowercased() {
        let creds =
            LoginCredentials::try_from_parts("Kiprop@QwikSale.test", " pw ").expect("valid");
        assert_eq!(creds.identifier_str(), "kiprop@qwiksale.test");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn usernames_are_trimmed_but_keep_case() {
        let creds = LoginCredentials::try_from_parts("  Admin ", "password").expect("valid");
        assert_eq!(
            creds.identifier(),
            &LoginIdentifier::Username("Admin".to_owned())
        );
        assert!(creds.has_dev_password());
    }
}
