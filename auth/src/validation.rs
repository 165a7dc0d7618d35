//! Sign-in form validation.
//!
//! Runs on every keystroke for live feedback and once more at submit time.
//! Every field is checked so the form can show all problems in one pass.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

// local@domain: dotted local atoms whose last character is not an
// apostrophe, domain labels with at least one dot and an alphabetic TLD.
// No whitespace anywhere.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([A-Za-z0-9_'+\-]+\.)*[A-Za-z0-9_'+\-]*[A-Za-z0-9_+\-]@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("valid email regex")
});

/// Raw form input as typed by the user
#[derive(Clone, Default, Deserialize)]
pub struct RawCredentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RawCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RawCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credentials that passed validation. Only [`validate`] builds these.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Form fields that can carry a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid format")]
    InvalidFormat,

    #[error("too short (min {min})")]
    TooShort { min: usize },
}

/// All field problems found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }

    fn insert(&mut self, field: Field, error: FieldError) {
        self.errors.insert(field, error);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name(), error)?;
            first = false;
        }
        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate raw form input, collecting every field error
pub fn validate(raw: &RawCredentials) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::default();

    if !is_valid_email(&raw.email) {
        errors.insert(Field::Email, FieldError::InvalidFormat);
    }

    if raw.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            Field::Password,
            FieldError::TooShort {
                min: MIN_PASSWORD_LEN,
            },
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Credentials {
        email: raw.email.clone(),
        password: raw.password.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_credentials() {
        let creds = validate(&RawCredentials::new("a@b.com", "secret1")).unwrap();
        assert_eq!(creds.email(), "a@b.com");
        assert_eq!(creds.password(), "secret1");
    }

    #[test]
    fn test_accepts_common_addresses() {
        for email in [
            "user@email.com",
            "first.last@sub.example.org",
            "user+tag@example.co",
            "o'brien@example.ie",
            "x_y-z@my-host.example.com",
        ] {
            assert!(is_valid_email(email), "{} should be valid", email);
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for email in [
            "",
            "bad",
            "@example.com",
            "user@",
            "user@localhost",
            "user@@example.com",
            "us er@example.com",
            " user@example.com",
            "user@example.com ",
            "user@exa mple.com",
            ".user@example.com",
            "user..name@example.com",
            "user@-example.com",
            "user@example.c",
            "o'@example.com",
            "user.'@example.com",
            "user.@example.com",
        ] {
            assert!(!is_valid_email(email), "{:?} should be invalid", email);
        }
    }

    #[test]
    fn test_invalid_email_error() {
        let errors = validate(&RawCredentials::new("bad", "secret1")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Email), Some(&FieldError::InvalidFormat));
        assert_eq!(errors.get(Field::Email).unwrap().to_string(), "invalid format");
    }

    #[test]
    fn test_short_password_error() {
        let errors = validate(&RawCredentials::new("a@b.com", "12345")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Password).unwrap().to_string(),
            "too short (min 6)"
        );
    }

    #[test]
    fn test_reports_all_errors_at_once() {
        let errors = validate(&RawCredentials::new("nope", "")).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.get(Field::Email).is_some());
        assert!(errors.get(Field::Password).is_some());
        assert_eq!(
            errors.to_string(),
            "email: invalid format, password: too short (min 6)"
        );
    }

    #[test]
    fn test_password_length_counts_characters() {
        // Six characters, more than six bytes
        assert!(validate(&RawCredentials::new("a@b.com", "éééééé")).is_ok());
        assert!(validate(&RawCredentials::new("a@b.com", "ééééé")).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = validate(&RawCredentials::new("a@b.com", "secret1")).unwrap();
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret1"));
        assert!(printed.contains("a@b.com"));
    }
}
