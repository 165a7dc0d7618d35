use serde::Serialize;
use std::fmt;

/// Provider error codes understood by [`classify`]
pub mod codes {
    pub const INVALID_EMAIL: &str = "auth/invalid-email";
    pub const USER_DISABLED: &str = "auth/user-disabled";
    pub const USER_NOT_FOUND: &str = "auth/user-not-found";
    pub const WRONG_PASSWORD: &str = "auth/wrong-password";
}

/// Why the identity provider refused a sign-in attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidEmail,
    AccountDisabled,
    AccountNotFound,
    WrongCredential,
    Unknown,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::InvalidEmail => "invalid_email",
            FailureKind::AccountDisabled => "account_disabled",
            FailureKind::AccountNotFound => "account_not_found",
            FailureKind::WrongCredential => "wrong_credential",
            FailureKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a provider error code to a [`FailureKind`].
///
/// Total over its input: a missing or unrecognized code is `Unknown`.
pub fn classify(code: Option<&str>) -> FailureKind {
    match code {
        Some(codes::INVALID_EMAIL) => FailureKind::InvalidEmail,
        Some(codes::USER_DISABLED) => FailureKind::AccountDisabled,
        Some(codes::USER_NOT_FOUND) => FailureKind::AccountNotFound,
        Some(codes::WRONG_PASSWORD) => FailureKind::WrongCredential,
        _ => FailureKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(classify(Some("auth/invalid-email")), FailureKind::InvalidEmail);
        assert_eq!(classify(Some("auth/user-disabled")), FailureKind::AccountDisabled);
        assert_eq!(classify(Some("auth/user-not-found")), FailureKind::AccountNotFound);
        assert_eq!(classify(Some("auth/wrong-password")), FailureKind::WrongCredential);
    }

    #[test]
    fn test_unrecognized_codes_are_unknown() {
        for code in [
            "",
            "auth/teapot",
            "AUTH/WRONG-PASSWORD",
            " auth/wrong-password",
            "auth/wrong-password\n",
            "auth/",
            "\u{0}garbage\u{fffd}",
        ] {
            assert_eq!(classify(Some(code)), FailureKind::Unknown, "{:?}", code);
        }
    }

    #[test]
    fn test_missing_code_is_unknown() {
        assert_eq!(classify(None), FailureKind::Unknown);
    }

    #[test]
    fn test_failure_kind_serialization() {
        let json = serde_json::to_string(&FailureKind::WrongCredential).unwrap();
        assert_eq!(json, "\"wrong_credential\"");
        assert_eq!(FailureKind::AccountNotFound.to_string(), "account_not_found");
    }
}
