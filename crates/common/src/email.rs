//! Validated email address value object.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

const MAX_LENGTH: usize = 254;

/// Error returned when a string is not a well-formed email address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid email address '{value}': {reason}")]
pub struct InvalidEmail {
    pub value: String,
    pub reason: &'static str,
}

/// A syntactically valid email address.
///
/// The address must pass the HTML5-style check of `validator` and, on top of
/// that, have a dotted domain whose last label is not numeric.
/// Deliverability is the mailer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses and validates an email address. Surrounding whitespace is
    /// ignored.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, InvalidEmail> {
        let raw = value.as_ref();
        let trimmed = raw.trim();
        let invalid = |reason: &'static str| InvalidEmail {
            value: raw.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(invalid("address is empty"));
        }
        if trimmed.len() > MAX_LENGTH {
            return Err(invalid("address is too long"));
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("address contains whitespace"));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(invalid("missing '@'"));
        };
        if local.is_empty() {
            return Err(invalid("local part is empty"));
        }
        if domain.contains('@') {
            return Err(invalid("more than one '@'"));
        }
        if !domain.contains('.') {
            return Err(invalid("domain has no '.'"));
        }
        if domain.split('.').any(str::is_empty) {
            return Err(invalid("domain has an empty label"));
        }
        if domain
            .rsplit('.')
            .next()
            .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(invalid("top-level domain is numeric"));
        }

        let address = trimmed.to_string();
        if !address.validate_email() {
            return Err(invalid("address is not well-formed"));
        }

        Ok(Self(address))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = InvalidEmail;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = InvalidEmail;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_address() {
        let email = Email::parse("a@x.com").unwrap();
        assert_eq!(email.as_str(), "a@x.com");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let email = Email::parse("  b@x.com ").unwrap();
        assert_eq!(email.as_str(), "b@x.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for value in [
            "",
            "plainaddress",
            "@x.com",
            "a@",
            "a@x",
            "a@@x.com",
            "a@x..com",
            "a@.x.com",
            "a b@x.com",
            "a,b;c<d>@x.com",
            "\"@x.com",
            "a@-x-.com",
            "a@x.c_m",
            "a@x.123",
        ] {
            assert!(Email::parse(value).is_err(), "{value:?} should be rejected");
        }
    }

    #[test]
    fn accepts_common_local_part_characters() {
        for value in ["first.last@x.com", "a+tag@mail.x.co", "o'neil@x-y.org"] {
            assert!(Email::parse(value).is_ok(), "{value:?} should be accepted");
        }
    }

    #[test]
    fn names_the_failed_rule() {
        assert_eq!(
            Email::parse("a@x.123").unwrap_err().reason,
            "top-level domain is numeric"
        );
        assert_eq!(
            Email::parse("a,b@x.com").unwrap_err().reason,
            "address is not well-formed"
        );
    }

    #[test]
    fn rejects_overlong_address() {
        let value = format!("{}@x.com", "a".repeat(MAX_LENGTH));
        let err = Email::parse(&value).unwrap_err();
        assert_eq!(err.reason, "address is too long");
    }

    #[test]
    fn error_message_names_the_value() {
        let err = Email::parse("nope").unwrap_err();
        assert_eq!(err.to_string(), "invalid email address 'nope': missing '@'");
    }

    #[test]
    fn deserialization_validates() {
        let ok: Email = serde_json::from_str("\"c@x.com\"").unwrap();
        assert_eq!(ok.as_str(), "c@x.com");

        let bad = serde_json::from_str::<Email>("\"not-an-email\"");
        assert!(bad.is_err());
    }
}
