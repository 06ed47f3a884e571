//! Contact details collected at signup and checkout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not of the form `local@domain`.
    #[error("email must look like name@domain")]
    Malformed,
}

/// An email address with basic structural validation.
///
/// ```
/// use jersey_house_core::Email;
///
/// assert!(Email::parse("fan@example.co.ke").is_ok());
/// assert!(Email::parse("fan@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, or does not have a
    /// non-empty local part and domain separated by a single `@`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        match s.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not a Kenyan mobile number.
    #[error("enter a valid Kenyan phone number, e.g. 254712345678 or 0712345678")]
    Invalid,
}

/// A Kenyan mobile number, normalized to the `254XXXXXXXXX` form that
/// mobile-money providers expect.
///
/// Accepted inputs: `254712345678`, `+254712345678`, `0712345678`,
/// `0112345678`. Spaces and dashes are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Country calling code for Kenya.
    pub const COUNTRY_CODE: &'static str = "254";

    /// Parse and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::Invalid`] for anything that does not normalize to
    /// `254` followed by nine digits starting with 1 or 7.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if compact.is_empty() {
            return Err(PhoneError::Empty);
        }

        let compact = compact.strip_prefix('+').unwrap_or(&compact);
        let subscriber = if let Some(rest) = compact.strip_prefix(Self::COUNTRY_CODE) {
            rest
        } else if let Some(rest) = compact.strip_prefix('0') {
            rest
        } else {
            return Err(PhoneError::Invalid);
        };

        let valid = subscriber.len() == 9
            && subscriber.chars().all(|c| c.is_ascii_digit())
            && (subscriber.starts_with('7') || subscriber.starts_with('1'));
        if !valid {
            return Err(PhoneError::Invalid);
        }

        Ok(Self(format!("{}{subscriber}", Self::COUNTRY_CODE)))
    }

    /// The normalized number, e.g. `254712345678`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rejects_malformed() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@domain.com"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("a@b@c"), Err(EmailError::Malformed));
        let long = format!("{}@x.com", "a".repeat(260));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn test_email_trims() {
        assert_eq!(Email::parse(" fan@club.ke ").unwrap().as_str(), "fan@club.ke");
    }

    #[test]
    fn test_phone_normalizes_local_forms() {
        for input in [
            "254712345678",
            "+254712345678",
            "0712345678",
            "0712 345 678",
            "0712-345-678",
        ] {
            assert_eq!(PhoneNumber::parse(input).unwrap().as_str(), "254712345678");
        }
        assert_eq!(
            PhoneNumber::parse("0112345678").unwrap().as_str(),
            "254112345678"
        );
    }

    #[test]
    fn test_phone_rejects_invalid() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
        assert_eq!(PhoneNumber::parse("12345"), Err(PhoneError::Invalid));
        assert_eq!(PhoneNumber::parse("2547123456"), Err(PhoneError::Invalid));
        assert_eq!(PhoneNumber::parse("0812345678"), Err(PhoneError::Invalid));
        assert_eq!(PhoneNumber::parse("07123456789"), Err(PhoneError::Invalid));
    }

    #[test]
    fn test_phone_deserializes_through_parse() {
        let phone: PhoneNumber = serde_json::from_str("\"0722000111\"").unwrap();
        assert_eq!(phone.as_str(), "254722000111");
        assert!(serde_json::from_str::<PhoneNumber>("\"hello\"").is_err());
    }
}
