//! Contact phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty (after trimming).
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains something other than digits and separators.
    #[error("phone number may only contain digits, spaces, dashes and a leading +")]
    InvalidCharacter,
    /// Too few or too many digits.
    #[error("phone number must have between {min} and {max} digits")]
    Length {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A numeric contact number (phone, WhatsApp).
///
/// Spaces, dashes and parentheses are accepted as separators and dropped; an
/// optional leading `+` is kept. The stored value is the normalized form.
///
/// ```
/// use tripnest_core::PhoneNumber;
///
/// assert_eq!(PhoneNumber::parse("077 123-4567").unwrap().as_str(), "0771234567");
/// assert_eq!(PhoneNumber::parse("+94 77 123 4567").unwrap().as_str(), "+94771234567");
/// assert!(PhoneNumber::parse("call me").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 9;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneError`] if the input is blank, holds letters or has
    /// the wrong number of digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let (plus, rest) = s
            .strip_prefix('+')
            .map_or(("", s), |rest| ("+", rest));

        let mut digits = String::with_capacity(rest.len());
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '(' | ')' => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneError::Length {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(format!("{plus}{digits}")))
    }

    /// Returns the normalized number.
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

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
