//! Validated string types shared across the Emporium crates.
//!
//! - [`NonEmptyText`]: trimmed, never blank (commodity names, CLI input)
//! - [`Slug`]: URL- and filename-safe document key
//! - [`LanguageCode`]: authored translation key (ISO 639 code with optional subtags)

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Maximum length of a slug in bytes.
pub const MAX_SLUG_LEN: usize = 128;

/// Maximum length of a language code in bytes (BCP 47 recommends 35).
pub const MAX_LANGUAGE_CODE_LEN: usize = 35;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input exceeded the allowed length
    #[error("Text exceeds {max} bytes")]
    TooLong { max: usize },
    /// The input contained a character the type does not allow
    #[error("invalid character {found:?} in {kind}")]
    InvalidCharacter { kind: &'static str, found: char },
}

/// A string that contains at least one non-whitespace character.
///
/// Input is trimmed during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, returning [`TextError::Empty`] for blank input.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Short human-readable document key.
///
/// Slugs appear in URLs (`/text/<slug>`) and as file names in the slug index, so only ASCII
/// letters, digits, `-`, `_` and `.` are accepted, and a slug may not start with `.`.
/// Case is preserved and significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref().trim();
        if input.is_empty() {
            return Err(TextError::Empty);
        }
        if input.len() > MAX_SLUG_LEN {
            return Err(TextError::TooLong { max: MAX_SLUG_LEN });
        }
        if let Some(found) = input
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(TextError::InvalidCharacter { kind: "slug", found });
        }
        if input.starts_with('.') {
            return Err(TextError::InvalidCharacter {
                kind: "slug",
                found: '.',
            });
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key of an authored translation.
///
/// Validation only guards the shape (a letter followed by letters, digits or `-`); the value is
/// stored exactly as authored and compared exactly, so `en` and `en-US` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref().trim();
        let first = input.chars().next().ok_or(TextError::Empty)?;
        if input.len() > MAX_LANGUAGE_CODE_LEN {
            return Err(TextError::TooLong {
                max: MAX_LANGUAGE_CODE_LEN,
            });
        }
        if !first.is_ascii_alphabetic() {
            return Err(TextError::InvalidCharacter {
                kind: "language code",
                found: first,
            });
        }
        if let Some(found) = input
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(TextError::InvalidCharacter {
                kind: "language code",
                found,
            });
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_conversions {
    ($($ty:ident),+) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = TextError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl std::str::FromStr for $ty {
            type Err = TextError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    )+};
}

string_conversions!(NonEmptyText, Slug, LanguageCode);

// Lets a `BTreeMap<LanguageCode, _>` be queried with a raw request `&str`.
impl Borrow<str> for LanguageCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}
