//! The secret that pairs a sender with a receiver.

use crate::SecretError;
use std::fmt;
use std::str::FromStr;

/// Separator placed between the words of a secret.
pub const SEPARATOR: char = '-';

/// Longest secret accepted from user input.
pub const MAX_SECRET_LEN: usize = 64;

/// A short, human-speakable token identifying one offer on the relay.
///
/// Secrets look like `fast-blue-began`: lowercase words joined by `-`.
/// Anything parsed through [`Secret::parse`] is safe to embed in a URL path.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secret(String);

impl Secret {
    /// Join generated words into a secret.
    ///
    /// Words are expected to come from a trusted list of lowercase words.
    pub fn from_words(words: &[&str]) -> Self {
        let mut joined = String::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                joined.push(SEPARATOR);
            }
            joined.push_str(word);
        }
        Self(joined)
    }

    /// Parse a secret typed or pasted by a person.
    ///
    /// Surrounding whitespace is ignored and letters are lowercased, so
    /// `" Fast-Blue-Began\n"` parses to `fast-blue-began`.
    pub fn parse(input: &str) -> Result<Self, SecretError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SecretError::Empty);
        }
        if trimmed.len() > MAX_SECRET_LEN {
            return Err(SecretError::TooLong {
                len: trimmed.len(),
                limit: MAX_SECRET_LEN,
            });
        }

        let normalized = trimmed.to_ascii_lowercase();
        if let Some(bad) = normalized
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == SEPARATOR))
        {
            return Err(SecretError::InvalidCharacter(bad));
        }

        if normalized.split(SEPARATOR).any(str::is_empty) {
            return Err(SecretError::Malformed(normalized));
        }

        Ok(Self(normalized))
    }

    /// The secret as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First word only, for log lines that must not carry the whole key.
    pub fn redacted(&self) -> &str {
        self.0.split(SEPARATOR).next().unwrap_or_default()
    }
}

impl FromStr for Secret {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({}-…)", self.redacted())
    }
}
