//! Short-link tokens: fixed-length opaque aliases for recipes.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters in every token.
pub const SHORT_LINK_SIZE: usize = 8;

/// Reasons a string is not a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortLinkTokenError {
    /// Wrong number of characters.
    #[error("short link must be exactly {expected} characters, got {actual}")]
    Length {
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// Characters outside `[A-Za-z0-9]`.
    #[error("short link may only contain ASCII letters and digits")]
    Alphabet,
}

/// Validated short-link token.
///
/// # Examples
/// ```
/// use recipe_backend::domain::ShortLinkToken;
///
/// assert!(ShortLinkToken::new("aB3dE5gH").is_ok());
/// assert!(ShortLinkToken::new("short").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortLinkToken(String);

impl ShortLinkToken {
    /// Validate `raw` as a token.
    ///
    /// # Errors
    /// Returns [`ShortLinkTokenError`] for wrong lengths or alphabets.
    pub fn new(raw: impl Into<String>) -> Result<Self, ShortLinkTokenError> {
        let raw = raw.into();
        let actual = raw.chars().count();
        if actual != SHORT_LINK_SIZE {
            return Err(ShortLinkTokenError::Length {
                expected: SHORT_LINK_SIZE,
                actual,
            });
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ShortLinkTokenError::Alphabet);
        }
        Ok(Self(raw))
    }

    /// Borrow the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShortLinkToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ShortLinkToken> for String {
    fn from(value: ShortLinkToken) -> Self {
        value.0
    }
}

impl TryFrom<String> for ShortLinkToken {
    type Error = ShortLinkTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Supplies candidate tokens.
///
/// Production uses [`RandomTokenSource`]; tests script collisions.
pub trait ShortLinkTokenSource: Send + Sync {
    /// Produce a fresh candidate.
    fn next_token(&self) -> ShortLinkToken;
}

/// Draws tokens uniformly from the alphanumeric alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenSource;

impl ShortLinkTokenSource for RandomTokenSource {
    fn next_token(&self) -> ShortLinkToken {
        let raw: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SHORT_LINK_SIZE)
            .map(char::from)
            .collect();
        ShortLinkToken(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc", ShortLinkTokenError::Length { expected: SHORT_LINK_SIZE, actual: 3 })]
    #[case("abcdefghi", ShortLinkTokenError::Length { expected: SHORT_LINK_SIZE, actual: 9 })]
    #[case("abcd-fgh", ShortLinkTokenError::Alphabet)]
    #[case("abcdéfgh", ShortLinkTokenError::Alphabet)]
    fn rejects_malformed_tokens(#[case] raw: &str, #[case] expected: ShortLinkTokenError) {
        assert_eq!(ShortLinkToken::new(raw), Err(expected));
    }

    #[rstest]
    fn random_tokens_are_valid() {
        let source = RandomTokenSource;
        for _ in 0..32 {
            let token = source.next_token();
            assert!(ShortLinkToken::new(token.as_str()).is_ok(), "{token}");
        }
    }
}
