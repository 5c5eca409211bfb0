//! Opaque public identifiers.
//!
//! # Invariants
//! - A token is exactly 12 uppercase hexadecimal characters.
//! - A token is generated once per entity and never changes.
//! - Uniqueness (including non-reuse after deletion) is enforced by storage,
//!   not here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Number of characters kept from the random identifier.
pub const TOKEN_LEN: usize = 12;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-F]{12}$").expect("valid token regex"));

/// Externally addressable identifier of a task, project or routine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Draws a fresh token from a random v4 UUID.
    ///
    /// The UUID's 128 bits are rendered as uppercase hex and truncated to the
    /// first 48 bits.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string().to_ascii_uppercase();
        Self(hex[..TOKEN_LEN].to_string())
    }

    /// Parses a caller-supplied token string.
    pub fn parse(value: &str) -> Result<Self, TokenError> {
        if TOKEN_RE.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(TokenError::Malformed(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Token {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Token> for String {
    fn from(value: Token) -> Self {
        value.0
    }
}

/// Token parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Malformed(String),
}

impl Display for TokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "malformed token: `{value}`"),
        }
    }
}

impl Error for TokenError {}

/// Source of fresh tokens for newly created entities.
pub trait TokenGenerator {
    fn generate(&self) -> Token;
}

/// Default generator backed by [`Token::generate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokenGenerator;

impl TokenGenerator for UuidTokenGenerator {
    fn generate(&self) -> Token {
        Token::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenError};
    use std::collections::HashSet;

    #[test]
    fn generated_token_is_twelve_uppercase_hex_chars() {
        let token = Token::generate();
        assert_eq!(token.as_str().len(), 12);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn ten_thousand_generated_tokens_are_distinct() {
        let tokens: HashSet<Token> = (0..10_000).map(|_| Token::generate()).collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn parse_rejects_lowercase_and_wrong_length() {
        assert!(Token::parse("0123456789AB").is_ok());
        assert_eq!(
            Token::parse("0123456789ab"),
            Err(TokenError::Malformed("0123456789ab".to_string()))
        );
        assert!(Token::parse("0123456789A").is_err());
        assert!(Token::parse("0123456789ABC").is_err());
        assert!(Token::parse("").is_err());
    }

    #[test]
    fn deserialization_validates_format() {
        let token: Token = serde_json::from_str("\"ABCDEF012345\"").expect("valid token");
        assert_eq!(token.as_str(), "ABCDEF012345");
        assert!(serde_json::from_str::<Token>("\"not-a-token\"").is_err());
    }
}
