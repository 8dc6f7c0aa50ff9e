//! Callback token codec.
//!
//! A token is the 32-byte payload attached to every widget button:
//!
//! | bytes     | field                         |
//! |-----------|-------------------------------|
//! | `[0, 4)`  | signature                     |
//! | `[4, 8)`  | window type tag               |
//! | `[8, 12)` | window row id, big-endian     |
//! | `[12, 16)`| button type tag               |
//! | `[16, 32)`| random nonce                  |

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Marks payloads produced by this crate.
pub const SIGNATURE: [u8; 4] = [0x7f, b'W', b'G', b'T'];

/// Encoded token length.
pub const TOKEN_LEN: usize = 32;

/// Stable 4-byte identifier of a registered window or button type.
pub type TypeTag = [u8; 4];

/// Compute the type tag of a type name: its CRC-32, big-endian.
pub fn type_tag(name: &str) -> TypeTag {
    crc32fast::hash(name.as_bytes()).to_be_bytes()
}

/// Whether a raw payload starts with [`SIGNATURE`].
pub fn has_signature(data: &[u8]) -> bool {
    data.len() >= SIGNATURE.len() && data[..SIGNATURE.len()] == SIGNATURE
}

/// Token decode failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token must be {TOKEN_LEN} bytes, got {0}")]
    Length(usize),

    #[error("token signature mismatch")]
    Signature,

    #[error("window id {0} does not fit in a token")]
    WindowIdOverflow(i64),
}

/// A decoded callback token.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token([u8; TOKEN_LEN]);

impl Token {
    /// Mint a fresh token for a button of type `button_tag` living in
    /// window `window_id`.
    pub fn generate(
        window_tag: TypeTag,
        window_id: i64,
        button_tag: TypeTag,
    ) -> Result<Self, TokenError> {
        let id = u32::try_from(window_id).map_err(|_| TokenError::WindowIdOverflow(window_id))?;

        let mut bytes = [0u8; TOKEN_LEN];
        bytes[0..4].copy_from_slice(&SIGNATURE);
        bytes[4..8].copy_from_slice(&window_tag);
        bytes[8..12].copy_from_slice(&id.to_be_bytes());
        bytes[12..16].copy_from_slice(&button_tag);
        bytes[16..32].copy_from_slice(Uuid::new_v4().as_bytes());
        Ok(Self(bytes))
    }

    /// Decode a raw payload.
    pub fn parse(data: &[u8]) -> Result<Self, TokenError> {
        let bytes: [u8; TOKEN_LEN] = data
            .try_into()
            .map_err(|_| TokenError::Length(data.len()))?;
        if !has_signature(&bytes) {
            return Err(TokenError::Signature);
        }
        Ok(Self(bytes))
    }

    pub fn window_tag(&self) -> TypeTag {
        [self.0[4], self.0[5], self.0[6], self.0[7]]
    }

    pub fn window_id(&self) -> i64 {
        i64::from(u32::from_be_bytes([self.0[8], self.0[9], self.0[10], self.0[11]]))
    }

    pub fn button_tag(&self) -> TypeTag {
        [self.0[12], self.0[13], self.0[14], self.0[15]]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_is_crc32() {
        // CRC-32 check value
        assert_eq!(type_tag("123456789"), 0xCBF4_3926u32.to_be_bytes());
        assert_eq!(type_tag("SimpleButton"), type_tag("SimpleButton"));
        assert_ne!(type_tag("SimpleButton"), type_tag("CheckBoxButton"));
    }

    #[test]
    fn test_token_fields() {
        let window_tag = type_tag("SettingsWindow");
        let button_tag = type_tag("SimpleButton");
        let token = Token::generate(window_tag, 77, button_tag).unwrap();

        let parsed = Token::parse(token.as_bytes()).unwrap();
        assert_eq!(parsed, token);
        assert_eq!(parsed.window_tag(), window_tag);
        assert_eq!(parsed.window_id(), 77);
        assert_eq!(parsed.button_tag(), button_tag);
        assert_eq!(&parsed.as_bytes()[..4], &SIGNATURE);
        assert_eq!(&parsed.as_bytes()[8..12], &[0, 0, 0, 77]);
    }

    #[test]
    fn test_tokens_are_unique() {
        let tag = type_tag("SimpleButton");
        let a = Token::generate(tag, 1, tag).unwrap();
        let b = Token::generate(tag, 1, tag).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert_eq!(Token::parse(&[0u8; 10]), Err(TokenError::Length(10)));
        assert_eq!(Token::parse(&[0u8; 32]), Err(TokenError::Signature));
        assert!(!has_signature(b"abc"));
        assert!(has_signature(&SIGNATURE));
    }

    #[test]
    fn test_window_id_overflow() {
        let tag = type_tag("W");
        assert_eq!(
            Token::generate(tag, i64::from(u32::MAX) + 1, tag),
            Err(TokenError::WindowIdOverflow(i64::from(u32::MAX) + 1))
        );
        assert_eq!(
            Token::generate(tag, -1, tag),
            Err(TokenError::WindowIdOverflow(-1))
        );
    }
}
