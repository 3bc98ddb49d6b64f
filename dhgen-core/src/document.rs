//! The persisted key-pair document and its hex encoding.
//!
//! ```json
//! {
//!     "dhSecret": "<74 lowercase hex characters>",
//!     "dhPublic": "<128 lowercase hex characters>"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::keygen::GeneratedKeyPair;
use crate::primitive::{PublicKeyBytes, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};

/// Hex length of `dhSecret`.
pub const SECRET_HEX_LEN: usize = PRIVATE_KEY_SIZE * 2;

/// Hex length of `dhPublic`.
pub const PUBLIC_HEX_LEN: usize = PUBLIC_KEY_SIZE * 2;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("document is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be {expected} hex characters, found {actual}")]
    WrongLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} must be lowercase hex")]
    NotLowercase { field: &'static str },

    #[error("{field} is not valid hex")]
    InvalidHex {
        field: &'static str,
        source: hex::FromHexError,
    },
}

/// Lowercase hex, two digits per byte, no prefix or separators.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Strict inverse of [`encode_hex`] for a fixed width. `field` names the
/// value in errors.
pub fn decode_hex<const N: usize>(field: &'static str, text: &str) -> Result<[u8; N], DocumentError> {
    if text.len() != N * 2 {
        return Err(DocumentError::WrongLength {
            field,
            expected: N * 2,
            actual: text.len(),
        });
    }
    if text.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(DocumentError::NotLowercase { field });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(text, &mut out)
        .map_err(|source| DocumentError::InvalidHex { field, source })?;
    Ok(out)
}

/// The two-field artifact written by a run. Field order on output is
/// `dhSecret` then `dhPublic`; readers must not depend on it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairDocument {
    dh_secret: String,
    dh_public: String,
}

impl KeyPairDocument {
    pub fn from_pair(pair: &GeneratedKeyPair) -> Self {
        Self::from_bytes(pair.secret(), pair.public())
    }

    pub fn from_bytes(secret: &[u8; PRIVATE_KEY_SIZE], public: &PublicKeyBytes) -> Self {
        Self {
            dh_secret: encode_hex(secret),
            dh_public: encode_hex(public),
        }
    }

    pub fn dh_secret(&self) -> &str {
        &self.dh_secret
    }

    pub fn dh_public(&self) -> &str {
        &self.dh_public
    }

    pub fn secret_bytes(&self) -> Result<Zeroizing<[u8; PRIVATE_KEY_SIZE]>, DocumentError> {
        decode_hex::<PRIVATE_KEY_SIZE>("dhSecret", &self.dh_secret).map(Zeroizing::new)
    }

    pub fn public_bytes(&self) -> Result<PublicKeyBytes, DocumentError> {
        decode_hex::<PUBLIC_KEY_SIZE>("dhPublic", &self.dh_public)
    }

    /// Parse a document and check both fields are well-formed hex of the
    /// right width. The key itself is not re-validated.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let doc: Self = serde_json::from_str(text)?;
        doc.secret_bytes()?;
        doc.public_bytes()?;
        Ok(doc)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = Zeroizing::new(std::fs::read_to_string(path).map_err(|source| {
            DocumentError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?);
        Self::from_json(&text)
    }
}

impl fmt::Debug for KeyPairDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairDocument")
            .field("dh_secret", &"<redacted>")
            .field("dh_public", &self.dh_public)
            .finish()
    }
}
