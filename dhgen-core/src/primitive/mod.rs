//! Boundary around the isogeny Diffie-Hellman primitive.
//!
//! The generator only talks to [`IsogenyDh`]. Whatever implements it owns the
//! curve arithmetic; callers see opaque key values, a validation predicate,
//! and fixed-width exports.

use rand::TryCryptoRng;
use thiserror::Error;
use zeroize::Zeroizing;

/// Exported private key width in bytes.
pub const PRIVATE_KEY_SIZE: usize = 37;

/// Exported public key width in bytes.
pub const PUBLIC_KEY_SIZE: usize = 64;

/// Exported private key bytes, wiped when dropped.
pub type PrivateKeyBytes = Zeroizing<[u8; PRIVATE_KEY_SIZE]>;

/// Exported public key bytes.
pub type PublicKeyBytes = [u8; PUBLIC_KEY_SIZE];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrimitiveError {
    /// The randomness source reported an error.
    #[error("randomness source failed: {0}")]
    Randomness(String),

    /// The source kept producing unusable values.
    #[error("{operation} made no progress after {attempts} attempts")]
    Exhausted {
        operation: &'static str,
        attempts: usize,
    },

    #[error("malformed key encoding: {0}")]
    Encoding(String),
}

impl PrimitiveError {
    /// True when the failure is attributable to the randomness source.
    pub fn is_randomness(&self) -> bool {
        matches!(
            self,
            PrimitiveError::Randomness(_) | PrimitiveError::Exhausted { .. }
        )
    }
}

/// An isogeny-based Diffie-Hellman key primitive.
///
/// Every randomized operation takes the caller's cryptographically secure
/// source; implementations must not create their own.
pub trait IsogenyDh {
    type PrivateKey;
    type PublicKey;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    fn sample_private_key<R>(&self, rng: &mut R) -> Result<Self::PrivateKey, PrimitiveError>
    where
        R: TryCryptoRng + ?Sized;

    /// Deterministic in `sk`; `rng` only feeds the group action's point sampling.
    fn derive_public_key<R>(
        &self,
        sk: &Self::PrivateKey,
        rng: &mut R,
    ) -> Result<Self::PublicKey, PrimitiveError>
    where
        R: TryCryptoRng + ?Sized;

    /// Probabilistic structure check. Returns `false` for anything it cannot
    /// positively accept, including when `rng` fails.
    fn validate_public_key<R>(&self, pk: &Self::PublicKey, rng: &mut R) -> bool
    where
        R: TryCryptoRng + ?Sized;

    fn export_private_key(&self, sk: &Self::PrivateKey) -> PrivateKeyBytes;

    fn export_public_key(&self, pk: &Self::PublicKey) -> PublicKeyBytes;
}

/// Fill `buf` from `rng`, mapping source failures to [`PrimitiveError::Randomness`].
pub fn fill_random<R>(rng: &mut R, buf: &mut [u8]) -> Result<(), PrimitiveError>
where
    R: TryCryptoRng + ?Sized,
{
    rng.try_fill_bytes(buf)
        .map_err(|e| PrimitiveError::Randomness(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_rng, FailingRng};

    #[test]
    fn test_fill_random_from_seeded_rng() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        fill_random(&mut test_rng(), &mut a).unwrap();
        fill_random(&mut test_rng(), &mut b).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, [0u8; 32]);
    }

    #[test]
    fn test_fill_random_maps_failure() {
        let mut buf = [0u8; 8];
        let err = fill_random(&mut FailingRng, &mut buf).unwrap_err();
        assert!(err.is_randomness());
        assert!(err.to_string().contains("randomness source failed"));
    }

    #[test]
    fn test_error_classification() {
        let exhausted = PrimitiveError::Exhausted {
            operation: "group action",
            attempts: 3,
        };
        assert!(exhausted.is_randomness());
        assert_eq!(
            exhausted.to_string(),
            "group action made no progress after 3 attempts"
        );
        assert!(!PrimitiveError::Encoding("nibble".into()).is_randomness());
    }
}
