//! A stand-in [`IsogenyDh`] with scripted validation.
//!
//! Private keys are sampled exactly like CSIDH-512 keys, so uniqueness
//! properties carry over. Derivation is a cheap deterministic byte mix rather
//! than a group action, and validation returns whatever the test asked for.

use rand::TryCryptoRng;
use std::cell::Cell;
use zeroize::Zeroizing;

use crate::csidh::{Csidh512, CsidhPrivateKey};
use crate::primitive::{
    IsogenyDh, PrimitiveError, PrivateKeyBytes, PublicKeyBytes, PRIVATE_KEY_SIZE,
    PUBLIC_KEY_SIZE,
};

#[derive(Debug)]
pub struct StubPrimitive {
    accept: bool,
    derive_error: Option<PrimitiveError>,
    validations: Cell<usize>,
}

impl StubPrimitive {
    /// Validation accepts every key.
    pub fn accepting() -> Self {
        Self {
            accept: true,
            derive_error: None,
            validations: Cell::new(0),
        }
    }

    /// Validation rejects every key.
    pub fn rejecting() -> Self {
        Self {
            accept: false,
            ..Self::accepting()
        }
    }

    /// Derivation fails with `error`.
    pub fn failing_derive(error: PrimitiveError) -> Self {
        Self {
            derive_error: Some(error),
            ..Self::accepting()
        }
    }

    /// Number of times validation has been asked.
    pub fn validations(&self) -> usize {
        self.validations.get()
    }

    /// The public bytes this stub derives for `secret`.
    pub fn public_for(secret: &[u8; PRIVATE_KEY_SIZE]) -> PublicKeyBytes {
        let mut out = [0u8; PUBLIC_KEY_SIZE];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = secret[i % PRIVATE_KEY_SIZE].rotate_left(3) ^ (i as u8);
        }
        out
    }
}

impl IsogenyDh for StubPrimitive {
    type PrivateKey = CsidhPrivateKey;
    type PublicKey = PublicKeyBytes;

    fn name(&self) -> &'static str {
        "stub"
    }

    fn sample_private_key<R>(&self, rng: &mut R) -> Result<CsidhPrivateKey, PrimitiveError>
    where
        R: TryCryptoRng + ?Sized,
    {
        Csidh512::new().sample_private_key(rng)
    }

    fn derive_public_key<R>(
        &self,
        sk: &CsidhPrivateKey,
        _rng: &mut R,
    ) -> Result<PublicKeyBytes, PrimitiveError>
    where
        R: TryCryptoRng + ?Sized,
    {
        if let Some(err) = &self.derive_error {
            return Err(err.clone());
        }
        let secret: Zeroizing<[u8; PRIVATE_KEY_SIZE]> = self.export_private_key(sk);
        Ok(Self::public_for(&secret))
    }

    fn validate_public_key<R>(&self, _pk: &PublicKeyBytes, _rng: &mut R) -> bool
    where
        R: TryCryptoRng + ?Sized,
    {
        self.validations.set(self.validations.get() + 1);
        self.accept
    }

    fn export_private_key(&self, sk: &CsidhPrivateKey) -> PrivateKeyBytes {
        Csidh512::new().export_private_key(sk)
    }

    fn export_public_key(&self, pk: &PublicKeyBytes) -> PublicKeyBytes {
        *pk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_rng;

    #[test]
    fn test_stub_derivation_is_deterministic() {
        let stub = StubPrimitive::accepting();
        let mut rng = test_rng();
        let sk = stub.sample_private_key(&mut rng).unwrap();

        let a = stub.derive_public_key(&sk, &mut rng).unwrap();
        let b = stub.derive_public_key(&sk, &mut rng).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, StubPrimitive::public_for(&stub.export_private_key(&sk)));
    }

    #[test]
    fn test_stub_validation_is_scripted_and_counted() {
        let mut rng = test_rng();
        let pk = [0u8; PUBLIC_KEY_SIZE];

        let accepting = StubPrimitive::accepting();
        assert!(accepting.validate_public_key(&pk, &mut rng));

        let rejecting = StubPrimitive::rejecting();
        assert!(!rejecting.validate_public_key(&pk, &mut rng));
        assert!(!rejecting.validate_public_key(&pk, &mut rng));
        assert_eq!(rejecting.validations(), 2);
    }
}
