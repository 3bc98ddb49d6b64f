//! One-shot key-pair generation: sample, derive, validate, export.
//!
//! Fail-closed. A rejected public key ends the run; there is no resampling,
//! since a primitive or source that produces bad keys should be noticed
//! rather than papered over.

use rand::TryCryptoRng;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::primitive::{
    IsogenyDh, PrimitiveError, PrivateKeyBytes, PublicKeyBytes, PRIVATE_KEY_SIZE,
};

/// Pipeline step, carried by errors so reports name where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeygenStep {
    SamplePrivateKey,
    DerivePublicKey,
    ValidatePublicKey,
}

impl fmt::Display for KeygenStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeygenStep::SamplePrivateKey => "sample private key",
            KeygenStep::DerivePublicKey => "derive public key",
            KeygenStep::ValidatePublicKey => "validate public key",
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeygenError {
    #[error("randomness source failed at step '{step}'")]
    RandomnessFailure {
        step: KeygenStep,
        source: PrimitiveError,
    },

    #[error("invalid key at step '{step}': {reason}")]
    InvalidKey { step: KeygenStep, reason: String },
}

impl KeygenError {
    pub fn step(&self) -> KeygenStep {
        match self {
            KeygenError::RandomnessFailure { step, .. } | KeygenError::InvalidKey { step, .. } => {
                *step
            }
        }
    }

    fn from_primitive(step: KeygenStep, err: PrimitiveError) -> Self {
        if err.is_randomness() {
            KeygenError::RandomnessFailure { step, source: err }
        } else {
            KeygenError::InvalidKey {
                step,
                reason: err.to_string(),
            }
        }
    }
}

/// A validated pair in exported form. The secret half is wiped on drop and
/// never shown by `Debug`.
pub struct GeneratedKeyPair {
    secret: PrivateKeyBytes,
    public: PublicKeyBytes,
}

impl GeneratedKeyPair {
    pub fn secret(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.secret
    }

    pub fn public(&self) -> &PublicKeyBytes {
        &self.public
    }
}

impl fmt::Debug for GeneratedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedKeyPair")
            .field("secret", &"<redacted>")
            .field("public", &hex::encode(self.public))
            .finish()
    }
}

pub struct KeyPairGenerator<P> {
    primitive: P,
}

impl<P: IsogenyDh> KeyPairGenerator<P> {
    pub fn new(primitive: P) -> Self {
        Self { primitive }
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Produce one validated key pair.
    pub fn generate<R>(&self, rng: &mut R) -> Result<GeneratedKeyPair, KeygenError>
    where
        R: TryCryptoRng + ?Sized,
    {
        let name = self.primitive.name();

        debug!(primitive = name, step = %KeygenStep::SamplePrivateKey, "keygen step");
        let sk = self
            .primitive
            .sample_private_key(rng)
            .map_err(|e| KeygenError::from_primitive(KeygenStep::SamplePrivateKey, e))?;

        debug!(primitive = name, step = %KeygenStep::DerivePublicKey, "keygen step");
        let pk = self
            .primitive
            .derive_public_key(&sk, rng)
            .map_err(|e| KeygenError::from_primitive(KeygenStep::DerivePublicKey, e))?;

        debug!(primitive = name, step = %KeygenStep::ValidatePublicKey, "keygen step");
        if !self.primitive.validate_public_key(&pk, rng) {
            // Reported once, by whoever receives the error.
            debug!(primitive = name, "derived public key failed validation");
            return Err(KeygenError::InvalidKey {
                step: KeygenStep::ValidatePublicKey,
                reason: "derived public key was rejected by validation".to_string(),
            });
        }

        let pair = GeneratedKeyPair {
            secret: self.primitive.export_private_key(&sk),
            public: self.primitive.export_public_key(&pk),
        };
        drop(sk);

        debug!(primitive = name, "key pair generated");
        Ok(pair)
    }
}
