//! Arithmetic in the prime field F_p.
//!
//! Values are kept fully reduced in `[0, p)`. This is variable-time big
//! integer arithmetic; see the crate docs for the caveat.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::TryCryptoRng;
use std::fmt;
use std::ops::{Add, Mul, Sub};

use super::params::Params;
use crate::primitive::{fill_random, PrimitiveError};

/// Byte width of a serialized field element.
pub const FP_BYTES: usize = 64;

/// Rejection sampling gives up after this many out-of-range candidates.
/// Each candidate is accepted with probability above 3/4.
const MAX_SAMPLE_ATTEMPTS: usize = 128;

#[derive(Clone, PartialEq, Eq)]
pub struct Fp(BigUint);

impl Fp {
    pub fn zero() -> Self {
        Fp(BigUint::zero())
    }

    pub fn one() -> Self {
        Fp(BigUint::one())
    }

    pub fn from_u64(value: u64) -> Self {
        Fp(BigUint::from(value) % &Params::global().p)
    }

    /// Parse a little-endian canonical encoding. Values `≥ p` are rejected.
    pub fn from_le_bytes(bytes: &[u8; FP_BYTES]) -> Option<Self> {
        let value = BigUint::from_bytes_le(bytes);
        (value < Params::global().p).then_some(Fp(value))
    }

    pub fn to_le_bytes(&self) -> [u8; FP_BYTES] {
        let mut out = [0u8; FP_BYTES];
        let digits = self.0.to_bytes_le();
        out[..digits.len()].copy_from_slice(&digits);
        out
    }

    /// Uniform element of F_p drawn from `rng`.
    pub fn random<R: TryCryptoRng + ?Sized>(rng: &mut R) -> Result<Self, PrimitiveError> {
        let params = Params::global();
        let mut buf = [0u8; FP_BYTES];

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            fill_random(rng, &mut buf)?;
            let candidate = BigUint::from_bytes_le(&buf) & &params.sample_mask;
            if candidate < params.p {
                return Ok(Fp(candidate));
            }
        }

        Err(PrimitiveError::Exhausted {
            operation: "field element sampling",
            attempts: MAX_SAMPLE_ATTEMPTS,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn square(&self) -> Self {
        self * self
    }

    pub fn double(&self) -> Self {
        self + self
    }

    /// Multiplicative inverse by Fermat's little theorem. Zero maps to zero.
    pub fn invert(&self) -> Self {
        let params = Params::global();
        Fp(self.0.modpow(&params.p_minus_2, &params.p))
    }

    /// Euler's criterion. Zero is reported as a non-square.
    pub fn is_square(&self) -> bool {
        if self.is_zero() {
            return false;
        }
        let params = Params::global();
        self.0.modpow(&params.legendre_exp, &params.p).is_one()
    }

    pub fn negate(&self) -> Self {
        if self.is_zero() {
            Fp::zero()
        } else {
            Fp(&Params::global().p - &self.0)
        }
    }
}

impl fmt::Debug for Fp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp(0x{})", self.0.to_str_radix(16))
    }
}

impl Add for &Fp {
    type Output = Fp;

    fn add(self, rhs: &Fp) -> Fp {
        let p = &Params::global().p;
        let sum = &self.0 + &rhs.0;
        if &sum >= p {
            Fp(sum - p)
        } else {
            Fp(sum)
        }
    }
}

impl Sub for &Fp {
    type Output = Fp;

    fn sub(self, rhs: &Fp) -> Fp {
        if self.0 >= rhs.0 {
            Fp(&self.0 - &rhs.0)
        } else {
            Fp(&Params::global().p - &rhs.0 + &self.0)
        }
    }
}

impl Mul for &Fp {
    type Output = Fp;

    fn mul(self, rhs: &Fp) -> Fp {
        Fp((&self.0 * &rhs.0) % &Params::global().p)
    }
}
