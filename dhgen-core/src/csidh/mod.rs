//! CSIDH-512, the default [`IsogenyDh`] primitive.
//!
//! Private keys are 74 exponents in `[-5, 5]`, one per small prime ℓᵢ,
//! packed as signed nibbles into 37 bytes: exponent `i` lives in byte
//! `i / 2`, in the high nibble for even `i` and the low nibble for odd `i`.
//! Public keys are the Montgomery coefficient `A` of the target curve,
//! 64 bytes little-endian.
//!
//! The arithmetic is variable-time. It is correct, not hardened against
//! side channels.

mod curve;
mod field;
pub mod params;

use num_bigint::BigUint;
use num_traits::One;
use rand::TryCryptoRng;
use std::fmt;
use tracing::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::primitive::{
    fill_random, IsogenyDh, PrimitiveError, PrivateKeyBytes, PublicKeyBytes, PRIVATE_KEY_SIZE,
    PUBLIC_KEY_SIZE,
};
use curve::{Curve, Point};
use field::Fp;
use params::{product, Params, MAX_EXPONENT, NUM_PRIMES, PRIMES};

/// Upper bound on group-action rounds. A round fails to make progress only
/// when its random point lands on an already finished side or has small
/// order, so honest sources finish in a few dozen rounds.
const MAX_ACTION_ROUNDS: usize = 1_000;

/// Upper bound on refills while sampling a private key. Each 148-byte refill
/// yields about six usable exponents, so honest sources need around a dozen.
const MAX_SAMPLE_ROUNDS: usize = 64;

/// Upper bound on random points tried while proving supersingularity.
const MAX_VALIDATION_ATTEMPTS: usize = 32;

/// A CSIDH private key: packed exponent vector.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CsidhPrivateKey {
    packed: [u8; PRIVATE_KEY_SIZE],
}

impl CsidhPrivateKey {
    /// Parse a packed key, rejecting nibbles outside `[-5, 5]`.
    pub fn from_bytes(bytes: &[u8; PRIVATE_KEY_SIZE]) -> Result<Self, PrimitiveError> {
        let key = CsidhPrivateKey { packed: *bytes };
        for i in 0..NUM_PRIMES {
            if key.exponent(i).abs() > MAX_EXPONENT {
                return Err(PrimitiveError::Encoding(format!(
                    "exponent {i} out of range"
                )));
            }
        }
        Ok(key)
    }

    /// Signed exponent for prime index `i`.
    pub fn exponent(&self, i: usize) -> i8 {
        let byte = self.packed[i / 2];
        let nibble = if i % 2 == 0 { byte } else { byte << 4 };
        (nibble as i8) >> 4
    }

    fn set_exponent(&mut self, i: usize, value: i8) {
        let nibble = (value as u8) & 0x0f;
        let byte = &mut self.packed[i / 2];
        if i % 2 == 0 {
            *byte = (*byte & 0x0f) | (nibble << 4);
        } else {
            *byte = (*byte & 0xf0) | nibble;
        }
    }
}

impl fmt::Debug for CsidhPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsidhPrivateKey")
            .field("packed", &"<redacted>")
            .finish()
    }
}

/// A CSIDH public key. Holds the raw encoding so validation can reject
/// non-canonical values.
#[derive(Clone, PartialEq, Eq)]
pub struct CsidhPublicKey {
    bytes: [u8; PUBLIC_KEY_SIZE],
}

impl CsidhPublicKey {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        CsidhPublicKey { bytes }
    }

    fn from_coefficient(a: &Fp) -> Self {
        CsidhPublicKey {
            bytes: a.to_le_bytes(),
        }
    }

    /// The starting curve `y² = x³ + x`.
    pub fn base() -> Self {
        CsidhPublicKey::from_coefficient(&Fp::zero())
    }
}

impl fmt::Debug for CsidhPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CsidhPublicKey({})", hex::encode(self.bytes))
    }
}

/// CSIDH over the 511-bit prime `p = 4·3·5·…·373·587 − 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Csidh512;

impl Csidh512 {
    pub fn new() -> Self {
        Csidh512
    }

    /// Apply the class-group element `sk` to the curve `start`.
    ///
    /// Key derivation is `action(base, sk)`; a shared secret would be
    /// `action(peer_public, sk)`.
    pub fn action<R>(
        &self,
        start: &CsidhPublicKey,
        sk: &CsidhPrivateKey,
        rng: &mut R,
    ) -> Result<CsidhPublicKey, PrimitiveError>
    where
        R: TryCryptoRng + ?Sized,
    {
        let a = Fp::from_le_bytes(&start.bytes)
            .ok_or_else(|| PrimitiveError::Encoding("curve coefficient not below p".into()))?;

        let mut walk = Walk::new(sk);
        let mut curve = Curve::from_affine(a);

        let mut round = 0;
        while !walk.is_done() {
            round += 1;
            if round > MAX_ACTION_ROUNDS {
                return Err(PrimitiveError::Exhausted {
                    operation: "group action",
                    attempts: MAX_ACTION_ROUNDS,
                });
            }

            let x = Fp::random(rng)?;
            let rhs = Curve::rhs(&curve.a, &x);
            if rhs.is_zero() {
                continue;
            }
            let side = if rhs.is_square() { Side::Curve } else { Side::Twist };
            if walk.done[side as usize] {
                continue;
            }

            walk.step(&mut curve, Point::from_x(x), side);
            curve.normalize();
            trace!(round, ?side, "group action round");
        }

        debug!(rounds = round, "group action complete");
        Ok(CsidhPublicKey::from_coefficient(&curve.a))
    }

    /// Run the supersingularity check. Randomness failures reject.
    fn check_supersingular<R>(&self, a: &Fp, rng: &mut R) -> Result<bool, PrimitiveError>
    where
        R: TryCryptoRng + ?Sized,
    {
        let curve = Curve::from_affine(a.clone());

        for attempt in 1..=MAX_VALIDATION_ATTEMPTS {
            let start = Point::from_x(Fp::random(rng)?);
            // Clear the 2-power part of p + 1.
            let point = curve.double(&curve.double(&start));

            let mut order = BigUint::one();
            if let Some(verdict) = order_search(&curve, point, 0, NUM_PRIMES, &mut order) {
                trace!(attempt, verdict, "validation finished");
                return Ok(verdict);
            }
        }

        Ok(false)
    }
}

/// Which quadratic twist a sampled point lives on. Points on the curve
/// itself walk positive exponents, points on the twist negative ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Curve = 0,
    Twist = 1,
}

/// Remaining walk for one private key, split by sign.
struct Walk {
    remaining: Zeroizing<[[u8; NUM_PRIMES]; 2]>,
    /// Cofactor clearing the primes a side no longer needs.
    cofactor: [BigUint; 2],
    done: [bool; 2],
}

impl Walk {
    fn new(sk: &CsidhPrivateKey) -> Self {
        let mut remaining = Zeroizing::new([[0u8; NUM_PRIMES]; 2]);
        let mut cofactor = [BigUint::from(4u32), BigUint::from(4u32)];

        for (i, &prime) in PRIMES.iter().enumerate() {
            let e = sk.exponent(i);
            match e.signum() {
                1 => {
                    remaining[Side::Curve as usize][i] = e.unsigned_abs();
                    cofactor[Side::Twist as usize] *= prime;
                }
                -1 => {
                    remaining[Side::Twist as usize][i] = e.unsigned_abs();
                    cofactor[Side::Curve as usize] *= prime;
                }
                _ => {
                    cofactor[Side::Curve as usize] *= prime;
                    cofactor[Side::Twist as usize] *= prime;
                }
            }
        }

        Walk {
            remaining,
            cofactor,
            done: [false, false],
        }
    }

    fn is_done(&self) -> bool {
        self.done.iter().all(|&d| d)
    }

    /// One round on `side`: isolate every still-needed ℓᵢ-torsion part of
    /// `point` and walk one step along each, largest prime first.
    fn step(&mut self, curve: &mut Curve, point: Point, side: Side) {
        let s = side as usize;
        let mut point = curve.multiply(&point, &self.cofactor[s]);
        self.done[s] = true;

        for i in (0..NUM_PRIMES).rev() {
            if self.remaining[s][i] == 0 {
                continue;
            }

            let lower: Vec<u64> = (0..i)
                .filter(|&j| self.remaining[s][j] > 0)
                .map(|j| PRIMES[j])
                .collect();
            let kernel = curve.multiply(&point, &product(&lower));

            if !kernel.is_infinity() {
                curve.isogeny(&mut point, &kernel, PRIMES[i]);
                self.remaining[s][i] -= 1;
                if self.remaining[s][i] == 0 {
                    self.cofactor[s] *= PRIMES[i];
                }
            }

            self.done[s] &= self.remaining[s][i] == 0;
        }
    }
}

/// Recursively split the prime set, accumulating the order of `point` in
/// `order`. `Some(true)` once the order exceeds `4·√p`, `Some(false)` as soon
/// as the point is not killed by the expected ℓ, `None` if inconclusive.
fn order_search(
    curve: &Curve,
    point: Point,
    lower: usize,
    upper: usize,
    order: &mut BigUint,
) -> Option<bool> {
    if upper - lower == 1 {
        if point.is_infinity() {
            return None;
        }
        let prime = PRIMES[lower];
        if !curve.multiply(&point, &BigUint::from(prime)).is_infinity() {
            return Some(false);
        }
        *order *= prime;
        return (*order > Params::global().four_sqrt_p).then_some(true);
    }

    let mid = lower + (upper - lower + 1) / 2;
    let upper_half = curve.multiply(&point, &product(&PRIMES[lower..mid]));
    let lower_half = curve.multiply(&point, &product(&PRIMES[mid..upper]));

    // Larger primes first: they grow the order fastest.
    order_search(curve, upper_half, mid, upper, order)
        .or_else(|| order_search(curve, lower_half, lower, mid, order))
}

impl IsogenyDh for Csidh512 {
    type PrivateKey = CsidhPrivateKey;
    type PublicKey = CsidhPublicKey;

    fn name(&self) -> &'static str {
        "csidh-512"
    }

    fn sample_private_key<R>(&self, rng: &mut R) -> Result<CsidhPrivateKey, PrimitiveError>
    where
        R: TryCryptoRng + ?Sized,
    {
        let mut key = CsidhPrivateKey {
            packed: [0u8; PRIVATE_KEY_SIZE],
        };
        let mut buf = Zeroizing::new([0u8; 2 * NUM_PRIMES]);
        let mut filled = 0;
        let mut rounds = 0;

        // Keep bytes that read as an i8 in [-5, 5]; about one in 23 does.
        while filled < NUM_PRIMES {
            rounds += 1;
            if rounds > MAX_SAMPLE_ROUNDS {
                return Err(PrimitiveError::Exhausted {
                    operation: "private key sampling",
                    attempts: MAX_SAMPLE_ROUNDS,
                });
            }

            fill_random(rng, buf.as_mut_slice())?;
            for &byte in buf.iter() {
                let candidate = byte as i8;
                if (-MAX_EXPONENT..=MAX_EXPONENT).contains(&candidate) {
                    key.set_exponent(filled, candidate);
                    filled += 1;
                    if filled == NUM_PRIMES {
                        break;
                    }
                }
            }
        }

        Ok(key)
    }

    fn derive_public_key<R>(
        &self,
        sk: &CsidhPrivateKey,
        rng: &mut R,
    ) -> Result<CsidhPublicKey, PrimitiveError>
    where
        R: TryCryptoRng + ?Sized,
    {
        self.action(&CsidhPublicKey::base(), sk, rng)
    }

    fn validate_public_key<R>(&self, pk: &CsidhPublicKey, rng: &mut R) -> bool
    where
        R: TryCryptoRng + ?Sized,
    {
        let Some(a) = Fp::from_le_bytes(&pk.bytes) else {
            return false;
        };
        // A = ±2 is singular.
        let two = Fp::from_u64(2);
        if a == two || a == two.negate() {
            return false;
        }

        match self.check_supersingular(&a, rng) {
            Ok(verdict) => verdict,
            Err(e) => {
                debug!(error = %e, "validation aborted");
                false
            }
        }
    }

    fn export_private_key(&self, sk: &CsidhPrivateKey) -> PrivateKeyBytes {
        Zeroizing::new(sk.packed)
    }

    fn export_public_key(&self, pk: &CsidhPublicKey) -> PublicKeyBytes {
        pk.bytes
    }
}
