//! CSIDH-512 parameter set.

use num_bigint::BigUint;
use num_traits::One;
use std::sync::OnceLock;

/// Number of small odd primes ℓᵢ dividing `p + 1`.
pub const NUM_PRIMES: usize = 74;

/// Private exponents are drawn from `[-MAX_EXPONENT, MAX_EXPONENT]`.
pub const MAX_EXPONENT: i8 = 5;

/// The ℓᵢ, in increasing order.
pub const PRIMES: [u64; NUM_PRIMES] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 587,
];

/// Derived constants, computed once per process.
#[derive(Debug)]
pub struct Params {
    /// `p = 4·∏ℓᵢ − 1`
    pub p: BigUint,
    /// `p − 2`, the inversion exponent.
    pub p_minus_2: BigUint,
    /// `(p − 1) / 2`, the Euler criterion exponent.
    pub legendre_exp: BigUint,
    /// An upper bound on `4·√p`; a point order above it proves supersingularity.
    pub four_sqrt_p: BigUint,
    /// `2^bits(p) − 1`, used to mask random candidates before rejection.
    pub sample_mask: BigUint,
}

impl Params {
    pub fn global() -> &'static Params {
        static PARAMS: OnceLock<Params> = OnceLock::new();
        PARAMS.get_or_init(Params::compute)
    }

    fn compute() -> Params {
        let p = product(&PRIMES) * 4u32 - 1u32;
        let p_minus_2 = &p - 2u32;
        let legendre_exp = (&p - 1u32) >> 1;
        let four_sqrt_p = (p.sqrt() + 1u32) * 4u32;
        let sample_mask = (BigUint::one() << p.bits()) - 1u32;

        Params {
            p,
            p_minus_2,
            legendre_exp,
            four_sqrt_p,
            sample_mask,
        }
    }
}

/// Product of a run of small primes, used as a scalar.
pub fn product(primes: &[u64]) -> BigUint {
    primes
        .iter()
        .fold(BigUint::one(), |acc, &prime| acc * prime)
}
