//! Randomness sources with scripted behavior.

use rand::{CryptoRng, RngCore, TryCryptoRng, TryRngCore};
use std::fmt;

/// Error reported by [`FailingRng`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntropyUnavailable;

impl fmt::Display for EntropyUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("entropy source unavailable")
    }
}

impl std::error::Error for EntropyUnavailable {}

/// A secure-looking source that fails every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRng;

impl TryRngCore for FailingRng {
    type Error = EntropyUnavailable;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        Err(EntropyUnavailable)
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        Err(EntropyUnavailable)
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
        Err(EntropyUnavailable)
    }
}

impl TryCryptoRng for FailingRng {}

/// Serves `budget` bytes from an inner generator, then fails. Lets a test
/// break the source partway through a run.
#[derive(Debug)]
pub struct LimitedRng<R> {
    inner: R,
    budget: usize,
}

impl<R> LimitedRng<R> {
    pub fn new(inner: R, budget: usize) -> Self {
        Self { inner, budget }
    }

    fn take(&mut self, len: usize) -> Result<(), EntropyUnavailable> {
        if len > self.budget {
            self.budget = 0;
            return Err(EntropyUnavailable);
        }
        self.budget -= len;
        Ok(())
    }
}

impl<R: RngCore> TryRngCore for LimitedRng<R> {
    type Error = EntropyUnavailable;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        self.take(4)?;
        Ok(self.inner.next_u32())
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        self.take(8)?;
        Ok(self.inner.next_u64())
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.take(dst.len())?;
        self.inner.fill_bytes(dst);
        Ok(())
    }
}

impl<R: CryptoRng> TryCryptoRng for LimitedRng<R> {}

/// Yields the same byte forever. Marked cryptographic so it can reach code
/// that demands a secure source; only useful for driving degenerate paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantRng(pub u8);

impl RngCore for ConstantRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_ne_bytes([self.0; 4])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_ne_bytes([self.0; 8])
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(self.0);
    }
}

impl CryptoRng for ConstantRng {}
