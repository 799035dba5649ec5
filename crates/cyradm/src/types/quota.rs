//! Storage quota snapshots.

use crate::{Error, Result};

/// Storage quota state for one mailbox at one point in time.
///
/// The three quantities are computed together and never mutated; a fresh
/// query produces a fresh snapshot. The load is used×100/limit, rounded up
/// to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaSnapshot {
    used: u64,
    limit: u64,
    load: f64,
}

impl QuotaSnapshot {
    /// Builds a snapshot from used/limit byte counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroQuotaLimit`] when `limit` is zero; the load
    /// would be undefined.
    pub fn new(used: u64, limit: u64) -> Result<Self> {
        if limit == 0 {
            return Err(Error::ZeroQuotaLimit);
        }
        // Round up to 2 decimals in integer space to keep the result exact.
        let scaled = (u128::from(used) * 10_000).div_ceil(u128::from(limit));
        #[allow(clippy::cast_precision_loss)]
        let load = scaled as f64 / 100.0;
        Ok(Self { used, limit, load })
    }

    /// Bytes currently used.
    #[must_use]
    pub const fn used(&self) -> u64 {
        self.used
    }

    /// Byte quota limit.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Percentage of the quota consumed, rounded up to 2 decimal places.
    #[must_use]
    pub const fn load(&self) -> f64 {
        self.load
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn exact_quarter() {
        let q = QuotaSnapshot::new(50, 200).unwrap();
        assert_eq!(q.used(), 50);
        assert_eq!(q.limit(), 200);
        assert_eq!(q.load(), 25.00);
    }

    #[test]
    fn one_third_rounds_up() {
        let q = QuotaSnapshot::new(1, 3).unwrap();
        assert_eq!(q.load(), 33.34);
    }

    #[test]
    fn full_mailbox() {
        let q = QuotaSnapshot::new(200, 200).unwrap();
        assert_eq!(q.load(), 100.00);
    }

    #[test]
    fn empty_mailbox() {
        let q = QuotaSnapshot::new(0, 200).unwrap();
        assert_eq!(q.load(), 0.00);
    }

    #[test]
    fn zero_limit_is_an_error() {
        assert!(matches!(
            QuotaSnapshot::new(50, 0),
            Err(Error::ZeroQuotaLimit)
        ));
    }

    #[test]
    fn recompute_is_deterministic() {
        let a = QuotaSnapshot::new(1, 3).unwrap();
        let b = QuotaSnapshot::new(1, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn large_values_do_not_overflow() {
        let q = QuotaSnapshot::new(u64::MAX / 2, u64::MAX).unwrap();
        assert!(q.load() <= 50.01);
    }
}
