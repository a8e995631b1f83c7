//! Tiered mileage fares.
//!
//! A trip's fare is the flat rate of the tier whose mileage range contains
//! the trip distance. Past the highest tier the fare is that tier's rate plus
//! a per-mile overflow charge:
//!
//! `fare = highest.rate + overflow_rate_per_mile * (distance - highest.to_miles)`
//!
//! Tier sets are validated before any lookup; overlapping, gapped or
//! out-of-order tiers are rejected rather than matched arbitrarily.

mod error;
mod rate_card;
mod tiers;

pub use error::PricingError;
pub use rate_card::RateCard;
pub use tiers::{validate_tiers, FareBreakdown, RateTable, RateTier};

/// Fare for a single trip against an unvalidated tier set.
///
/// Validates `tiers` on every call; build a [`RateTable`] once when pricing
/// many trips against the same tiers.
pub fn compute_fare(
    distance_miles: f64,
    tiers: &[RateTier],
    overflow_rate_per_mile: f64,
) -> Result<f64, PricingError> {
    validate_tiers(tiers, overflow_rate_per_mile)?;
    tiers::breakdown_validated(tiers, overflow_rate_per_mile, distance_miles)
        .map(|breakdown| breakdown.total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fare_within_tier_is_flat_rate() {
        let tiers = [RateTier::new(1.0, 5.0, 14.0), RateTier::new(5.0, 10.0, 20.0)];
        assert_eq!(compute_fare(3.0, &tiers, 2.0), Ok(14.0));
        assert_eq!(compute_fare(7.5, &tiers, 2.0), Ok(20.0));
    }

    #[test]
    fn fare_beyond_highest_tier_adds_overflow() {
        let tiers = [RateTier::new(1.0, 5.0, 14.0), RateTier::new(5.0, 10.0, 20.0)];
        assert_eq!(compute_fare(12.0, &tiers, 2.0), Ok(24.0));
    }

    #[test]
    fn overlapping_tiers_are_rejected() {
        let tiers = [RateTier::new(1.0, 5.0, 14.0), RateTier::new(3.0, 10.0, 20.0)];
        assert!(matches!(
            compute_fare(4.0, &tiers, 2.0),
            Err(PricingError::InvalidTierConfiguration(_))
        ));
    }
}
