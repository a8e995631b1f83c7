use serde::{Deserialize, Serialize};

use super::error::PricingError;

/// Boundaries closer than this are treated as touching.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// A mileage band charged at a flat rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    pub from_miles: f64,
    pub to_miles: f64,
    pub rate: f64,
}

impl RateTier {
    pub fn new(from_miles: f64, to_miles: f64, rate: f64) -> Self {
        Self {
            from_miles,
            to_miles,
            rate,
        }
    }

    fn contains(&self, distance_miles: f64) -> bool {
        self.from_miles <= distance_miles && distance_miles <= self.to_miles
    }
}

/// How a fare was put together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub distance_miles: f64,
    /// Index of the tier whose flat rate applies (the highest tier for overflow).
    pub tier_index: usize,
    pub tier_rate: f64,
    pub overflow_miles: f64,
    pub overflow_charge: f64,
    pub total: f64,
}

/// Check that tiers are ascending, contiguous and well formed.
///
/// Consecutive tiers must share a boundary (`next.from_miles == prev.to_miles`);
/// anything else is reported as an overlap, a gap or an ordering problem.
pub fn validate_tiers(tiers: &[RateTier], overflow_rate_per_mile: f64) -> Result<(), PricingError> {
    if tiers.is_empty() {
        return Err(PricingError::InvalidTierConfiguration(
            "at least one tier is required".to_string(),
        ));
    }

    if !overflow_rate_per_mile.is_finite() || overflow_rate_per_mile < 0.0 {
        return Err(PricingError::InvalidTierConfiguration(format!(
            "overflow rate must be a non-negative number, got {overflow_rate_per_mile}"
        )));
    }

    for (idx, tier) in tiers.iter().enumerate() {
        if !tier.from_miles.is_finite() || !tier.to_miles.is_finite() || !tier.rate.is_finite() {
            return Err(PricingError::InvalidTierConfiguration(format!(
                "tier {idx} has a non-finite value"
            )));
        }
        if tier.from_miles < 0.0 {
            return Err(PricingError::InvalidTierConfiguration(format!(
                "tier {idx} starts below zero ({} miles)",
                tier.from_miles
            )));
        }
        if tier.from_miles >= tier.to_miles {
            return Err(PricingError::InvalidTierConfiguration(format!(
                "tier {idx} range is empty or inverted ({}..{} miles)",
                tier.from_miles, tier.to_miles
            )));
        }
        if tier.rate < 0.0 {
            return Err(PricingError::InvalidTierConfiguration(format!(
                "tier {idx} has a negative rate ({})",
                tier.rate
            )));
        }
    }

    for idx in 1..tiers.len() {
        let prev = &tiers[idx - 1];
        let next = &tiers[idx];
        if next.from_miles < prev.from_miles {
            return Err(PricingError::InvalidTierConfiguration(format!(
                "tiers {} and {idx} are not in ascending order",
                idx - 1
            )));
        }
        if next.from_miles < prev.to_miles - BOUNDARY_TOLERANCE {
            return Err(PricingError::InvalidTierConfiguration(format!(
                "tiers {} and {idx} overlap ({}..{} and {}..{} miles)",
                idx - 1,
                prev.from_miles,
                prev.to_miles,
                next.from_miles,
                next.to_miles
            )));
        }
        if next.from_miles > prev.to_miles + BOUNDARY_TOLERANCE {
            return Err(PricingError::InvalidTierConfiguration(format!(
                "gap between tiers {} and {idx} ({} to {} miles)",
                idx - 1,
                prev.to_miles,
                next.from_miles
            )));
        }
    }

    Ok(())
}

/// Fare for already validated tiers.
pub(crate) fn breakdown_validated(
    tiers: &[RateTier],
    overflow_rate_per_mile: f64,
    distance_miles: f64,
) -> Result<FareBreakdown, PricingError> {
    if !distance_miles.is_finite() || distance_miles < 0.0 {
        return Err(PricingError::InvalidDistance(distance_miles));
    }

    let last_index = tiers.len() - 1;
    let highest = &tiers[last_index];
    if distance_miles > highest.to_miles {
        let overflow_miles = distance_miles - highest.to_miles;
        let overflow_charge = overflow_rate_per_mile * overflow_miles;
        return Ok(FareBreakdown {
            distance_miles,
            tier_index: last_index,
            tier_rate: highest.rate,
            overflow_miles,
            overflow_charge,
            total: highest.rate + overflow_charge,
        });
    }

    // Lower tier wins on a shared boundary; distances below the first tier
    // pay the first tier's rate.
    let tier_index = tiers
        .iter()
        .position(|tier| tier.contains(distance_miles))
        .unwrap_or(0);
    let tier_rate = tiers[tier_index].rate;

    Ok(FareBreakdown {
        distance_miles,
        tier_index,
        tier_rate,
        overflow_miles: 0.0,
        overflow_charge: 0.0,
        total: tier_rate,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRateTable {
    tiers: Vec<RateTier>,
    #[serde(default)]
    overflow_rate_per_mile: f64,
}

/// Tiers plus overflow rate, validated once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRateTable", into = "RawRateTable")]
pub struct RateTable {
    tiers: Vec<RateTier>,
    overflow_rate_per_mile: f64,
}

impl RateTable {
    pub fn new(tiers: Vec<RateTier>, overflow_rate_per_mile: f64) -> Result<Self, PricingError> {
        validate_tiers(&tiers, overflow_rate_per_mile)?;
        Ok(Self {
            tiers,
            overflow_rate_per_mile,
        })
    }

    pub fn tiers(&self) -> &[RateTier] {
        &self.tiers
    }

    pub fn overflow_rate_per_mile(&self) -> f64 {
        self.overflow_rate_per_mile
    }

    pub fn breakdown(&self, distance_miles: f64) -> Result<FareBreakdown, PricingError> {
        breakdown_validated(&self.tiers, self.overflow_rate_per_mile, distance_miles)
    }

    pub fn fare(&self, distance_miles: f64) -> Result<f64, PricingError> {
        self.breakdown(distance_miles).map(|breakdown| breakdown.total)
    }
}

impl TryFrom<RawRateTable> for RateTable {
    type Error = PricingError;

    fn try_from(raw: RawRateTable) -> Result<Self, Self::Error> {
        RateTable::new(raw.tiers, raw.overflow_rate_per_mile)
    }
}

impl From<RateTable> for RawRateTable {
    fn from(table: RateTable) -> Self {
        RawRateTable {
            tiers: table.tiers,
            overflow_rate_per_mile: table.overflow_rate_per_mile,
        }
    }
}
