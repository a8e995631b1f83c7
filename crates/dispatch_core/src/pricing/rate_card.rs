use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::VehicleClass;

use super::error::PricingError;
use super::tiers::{FareBreakdown, RateTable};

/// Rate tables keyed by service level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateCard {
    tables: BTreeMap<VehicleClass, RateTable>,
}

impl RateCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table for `service`, returning the one it replaces.
    pub fn insert(&mut self, service: VehicleClass, table: RateTable) -> Option<RateTable> {
        self.tables.insert(service, table)
    }

    pub fn with_table(mut self, service: VehicleClass, table: RateTable) -> Self {
        self.insert(service, table);
        self
    }

    pub fn table(&self, service: VehicleClass) -> Result<&RateTable, PricingError> {
        self.tables
            .get(&service)
            .ok_or(PricingError::UnknownServiceLevel(service))
    }

    pub fn services(&self) -> impl Iterator<Item = VehicleClass> + '_ {
        self.tables.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn breakdown(
        &self,
        service: VehicleClass,
        distance_miles: f64,
    ) -> Result<FareBreakdown, PricingError> {
        self.table(service)?.breakdown(distance_miles)
    }

    pub fn fare(&self, service: VehicleClass, distance_miles: f64) -> Result<f64, PricingError> {
        self.table(service)?.fare(distance_miles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::RateTier;

    #[test]
    fn fares_differ_by_service_level() {
        let card = RateCard::new()
            .with_table(
                VehicleClass::Ambulatory,
                RateTable::new(vec![RateTier::new(0.0, 10.0, 25.0)], 2.0).expect("tiers"),
            )
            .with_table(
                VehicleClass::Wheelchair,
                RateTable::new(vec![RateTier::new(0.0, 10.0, 45.0)], 3.0).expect("tiers"),
            );

        assert_eq!(card.fare(VehicleClass::Ambulatory, 12.0), Ok(29.0));
        assert_eq!(card.fare(VehicleClass::Wheelchair, 12.0), Ok(51.0));
        assert_eq!(
            card.fare(VehicleClass::Stretcher, 12.0),
            Err(PricingError::UnknownServiceLevel(VehicleClass::Stretcher))
        );
    }

    #[test]
    fn deserializes_from_service_keyed_json() {
        let card: RateCard = serde_json::from_str(
            r#"{
                "ambulatory": {"tiers": [{"from_miles": 0, "to_miles": 5, "rate": 14}], "overflow_rate_per_mile": 2},
                "stretcher": {"tiers": [{"from_miles": 0, "to_miles": 5, "rate": 90}], "overflow_rate_per_mile": 6}
            }"#,
        )
        .expect("rate card json");

        let services: Vec<VehicleClass> = card.services().collect();
        assert_eq!(services, vec![VehicleClass::Ambulatory, VehicleClass::Stretcher]);
        assert_eq!(card.fare(VehicleClass::Stretcher, 7.0), Ok(102.0));
    }
}
