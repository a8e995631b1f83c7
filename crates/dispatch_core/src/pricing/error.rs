use thiserror::Error;

use crate::model::VehicleClass;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("invalid tier configuration: {0}")]
    InvalidTierConfiguration(String),

    #[error("invalid trip distance: {0} miles")]
    InvalidDistance(f64),

    #[error("no rate tiers configured for service level '{0}'")]
    UnknownServiceLevel(VehicleClass),
}
