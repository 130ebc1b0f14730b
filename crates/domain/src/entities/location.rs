//! Geographic position of a pharmacy, captured during account setup.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{PharmacyId, PharmacyLocationId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacyLocation {
    pub id: PharmacyLocationId,
    pub pharmacy_id: PharmacyId,
    pub latitude: f64,
    pub longitude: f64,
}

impl PharmacyLocation {
    pub fn new(pharmacy_id: PharmacyId, latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::validation(format!(
                "Latitude out of range: {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::validation(format!(
                "Longitude out of range: {longitude}"
            )));
        }
        Ok(Self {
            id: PharmacyLocationId::new(),
            pharmacy_id,
            latitude,
            longitude,
        })
    }
}
