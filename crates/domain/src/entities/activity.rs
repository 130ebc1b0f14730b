//! Inventory activity log entries shown on the pharmacy dashboard.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ActivityId, MedicineId, PharmacyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Added,
    Updated,
    Deleted,
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "ADDED"),
            Self::Updated => write!(f, "UPDATED"),
            Self::Deleted => write!(f, "DELETED"),
        }
    }
}

impl FromStr for ActivityAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADDED" => Ok(Self::Added),
            "UPDATED" => Ok(Self::Updated),
            "DELETED" => Ok(Self::Deleted),
            other => Err(DomainError::parse(format!("Unknown activity: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryActivity {
    pub id: ActivityId,
    pub pharmacy_id: PharmacyId,
    /// None once the medicine is gone from the catalog.
    pub medicine_id: Option<MedicineId>,
    pub action: ActivityAction,
    /// Human-readable line, e.g. "Added Paracetamol 500mg (qty 40)".
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl InventoryActivity {
    pub fn record(
        pharmacy_id: PharmacyId,
        medicine_id: Option<MedicineId>,
        action: ActivityAction,
        message: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            pharmacy_id,
            medicine_id,
            action,
            message: message.into(),
            occurred_at,
        }
    }
}
