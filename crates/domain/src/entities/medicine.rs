//! Medicine master catalog entry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::MedicineId;

/// Lifecycle status of a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogStatus {
    Active,
    Discontinued,
}

impl fmt::Display for CatalogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Discontinued => write!(f, "DISCONTINUED"),
        }
    }
}

impl FromStr for CatalogStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "DISCONTINUED" => Ok(Self::Discontinued),
            other => Err(DomainError::parse(format!(
                "Unknown catalog status: {other}"
            ))),
        }
    }
}

/// One row of the shared medicine master catalog, keyed by a unique
/// registration number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: MedicineId,
    pub reg_no: String,
    pub generic_name: Option<String>,
    pub brand_name: Option<String>,
    pub dosage: Option<String>,
    pub pack_size: Option<String>,
    pub pack_type: Option<String>,
    pub manufacturer: Option<String>,
    pub country: Option<String>,
    pub agent: Option<String>,
    pub reg_date: Option<NaiveDate>,
    pub schedule: Option<String>,
    pub validation: Option<String>,
    pub dossier_no: Option<String>,
    pub status: CatalogStatus,
    pub created_at: DateTime<Utc>,
}

impl Medicine {
    pub fn new(reg_no: impl Into<String>, created_at: DateTime<Utc>) -> Result<Self, DomainError> {
        let reg_no = reg_no.into().trim().to_string();
        if reg_no.is_empty() {
            return Err(DomainError::validation("Registration number is required"));
        }
        Ok(Self {
            id: MedicineId::new(),
            reg_no,
            generic_name: None,
            brand_name: None,
            dosage: None,
            pack_size: None,
            pack_type: None,
            manufacturer: None,
            country: None,
            agent: None,
            reg_date: None,
            schedule: None,
            validation: None,
            dossier_no: None,
            status: CatalogStatus::Active,
            created_at,
        })
    }

    /// Display name for activity messages and suggestions: generic name
    /// falling back to brand name, with dosage appended when known.
    pub fn display_name(&self) -> String {
        let base = self
            .generic_name
            .as_deref()
            .or(self.brand_name.as_deref())
            .unwrap_or(&self.reg_no);
        match &self.dosage {
            Some(d) => format!("{base} {d}"),
            None => base.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn rejects_blank_reg_no() {
        assert!(Medicine::new("  ", at()).is_err());
    }

    #[test]
    fn trims_reg_no() {
        let m = Medicine::new("  19/07/1234 ", at()).expect("valid");
        assert_eq!(m.reg_no, "19/07/1234");
        assert_eq!(m.status, CatalogStatus::Active);
    }

    #[test]
    fn display_name_prefers_generic_then_brand() {
        let mut m = Medicine::new("X1", at()).expect("valid");
        assert_eq!(m.display_name(), "X1");

        m.brand_name = Some("Panadol".into());
        assert_eq!(m.display_name(), "Panadol");

        m.generic_name = Some("Paracetamol".into());
        m.dosage = Some("500mg".into());
        assert_eq!(m.display_name(), "Paracetamol 500mg");
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "active".parse::<CatalogStatus>().expect("parses"),
            CatalogStatus::Active
        );
        assert!("retired".parse::<CatalogStatus>().is_err());
    }
}
