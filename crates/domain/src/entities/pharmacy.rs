//! Pharmacy registration application and its approval lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::PharmacyId;

/// Application lifecycle: PENDING until an admin decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PharmacyStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for PharmacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl FromStr for PharmacyStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(DomainError::parse(format!(
                "Unknown pharmacy status: {other}"
            ))),
        }
    }
}

/// Business + contact details captured at registration.
///
/// Everything here comes straight off the registration form; the workflow
/// fields (`status`, `rejection_reason`) are only ever moved by
/// [`Pharmacy::approve`] / [`Pharmacy::reject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: PharmacyId,

    // Business details
    pub legal_entity_name: String,
    pub trade_name: Option<String>,
    pub nmra_license: String,
    pub business_reg_no: String,
    pub address: String,
    pub telephone: String,
    pub email: String,
    pub entity_type: String,

    // Contact person
    pub contact_full_name: String,
    pub contact_title: String,
    pub contact_phone: String,
    pub contact_email: String,

    // Declaration
    pub declaration_date: NaiveDate,
    pub agreed_to_declaration: bool,

    // Profile fields editable after approval
    pub about: Option<String>,
    pub opening_hours_json: Option<String>,

    // Workflow
    pub status: PharmacyStatus,
    pub rejection_reason: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Registration form data, validated before a `Pharmacy` exists.
#[derive(Debug, Clone)]
pub struct PharmacyRegistration {
    pub legal_entity_name: String,
    pub trade_name: Option<String>,
    pub nmra_license: String,
    pub business_reg_no: String,
    pub address: String,
    pub telephone: String,
    pub email: String,
    pub entity_type: String,
    pub contact_full_name: String,
    pub contact_title: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub declaration_date: NaiveDate,
    pub agreed_to_declaration: bool,
}

impl Pharmacy {
    /// Create a PENDING application from a registration form.
    pub fn register(
        form: PharmacyRegistration,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !form.agreed_to_declaration {
            return Err(DomainError::validation("Declaration must be accepted"));
        }
        let required = [
            ("legal entity name", &form.legal_entity_name),
            ("NMRA license", &form.nmra_license),
            ("business registration number", &form.business_reg_no),
            ("address", &form.address),
            ("telephone", &form.telephone),
            ("email", &form.email),
            ("entity type", &form.entity_type),
            ("contact full name", &form.contact_full_name),
            ("contact title", &form.contact_title),
            ("contact phone", &form.contact_phone),
            ("contact email", &form.contact_email),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("Missing {label}")));
            }
        }

        Ok(Self {
            id: PharmacyId::new(),
            legal_entity_name: form.legal_entity_name.trim().to_string(),
            trade_name: form
                .trade_name
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            nmra_license: form.nmra_license.trim().to_string(),
            business_reg_no: form.business_reg_no.trim().to_string(),
            address: form.address.trim().to_string(),
            telephone: form.telephone.trim().to_string(),
            email: form.email.trim().to_ascii_lowercase(),
            entity_type: form.entity_type.trim().to_string(),
            contact_full_name: form.contact_full_name.trim().to_string(),
            contact_title: form.contact_title.trim().to_string(),
            contact_phone: form.contact_phone.trim().to_string(),
            contact_email: form.contact_email.trim().to_ascii_lowercase(),
            declaration_date: form.declaration_date,
            agreed_to_declaration: true,
            about: None,
            opening_hours_json: None,
            status: PharmacyStatus::Pending,
            rejection_reason: None,
            created_at,
        })
    }

    /// PENDING → APPROVED. Any other starting state is a conflict.
    pub fn approve(&mut self) -> Result<(), DomainError> {
        if self.status != PharmacyStatus::Pending {
            return Err(DomainError::invalid_state_transition(format!(
                "Only PENDING pharmacies can be approved (current: {})",
                self.status
            )));
        }
        self.status = PharmacyStatus::Approved;
        Ok(())
    }

    /// PENDING → REJECTED with a mandatory reason.
    pub fn reject(&mut self, reason: &str) -> Result<(), DomainError> {
        if self.status != PharmacyStatus::Pending {
            return Err(DomainError::invalid_state_transition(format!(
                "Only PENDING pharmacies can be rejected (current: {})",
                self.status
            )));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::validation("Rejection reason is required"));
        }
        self.status = PharmacyStatus::Rejected;
        self.rejection_reason = Some(reason.to_string());
        Ok(())
    }

    /// Public-facing display name: trade name when set, legal name otherwise.
    pub fn display_name(&self) -> &str {
        self.trade_name.as_deref().unwrap_or(&self.legal_entity_name)
    }
}
