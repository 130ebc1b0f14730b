//! Ports for external services and testability seams.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::{DrugLookupError, MailError, PasswordError};

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasherPort: Send + Sync {
    fn hash(&self, raw: &str) -> Result<String, PasswordError>;
    fn verify(&self, raw: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// An email on its way out: setup links, reset links, rejection notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailerPort: Send + Sync {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError>;
}

/// Mapped drug-label information from the openFDA proxy.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DrugInfo {
    pub name: String,
    pub generic_name: String,
    pub usages: Vec<String>,
    pub common_side_effects: Vec<String>,
    pub serious_side_effects: Vec<String>,
    pub precautions: Vec<String>,
    pub interactions: Vec<String>,
    /// Dosage sections joined into one string.
    pub dosage_info: String,
    /// Clinical pharmacology sections joined into one string.
    pub how_it_works: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrugLabelPort: Send + Sync {
    /// `Ok(None)` when the upstream has no label for the name.
    async fn fetch(&self, name: &str) -> Result<Option<DrugInfo>, DrugLookupError>;
}
