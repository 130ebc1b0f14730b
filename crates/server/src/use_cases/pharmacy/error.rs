use pharmstock_domain::DomainError;

use crate::infrastructure::ports::{MailError, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum PharmacyError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Mail(#[from] MailError),
}
