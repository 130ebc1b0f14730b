//! Domain model for the pharmacy stock platform: the medicine master
//! catalog, pharmacy registration workflow, login identities, per-pharmacy
//! inventory, and credential tokens. No I/O lives here.

pub mod entities;
pub mod error;
pub mod ids;

pub use entities::*;
pub use error::DomainError;
pub use ids::*;
