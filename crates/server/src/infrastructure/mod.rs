//! Infrastructure: ports, the sqlx repositories and the concrete adapters
//! for clock, passwords, sessions, mail and the openFDA lookup.

pub mod clock;
pub mod importers;
pub mod mailer;
pub mod openfda;
pub mod password;
pub mod ports;
pub mod session;
pub mod sqlite;
