//! Column decoding helpers shared by the repositories.

use chrono::{DateTime, NaiveDate, Utc};

use crate::infrastructure::ports::RepoError;

pub(super) fn bad_column(column: &str, detail: impl std::fmt::Display) -> RepoError {
    RepoError::Serialization(format!("column {column}: {detail}"))
}

pub(super) fn parse_ts(column: &str, value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| bad_column(column, e))
}

pub(super) fn parse_ts_opt(
    column: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, RepoError> {
    value.map(|v| parse_ts(column, v)).transpose()
}

pub(super) fn parse_date(column: &str, value: &str) -> Result<NaiveDate, RepoError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| bad_column(column, e))
}

pub(super) fn parse_date_opt(
    column: &str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, RepoError> {
    value.map(|v| parse_date(column, v)).transpose()
}

pub(super) fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(super) fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
