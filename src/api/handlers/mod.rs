pub mod battery;
pub mod health;
pub mod measurement;
pub mod summary;
pub mod wind;

use crate::error::{AppError, Result};
use chrono::NaiveDate;

pub type AppState = (crate::db::DbPool, crate::config::Config);

/// Parse a `YYYY-MM-DD` path segment.
pub fn parse_anchor_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_parse_anchor_date() {
        let date = assert_ok!(parse_anchor_date("2024-02-29"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        assert_err!(parse_anchor_date("2023-02-29"));
        assert_err!(parse_anchor_date("31.03.2024"));
        assert_err!(parse_anchor_date(""));
    }
}
