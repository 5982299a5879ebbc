use std::str::FromStr;

use crate::errors::{StatementParseError, StatementResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Raw OFX date token (`YYYYMMDD` optionally followed by time and zone).
#[derive(Debug, Clone, Copy)]
pub struct OfxDate<'a>(&'a str);

impl<'a> From<&'a str> for OfxDate<'a> {
    fn from(value: &'a str) -> Self {
        Self(value)
    }
}

impl OfxDate<'_> {
    /// Tokens shorter than eight characters carry no date. Anything longer
    /// must start with a valid calendar date.
    pub fn to_date(self) -> StatementResult<Option<NaiveDate>> {
        let clean = self.0.trim();
        if clean.chars().count() < 8 {
            return Ok(None);
        }

        let invalid = || StatementParseError::OfxDateInvalidFormat(clean.to_string());

        let digits = clean
            .get(..8)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(invalid)?;
        let year = digits[0..4].parse().map_err(|_| invalid())?;
        let month = digits[4..6].parse().map_err(|_| invalid())?;
        let day = digits[6..8].parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Some)
            .ok_or_else(invalid)
    }
}

/// Optional date leaf: absent stays absent.
pub fn parse_date(value: Option<&str>) -> StatementResult<Option<NaiveDate>> {
    match value {
        Some(value) => OfxDate::from(value).to_date(),
        None => Ok(None),
    }
}

/// Decimal leaf using `.` as the separator, whatever the host locale.
pub fn parse_decimal(value: Option<&str>, field: &'static str) -> StatementResult<Decimal> {
    let value = value.ok_or(StatementParseError::NotFound(field))?;
    Decimal::from_str(value).map_err(|_| StatementParseError::InvalidDecimal {
        field,
        value: value.to_string(),
    })
}
