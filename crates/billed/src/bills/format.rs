use chrono::{DateTime, Datelike, NaiveDate};

use super::domain::BillStatus;

/// French short month names, capitalized and cut to three characters.
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("unknown bill status '{0}'")]
    UnknownStatus(String),
}

/// Turns stored bill fields into the labels shown in the bill list.
pub trait BillFormatter: Send + Sync {
    fn format_date(&self, raw: &str) -> Result<String, FormatError>;
    fn format_status(&self, status: &BillStatus) -> Result<String, FormatError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FrenchFormatter;

impl BillFormatter for FrenchFormatter {
    fn format_date(&self, raw: &str) -> Result<String, FormatError> {
        let date = parse_bill_date(raw).ok_or_else(|| FormatError::InvalidDate(raw.to_string()))?;
        let month = MONTHS[date.month0() as usize];
        Ok(format!("{} {}. {:02}", date.day(), month, date.year().rem_euclid(100)))
    }

    fn format_status(&self, status: &BillStatus) -> Result<String, FormatError> {
        match status {
            BillStatus::Pending => Ok("En attente".to_string()),
            BillStatus::Accepted => Ok("Accepté".to_string()),
            BillStatus::Refused => Ok("Refused".to_string()),
            BillStatus::Other(raw) => Err(FormatError::UnknownStatus(raw.clone())),
        }
    }
}

fn parse_bill_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}
