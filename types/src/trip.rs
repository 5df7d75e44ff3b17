//! Trip request domain model.
//!
//! A [`TripRequest`] is immutable once submitted: the form boundary builds
//! one, validates it, and hands it to the prompt builder by value. A new
//! submission replaces the whole session rather than editing in place.

use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The interest catalog offered by the trip form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interest {
    Adventure,
    Nature,
    Food,
    History,
    Relaxation,
    Nightlife,
}

#[derive(Debug, Error)]
#[error("unknown interest {0:?} (expected one of: adventure, nature, food, history, relaxation, nightlife)")]
pub struct InterestParseError(String);

impl Interest {
    pub const ALL: [Interest; 6] = [
        Interest::Adventure,
        Interest::Nature,
        Interest::Food,
        Interest::History,
        Interest::Relaxation,
        Interest::Nightlife,
    ];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Interest::Adventure => "Adventure",
            Interest::Nature => "Nature",
            Interest::Food => "Food",
            Interest::History => "History",
            Interest::Relaxation => "Relaxation",
            Interest::Nightlife => "Nightlife",
        }
    }
}

impl FromStr for Interest {
    type Err = InterestParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Interest::ALL
            .into_iter()
            .find(|interest| interest.display_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InterestParseError(trimmed.to_string()))
    }
}

impl std::fmt::Display for Interest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Error)]
pub enum TripRequestError {
    #[error("source location must not be empty")]
    EmptySource,
    #[error("destination must not be empty")]
    EmptyDestination,
    #[error("budget must not be empty")]
    EmptyBudget,
    #[error("start date {start} is after end date {end}")]
    DateOrder { start: NaiveDate, end: NaiveDate },
}

/// Structured trip parameters from the form boundary.
///
/// `travelers >= 1` is unrepresentable otherwise; the remaining form
/// invariants (non-empty text fields, start <= end) are checked by
/// [`TripRequest::validate`], which the form boundary runs before
/// submitting. The pipeline itself treats the fields as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub source: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: String,
    pub travelers: NonZeroU32,
    pub interests: BTreeSet<Interest>,
}

impl TripRequest {
    pub fn validate(&self) -> Result<(), TripRequestError> {
        if self.source.trim().is_empty() {
            return Err(TripRequestError::EmptySource);
        }
        if self.destination.trim().is_empty() {
            return Err(TripRequestError::EmptyDestination);
        }
        if self.budget.trim().is_empty() {
            return Err(TripRequestError::EmptyBudget);
        }
        if self.start_date > self.end_date {
            return Err(TripRequestError::DateOrder {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Interests joined for prompt embedding, in catalog order.
    #[must_use]
    pub fn interests_label(&self) -> String {
        self.interests
            .iter()
            .map(|interest| interest.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TripRequest {
        TripRequest {
            source: "Lisbon".to_string(),
            destination: "Kyoto".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            budget: "2000-3000".to_string(),
            travelers: NonZeroU32::new(2).unwrap(),
            interests: BTreeSet::from([Interest::Food, Interest::History]),
        }
    }

    #[test]
    fn interest_parse_is_case_insensitive() {
        assert_eq!("food".parse::<Interest>().unwrap(), Interest::Food);
        assert_eq!(" NIGHTLIFE ".parse::<Interest>().unwrap(), Interest::Nightlife);
        assert!("snorkeling".parse::<Interest>().is_err());
    }

    #[test]
    fn validate_accepts_well_formed_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let mut req = request();
        req.source = "  ".to_string();
        assert!(matches!(req.validate(), Err(TripRequestError::EmptySource)));

        let mut req = request();
        req.destination = String::new();
        assert!(matches!(
            req.validate(),
            Err(TripRequestError::EmptyDestination)
        ));
    }

    #[test]
    fn validate_rejects_inverted_dates() {
        let mut req = request();
        req.end_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(matches!(
            req.validate(),
            Err(TripRequestError::DateOrder { .. })
        ));
    }

    #[test]
    fn interests_label_is_deterministic() {
        let req = request();
        assert_eq!(req.interests_label(), "Food, History");

        let mut empty = request();
        empty.interests.clear();
        assert_eq!(empty.interests_label(), "");
    }
}
