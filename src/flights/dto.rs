use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::{Flight, NewFlight, QaPair};
use crate::error::ApiError;

/// Request body for flight creation. The owner is never part of the body;
/// it comes from the authenticated identity.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateFlightRequest {
    pub title: String,
    pub from_country: String,
    pub to_country: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    pub qa: Vec<QaPair>,
}

impl CreateFlightRequest {
    /// Boundary validation: required fields and the fixed five-pair QA
    /// set, checked before anything reaches storage. Dates are normalized
    /// to UTC; a missing date defaults to now.
    pub fn validate(self) -> Result<NewFlight, ApiError> {
        if self.title.trim().is_empty()
            || self.from_country.trim().is_empty()
            || self.to_country.trim().is_empty()
        {
            return Err(ApiError::Validation("missing required flight fields".into()));
        }
        if self.qa.len() != 5 {
            return Err(ApiError::Validation(
                "exactly 5 question-answer pairs are required".into(),
            ));
        }

        let date = self
            .date
            .unwrap_or_else(OffsetDateTime::now_utc)
            .to_offset(time::UtcOffset::UTC);

        Ok(NewFlight {
            title: self.title,
            from_country: self.from_country,
            to_country: self.to_country,
            date,
            qa: self.qa,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateFlightResponse {
    pub message: String,
    pub flight: Flight,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_qa(count: usize) -> CreateFlightRequest {
        CreateFlightRequest {
            title: "Paris Trip".into(),
            from_country: "Ethiopia".into(),
            to_country: "France".into(),
            date: None,
            qa: (0..count)
                .map(|i| QaPair {
                    question: format!("q{i}"),
                    answer: format!("a{i}"),
                })
                .collect(),
        }
    }

    #[test]
    fn accepts_exactly_five_qa_pairs() {
        let flight = request_with_qa(5).validate().expect("valid");
        assert_eq!(flight.qa.len(), 5);
        assert_eq!(flight.date.offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn rejects_wrong_qa_count() {
        for count in [0, 4, 6] {
            let err = request_with_qa(count).validate().unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "count {count}");
        }
    }

    #[test]
    fn rejects_missing_fields() {
        let mut req = request_with_qa(5);
        req.title = "  ".into();
        assert!(matches!(
            req.validate().unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn normalizes_date_to_utc() {
        let mut req = request_with_qa(5);
        let offset = time::UtcOffset::from_hms(3, 0, 0).unwrap();
        let local = OffsetDateTime::now_utc().to_offset(offset);
        req.date = Some(local);
        let flight = req.validate().expect("valid");
        assert_eq!(flight.date.offset(), time::UtcOffset::UTC);
        assert_eq!(flight.date, local);
    }
}
