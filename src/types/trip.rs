use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

pub const DEFAULT_BUDGET: f64 = 1000.0;
pub const DEFAULT_DURATION_DAYS: u32 = 3;

/// Trip parameters collected for a single submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination city, interpolated verbatim into the prompt
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Budget in the configured currency, never negative
    pub budget: f64,
    /// Free-text interests (e.g. "art, museums, outdoor activities")
    pub interests: String,
    /// Trip length in days, at least 1
    pub duration_days: u32,
}

impl TripRequest {
    pub fn new(city: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            city: city.into(),
            start_date,
            end_date,
            budget: DEFAULT_BUDGET,
            interests: String::new(),
            duration_days: DEFAULT_DURATION_DAYS,
        }
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_interests(mut self, interests: impl Into<String>) -> Self {
        self.interests = interests.into();
        self
    }

    pub fn with_duration_days(mut self, duration_days: u32) -> Self {
        self.duration_days = duration_days;
        self
    }

    /// Checks the fields a submission cannot go out without.
    ///
    /// Date ordering is not checked.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.city.trim().is_empty() {
            return Err(PlannerError::Validation(
                "Please fill in all fields.".to_string(),
            ));
        }
        if self.budget.is_nan() || self.budget < 0.0 {
            return Err(PlannerError::Validation(format!(
                "budget must be 0 or more, got {}",
                self.budget
            )));
        }
        if self.duration_days == 0 {
            return Err(PlannerError::Validation(
                "trip duration must be at least 1 day".to_string(),
            ));
        }
        Ok(())
    }
}
