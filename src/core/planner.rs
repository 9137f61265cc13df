use std::time::Instant;
use tracing::{debug, info, warn};

use super::{
    aggregate::summarize_itinerary,
    calendar::{events_from_itinerary, export_calendar},
    extract::extract_itinerary,
    model::TextModel,
    prompt::build_itinerary_prompt,
};
use crate::{
    config::PlannerConfig,
    error::{PlannerError, Result},
    services::gemini_client::GeminiClient,
    types::{Itinerary, ItineraryResponse, Notice, PlanResult, TripRequest},
};

pub const GENERATION_FAILED_MESSAGE: &str = "Could not generate itinerary. Please try again.";

/// Runs the prompt -> model -> extract -> aggregate -> export pipeline for one submission.
#[derive(Debug)]
pub struct Planner {
    model: Box<dyn TextModel>,
    currency: String,
}

impl Planner {
    /// Planner backed by the Gemini API described by `config`
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        let client = GeminiClient::new(config)?;
        Ok(Self::with_model(client, config.currency()))
    }

    pub fn with_model<M: TextModel + 'static>(model: M, currency: impl Into<String>) -> Self {
        Self {
            model: Box::new(model),
            currency: currency.into(),
        }
    }

    /// Plan a trip.
    ///
    /// Only an incomplete request is returned as an error. Model, extraction and
    /// calendar failures are recorded as notices on the result, which then
    /// carries an empty itinerary or no calendar.
    pub async fn plan(&self, request: &TripRequest) -> Result<PlanResult> {
        request.ensure_complete()?;

        let start_time = Instant::now();
        let mut notices = Vec::new();

        let prompt = build_itinerary_prompt(request, &self.currency);
        info!(
            target: "trip_planner::planner",
            city = %request.city,
            model = self.model.name(),
            "requesting itinerary"
        );

        let raw_response = match self.model.generate(&prompt).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(target: "trip_planner::planner", error = %err, "model call failed");
                notices.push(Notice::error(format!("Error generating itinerary: {}", err)));
                None
            }
        };

        let itinerary = match raw_response.as_deref() {
            Some(raw) => self.decode(raw, &mut notices),
            None => ItineraryResponse::new(),
        };

        let days = Itinerary::from_response(&itinerary);
        let summary = summarize_itinerary(days.as_ref());
        let mut calendar = None;

        if itinerary.is_empty() {
            notices.push(Notice::error(GENERATION_FAILED_MESSAGE));
        } else {
            if !summary.data_available {
                notices.push(Notice::warning(PlannerError::NoItineraryData.to_string()));
            }
            notices.extend(summary.warnings.iter().cloned().map(Notice::warning));

            let records = match &days {
                Some(days) => events_from_itinerary(days, request.start_date),
                None => Vec::new(),
            };
            match export_calendar(&records) {
                Ok(document) => {
                    debug!(
                        target: "trip_planner::planner",
                        events = records.len(),
                        "calendar exported"
                    );
                    calendar = Some(document);
                }
                Err(err) => {
                    warn!(target: "trip_planner::planner", error = %err, "calendar export failed");
                    notices.push(Notice::error(err.to_string()));
                }
            }
        }

        info!(
            target: "trip_planner::planner",
            days = summary.days.len(),
            activities = summary.activity_count(),
            total_cost = summary.total_cost,
            "itinerary processed"
        );

        Ok(PlanResult {
            request: request.clone(),
            prompt,
            raw_response,
            itinerary,
            summary,
            calendar,
            notices,
            currency: self.currency.clone(),
            duration: start_time.elapsed(),
        })
    }

    fn decode(&self, raw: &str, notices: &mut Vec<Notice>) -> ItineraryResponse {
        match extract_itinerary(raw) {
            Ok(itinerary) => itinerary,
            Err(err @ PlannerError::NoJsonFound { .. }) => {
                warn!(target: "trip_planner::planner", "no JSON found in model response");
                notices.push(Notice::error(err.to_string()));
                if let PlannerError::NoJsonFound { raw_response } = err {
                    notices.push(Notice::info(format!("Raw response: {}", raw_response)));
                }
                ItineraryResponse::new()
            }
            Err(err) => {
                warn!(target: "trip_planner::planner", error = %err, "model response did not decode");
                notices.push(Notice::error(err.to_string()));
                ItineraryResponse::new()
            }
        }
    }
}
