use crate::types::TripRequest;

/// Build the single instruction sent to the model for a trip.
///
/// Values are interpolated verbatim.
pub fn build_itinerary_prompt(request: &TripRequest, currency: &str) -> String {
    format!(
        "Generate a personalized travel itinerary for a trip to {} from {} to {}. \
         Include activities based on the following preferences: Budget: {} {}, Interests: {}, \
         Trip Duration: {} days. Provide details like activity titles, descriptions, locations, timings, \
         and estimated costs in a structured JSON format.",
        request.city,
        request.start_date,
        request.end_date,
        request.budget,
        currency,
        request.interests,
        request.duration_days,
    )
}
