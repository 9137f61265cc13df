pub mod aggregate;
pub mod calendar;
pub mod cost;
pub mod extract;
pub mod model;
pub mod planner;
pub mod prompt;

pub use aggregate::{
    aggregate_itinerary, summarize_itinerary, CostedActivity, CostedDay, ItinerarySummary,
};
pub use calendar::{
    events_from_itinerary, export_calendar, save_calendar, CalendarEvent, EventRecord,
    CALENDAR_FILE_NAME, CALENDAR_MIME_TYPE,
};
pub use cost::{parse_cost, parse_cost_field, parse_cost_lenient, ParsedCost};
pub use extract::extract_itinerary;
pub use model::TextModel;
pub use planner::Planner;
pub use prompt::build_itinerary_prompt;
