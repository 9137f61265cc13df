//! trip-planner: personalized travel itineraries from a generative model
//!
//! The crate builds a prompt from trip parameters, asks a text model for a
//! JSON itinerary, pulls the JSON out of whatever prose surrounds it, totals
//! the activity costs, and exports the activities as an iCalendar file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use trip_planner::{Planner, PlannerConfig, TripRequest};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::from_env()?;
//!     let planner = Planner::new(&config)?;
//!
//!     let request = TripRequest::new(
//!         "Lisbon",
//!         NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2025, 5, 4).unwrap(),
//!     )
//!     .with_interests("tiles, seafood, viewpoints");
//!
//!     let result = planner.plan(&request).await?;
//!     println!("{}", result.render());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub(crate) mod services;
pub mod types;

pub use config::PlannerConfig;
pub use crate::core::{
    aggregate_itinerary, build_itinerary_prompt, events_from_itinerary, export_calendar,
    extract_itinerary, parse_cost, parse_cost_field, parse_cost_lenient, save_calendar,
    summarize_itinerary, CalendarEvent, EventRecord, ItinerarySummary, ParsedCost, Planner,
    TextModel, CALENDAR_FILE_NAME, CALENDAR_MIME_TYPE,
};
pub use error::{PlannerError, Result};
pub use services::gemini_client::GeminiClient;
pub use types::{
    Activity, CostField, DayPlan, Itinerary, ItineraryResponse, Notice, NoticeLevel, PlanResult,
    TripRequest,
};

#[cfg(feature = "cli")]
pub mod cli;
