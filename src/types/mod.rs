pub mod itinerary;
pub mod result;
pub mod trip;

pub use itinerary::{Activity, CostField, DayPlan, Itinerary, ItineraryResponse};
pub use result::{Notice, NoticeLevel, PlanResult};
pub use trip::TripRequest;
