use thiserror::Error;

/// Main error type for the itinerary pipeline
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model API error: {0}")]
    ModelApi(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not find JSON in the response.")]
    NoJsonFound { raw_response: String },

    #[error("JSON Parse error: {message}. The response received: {snippet}")]
    JsonDecode { message: String, snippet: String },

    #[error("Invalid cost format detected. Received: {0}. Setting as Unknown.")]
    InvalidCost(String),

    #[error("No itinerary data available to display.")]
    NoItineraryData,

    #[error("Error creating calendar file: {0}")]
    Calendar(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Get the error code for structured output
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::ModelApi(_) => "MODEL_API_ERROR",
            PlannerError::Http(_) => "HTTP_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::NoJsonFound { .. } => "NO_JSON_FOUND",
            PlannerError::JsonDecode { .. } => "JSON_DECODE_ERROR",
            PlannerError::InvalidCost(_) => "INVALID_COST",
            PlannerError::NoItineraryData => "NO_ITINERARY_DATA",
            PlannerError::Calendar(_) => "CALENDAR_ERROR",
            PlannerError::Validation(_) => "VALIDATION_ERROR",
            PlannerError::Io(_) => "IO_ERROR",
        }
    }

    /// True for failures that abort the program instead of degrading the result
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlannerError::Config(_))
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "fatal": self.is_fatal()
            }
        })
    }
}
