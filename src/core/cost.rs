//! Normalization of free-text activity costs.

use regex::Regex;
use serde::Serialize;
use std::{fmt, sync::OnceLock};

use crate::{
    error::{PlannerError, Result},
    types::CostField,
};

/// Phrases that mean the activity costs nothing. Matched against the whole field.
const FREE_PHRASES: [&str; 3] = ["free", "no cost", "complimentary"];

/// A cost field reduced to something the aggregator can total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum ParsedCost {
    Amount(f64),
    Variable,
    Unknown,
}

impl ParsedCost {
    pub fn amount(&self) -> Option<f64> {
        match self {
            ParsedCost::Amount(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for ParsedCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedCost::Amount(value) => write!(f, "{:.2}", value),
            ParsedCost::Variable => f.write_str("Variable"),
            ParsedCost::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Parse a cost field.
///
/// Sentinel words win over digits, so "Variable, around $20" is `Variable`.
/// Text that is neither a sentinel nor a number comes back as
/// `PlannerError::InvalidCost` carrying the original input; callers treat it
/// as `ParsedCost::Unknown`. Only ASCII digits survive the stripping step, so
/// numerals from other scripts (such as "٥٠") are not read as amounts.
pub fn parse_cost(raw: &str) -> Result<ParsedCost> {
    let lowered = raw.to_lowercase();

    if FREE_PHRASES.contains(&lowered.as_str()) {
        return Ok(ParsedCost::Amount(0.0));
    }
    if lowered.contains("variable") {
        return Ok(ParsedCost::Variable);
    }
    if lowered.contains("unknown") {
        return Ok(ParsedCost::Unknown);
    }

    let stripped = non_numeric().replace_all(raw, "");
    stripped
        .parse::<f64>()
        .map(ParsedCost::Amount)
        .map_err(|_| PlannerError::InvalidCost(raw.to_string()))
}

/// Parse a cost as it came out of the model's JSON.
///
/// Text goes through [`parse_cost`]. A JSON number is taken as the amount
/// directly; negative or non-finite numbers are invalid. Arrays, objects and
/// booleans are always invalid, so a price range never collapses into one
/// made-up figure.
pub fn parse_cost_field(field: &CostField) -> Result<ParsedCost> {
    match field {
        CostField::Text(text) => parse_cost(text),
        CostField::Number(amount) if amount.is_finite() && *amount >= 0.0 => {
            Ok(ParsedCost::Amount(*amount))
        }
        CostField::Number(_) | CostField::Unsupported(_) => {
            Err(PlannerError::InvalidCost(field.to_string()))
        }
    }
}

/// Like [`parse_cost`] but folds an invalid format into `Unknown`.
pub fn parse_cost_lenient(raw: &str) -> ParsedCost {
    parse_cost(raw).unwrap_or(ParsedCost::Unknown)
}

fn non_numeric() -> &'static Regex {
    static NON_NUMERIC: OnceLock<Regex> = OnceLock::new();
    NON_NUMERIC.get_or_init(|| Regex::new(r"[^0-9.]+").expect("cost pattern compiles"))
}
