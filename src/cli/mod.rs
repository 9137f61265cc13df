use crate::{
    config::PlannerConfig,
    core::calendar::{save_calendar, CALENDAR_FILE_NAME, CALENDAR_MIME_TYPE},
    error::PlannerError,
    types::{Notice, TripRequest},
    Planner,
};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI entry point for the trip-planner tool
pub async fn run() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trip_planner=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let matches = command().get_matches();

    let config = resolve_config(&matches).context("failed to initialize the model client")?;
    let request = trip_request(&matches)?;
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(CALENDAR_FILE_NAME));

    info!("Planning trip to {} with model {}", request.city, config.model());
    let planner = Planner::new(&config)?;

    let mut result = match planner.plan(&request).await {
        Ok(result) => result,
        Err(err @ PlannerError::Validation(_)) => {
            eprintln!("{}", err);
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(document) = &result.calendar {
        match save_calendar(&output, document) {
            Ok(()) => result.notices.push(Notice::success(format!(
                "Itinerary generated and saved as '{}' ({})",
                output.display(),
                CALENDAR_MIME_TYPE
            ))),
            Err(err) => {
                error!("Calendar export failed: {}", err);
                result.notices.push(Notice::error(err.to_string()));
            }
        }
    }

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.render());
    }

    info!("Finished in {:.2}s", result.duration.as_secs_f64());

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn command() -> Command {
    Command::new("trip-planner")
        .version("0.1.0")
        .about("Generate a personalized travel itinerary and export it as an iCalendar file")
        .arg(
            Arg::new("city")
                .short('c')
                .long("city")
                .value_name("CITY")
                .help("Destination city")
                .required(true),
        )
        .arg(
            Arg::new("start-date")
                .short('s')
                .long("start-date")
                .value_name("YYYY-MM-DD")
                .help("First day of the trip")
                .value_parser(parse_date)
                .required(true),
        )
        .arg(
            Arg::new("end-date")
                .short('e')
                .long("end-date")
                .value_name("YYYY-MM-DD")
                .help("Last day of the trip")
                .value_parser(parse_date)
                .required(true),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("AMOUNT")
                .help("Trip budget in the configured currency")
                .value_parser(parse_budget)
                .default_value("1000"),
        )
        .arg(
            Arg::new("interests")
                .short('i')
                .long("interests")
                .value_name("TEXT")
                .help("Interests (e.g., art, museums, outdoor activities)"),
        )
        .arg(
            Arg::new("duration")
                .short('d')
                .long("duration")
                .value_name("DAYS")
                .help("Trip duration in days")
                .value_parser(value_parser!(u32).range(1..))
                .default_value("3"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Where to write the calendar file")
                .value_parser(value_parser!(PathBuf))
                .default_value(CALENDAR_FILE_NAME),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Gemini model to use (or set GEMINI_MODEL, default gemini-1.5-flash)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("Model API key (or set PALM_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Generative Language API base URL (or set GEMINI_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds")
                .value_parser(value_parser!(u64))
                .default_value("120"),
        )
        .arg(
            Arg::new("currency")
                .long("currency")
                .value_name("CODE")
                .help("Currency code for the budget and cost totals (or set PLANNER_CURRENCY)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full result as JSON")
                .action(ArgAction::SetTrue),
        )
}

fn resolve_config(matches: &ArgMatches) -> crate::Result<PlannerConfig> {
    // Flag wins over the environment
    let mut config = match matches.get_one::<String>("api-key") {
        Some(api_key) => PlannerConfig::new(api_key.as_str())?.with_env_overrides(),
        None => PlannerConfig::from_env()?,
    };

    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.as_str());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(currency) = matches.get_one::<String>("currency") {
        config = config.with_currency(currency.as_str());
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*timeout));
    }

    Ok(config)
}

fn trip_request(matches: &ArgMatches) -> crate::Result<TripRequest> {
    let missing = || PlannerError::Validation("Please fill in all fields.".to_string());
    let city = matches.get_one::<String>("city").ok_or_else(missing)?;
    let start_date = *matches
        .get_one::<NaiveDate>("start-date")
        .ok_or_else(missing)?;
    let end_date = *matches.get_one::<NaiveDate>("end-date").ok_or_else(missing)?;

    let mut request = TripRequest::new(city.as_str(), start_date, end_date);
    if let Some(budget) = matches.get_one::<f64>("budget") {
        request = request.with_budget(*budget);
    }
    if let Some(interests) = matches.get_one::<String>("interests") {
        request = request.with_interests(interests.as_str());
    }
    if let Some(duration) = matches.get_one::<u32>("duration") {
        request = request.with_duration_days(*duration);
    }
    Ok(request)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected a date like 2025-05-01: {}", err))
}

fn parse_budget(value: &str) -> Result<f64, String> {
    let budget: f64 = value
        .parse()
        .map_err(|err| format!("not a number: {}", err))?;
    if budget.is_finite() && budget >= 0.0 {
        Ok(budget)
    } else {
        Err("budget must be 0 or more".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["trip-planner"];
        argv.extend_from_slice(args);
        command().try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_trip_request_from_flags() {
        let matches = parse(&[
            "--city",
            "Vienna",
            "--start-date",
            "2025-12-20",
            "--end-date",
            "2025-12-23",
            "--budget",
            "750.5",
            "--interests",
            "music",
            "--duration",
            "4",
        ]);
        let request = trip_request(&matches).unwrap();
        assert_eq!(request.city, "Vienna");
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2025, 12, 20).unwrap());
        assert_eq!(request.end_date, NaiveDate::from_ymd_opt(2025, 12, 23).unwrap());
        assert_eq!(request.budget, 750.5);
        assert_eq!(request.interests, "music");
        assert_eq!(request.duration_days, 4);
    }

    #[test]
    fn test_form_defaults() {
        let matches = parse(&[
            "-c",
            "Vienna",
            "-s",
            "2025-12-20",
            "-e",
            "2025-12-23",
        ]);
        let request = trip_request(&matches).unwrap();
        assert_eq!(request.budget, 1000.0);
        assert_eq!(request.duration_days, 3);
        assert_eq!(
            matches.get_one::<PathBuf>("output").unwrap(),
            &PathBuf::from("itinerary.ics")
        );
    }

    #[test]
    fn test_minimums_are_enforced() {
        let base = ["trip-planner", "-c", "Vienna", "-s", "2025-12-20", "-e", "2025-12-23"];
        let mut zero_days = base.to_vec();
        zero_days.extend(["--duration", "0"]);
        assert!(command().try_get_matches_from(zero_days).is_err());

        let mut negative_budget = base.to_vec();
        negative_budget.extend(["--budget=-5"]);
        assert!(command().try_get_matches_from(negative_budget).is_err());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        std::env::remove_var(crate::config::API_KEY_ENV);
        let matches = parse(&["-c", "Vienna", "-s", "2025-12-20", "-e", "2025-12-23"]);

        let err = resolve_config(&matches).unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("API key not found"));
    }

    #[test]
    fn test_flags_override_config() {
        let matches = parse(&[
            "-c",
            "Vienna",
            "-s",
            "2025-12-20",
            "-e",
            "2025-12-23",
            "--api-key",
            "flag-key",
            "--model",
            "gemini-1.5-pro",
            "--currency",
            "EUR",
            "--timeout",
            "30",
        ]);
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.api_key(), "flag-key");
        assert_eq!(config.model(), "gemini-1.5-pro");
        assert_eq!(config.currency(), "EUR");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
