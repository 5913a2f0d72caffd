use crate::{
    format_inr, AiProvider, CostCategory, EstimateSource, Estimator, EstimatorConfig,
    SourcedEstimate, TripRequest,
};
use anyhow::{anyhow, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    Command::new("tirtha-estimate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Estimate the cost of a temple trip in India")
        .arg(
            Arg::new("from")
                .long("from")
                .value_name("PLACE")
                .help("Where the trip starts")
                .required(true),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_name("TEMPLE")
                .help("Temple or town to visit")
                .required(true),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Travel mode: flight, train or car")
                .default_value("flight"),
        )
        .arg(
            Arg::new("days")
                .short('d')
                .long("days")
                .value_name("DAYS")
                .help("Trip duration in days")
                .default_value("3"),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("DATE")
                .help("Planned travel date"),
        )
        .arg(
            Arg::new("travelers")
                .short('n')
                .long("travelers")
                .value_name("COUNT")
                .help("Number of travelers")
                .default_value("2"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("LEVEL")
                .help("Budget level: budget, medium or luxury")
                .default_value("medium"),
        )
        .arg(
            Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("PROVIDER")
                .help("AI provider: openai, anthropic, cohere or mistral (or set AI_PROVIDER)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key for the provider (or set AI_API_KEY)"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("MODEL")
                .help("Model override (or set AI_MODEL)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Provider base URL override (or set AI_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds (or set AI_TIMEOUT_SECS)"),
        )
        .arg(
            Arg::new("max-retries")
                .long("max-retries")
                .value_name("COUNT")
                .help("Retries on rate limits and server errors (or set AI_MAX_RETRIES)"),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .action(ArgAction::SetTrue)
                .help("Skip the AI provider and use the fixed formula"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the estimate as JSON"),
        )
}

/// CLI entry point for the tirtha-estimate tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    let request = trip_request(&matches);
    request.validate()?;

    let estimator = if matches.get_flag("offline") {
        Estimator::deterministic()
    } else {
        Estimator::new(estimator_config(&matches)?)?
    };

    info!(
        from = %request.origin,
        to = %request.destination,
        remote = estimator.is_remote_enabled(),
        "estimating trip cost"
    );

    let outcome = estimator.estimate_with_source(&request).await;
    if let EstimateSource::Fallback { reason } = &outcome.source {
        warn!("AI estimate unavailable, showing fallback figures: {}", reason);
    }

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    } else {
        print!("{}", render(&request, &outcome));
    }

    Ok(())
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.get_one::<String>(name).map(String::as_str)
}

fn trip_request(matches: &ArgMatches) -> TripRequest {
    let count = |name: &str| {
        arg(matches, name)
            .map(|raw| crate::types::parse_count(&serde_json::Value::String(raw.to_string())))
            .unwrap_or(1)
    };

    TripRequest::new(
        arg(matches, "from").unwrap_or_default(),
        arg(matches, "to").unwrap_or_default(),
    )
    .with_travel_mode(arg(matches, "mode").unwrap_or_default())
    .with_duration_days(count("days"))
    .with_traveler_count(count("travelers"))
    .with_budget_level(arg(matches, "budget").unwrap_or_default())
    .with_travel_date(arg(matches, "date").unwrap_or_default())
}

/// Environment first, flags on top.
fn estimator_config(matches: &ArgMatches) -> anyhow::Result<EstimatorConfig> {
    let mut config = EstimatorConfig::from_env().context("reading AI_* environment")?;

    if let Some(provider) = arg(matches, "provider") {
        config.provider = provider.parse::<AiProvider>()?;
    }
    if let Some(api_key) = arg(matches, "api-key") {
        config.api_key = Some(api_key.to_string());
    }
    if let Some(model) = arg(matches, "model") {
        config.model = Some(model.to_string());
    }
    if let Some(base_url) = arg(matches, "base-url") {
        config.base_url = Some(base_url.to_string());
    }
    if let Some(timeout) = arg(matches, "timeout") {
        let secs: u64 = timeout
            .parse()
            .map_err(|_| anyhow!("--timeout must be a whole number of seconds"))?;
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(retries) = arg(matches, "max-retries") {
        config.max_retries = retries
            .parse()
            .map_err(|_| anyhow!("--max-retries must be a whole number"))?;
    }

    Ok(config)
}

fn render(request: &TripRequest, outcome: &SourcedEstimate) -> String {
    let mut out = String::new();
    let heading = match &outcome.source {
        EstimateSource::Remote { provider } => format!("AI-Powered Cost Breakdown ({provider})"),
        _ => "Estimated Cost Breakdown".to_string(),
    };

    out.push_str(&format!(
        "{heading}\n{} -> {}, {} traveler(s), {} day(s), {} by {}\n\n",
        request.origin,
        request.destination,
        request.travelers(),
        request.days(),
        request.budget_level,
        request.travel_mode,
    ));

    let breakdown = outcome.result.breakdown();
    for category in CostCategory::ALL {
        let label = if category == CostCategory::Accommodation {
            format!("{} ({} days)", category.label(), request.days())
        } else {
            category.label().to_string()
        };
        out.push_str(&format!(
            "  {:<28} {:>12}\n",
            label,
            format_inr(breakdown.get(category))
        ));
    }

    out.push_str(&format!(
        "  {:<28} {:>12}\n",
        "Total Estimated Cost",
        format_inr(outcome.result.total())
    ));

    out.push_str("\nTips:\n");
    for tip in outcome.result.tips() {
        out.push_str(&format!("  - {tip}\n"));
    }

    out
}
