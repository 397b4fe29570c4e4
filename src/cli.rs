use clap::{Args, Parser, Subcommand};
use house_valuation::config::AppConfig;
use house_valuation::error::AppError;
use house_valuation::telemetry;
use house_valuation::workflows::valuation::{
    AttributeField, AttributeRecord, CountField, HttpValuationGateway,
    SubmissionController, SubmitOutcome,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "House Valuation",
    about = "Estimate a house price from its attributes using the remote valuation service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit the attribute record and print the estimate (default command)
    Estimate(EstimateArgs),
    /// Print the request body sent for the default record
    Defaults,
    /// List every attribute with its default value and accepted input
    Fields,
}

#[derive(Args, Debug, Default)]
struct EstimateArgs {
    /// Override one attribute before submitting, e.g. `--set parking=2` (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    overrides: Vec<(String, String)>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    Ok((field.trim().to_string(), value.trim().to_string()))
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Estimate(EstimateArgs::default()));

    match command {
        Command::Estimate(args) => run_estimate(args).await,
        Command::Defaults => {
            println!("{}", render_defaults()?);
            Ok(())
        }
        Command::Fields => {
            print!("{}", render_fields());
            Ok(())
        }
    }
}

async fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let gateway = Arc::new(HttpValuationGateway::from_config(&config.valuation)?);
    let controller = SubmissionController::new(gateway, config.display.clone());

    for (field, value) in &args.overrides {
        controller.set_field_raw(field, value)?;
    }

    info!(
        ?config.environment,
        endpoint = %config.valuation.endpoint,
        overrides = args.overrides.len(),
        "requesting valuation"
    );

    match controller.submit().await {
        SubmitOutcome::Succeeded(text) => {
            println!("{text}");
            Ok(())
        }
        SubmitOutcome::Failed(text) => Err(AppError::Submission(text)),
        SubmitOutcome::AlreadyPending => Err(AppError::Submission(
            "a valuation request is already in progress".to_string(),
        )),
    }
}

fn render_defaults() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&AttributeRecord::default())
}

fn accepted_input(field: AttributeField) -> &'static str {
    match field {
        AttributeField::Area => "number > 0",
        AttributeField::Count(CountField::Parking) => "integer, clamped to 0..=10",
        AttributeField::Count(_) => "integer >= 0",
        AttributeField::Feature(_) => "yes | no",
        AttributeField::FurnishingStatus => "unfurnished | semi-furnished | furnished",
    }
}

fn render_fields() -> String {
    let record = AttributeRecord::default();
    let mut table = format!("{:<18} {:<16} accepts\n", "field", "default");
    for field in AttributeField::ALL {
        table.push_str(&format!(
            "{:<18} {:<16} {}\n",
            field.as_str(),
            record.display_value(field),
            accepted_input(field)
        ));
    }
    table
}
