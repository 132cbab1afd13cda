//! car-price - estimate a used-car price from the command line
//!
//! ```text
//! car-price --model model.json milage=45000 car_age=3 clean_title=1 \
//!     accident_label_enc=0 fuel_type=Gasoline brand=Ford transmission=A/T \
//!     ext_col=Black int_col=Black
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use car_price_core::config::{Config, LogFormat};
use car_price_core::{
    encode, LinearRegressor, PredictError, PricePredictor, RawInput, Schema, SchemaSource,
};

#[derive(Debug, Parser)]
#[command(name = "car-price", version, about = "Estimate a used-car price from listing attributes")]
struct Cli {
    /// JSON feature-list artifact (overrides SCHEMA_PATH)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Linear model JSON (overrides MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Read the feature list from the model
    #[arg(long)]
    schema_from_model: bool,

    /// Print the encoded vector instead of predicting
    #[arg(long)]
    encode_only: bool,

    /// Machine-readable output
    #[arg(long)]
    json: bool,

    /// Request fields
    #[arg(value_name = "FIELD=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.schema {
            config.schema_path = Some(path.clone());
        }
        if let Some(path) = &self.model {
            config.model_path = Some(path.clone());
        }
        if self.schema_from_model {
            config.schema_from_model = true;
        }
    }
}

fn parse_field(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{arg}`"))
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "car_price_core=info,car_price=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> ExitCode {
    // Load configuration
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::from_env();
    cli.apply(&mut config);

    // Initialize logging
    init_tracing(config.log_format);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (message, code) = failure_report(&err, config.is_production());
            eprintln!("{message}");
            ExitCode::from(code)
        }
    }
}

/// Text and exit code for a failed run. Production hides the cause behind
/// the generic message.
fn failure_report(err: &anyhow::Error, production: bool) -> (String, u8) {
    match err.downcast_ref::<PredictError>() {
        Some(predict_err) => {
            let mut message = predict_err.user_message().to_string();
            if !production {
                message.push_str(&format!("\n  cause: {predict_err}"));
            }
            let code = if predict_err.is_input_error() { 2 } else { 3 };
            (message, code)
        }
        None => (format!("error: {err:#}"), 1),
    }
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let origin = config.schema_origin()?;

    let model = config
        .model_path
        .as_deref()
        .map(LinearRegressor::load)
        .transpose()
        .context("Failed to load model")?
        .map(Arc::new);

    let schema = match origin.list_source() {
        Some(source) => Schema::load(source),
        None => {
            let model = model.as_deref().context("schema from model requires a model")?;
            Schema::load(SchemaSource::Model(model))
        }
    }
    .context("Failed to load feature schema")?;
    let schema = Arc::new(schema);

    tracing::info!(
        environment = %config.environment,
        features = schema.len(),
        "car-price starting..."
    );
    tracing::debug!(schema = ?schema.info(), "Feature layout");

    let raw: RawInput = cli.fields.iter().cloned().collect();

    match model {
        Some(model) if !cli.encode_only => {
            let predictor = PricePredictor::new(schema, model)?;
            let prediction = predictor.predict(&raw)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                println!("Estimated price: ${:.2}", prediction.price);
            }
        }
        _ => {
            let vector = encode(&raw, &schema).map_err(PredictError::from)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&vector.to_log_entry(&schema))?);
            } else {
                for (name, value) in schema.as_ordered_list().iter().zip(vector.as_slice()) {
                    println!("{name:<48} {value}");
                }
            }
        }
    }

    Ok(())
}
