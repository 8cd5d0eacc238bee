mod account;
mod bunker;
mod convert;
mod demo;
mod history;
mod market;
mod prices;

use oilprice_core::{
    ClassifiedError, DemoGateway, Envelope, EnvelopeError, GatewayConfig, PriceApiGateway,
};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Failed API call: no data, one structured error.
    pub fn api_error(error: &ClassifiedError) -> Self {
        Self::ok(Value::Null).with_errors(vec![EnvelopeError::from(error)])
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let mut metadata = Metadata::start();
    debug!(request_id = %metadata.request_id(), "running command");

    let command_result = match &cli.command {
        Command::Convert(args) => convert::run(args)?,
        Command::Latest(args) if api_key(cli).is_none() => {
            demo::latest_without_key(args, &demo_gateway(cli)?).await?
        }
        Command::Latest(args) => prices::latest(args, &gateway(cli)?).await?,
        Command::Prices(args) => prices::many(args, &gateway(cli)?).await?,
        Command::All => prices::all(&gateway(cli)?).await?,
        Command::History(args) => history::run(args, &gateway(cli)?).await?,
        Command::Tier => account::tier(&gateway(cli)?).await?,
        Command::Check => account::check(&gateway(cli)?).await?,
        Command::Bunker(args) => bunker::run(args, &gateway(cli)?).await?,
        Command::Codes => market::codes(&gateway(cli)?).await?,
        Command::Futures(args) => market::futures(args, &gateway(cli)?).await?,
        Command::Diesel(args) => market::diesel(args, &gateway(cli)?).await?,
        Command::Usage => market::usage(&gateway(cli)?).await?,
        Command::Demo(args) => demo::run(args, &demo_gateway(cli)?).await?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta()?;
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn api_key(cli: &Cli) -> Option<&str> {
    cli.api_key.as_deref().filter(|key| !key.trim().is_empty())
}

/// Environment config overlaid with CLI flags.
fn config(cli: &Cli) -> Result<GatewayConfig, CliError> {
    let mut config = GatewayConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    if cli.timeout_ms.is_some() {
        config = config.with_timeout_ms(cli.timeout_ms);
    }
    Ok(config)
}

fn gateway(cli: &Cli) -> Result<PriceApiGateway, CliError> {
    let api_key = api_key(cli).ok_or(CliError::MissingApiKey)?;
    PriceApiGateway::with_config(api_key, config(cli)?).map_err(CliError::from)
}

fn demo_gateway(cli: &Cli) -> Result<DemoGateway, CliError> {
    Ok(DemoGateway::with_config(config(cli)?))
}
