//! CLI argument definitions for `oilprice`.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `latest` | Latest price for one commodity (demo endpoint when no key is set) |
//! | `prices` | Latest prices for several commodities, skipping failures |
//! | `all` | Every latest price the account can see |
//! | `history` | Plan-gated past year or month of prices |
//! | `convert` | Offline energy-unit price conversion |
//! | `tier` | Account plan, usage and feature access |
//! | `check` | Connection and API key check |
//! | `bunker` | Marine fuel prices from the data connector |
//! | `codes` | Commodity catalog |
//! | `futures` | Futures settlement or forward curve (Reservoir Mastery) |
//! | `diesel` | Retail diesel price for a US state |
//! | `usage` | Requests used this month |
//! | `demo` | Keyless demo codes and prices |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--api-key` | `$OILPRICE_API_KEY` | API key |
//! | `--base-url` | `$OILPRICE_API_BASE_URL` or the public API | API base URL |
//! | `--timeout-ms` | `$OILPRICE_TIMEOUT_MS` or unset | Request timeout in ms |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! oilprice latest BRENT_CRUDE_USD
//! oilprice prices BRENT_CRUDE_USD WTI_USD NATURAL_GAS_USD --pretty
//! oilprice history BRENT_CRUDE_USD --period month --average-days 7
//! oilprice convert 85.5 --from barrel --to MBtu --commodity BRENT_CRUDE_OIL
//! oilprice futures ice-brent --curve
//! oilprice demo WTI_USD
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// OilPrice - commodity prices and energy-unit conversion
#[derive(Debug, Parser)]
#[command(
    name = "oilprice",
    author,
    version,
    about = "Commodity price API client and energy-unit converter"
)]
pub struct Cli {
    /// API key sent as `Authorization: Token <key>`.
    #[arg(long, global = true, env = "OILPRICE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the API base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the latest price for a commodity code.
    ///
    ///   oilprice latest BRENT_CRUDE_USD
    Latest(LatestArgs),

    /// Fetch latest prices for several codes concurrently.
    ///
    /// Codes that fail are reported as warnings and left out.
    Prices(PricesArgs),

    /// Fetch every latest price.
    All,

    /// Fetch price history (Exploration plan or higher).
    History(HistoryArgs),

    /// Convert a price between energy units without calling the API.
    Convert(ConvertArgs),

    /// Show the account plan and feature access.
    Tier,

    /// Check that the API is reachable with the configured key.
    Check,

    /// Fetch marine fuel (bunker) prices from the data connector.
    Bunker(BunkerArgs),

    /// List every commodity code with its name and category.
    Codes,

    /// Fetch a futures settlement or curve (Reservoir Mastery plan).
    ///
    ///   oilprice futures ice-brent --curve
    Futures(FuturesArgs),

    /// Fetch the retail diesel price for a US state.
    Diesel(DieselArgs),

    /// Show requests used against this month's quota.
    Usage,

    /// List demo codes, or fetch one without an API key.
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
pub struct LatestArgs {
    /// Commodity code (e.g., BRENT_CRUDE_USD).
    pub code: String,
}

#[derive(Debug, Args)]
pub struct PricesArgs {
    /// One or more commodity codes.
    #[arg(required = true, num_args = 1..)]
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    Year,
    Month,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Commodity code.
    pub code: String,

    #[arg(long, value_enum, default_value_t = Period::Year)]
    pub period: Period,

    /// Keep entries on or after this date (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<String>,

    /// Keep entries on or before this date (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<String>,

    /// Report the mean of the trailing N entries.
    #[arg(long)]
    pub average_days: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Price in the source unit.
    pub price: f64,

    /// Source unit: barrel, Mcf, tonne, MBtu, therm, MWh.
    #[arg(long = "from")]
    pub from_unit: String,

    /// Target unit.
    #[arg(long = "to", default_value = "MBtu")]
    pub to_unit: String,

    /// Commodity type whose standard heat content to use (e.g., BRENT_CRUDE_OIL).
    #[arg(long, conflicts_with = "heat_content")]
    pub commodity: Option<String>,

    /// Heat content in MMBtu per unit (default 5.8).
    #[arg(long)]
    pub heat_content: Option<f64>,
}

#[derive(Debug, Args)]
pub struct FuturesArgs {
    /// Contract slug (e.g., ice-brent, ice-wti, natural-gas).
    pub contract: String,

    /// Fetch the forward curve instead of the front settlement.
    #[arg(long, default_value_t = false)]
    pub curve: bool,
}

#[derive(Debug, Args)]
pub struct DieselArgs {
    /// Two-letter state code (e.g., CA, TX).
    pub state: String,
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Demo commodity code; omit to list the demo codes.
    pub code: Option<String>,
}

#[derive(Debug, Args)]
pub struct BunkerArgs {
    /// Fuel grade (e.g., VLSFO, MGO).
    #[arg(long)]
    pub fuel_type: Option<String>,

    #[arg(long)]
    pub port: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    /// Only records at or after this ISO-8601 timestamp.
    #[arg(long)]
    pub since: Option<String>,
}
