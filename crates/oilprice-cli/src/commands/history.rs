use oilprice_core::{CommodityCode, HistoricalSeries, HistoryPeriod, PriceApiGateway};
use serde::Serialize;

use crate::cli::{HistoryArgs, Period};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct HistoryResponseData {
    period: &'static str,
    series: HistoricalSeries,
    summary: HistorySummary,
}

#[derive(Debug, Serialize, PartialEq)]
struct HistorySummary {
    entries: usize,
    min: Option<f64>,
    max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    average_days: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    average: Option<f64>,
}

pub async fn run(args: &HistoryArgs, gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    let code = CommodityCode::parse(&args.code)?;
    let period = match args.period {
        Period::Year => HistoryPeriod::PastYear,
        Period::Month => HistoryPeriod::PastMonth,
    };

    let points = match gateway.get_history(&code, period).await {
        Ok(points) => points,
        Err(error) => return Ok(CommandResult::api_error(&error)),
    };

    let series = HistoricalSeries::from_points(code, &points)?;
    let series = narrow(series, args.from.as_deref(), args.to.as_deref())?;
    let summary = summarize(&series, args.average_days);

    let data = serde_json::to_value(HistoryResponseData {
        period: period.as_str(),
        series,
        summary,
    })?;
    Ok(CommandResult::ok(data))
}

/// Applies `--from`/`--to`; an open end takes the series' own bound.
fn narrow(
    series: HistoricalSeries,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<HistoricalSeries, CliError> {
    if from.is_none() && to.is_none() {
        return Ok(series);
    }

    let start = from.unwrap_or("0000-01-01");
    let end = to.unwrap_or("9999-12-31");
    series.within(start, end).map_err(CliError::from)
}

fn summarize(series: &HistoricalSeries, average_days: Option<usize>) -> HistorySummary {
    HistorySummary {
        entries: series.len(),
        min: series.min(),
        max: series.max(),
        average_days,
        average: average_days.and_then(|days| series.average_last(days)),
    }
}
