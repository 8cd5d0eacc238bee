use oilprice_core::{EnvelopeError, PlanFeatures, PriceApiGateway, UserTier};
use serde::Serialize;
use serde_json::json;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct TierResponseData {
    tier: UserTier,
    plan_features: PlanFeatures,
    requests_remaining: u64,
}

pub async fn tier(gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    let tier = match gateway.get_user_tier().await {
        Ok(tier) => tier,
        Err(error) => return Ok(CommandResult::api_error(&error)),
    };

    let mut warnings = Vec::new();
    if !tier.email_confirmed {
        warnings.push(String::from(
            "email address is not confirmed; some features may be limited",
        ));
    }

    let data = serde_json::to_value(TierResponseData {
        plan_features: tier.plan.features(),
        requests_remaining: tier.requests_limit.saturating_sub(tier.requests_used),
        tier,
    })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}

pub async fn check(gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    let connected = gateway.test_connection().await;
    let result = CommandResult::ok(json!({ "connected": connected }));

    if connected {
        return Ok(result);
    }

    let error = EnvelopeError::new(
        "api.connection_failed",
        "Could not fetch a reference price with the configured API key",
    )?
    .with_hint("Run `oilprice latest BRENT_CRUDE_USD` to see the classified failure");
    Ok(result.with_errors(vec![error]))
}
