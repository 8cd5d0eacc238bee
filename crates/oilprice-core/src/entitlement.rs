//! Plan entitlement checks for gated history and futures endpoints.
//!
//! History requests are rate-limited per commodity, so the gateway resolves
//! the caller's tier first and refuses locally when the plan lacks access.
//! Futures follow the same rule.

use crate::classify::ClassifiedError;
use crate::domain::{PlanTier, UserTier};

pub const HISTORICAL_UPGRADE_MESSAGE: &str = "Historical data requires Exploration tier or higher";
pub const FUTURES_UPGRADE_MESSAGE: &str = "Futures data requires Reservoir Mastery tier";

/// History window offered by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPeriod {
    PastYear,
    PastMonth,
}

impl HistoryPeriod {
    pub const fn path(self) -> &'static str {
        match self {
            Self::PastYear => "/prices/past_year",
            Self::PastMonth => "/prices/past_month",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PastYear => "past_year",
            Self::PastMonth => "past_month",
        }
    }
}

/// Progress of a gated history fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryStage {
    CheckingEntitlement,
    Fetching,
    Done,
}

impl HistoryStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CheckingEntitlement => "checking_entitlement",
            Self::Fetching => "fetching",
            Self::Done => "done",
        }
    }
}

/// Cheapest plan that unlocks historical data.
pub const fn minimum_historical_plan() -> PlanTier {
    PlanTier::Exploration
}

pub const fn minimum_futures_plan() -> PlanTier {
    PlanTier::ReservoirMastery
}

/// Fails with `UpgradeRequired` unless the tier may read history.
pub fn ensure_historical_access(tier: &UserTier) -> Result<(), ClassifiedError> {
    if tier.can_access_historical {
        return Ok(());
    }
    Err(refusal(HISTORICAL_UPGRADE_MESSAGE, minimum_historical_plan()))
}

/// Fails with `UpgradeRequired` unless the tier may read futures.
pub fn ensure_futures_access(tier: &UserTier) -> Result<(), ClassifiedError> {
    if tier.can_access_futures {
        return Ok(());
    }
    Err(refusal(FUTURES_UPGRADE_MESSAGE, minimum_futures_plan()))
}

fn refusal(message: &str, plan: PlanTier) -> ClassifiedError {
    ClassifiedError::upgrade_required(message, Some(String::from(plan.as_str())))
}
