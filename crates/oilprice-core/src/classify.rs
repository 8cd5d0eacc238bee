//! Classification of API failures into a closed error taxonomy.
//!
//! Every non-success response, transport failure or undecodable body is
//! turned into exactly one [`ClassifiedError`] carrying a machine-readable
//! [`ErrorKind`], a user-facing message and an optional recovery hint.
//!
//! | Status | Kind |
//! |--------|------|
//! | 401 | [`ErrorKind::Authentication`] |
//! | 403 with upgrade flag | [`ErrorKind::UpgradeRequired`] |
//! | 403 | [`ErrorKind::Authorization`] |
//! | 404 | [`ErrorKind::NotFound`] |
//! | 429 | [`ErrorKind::RateLimit`] |
//! | 500, 502, 503 | [`ErrorKind::ServerError`] |
//! | other non-2xx | [`ErrorKind::Unknown`] |
//! | no response | [`ErrorKind::NetworkError`] |
//! | bad 2xx body | [`ErrorKind::MalformedResponse`] |

use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::http_client::{HttpError, HttpResponse};

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Authentication,
    Authorization,
    UpgradeRequired,
    NotFound,
    RateLimit,
    ServerError,
    NetworkError,
    #[serde(rename = "INVALID_RESPONSE")]
    MalformedResponse,
    Unknown,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::UpgradeRequired => "UPGRADE_REQUIRED",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimit => "RATE_LIMIT",
            Self::ServerError => "SERVER_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::MalformedResponse => "INVALID_RESPONSE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Kinds where repeating the same call later can succeed.
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::RateLimit | Self::ServerError | Self::NetworkError)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API endpoint family a response came from; a few statuses read
/// differently depending on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEndpoint {
    LatestPrice,
    AllPrices,
    History,
    UserTier,
    DataConnector,
    Catalog,
    Futures,
    Diesel,
    Usage,
    Demo,
}

/// Fully classified API or transport failure.
///
/// Only the gateway builds these; outside the crate they are read, never made:
///
/// ```compile_fail
/// use oilprice_core::{ClassifiedError, HttpError};
///
/// let _ = ClassifiedError::network(&HttpError::new("connection refused"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    kind: ErrorKind,
    http_status: Option<u16>,
    user_message: String,
    recovery_hint: Option<String>,
    recommended_plan: Option<String>,
}

impl ClassifiedError {
    fn new(
        kind: ErrorKind,
        http_status: Option<u16>,
        user_message: impl Into<String>,
        recovery_hint: Option<String>,
    ) -> Self {
        Self {
            kind,
            http_status,
            user_message: user_message.into(),
            recovery_hint,
            recommended_plan: None,
        }
    }

    /// Transport failure, no response received.
    pub(crate) fn network(error: &HttpError) -> Self {
        Self::new(
            ErrorKind::NetworkError,
            None,
            format!("Network error: {}", error.message()),
            Some(String::from("Check your internet connection and try again")),
        )
    }

    /// Success status whose body did not match the expected schema.
    pub(crate) fn malformed(status: u16, detail: impl Display) -> Self {
        Self::new(
            ErrorKind::MalformedResponse,
            Some(status),
            format!("Invalid response from API: {detail}"),
            Some(String::from(
                "Try again; contact support if the problem persists",
            )),
        )
    }

    /// Entitlement check rejected the account before any data request.
    pub(crate) fn upgrade_required(message: impl Into<String>, recommended_plan: Option<String>) -> Self {
        Self {
            recommended_plan: recommended_plan.clone(),
            ..Self::new(
                ErrorKind::UpgradeRequired,
                None,
                message,
                Some(upgrade_hint(recommended_plan.as_deref())),
            )
        }
    }

    /// Account tier lookups collapse every failure into a network error.
    pub(crate) fn tier_unavailable(cause: &ClassifiedError) -> Self {
        if cause.kind == ErrorKind::NetworkError {
            return cause.clone();
        }
        Self::new(
            ErrorKind::NetworkError,
            cause.http_status,
            format!("Network error: unable to load account tier ({})", cause.user_message),
            Some(String::from("Check your connection and API key, then try again")),
        )
    }

    /// Code outside the keyless demo set; no request was made.
    pub(crate) fn demo_unavailable(code: &str) -> Self {
        Self::new(
            ErrorKind::Authentication,
            None,
            format!("{code} is not available without an API key"),
            Some(String::from(
                "Set an API key, or pick one of the demo commodity codes",
            )),
        )
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub const fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn recovery_hint(&self) -> Option<&str> {
        self.recovery_hint.as_deref()
    }

    pub fn recommended_plan(&self) -> Option<&str> {
        self.recommended_plan.as_deref()
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Authentication => "api.authentication",
            ErrorKind::Authorization => "api.authorization",
            ErrorKind::UpgradeRequired => "api.upgrade_required",
            ErrorKind::NotFound => "api.not_found",
            ErrorKind::RateLimit => "api.rate_limit",
            ErrorKind::ServerError => "api.server_error",
            ErrorKind::NetworkError => "api.network_error",
            ErrorKind::MalformedResponse => "api.invalid_response",
            ErrorKind::Unknown => "api.unknown",
        }
    }
}

impl Display for ClassifiedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.user_message, self.code())
    }
}

impl std::error::Error for ClassifiedError {}

/// Classifies a non-success response. `now` anchors `X-RateLimit-Reset`.
pub fn classify_response(
    response: &HttpResponse,
    endpoint: ApiEndpoint,
    now: OffsetDateTime,
) -> ClassifiedError {
    let body = ErrorBody::parse(&response.body);
    let status = response.status;
    let upstream = body
        .error
        .clone()
        .or_else(|| body.message.clone())
        .or_else(|| response.status_text().map(String::from))
        .unwrap_or_else(|| format!("status {status}"));

    match status {
        401 => ClassifiedError::new(
            ErrorKind::Authentication,
            Some(status),
            format!("Authentication failed: {upstream}"),
            Some(String::from("Update your API key in settings")),
        ),
        403 if body.upgrade_required || endpoint == ApiEndpoint::DataConnector => {
            let message = body
                .message
                .clone()
                .or_else(|| body.error.clone())
                .unwrap_or_else(|| String::from("Upgrade required"));
            ClassifiedError {
                http_status: Some(status),
                ..ClassifiedError::upgrade_required(message, body.recommended_plan)
            }
        }
        403 => ClassifiedError::new(
            ErrorKind::Authorization,
            Some(status),
            format!("Access denied: {upstream}"),
            Some(String::from(
                "Check that your API key has access to this resource",
            )),
        ),
        404 => ClassifiedError::new(
            ErrorKind::NotFound,
            Some(status),
            format!("Resource not found: {upstream}"),
            Some(String::from(
                "Check the commodity code, for example BRENT_CRUDE_USD",
            )),
        ),
        429 => {
            let message = if endpoint == ApiEndpoint::History {
                String::from(
                    "Rate limit exceeded for historical data. Historical endpoints are limited per commodity per hour",
                )
            } else {
                body.error
                    .clone()
                    .or_else(|| body.message.clone())
                    .unwrap_or_else(|| String::from("Rate limit exceeded"))
            };
            ClassifiedError::new(
                ErrorKind::RateLimit,
                Some(status),
                message,
                Some(rate_limit_hint(response, now)),
            )
        }
        500 | 502 | 503 => ClassifiedError::new(
            ErrorKind::ServerError,
            Some(status),
            format!("Server error: {upstream}"),
            Some(String::from(
                "The API is temporarily unavailable. Retry in 1 minute",
            )),
        ),
        _ => {
            let message = match body.error.as_deref().or_else(|| response.status_text()) {
                Some(reason) => format!("HTTP {status}: {reason}"),
                None => format!("HTTP {status}"),
            };
            ClassifiedError::new(ErrorKind::Unknown, Some(status), message, None)
        }
    }
}

/// Minutes until the rate limit resets, rounded up, from `Retry-After`
/// (seconds) or else `X-RateLimit-Reset` (epoch seconds).
pub fn rate_limit_wait_minutes(response: &HttpResponse, now: OffsetDateTime) -> Option<u64> {
    if let Some(seconds) = response
        .header("retry-after")
        .and_then(|value| value.trim().parse::<u64>().ok())
    {
        return Some(seconds.div_ceil(60));
    }

    response
        .header("x-ratelimit-reset")
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(|reset_at| {
            let remaining = reset_at.saturating_sub(now.unix_timestamp()).max(0) as u64;
            remaining.div_ceil(60)
        })
}

fn rate_limit_hint(response: &HttpResponse, now: OffsetDateTime) -> String {
    match rate_limit_wait_minutes(response, now) {
        Some(1) => String::from("Retry in 1 minute"),
        Some(minutes) if minutes > 0 => format!("Retry in {minutes} minutes"),
        _ => String::from("Rate limit resets soon. Retry shortly"),
    }
}

fn upgrade_hint(recommended_plan: Option<&str>) -> String {
    match recommended_plan {
        Some(plan) => format!("Upgrade your plan to {plan} at oilpriceapi.com/pricing"),
        None => String::from("Upgrade your plan at oilpriceapi.com/pricing"),
    }
}

/// Error payload fields; anything unparsable yields an empty body.
#[derive(Debug, Default)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    upgrade_required: bool,
    recommended_plan: Option<String>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };

        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        let flagged = |key: &str| object.get(key).and_then(Value::as_bool) == Some(true);

        Self {
            error: text("error"),
            message: text("message"),
            upgrade_required: flagged("upgrade_required")
                || flagged("upgradeRequired")
                || text("feature").is_some(),
            recommended_plan: text("recommended_plan").or_else(|| text("recommendedPlan")),
        }
    }
}
