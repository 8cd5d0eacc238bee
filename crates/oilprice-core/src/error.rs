use thiserror::Error;

/// Validation and contract errors exposed by `oilprice-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Caller supplied an argument that breaks an operation's precondition.
    #[error("{0}")]
    InvalidArgument(&'static str),

    #[error("unknown commodity type: {value}")]
    UnknownCommodity { value: String },
    #[error("unknown unit '{value}', expected one of barrel, Mcf, tonne, MBtu, therm, MWh")]
    UnknownUnit { value: String },
    #[error("unknown plan '{value}', expected one of free, exploration, production, reservoir_mastery")]
    UnknownPlan { value: String },

    #[error("commodity code cannot be empty")]
    EmptyCommodityCode,
    #[error("commodity code length {len} exceeds max {max}")]
    CommodityCodeTooLong { len: usize, max: usize },
    #[error("commodity code must start with an ASCII letter: '{ch}'")]
    CommodityCodeInvalidStart { ch: char },
    #[error("commodity code contains invalid character '{ch}' at index {index}")]
    CommodityCodeInvalidChar { ch: char, index: usize },

    #[error("futures contract cannot be empty")]
    EmptyContractCode,
    #[error("futures contract length {len} exceeds max {max}")]
    ContractCodeTooLong { len: usize, max: usize },
    #[error("futures contract contains invalid character '{ch}' at index {index}")]
    ContractCodeInvalidChar { ch: char, index: usize },

    #[error("state must be a two-letter US state code: '{value}'")]
    InvalidStateCode { value: String },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] crate::classify::ClassifiedError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
