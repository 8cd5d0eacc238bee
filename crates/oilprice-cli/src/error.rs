use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] oilprice_core::ValidationError),

    #[error("API key is required: pass --api-key or set OILPRICE_API_KEY")]
    MissingApiKey,

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::MissingApiKey => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
