use crate::notice::Notice;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinanceBuddyError {
    #[error("Invalid file type: {0}. Only .csv files are accepted")]
    InvalidFileType(String),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Usage limit reached")]
    UsageLimitReached,

    #[error("Backend returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Stream read error: {0}")]
    Stream(String),

    #[error("No chat request is awaiting a reply")]
    NotSending,

    #[error("Configuration error: {0}")]
    Config(String),

    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FinanceBuddyError {
    /// The transient message a front end shows for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            Self::InvalidFileType(_) => Notice::error("Invalid file type", "Please upload a CSV file."),
            Self::CsvParse(e) => Notice::error("Error parsing file", e.to_string()),
            Self::IoError(e) => Notice::error("Error parsing file", e.to_string()),
            Self::RateLimited => {
                Notice::error("Rate limit exceeded", "Please wait a moment and try again.")
            }
            Self::UsageLimitReached => Notice::error(
                "Usage limit reached",
                "Please add credits to continue using AI features.",
            ),
            Self::Upstream { message, .. } => Notice::error("Error", message.clone()),
            other => Notice::error("Error", other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinanceBuddyError>;
