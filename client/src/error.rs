//! Error types for backend communication
//!
//! Every failure an operation can hit is a [`ClientError`]. None of them
//! escape an operation: queries and uploads turn them into transcript
//! entries, roster refreshes turn them into a log line.

use thiserror::Error;

/// Errors that can occur while talking to the Medify backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request could not be sent or the response body could not be read
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON, or not the expected JSON
    #[error("Invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The file selected for upload could not be read
    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),

    /// The response was valid JSON but its shape is unusable
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}
