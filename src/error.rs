//! Error types for the Serviq client core.

use crate::booking::model::BookingStatus;

/// Top-level error type for the client core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Local store failures.
///
/// These never escape the store facade — every read falls back to a
/// defined default and every write reports success as a bool.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to open store: {0}")]
    Open(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Store serialization failed: {0}")]
    Serialization(String),
}

/// Remote gateway failures, classified by what came back.
///
/// The three buckets are preserved all the way into the upload pipeline
/// and the onboarding workflow so callers can pick distinct messaging and
/// retry policy per bucket.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A response arrived and it carried an error.
    #[error("Server rejected request with status {status}: {message}")]
    ServerRejected { status: u16, message: String },

    /// The request went out but nothing usable came back.
    #[error("No response from server: {0}")]
    NoResponse(String),

    /// The request could not even be constructed.
    #[error("Request setup failed: {0}")]
    SetupFailed(String),
}

/// Media upload failures.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Preflight found no network, or the submit never reached the host.
    #[error("No network connectivity")]
    NoConnectivity,

    /// The upload ran past its deadline and was abandoned.
    #[error("Upload timed out")]
    Timeout,

    /// The hosting endpoint answered with an error.
    #[error("Upload rejected by host: {message}")]
    Rejected { message: String },

    /// Anything else: unreadable local file, malformed response body.
    #[error("Upload failed: {0}")]
    Failed(String),
}

/// Session and role errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Account is not eligible for the provider role")]
    RoleNotEligible,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),
}

/// Illegal booking status changes. These fail loudly — never clamped.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("No forward transition from status {from}")]
    InvalidTransition { from: BookingStatus },

    #[error("Booking is already terminal ({status})")]
    TerminalState { status: BookingStatus },

    #[error("Actor {actor} may not perform this transition")]
    NotPermitted { actor: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// A single invalid field reported by step validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Provider onboarding errors.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Step validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Draft was already submitted")]
    AlreadySubmitted,

    #[error("Submission failed: {0}")]
    Submit(#[from] TransportError),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for the client core.
pub type Result<T> = std::result::Result<T, Error>;
