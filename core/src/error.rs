//! # Error Handling
//!
//! Provides the unified `AppError` enum used by the loading surfaces of the workspace.
//!
//! The request compiler itself never returns errors: malformed inputs are skipped.
//! Errors only occur while reading documents and configuration.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// JSON (de)serialization failure.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// YAML (de)serialization failure.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// XML writer failure.
    /// Not converted from `String` to avoid conflict with General.
    #[from(ignore)]
    #[display("XML Error: {_0}")]
    Xml(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
