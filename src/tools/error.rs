//! Error handling for tools
//!
//! Every tool returns [`ToolError`] on failure. The catalog renders it with
//! [`format_error_for_llm`] so the agent always receives the same JSON shape:
//! the plain-text message under `error`, plus a category, a code, whether a
//! retry can help, and optional suggestions.
//!
//! ```ignore
//! let payload = format_error_for_llm(
//!     "get_project",
//!     ErrorCategory::ResourceUnavailable,
//!     "Project not found",
//!     Some(vec!["Use list_projects to find valid project IDs"]),
//! );
//! ```

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;

use crate::platform::api::PlatformApiError;
use crate::platform::assembler::AssembleError;

/// Error categories for tool errors
///
/// These categories help the agent understand what kind of error occurred
/// and how to potentially recover from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Token missing, invalid, or lacking access
    PermissionDenied,
    /// Input validation failed
    ValidationFailed,
    /// Serialization/deserialization error
    SerializationError,
    /// Network or connection error
    NetworkError,
    /// Resource not found or temporarily unavailable
    ResourceUnavailable,
    /// The platform rejected the request or failed
    UpstreamFailed,
    /// No tool with the requested name
    UnknownTool,
}

impl ErrorCategory {
    /// Returns whether this error is potentially recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed | Self::NetworkError | Self::ResourceUnavailable
        )
    }

    /// Returns the error code string for this category
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::SerializationError => "SERIALIZATION_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ResourceUnavailable => "RESOURCE_UNAVAILABLE",
            Self::UpstreamFailed => "UPSTREAM_FAILED",
            Self::UnknownTool => "UNKNOWN_TOOL",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors a tool call can end with
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Api(#[from] PlatformApiError),

    #[error("{0}")]
    Validation(String),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolError::Validation(_) => ErrorCategory::ValidationFailed,
            ToolError::Serialization(_) => ErrorCategory::SerializationError,
            ToolError::Api(e) => match e {
                PlatformApiError::Unauthorized(_) | PlatformApiError::PermissionDenied(_) => {
                    ErrorCategory::PermissionDenied
                }
                PlatformApiError::NotFound(_) | PlatformApiError::RateLimited(_) => {
                    ErrorCategory::ResourceUnavailable
                }
                PlatformApiError::HttpError(_) => ErrorCategory::NetworkError,
                PlatformApiError::ParseError(_)
                | PlatformApiError::ServerError { .. }
                | PlatformApiError::ApiError { .. } => ErrorCategory::UpstreamFailed,
            },
        }
    }

    /// Recovery hints for the agent
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            ToolError::Validation(_) => vec!["Check the tool's input schema and retry"],
            ToolError::Serialization(_) => Vec::new(),
            ToolError::Api(e) => match e {
                PlatformApiError::Unauthorized(_) => vec![
                    "LUNCURKAN_TOKEN is missing, expired or revoked",
                    "Generate a new token at https://console.luncurkan.dev/profile/api-tokens",
                ],
                PlatformApiError::PermissionDenied(_) => {
                    vec!["The token's user does not have access to this resource"]
                }
                PlatformApiError::NotFound(_) => vec![
                    "The ID may be incorrect",
                    "Use the matching list_* tool to find valid IDs",
                ],
                PlatformApiError::RateLimited(_) => vec!["Wait a moment before retrying"],
                PlatformApiError::HttpError(_) => vec![
                    "Check network connectivity",
                    "The Luncurkan API may be temporarily unavailable",
                ],
                PlatformApiError::ServerError { .. } => {
                    vec!["The Luncurkan API is experiencing issues", "Try again later"]
                }
                PlatformApiError::ParseError(_) | PlatformApiError::ApiError { .. } => {
                    Vec::new()
                }
            },
        }
    }
}

impl From<AssembleError> for ToolError {
    fn from(error: AssembleError) -> Self {
        match error {
            AssembleError::Api(e) => ToolError::Api(e),
            other @ AssembleError::InvalidResources { .. } => {
                ToolError::Validation(other.to_string())
            }
        }
    }
}

/// Format an error for the agent
///
/// # Arguments
///
/// * `tool_name` - Name of the tool that produced the error
/// * `category` - The error category
/// * `message` - Human-readable error message
/// * `suggestions` - Optional list of suggestions for recovery
pub fn format_error_for_llm(
    tool_name: &str,
    category: ErrorCategory,
    message: &str,
    suggestions: Option<Vec<&str>>,
) -> Value {
    let mut error_obj = json!({
        "error": message,
        "tool": tool_name,
        "category": category,
        "code": category.code(),
        "recoverable": category.is_recoverable(),
    });

    if let Some(suggs) = suggestions {
        if !suggs.is_empty() {
            error_obj["suggestions"] = json!(suggs);
        }
    }

    error_obj
}

/// Render a [`ToolError`] raised by `tool_name`
pub fn format_tool_error(tool_name: &str, error: &ToolError) -> Value {
    format_error_for_llm(
        tool_name,
        error.category(),
        &error.to_string(),
        Some(error.suggestions()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_is_the_plain_message() {
        let error = ToolError::Api(PlatformApiError::from_status(
            404,
            "Project not found".to_string(),
        ));
        let payload = format_tool_error("get_project", &error);

        assert_eq!(payload["error"], "Project not found");
        assert_eq!(payload["tool"], "get_project");
        assert_eq!(payload["code"], "RESOURCE_UNAVAILABLE");
        assert_eq!(payload["category"], "resource_unavailable");
        assert_eq!(payload["recoverable"], true);
        assert!(payload["suggestions"].is_array());
    }

    #[test]
    fn test_status_message_passes_through() {
        let error = ToolError::Api(PlatformApiError::from_status(502, "HTTP 502".to_string()));
        let payload = format_tool_error("list_projects", &error);
        assert_eq!(payload["error"], "HTTP 502");
        assert_eq!(payload["code"], "UPSTREAM_FAILED");
        assert_eq!(payload["recoverable"], false);
    }

    #[test]
    fn test_unauthorized_is_permission_denied() {
        let error = ToolError::Api(PlatformApiError::from_status(401, "Invalid token".to_string()));
        assert_eq!(error.category(), ErrorCategory::PermissionDenied);
        assert!(
            error
                .suggestions()
                .iter()
                .any(|s| s.contains("console.luncurkan.dev"))
        );
    }

    #[test]
    fn test_empty_suggestions_are_omitted() {
        let payload = format_error_for_llm("x", ErrorCategory::UnknownTool, "Unknown tool: x", None);
        assert!(payload.get("suggestions").is_none());

        let payload =
            format_error_for_llm("x", ErrorCategory::UnknownTool, "Unknown tool: x", Some(vec![]));
        assert!(payload.get("suggestions").is_none());
    }

    #[test]
    fn test_invalid_resources_become_validation_errors() {
        let error: ToolError = AssembleError::InvalidResources { cpu: 0, memory: 0 }.into();
        assert_eq!(error.category(), ErrorCategory::ValidationFailed);
        assert!(error.to_string().contains("positive"));
    }

    #[test]
    fn test_category_codes() {
        assert_eq!(ErrorCategory::ValidationFailed.code(), "VALIDATION_FAILED");
        assert_eq!(ErrorCategory::NetworkError.to_string(), "NETWORK_ERROR");
        assert!(ErrorCategory::NetworkError.is_recoverable());
        assert!(!ErrorCategory::PermissionDenied.is_recoverable());
    }
}
