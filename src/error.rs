use rmcp::Error as McpError;
use rmcp::model::ErrorCode;
use thiserror::Error;

use crate::ads_api::ApiError;

/// Result alias used throughout the dispatch pipeline
pub type Result<T> = std::result::Result<T, Error>;

// Error taxonomy for a single tool invocation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Failed to {context}: {message}")]
    ExternalCall { context: String, message: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field:  field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn external(context: impl Into<String>, source: &ApiError) -> Self {
        Self::ExternalCall {
            context: context.into(),
            message: source.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON handling failed: {err}"))
    }
}

// Conversion to McpError for API boundaries
impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        match err {
            Error::UnknownTool(_) => {
                McpError::new(ErrorCode::METHOD_NOT_FOUND, err.to_string(), None)
            }
            Error::Validation { .. }
            | Error::NotFound { .. }
            | Error::ExternalCall { .. }
            | Error::Configuration(_)
            | Error::Internal(_) => McpError::internal_error(err.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_maps_to_method_not_found() {
        let mcp: McpError = Error::UnknownTool("nope".to_string()).into();
        assert_eq!(mcp.code.0, -32601);
        assert!(mcp.message.contains("nope"));
    }

    #[test]
    fn test_validation_maps_to_internal_error_with_field() {
        let mcp: McpError = Error::validation("campaignId", "is required").into();
        assert_eq!(mcp.code.0, -32603);
        assert_eq!(mcp.message, "Invalid argument 'campaignId': is required");
    }

    #[test]
    fn test_external_call_carries_context_and_message() {
        let api = ApiError::Status {
            status:  400,
            message: "bad query".to_string(),
        };
        let err = Error::external("list campaigns", &api);
        assert_eq!(
            err.to_string(),
            "Failed to list campaigns: Google Ads API returned HTTP 400: bad query"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("Ad group", "42");
        assert_eq!(err.to_string(), "Ad group not found: 42");
    }
}
