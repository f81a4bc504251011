//! JSON-RPC error types for the tool boundary

use thiserror::Error;

use super::jsonrpc::JsonRpcError;
use crate::domain::DomainError;

/// JSON-RPC 2.0 error codes used by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }
}

/// Error returned to the client in place of a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("MCP error {}: {message}", code.code())]
pub struct McpError {
    pub code: ErrorCode,
    pub message: String,
}

impl McpError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MethodNotFound, message)
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Convert a domain error, prefixing internal failures with what was being done
    pub fn from_domain(context: &str, err: DomainError) -> Self {
        let error = Self::from(err);

        match error.code {
            ErrorCode::InternalError => Self::internal(format!("{}: {}", context, error.message)),
            _ => error,
        }
    }
}

impl From<DomainError> for McpError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotInitialized => Self::invalid_request(err.to_string()),
            DomainError::InvalidInput { message } => Self::invalid_params(message),
            DomainError::Configuration { message } => Self::invalid_params(message),
            DomainError::DimensionMismatch { .. }
            | DomainError::Provider { .. }
            | DomainError::Internal { .. } => Self::internal(err.to_string()),
        }
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message,
            data: None,
        }
    }
}
