//! Error types for ride validation service calls.
//!
//! Service errors never reach the user as-is: a failed remote check resolves
//! the field to "could not verify", which blocks submission.

use std::fmt;

/// Result type for ride validation service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Structured context for service errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "last_odometer", "validate_field")
    pub operation: Option<String>,
    /// Endpoint path or URL involved
    pub endpoint: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether repeating the call may succeed
    pub retryable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark this error as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.endpoint.is_none()
            && self.details.is_none()
            && !self.retryable
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref endpoint) = self.endpoint {
            parts.push(format!("endpoint={}", endpoint));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, " [{}]", parts.join(", "))
    }
}

/// Error type for ride validation service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service could not be reached.
    #[error("Connection error: {message}{context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// No reply within the configured timeout.
    #[error("Timeout error: {message}{context}")]
    TimeoutError {
        message: String,
        context: ErrorContext,
    },

    /// Non-success status or a body that could not be decoded.
    #[error("Bad response: {message}{context}")]
    BadResponse {
        message: String,
        context: ErrorContext,
    },

    /// The request itself was rejected (missing or malformed inputs).
    #[error("Invalid request: {message}{context}")]
    InvalidRequest {
        message: String,
        context: ErrorContext,
    },

    /// The service reports itself as down.
    #[error("Service unavailable: {message}{context}")]
    Unavailable {
        message: String,
        context: ErrorContext,
    },
}

impl ServiceError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Create a bad response error.
    pub fn bad_response(message: impl Into<String>) -> Self {
        Self::BadResponse {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::TimeoutError { context, .. }
            | Self::BadResponse { context, .. }
            | Self::InvalidRequest { context, .. }
            | Self::Unavailable { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::TimeoutError { context, .. }
            | Self::BadResponse { context, .. }
            | Self::InvalidRequest { context, .. }
            | Self::Unavailable { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add or update the endpoint in the error context.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.context_mut().endpoint = Some(endpoint.into());
        self
    }
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err.url().map(|u| u.path().to_string());
        let error = if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if err.is_connect() {
            Self::connection(err.to_string())
        } else if let Some(status) = err.status() {
            Self::BadResponse {
                message: format!("HTTP {}", status),
                context: ErrorContext::default()
                    .with_details(err.to_string())
                    .retryable_if(status.is_server_error()),
            }
        } else {
            Self::bad_response(err.to_string())
        };
        match endpoint {
            Some(path) => error.with_endpoint(path),
            None => error,
        }
    }
}

impl ErrorContext {
    #[cfg_attr(not(feature = "http-client"), allow(dead_code))]
    fn retryable_if(self, retryable: bool) -> Self {
        if retryable {
            self.retryable()
        } else {
            self
        }
    }
}
