// Copyright 2025 Cowboy AI, LLC.

//! Error types for equation operations

use thiserror::Error;

/// Opaque failure reported by a [`Connector`](crate::Connector).
pub type ConnectorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building or evaluating equations
#[derive(Debug, Error)]
pub enum EquationError {
    /// Two terms or link sets were built under different connectors
    #[error("Connector mismatch: expected connector {expected}, got {found}")]
    ConnectorMismatch {
        /// Connector id of the left-hand operand
        expected: String,
        /// Connector id of the right-hand operand
        found: String,
    },

    /// The connector failed to join two entities
    #[error("Connection failed: {connector} could not connect {source_id} -> {sink_id}: {source}")]
    ConnectionFailed {
        /// Connector that reported the failure
        connector: String,
        /// Identity of the source entity
        source_id: String,
        /// Identity of the sink entity
        sink_id: String,
        /// Failure returned by the connector
        #[source]
        source: ConnectorError,
    },
}

/// Result type for equation operations
pub type EquationResult<T> = Result<T, EquationError>;

impl EquationError {
    /// Build a mismatch error from two connector ids
    pub fn connector_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        EquationError::ConnectorMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Check if this is a connector mismatch
    pub fn is_connector_mismatch(&self) -> bool {
        matches!(self, EquationError::ConnectorMismatch { .. })
    }

    /// Check if this error came from the connector itself
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, EquationError::ConnectionFailed { .. })
    }

    /// The connector's own error, when there is one
    pub fn connector_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            EquationError::ConnectionFailed { source, .. } => Some(source.as_ref()),
            EquationError::ConnectorMismatch { .. } => None,
        }
    }
}
