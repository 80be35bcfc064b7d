//! Error types for chanlog
//!
//! This module defines the error type shared by both sinks. The relational sink
//! only recovers from [`ChanlogError::ConnectionLost`]; every other variant is
//! propagated to the caller.

use thiserror::Error;

/// Main error type for chanlog operations
#[derive(Error, Debug)]
pub enum ChanlogError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigFileMissing(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// I/O errors (transcript files, config files)
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    /// JSON configuration / event parsing errors
    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlError {
        #[from]
        source: toml::de::Error,
    },

    /// The session to the store broke underneath an operation
    #[error("Database connection lost: {0}")]
    ConnectionLost(String),

    /// Reconnecting after a lost session failed; the sink has no usable session
    #[error("Reconnect failed: {0}")]
    ReconnectFailed(Box<ChanlogError>),

    /// Establishing a new session failed
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// Any other store failure (constraint violations, bad SQL, ...)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A row that was just inserted could not be found again
    #[error("Store inconsistency: {0}")]
    Inconsistency(String),

    /// Tracing subscriber errors
    #[error("Tracing error: {0}")]
    TracingError(String),

    /// Backend compiled out of this build
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),
}

/// Result type alias for chanlog operations
pub type Result<T> = std::result::Result<T, ChanlogError>;

impl ChanlogError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new database error
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Create a new connection-lost error
    pub fn connection_lost<S: Into<String>>(msg: S) -> Self {
        Self::ConnectionLost(msg.into())
    }

    /// Create a new inconsistency error
    pub fn inconsistency<S: Into<String>>(msg: S) -> Self {
        Self::Inconsistency(msg.into())
    }

    /// True for the one failure kind the relational sink reconnects on
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Self::ConnectionLost(_))
    }

    /// True when the relational sink can no longer write at all
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ReconnectFailed(_))
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Self::ConfigError(_)
            | Self::ConfigFileMissing(_)
            | Self::InvalidLogLevel(_)
            | Self::TomlError { .. } => "config",
            Self::IoError { .. } => "io",
            Self::SerializationError { .. } => "serialization",
            Self::ConnectionLost(_) | Self::ConnectionError(_) | Self::ReconnectFailed(_) => {
                "connection"
            }
            Self::DatabaseError(_) => "database",
            Self::Inconsistency(_) => "inconsistency",
            Self::TracingError(_) => "tracing",
            Self::FeatureNotEnabled(_) => "feature",
        }
    }
}

impl From<diesel::result::Error> for ChanlogError {
    fn from(e: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match e {
            Error::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                Self::ConnectionLost(info.message().to_string())
            }
            Error::BrokenTransactionManager => {
                Self::ConnectionLost("transaction manager is broken".to_string())
            }
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for ChanlogError {
    fn from(e: diesel::ConnectionError) -> Self {
        Self::ConnectionError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use std::io;

    #[test]
    fn test_error_creation() {
        let config_err = ChanlogError::config("Invalid configuration");
        assert!(matches!(config_err, ChanlogError::ConfigError(_)));
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Invalid configuration"
        );

        let db_err = ChanlogError::database("Connection failed");
        assert_eq!(db_err.to_string(), "Database error: Connection failed");
    }

    #[test]
    fn test_closed_connection_is_connection_lost() {
        let err: ChanlogError = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection unexpectedly".to_string()),
        )
        .into();

        assert!(err.is_connection_lost());
        assert!(err.to_string().contains("server closed the connection"));
    }

    #[test]
    fn test_constraint_violation_is_not_connection_lost() {
        let err: ChanlogError = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_string()),
        )
        .into();

        assert!(!err.is_connection_lost());
        assert!(matches!(err, ChanlogError::DatabaseError(_)));

        let err: ChanlogError = DieselError::NotFound.into();
        assert!(!err.is_connection_lost());
    }

    #[test]
    fn test_error_from_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        let err: ChanlogError = io_error.into();
        assert!(matches!(err, ChanlogError::IoError { .. }));
        assert!(err.to_string().contains("Access denied"));
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ChanlogError::config("test").category(), "config");
        assert_eq!(ChanlogError::database("test").category(), "database");
        assert_eq!(ChanlogError::connection_lost("test").category(), "connection");
        assert_eq!(ChanlogError::inconsistency("test").category(), "inconsistency");
    }

    #[test]
    fn test_reconnect_failure_is_fatal() {
        let err = ChanlogError::ReconnectFailed(Box::new(ChanlogError::ConfigFileMissing(
            "chanlog.toml".to_string(),
        )));
        assert!(err.is_fatal());
        assert!(!err.is_connection_lost());
        assert_eq!(err.category(), "connection");
        assert!(err.to_string().contains("chanlog.toml"));

        assert!(!ChanlogError::connection_lost("gone").is_fatal());
    }
}
