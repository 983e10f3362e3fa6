//! Unified application error types for Taskboard.
//!
//! Every crate maps its internal errors into [`AppError`] so they propagate
//! through the `?` operator. The kinds follow how a failure must be handled:
//!
//! - [`ErrorKind::Configuration`] is raised while wiring the application
//!   (an unregistered filter kind, an unresolved repository type) and is
//!   fatal. It is never retried.
//! - [`ErrorKind::NotFound`] is raised per call and translated by callers.
//! - [`ErrorKind::UnsupportedType`] is raised when a value is bound to a
//!   filter that cannot accept it. It signals a programming error.
//! - [`ErrorKind::Database`] wraps backend execution failures unchanged.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    /// The acting user lacks a permission.
    Authorization,
    Validation,
    /// Duplicate username, email, or membership.
    Conflict,
    Internal,
    Database,
    /// Wiring failures: unregistered kinds, unresolved repositories, bad config.
    Configuration,
    /// A value was bound to a filter whose policy rejects it.
    UnsupportedType,
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authorization => "AUTHORIZATION",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::UnsupportedType => "UNSUPPORTED_TYPE",
            Self::Serialization => "SERIALIZATION",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

macro_rules! error_constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )*
    };
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Keep `source` as the cause reported by [`std::error::Error::source`].
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    error_constructors! {
        not_found => NotFound,
        authorization => Authorization,
        validation => Validation,
        conflict => Conflict,
        internal => Internal,
        database => Database,
        configuration => Configuration,
        serialization => Serialization,
    }

    /// A filter, order, or group kind was requested that nobody registered.
    pub fn definition_not_found(kind: impl fmt::Display) -> Self {
        Self::configuration(format!("Filter definition not found: {kind}"))
    }

    /// No repository implementation was registered for the requested type.
    pub fn persistence_type_not_found(type_name: &str) -> Self {
        Self::configuration(format!("Persistence type not found: {type_name}"))
    }

    /// A value of type `value_type` was bound to a filter of kind `kind`.
    pub fn unsupported_type(kind: impl fmt::Display, value_type: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedType,
            format!("Type {value_type} not supported for this filter: {kind}"),
        )
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("Invalid JSON: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Could not read configuration: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::definition_not_found("BETWEEN");
        assert_eq!(
            err.to_string(),
            "CONFIGURATION: Filter definition not found: BETWEEN"
        );
    }

    #[test]
    fn test_clone_drops_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(json_err);
        assert!(err.source.is_some());
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert!(cloned.is(ErrorKind::Serialization));
    }

    #[test]
    fn test_unsupported_type_message() {
        let err = AppError::unsupported_type("LIKE", "integer");
        assert!(err.is(ErrorKind::UnsupportedType));
        assert!(err.message.contains("integer"));
        assert!(err.message.contains("LIKE"));
    }
}
