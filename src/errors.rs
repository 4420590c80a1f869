//! Error types of the filter.
//!
//! [ConfigurationError] is only ever returned while a [FilterConfig] is being
//! built. Once a filter exists, evaluating it can either deny access
//! ([AccessDenied]) or fail because one of the resolvers failed
//! ([FilterError::Resolver]).
//!
//! [FilterConfig]: crate::FilterConfig

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("at least one country code required")]
    EmptyCodes,
    #[error("codes must be a string or collection of strings")]
    InvalidCodes,
    #[error("invalid country code {0:?}, expected two ASCII letters")]
    InvalidCountryCode(String),
    #[error("invalid filter mode {0:?}, expected \"allow\" or \"deny\"")]
    InvalidMode(String),
    #[error("invalid trusted proxy network {value:?}")]
    InvalidProxy {
        value: String,
        #[source]
        source: ipnetwork::IpNetworkError,
    },
    #[error("failed to open GeoIP database at {}", path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to parse filter configuration")]
    Deserialize(#[from] toml::de::Error),
    #[error(transparent)]
    Environment(#[from] anyhow::Error),
}

/// The request was rejected by the filter.
///
/// Responds with `403 Forbidden` and the configured message as plain text
/// body when returned from an [axum] handler or middleware.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AccessDenied {
    message: String,
}

impl AccessDenied {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AccessDenied {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, self.message).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    /// The IP or country resolver failed. The error is passed through as
    /// returned by the resolver.
    #[error(transparent)]
    Resolver(anyhow::Error),
}
