//! Error types for wind-field queries.

use thiserror::Error;

/// Errors that can occur while answering a wind query.
///
/// Every variant is fatal for the query that raised it; the engine never
/// retries and never returns a partial vector.
#[derive(Error, Debug)]
pub enum WindFieldError {
    /// Empty axis, empty catalog or an invalid setting.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A cache fill completed without producing the requested grid point.
    #[error(
        "grid point (lat {latitude}, lon {longitude}, {level} hPa) for field '{field}' \
         not decoded from dataset {dataset}"
    )]
    GridPointMissing {
        dataset: String,
        field: String,
        latitude: f64,
        longitude: f64,
        level: f64,
    },

    /// The scalar grid decoder failed.
    #[error("decoder unavailable: {0}")]
    Decoder(String),

    /// The dataset catalog failed.
    #[error("catalog unavailable: {0}")]
    Catalog(String),
}

/// Broad classification of a [`WindFieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Mismatched or malformed grid data, or an empty axis/catalog.
    Configuration,
    /// An I/O collaborator (decoder or catalog) could not serve the request.
    UpstreamUnavailable,
}

impl WindFieldError {
    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a Decoder error.
    pub fn decoder(msg: impl Into<String>) -> Self {
        Self::Decoder(msg.into())
    }

    /// Create a Catalog error.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::GridPointMissing { .. } => ErrorKind::Configuration,
            Self::Decoder(_) | Self::Catalog(_) => ErrorKind::UpstreamUnavailable,
        }
    }
}

impl From<anyhow::Error> for WindFieldError {
    fn from(err: anyhow::Error) -> Self {
        Self::Decoder(format!("{err:#}"))
    }
}

/// Result type for wind-field operations.
pub type Result<T> = std::result::Result<T, WindFieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            WindFieldError::configuration("empty axis").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            WindFieldError::GridPointMissing {
                dataset: "gfs_4_20181113_0000_000".into(),
                field: "u".into(),
                latitude: 0.0,
                longitude: 1.0,
                level: 900.0,
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            WindFieldError::decoder("io").kind(),
            ErrorKind::UpstreamUnavailable
        );
        assert_eq!(
            WindFieldError::catalog("index").kind(),
            ErrorKind::UpstreamUnavailable
        );
    }

    #[test]
    fn test_anyhow_context_is_kept() {
        let err: WindFieldError = anyhow::anyhow!("short read")
            .context("reading message 12")
            .into();
        let text = err.to_string();
        assert!(text.contains("reading message 12"));
        assert!(text.contains("short read"));
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    }
}
