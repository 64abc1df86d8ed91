//! Error types for sigsheet

use sigsheet_chart::ChartError;
use sigsheet_formula::FormulaError;
use thiserror::Error;

/// Boxed error from an external collaborator
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by one invocation
#[derive(Debug, Error)]
pub enum Error {
    /// A configured range, column or anchor cannot be used
    #[error("Invalid {context}: {source}")]
    Configuration {
        context: String,
        #[source]
        source: ConfigError,
    },

    /// The configuration file could not be read or parsed
    #[error("Failed to load config '{path}': {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: BoxError,
    },

    /// The metrics service failed
    #[error("Failed to fetch metrics: {0}")]
    Fetch(#[source] BoxError),

    /// The sheet store rejected or failed to apply the batch
    #[error("Failed to apply batch: {0}")]
    Store(#[source] BoxError),
}

/// Underlying cause of an [`Error::Configuration`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Core(#[from] sigsheet_core::Error),
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl Error {
    /// Wrap an error from a metrics fetcher
    pub fn fetch<E: Into<BoxError>>(err: E) -> Self {
        Error::Fetch(err.into())
    }

    /// Wrap an error from a sheet store
    pub fn store<E: Into<BoxError>>(err: E) -> Self {
        Error::Store(err.into())
    }

    /// Whether the error comes from the configuration rather than a service
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. } | Error::ConfigFile { .. })
    }
}

/// Attach the name of the offending setting to a configuration error
pub(crate) fn configuration<E, C>(context: C) -> impl FnOnce(E) -> Error
where
    E: Into<ConfigError>,
    C: Into<String>,
{
    move |err| Error::Configuration {
        context: context.into(),
        source: err.into(),
    }
}
