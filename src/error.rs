use thiserror::Error;

/// Outcome of a catalog call that did not produce a record
///
/// Both variants are expected results rather than exceptional conditions:
/// callers translate them into their own terminal states.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog answered but had no matching meal
    #[error("No matching meal in the catalog")]
    NotFound,

    /// Transport or decoding failure (DNS, timeout, non-2xx, malformed body)
    #[error("Failed to fetch from catalog: {0}")]
    FetchFailed(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::FetchFailed(err.to_string())
    }
}

/// Errors that can occur while setting up or driving a meal finder session
#[derive(Error, Debug)]
pub enum FinderError {
    /// A catalog lookup did not produce a record
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The durable favorites record could not be decoded
    #[error("Malformed favorites record: {0}")]
    MalformedPersistedState(String),

    /// Reading or writing the favorites record failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Failed to build the HTTP client
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
