//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Index could not be built from the catalog snapshot
    #[error("Index build failed: {0}")]
    IndexBuild(String),

    /// Index was built from a different catalog revision
    #[error("Index is stale: built from revision {index_revision}, catalog is at {catalog_revision}")]
    StaleIndex {
        /// Revision the index was built from
        index_revision: u64,
        /// Revision of the snapshot being queried
        catalog_revision: u64,
    },

    /// Catalog read or insert failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] nutrilog_core::Error),

    /// Background search or build task died
    #[error("Search task failed: {0}")]
    Task(String),
}

/// Error code for integration with nutrilog-core error handling.
/// Range: 10xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Index build failed
    IndexBuild = 10001,
    /// Index is stale
    StaleIndex = 10002,
    /// Catalog error
    Catalog = 10003,
    /// Task failure
    Task = 10004,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::IndexBuild(_) => SearchErrorCode::IndexBuild,
            SearchError::StaleIndex { .. } => SearchErrorCode::StaleIndex,
            SearchError::Catalog(_) => SearchErrorCode::Catalog,
            SearchError::Task(_) => SearchErrorCode::Task,
        }
    }
}

impl From<tokio::task::JoinError> for SearchError {
    fn from(err: tokio::task::JoinError) -> Self {
        SearchError::Task(err.to_string())
    }
}

impl From<SearchError> for nutrilog_core::Error {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Catalog(inner) => inner,
            other => nutrilog_core::Error::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrilog_core::ErrorCode;

    #[test]
    fn test_catalog_error_keeps_its_code() {
        let err = SearchError::from(nutrilog_core::Error::catalog_unavailable("gone"));
        assert_eq!(err.code(), SearchErrorCode::Catalog);

        let core: nutrilog_core::Error = err.into();
        assert_eq!(core.code, ErrorCode::CatalogUnavailable);
    }

    #[test]
    fn test_other_errors_become_internal() {
        let err = SearchError::StaleIndex {
            index_revision: 1,
            catalog_revision: 2,
        };
        let core: nutrilog_core::Error = err.into();
        assert_eq!(core.code, ErrorCode::Internal);
        assert!(core.message.contains("revision 1"));
    }
}
