use thiserror::Error;

/// Failure taxonomy for remote catalog calls.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The call itself did not complete (transport failure, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered with a non-success status.
    #[error("catalog API error ({0}): {1}")]
    Api(u16, String),

    /// The response body was not the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The remote has no record for the requested product id.
    #[error("product not found")]
    NotFound,
}

impl CatalogError {
    /// True when the remote reported no such record, as opposed to the
    /// call itself failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound)
    }
}
