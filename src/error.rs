//! Error taxonomy shared by the index, the forest, and the catalog.

/// Errors returned by catalog and index operations.
///
/// No operation mutates state before returning one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A non-positive identifier, or a merge naming the same collection twice.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The identifier is already registered.
    #[error("identifier {0} is already registered")]
    DuplicateKey(i64),
    /// The identifier is not registered.
    #[error("identifier {0} is not registered")]
    NotFound(i64),
    /// Every probe slot was occupied. Growth runs before this can happen,
    /// so seeing it means the largest prime capacity has been saturated.
    #[error("index is full")]
    Full,
}

pub type Result<T> = std::result::Result<T, Error>;
