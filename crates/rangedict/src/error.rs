//! Errors reported for malformed queries

/// An error produced when a query window cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error<K> {
    /// The resolved window was empty or reversed
    #[error("Invalid range, {begin:?} is not less than {end:?}")]
    InvalidRange {
        /// The resolved start of the window
        begin: K,
        /// The resolved end of the window
        end: K,
    },
    /// A bound was left unspecified but the dictionary holds no ranges to
    /// default it from
    #[error("Cannot default an unspecified bound on an empty dictionary")]
    Unbounded,
}
