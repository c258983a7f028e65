//! Encoding errors

/// Error returned by the format encoders.
///
/// Encoding is all-or-nothing: when one of these is returned no bytes have
/// been produced. Recoverable anomalies (long names, unreadable image
/// headers) never surface here, they are logged and degraded instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// Nothing was registered before encoding
    #[error("no {0} to pack")]
    EmptyInput(&'static str),

    /// A count, size or offset would overflow its 32-bit field
    #[error("{what} ({value}) does not fit in a 32-bit field")]
    TooLarge { what: &'static str, value: usize },
}
