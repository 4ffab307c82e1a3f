//! Error type shared by parsers and validating entry points.

/// Errors returned by the fallible operations of this crate.
///
/// Generation functions never fail; only parsing and argument validation do.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum Error {
    /// A text representation was malformed (wrong length, part count, prefix, digit, or value
    /// out of range). `kind` names the expected representation.
    #[error("invalid {kind} string representation")]
    InvalidFormat {
        /// Name of the representation being parsed.
        kind: &'static str,
    },

    /// A compact identifier node id was outside `[0, 1024)`.
    #[error("node id {0} out of range [0, 1024)")]
    NodeIdOutOfRange(u64),

    /// A numeric hash kind code did not correspond to any [`HashKind`](crate::HashKind).
    #[error("unsupported hash kind: {0}")]
    UnsupportedHashKind(u8),
}

impl Error {
    pub(crate) const fn invalid(kind: &'static str) -> Self {
        Self::InvalidFormat { kind }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    /// Produces descriptive messages
    #[test]
    fn produces_descriptive_messages() {
        assert_eq!(
            Error::invalid("XML-safe").to_string(),
            "invalid XML-safe string representation"
        );
        assert_eq!(
            Error::NodeIdOutOfRange(1024).to_string(),
            "node id 1024 out of range [0, 1024)"
        );
        assert_eq!(
            Error::UnsupportedHashKind(4).to_string(),
            "unsupported hash kind: 4"
        );
    }
}
