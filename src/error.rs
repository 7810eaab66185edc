use std::fmt;

/// Router error
///
/// Returned by [`Router::register`](crate::router::Router::register) when a
/// handler table is rejected, and by [`Router::route`](crate::router::Router::route)
/// or [`Router::compile`](crate::router::Router::compile) when the combined
/// pattern cannot be compiled.
#[derive(Debug, Clone)]
pub enum RouterError {
    /// A handler table key is not one of the recognized HTTP methods
    ///
    /// Method names are matched exactly and case-sensitively
    /// (`GET` is valid, `get` is not). The registration is rejected as a whole.
    InvalidMethod {
        /// The rejected method key
        method: String,
    },
    /// The combined alternation pattern failed to compile
    ///
    /// This is a configuration bug: one of the registered patterns is not a
    /// valid regular expression. It surfaces on the first compile after the
    /// offending registration, not at registration time.
    MalformedPattern {
        /// The full combined pattern text that was compiled
        pattern: String,
        /// The underlying regex engine error
        source: regex::Error,
    },
    /// The combined pattern compiled, but its group structure does not line up
    /// with the registered routes
    ///
    /// Happens when a registered pattern carries unbalanced parentheses that
    /// happen to pair up with a neighbouring route's wrapper group.
    IndexMismatch {
        /// The full combined pattern text
        pattern: String,
        /// What did not line up
        reason: String,
    },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidMethod { method } => {
                write!(f, "Invalid http method received: {}", method)
            }
            RouterError::MalformedPattern { pattern, source } => {
                write!(
                    f,
                    "Router configuration error: combined pattern '{}' does not compile: {}",
                    pattern, source
                )
            }
            RouterError::IndexMismatch { pattern, reason } => {
                write!(
                    f,
                    "Router configuration error: combined pattern '{}' is inconsistent: {}",
                    pattern, reason
                )
            }
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouterError::MalformedPattern { source, .. } => Some(source),
            RouterError::InvalidMethod { .. } | RouterError::IndexMismatch { .. } => None,
        }
    }
}
