//! Error types for the forecast integration

use thiserror::Error;

/// Structural failure while reading the forecast markup
///
/// Every variant names the field whose landmark was missing or malformed, so
/// a changed page layout can be told apart from an empty forecast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required element occurred the wrong number of times
    #[error("Expected {expected} `{field}` node(s), found {found}")]
    MissingElement {
        /// Landmark that was looked up
        field: &'static str,
        /// Number of nodes the layout requires
        expected: usize,
        /// Number of nodes actually present
        found: usize,
    },

    /// A required attribute is absent
    #[error("`{field}` has no `{attribute}` attribute")]
    MissingAttribute {
        /// Element that lacks the attribute
        field: &'static str,
        /// Name of the attribute
        attribute: &'static str,
    },

    /// A node is present but its text cannot be interpreted
    #[error("Invalid `{field}` value: {value:?}")]
    InvalidValue {
        /// Field being parsed
        field: &'static str,
        /// Offending text
        value: String,
    },
}

impl ParseError {
    /// The field that failed to parse
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingElement { field, .. }
            | Self::MissingAttribute { field, .. }
            | Self::InvalidValue { field, .. } => field,
        }
    }

    pub(crate) fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }
}

/// Errors that can occur while talking to the forecast service
#[derive(Debug, Error)]
pub enum KachelmannError {
    /// Connection to the forecast service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the forecast service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The configured timeout in seconds
        timeout_secs: u64,
    },

    /// The HTTP session could not be built
    #[error("Session initialization failed: {0}")]
    SessionInit(String),

    /// A header name or value is not valid HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The search endpoint redirected somewhere that encodes no station id
    #[error("Malformed redirect target {location:?}: {reason}")]
    MalformedRedirect {
        /// Value of the `Location` header
        location: String,
        /// What was wrong with it
        reason: String,
    },

    /// The forecast page does not have the expected layout
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl KachelmannError {
    /// Returns true for transport failures that a later attempt may not hit
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::Timeout { .. }
        )
    }

    /// Map a reqwest failure onto the transport variants
    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
