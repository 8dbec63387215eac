//! Shared default headers with a change counter

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::error::KachelmannError;

/// User-Agent sent unless the caller configures another one
pub const DEFAULT_USER_AGENT: &str =
    concat!("Kachelmann-Wetter-Getter/v", env!("CARGO_PKG_VERSION"));

static GLOBAL_HEADERS: LazyLock<Arc<HeaderConfig>> =
    LazyLock::new(|| Arc::new(HeaderConfig::new()));

/// Default request headers plus a generation counter
///
/// Every mutation bumps the generation. Session providers remember the
/// generation their session was built with and replace the session on the
/// next checkout once it differs. Sessions already checked out keep the old
/// headers until they are returned.
#[derive(Debug)]
pub struct HeaderConfig {
    headers: RwLock<HeaderMap>,
    generation: AtomicU64,
}

impl HeaderConfig {
    /// Create a configuration holding only the default User-Agent
    #[must_use]
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        Self {
            headers: RwLock::new(headers),
            generation: AtomicU64::new(0),
        }
    }

    /// The process-wide configuration used by default constructors
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_HEADERS)
    }

    /// Define the User-Agent sent to the remote host
    ///
    /// With `replace` the given string becomes the whole header; otherwise
    /// the default User-Agent is appended to it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHeader` if the result is not a valid header value.
    pub fn set_user_agent(&self, user_agent: &str, replace: bool) -> Result<(), KachelmannError> {
        let value = if replace {
            user_agent.to_string()
        } else {
            format!("{user_agent} {DEFAULT_USER_AGENT}")
        };
        self.insert(USER_AGENT, &value)
    }

    /// Set an arbitrary default header
    ///
    /// # Errors
    ///
    /// Returns `InvalidHeader` if the name or value is not valid HTTP.
    pub fn set_header(&self, name: &str, value: &str) -> Result<(), KachelmannError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| KachelmannError::InvalidHeader(format!("{name:?}: {e}")))?;
        self.insert(name, value)
    }

    /// Invalidate all sessions without changing any header
    pub fn invalidate_sessions(&self) {
        let _headers = self.headers.write();
        self.bump();
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Consistent copy of the headers together with their generation
    pub fn snapshot(&self) -> (u64, HeaderMap) {
        let headers = self.headers.read();
        (self.generation(), headers.clone())
    }

    /// The configured User-Agent
    pub fn user_agent(&self) -> Option<String> {
        self.headers
            .read()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    }

    fn insert(&self, name: HeaderName, value: &str) -> Result<(), KachelmannError> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| KachelmannError::InvalidHeader(format!("{name}: {e}")))?;

        let mut headers = self.headers.write();
        headers.insert(name, value);
        self.bump();
        Ok(())
    }

    fn bump(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "Header configuration changed");
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Define the User-Agent of the process-wide header configuration
///
/// # Errors
///
/// Returns `InvalidHeader` if the result is not a valid header value.
pub fn set_user_agent(user_agent: &str, replace: bool) -> Result<(), KachelmannError> {
    HeaderConfig::global().set_user_agent(user_agent, replace)
}

/// Invalidate every session built from the process-wide header configuration
pub fn invalidate_sessions() {
    HeaderConfig::global().invalidate_sessions();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent() {
        let headers = HeaderConfig::new();
        assert_eq!(headers.user_agent().as_deref(), Some(DEFAULT_USER_AGENT));
        assert!(DEFAULT_USER_AGENT.starts_with("Kachelmann-Wetter-Getter/v"));
        assert_eq!(headers.generation(), 0);
    }

    #[test]
    fn test_user_agent_is_prefixed_by_default() {
        let headers = HeaderConfig::new();
        headers.set_user_agent("MyBot/2.1", false).unwrap();
        assert_eq!(
            headers.user_agent(),
            Some(format!("MyBot/2.1 {DEFAULT_USER_AGENT}"))
        );
    }

    #[test]
    fn test_user_agent_replace() {
        let headers = HeaderConfig::new();
        headers.set_user_agent("MyBot/2.1", true).unwrap();
        assert_eq!(headers.user_agent().as_deref(), Some("MyBot/2.1"));
    }

    #[test]
    fn test_every_change_bumps_generation() {
        let headers = HeaderConfig::new();
        headers.set_user_agent("a", true).unwrap();
        assert_eq!(headers.generation(), 1);
        headers.set_header("Accept-Language", "de").unwrap();
        assert_eq!(headers.generation(), 2);
        headers.invalidate_sessions();
        assert_eq!(headers.generation(), 3);

        let (generation, map) = headers.snapshot();
        assert_eq!(generation, 3);
        assert_eq!(map.get("accept-language").unwrap(), "de");
    }

    #[test]
    fn test_invalid_header_is_rejected_without_bump() {
        let headers = HeaderConfig::new();
        assert!(matches!(
            headers.set_header("bad header", "x"),
            Err(KachelmannError::InvalidHeader(_))
        ));
        assert!(matches!(
            headers.set_user_agent("line\nbreak", true),
            Err(KachelmannError::InvalidHeader(_))
        ));
        assert_eq!(headers.generation(), 0);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&HeaderConfig::global(), &HeaderConfig::global()));
    }
}
