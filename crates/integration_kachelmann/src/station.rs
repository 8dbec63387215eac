//! Location name to station id resolution
//!
//! Names are resolved by submitting the site's search form with redirects
//! disabled. A redirect to `.../<digits>-<slug>` carries the station id, a
//! plain success page means the site knows no such place.
//!
//! Results are memoized per name for the lifetime of the resolver. Station
//! ids are always kept, "no such location" answers only when negative caching
//! is enabled and failed lookups never.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use domain::{Location, LocationResult, StationId};
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

use crate::config::KachelmannConfig;
use crate::error::KachelmannError;
use crate::http::{HeaderConfig, HttpRequest, SessionProvider};

/// Value of the search form's action field
const SEARCH_ACTION: &str = "wetter";

/// Resolves location names to station ids with a shared cache
pub struct LocationResolver {
    sessions: SessionProvider,
    search_url: String,
    cache_negative_results: bool,
    cache: Mutex<HashMap<String, LocationResult>>,
}

impl LocationResolver {
    /// Create a resolver with its own reqwest-backed session provider
    ///
    /// # Errors
    ///
    /// Returns `SessionInit` if the HTTP client cannot be built.
    pub fn new(config: &KachelmannConfig, headers: Arc<HeaderConfig>) -> Result<Self, KachelmannError> {
        let sessions = SessionProvider::with_config("LocationResolver", config, headers)?;
        Ok(Self::with_session_provider(sessions, config))
    }

    /// Create a resolver on top of an existing session provider
    #[must_use]
    pub fn with_session_provider(sessions: SessionProvider, config: &KachelmannConfig) -> Self {
        Self {
            sessions,
            search_url: config.search_url(),
            cache_negative_results: config.cache_negative_results,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Ask the site for a location, bypassing the cache
    ///
    /// Transport failures and unexpected status codes are logged and reported
    /// as [`LocationResult::CouldNotRetrieve`].
    ///
    /// # Errors
    ///
    /// Returns `MalformedRedirect` if the site redirects to a target that
    /// carries no station id, or `SessionInit` if no session can be built.
    #[instrument(skip(self))]
    pub async fn search_location(&self, name: &str) -> Result<LocationResult, KachelmannError> {
        let request = HttpRequest::post_form(
            self.search_url.as_str(),
            [("forecast_action", SEARCH_ACTION), ("forecast_input", name)],
        )
        .without_redirects();

        let response = {
            let session = self.sessions.checkout().await?;
            match session.send(request).await {
                Ok(response) => response,
                Err(e) => {
                    error!(error = %e, "Could not query location search");
                    return Ok(LocationResult::CouldNotRetrieve);
                },
            }
        };

        let status = response.status;
        if status.is_redirection() {
            let Some(target) = response.location() else {
                let err = KachelmannError::MalformedRedirect {
                    location: String::new(),
                    reason: format!("{status} without a Location header"),
                };
                error!(error = %err, "Unusable search redirect");
                return Err(err);
            };

            return match station_from_redirect(target) {
                Ok(id) => {
                    debug!(station_id = %id, "Location resolved");
                    Ok(LocationResult::StationId(id))
                },
                Err(err) => {
                    error!(error = %err, "Unusable search redirect");
                    Err(err)
                },
            };
        }

        if status.is_success() {
            debug!("No such location");
            return Ok(LocationResult::NoSuchLocation);
        }

        error!(status = status.as_u16(), "Location search returned an unexpected status");
        Ok(LocationResult::CouldNotRetrieve)
    }

    /// Resolve a name through the cache
    ///
    /// The cache stays locked for the whole lookup, so concurrent callers
    /// never search for the same name twice and never see a partial entry.
    ///
    /// # Errors
    ///
    /// See [`Self::search_location`]. Errors are not cached.
    #[instrument(skip(self))]
    pub async fn lookup(&self, name: &str) -> Result<LocationResult, KachelmannError> {
        let mut cache = self.cache.lock().await;

        if let Some(result) = cache.get(name) {
            debug!(%result, "Location cache hit");
            return Ok(*result);
        }

        let result = self.search_location(name).await?;
        if result.is_cacheable(self.cache_negative_results) {
            cache.insert(name.to_string(), result);
        }

        Ok(result)
    }

    /// Resolve a name to a station id through the cache
    ///
    /// Unknown names and failed lookups both yield `None`; use
    /// [`Self::lookup`] to tell them apart.
    ///
    /// # Errors
    ///
    /// See [`Self::search_location`].
    pub async fn get_location(&self, name: &str) -> Result<Option<StationId>, KachelmannError> {
        Ok(self.lookup(name).await?.station_id())
    }

    /// Station id for any kind of location input
    ///
    /// Numeric names and ids are returned without any network request.
    ///
    /// # Errors
    ///
    /// See [`Self::search_location`].
    pub async fn station_id(&self, location: &Location) -> Result<Option<StationId>, KachelmannError> {
        match location {
            Location::Name(name) => match name.parse::<StationId>() {
                Ok(id) => Ok(Some(id)),
                Err(_) => self.get_location(name).await,
            },
            Location::Id(id) => Ok(Some(*id)),
            Location::Resolved(result) => Ok(result.station_id()),
        }
    }

    /// The cached result for a name, if any
    pub async fn cached(&self, name: &str) -> Option<LocationResult> {
        self.cache.lock().await.get(name).copied()
    }
}

impl fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationResolver")
            .field("sessions", &self.sessions)
            .field("search_url", &self.search_url)
            .field("cache_negative_results", &self.cache_negative_results)
            .finish_non_exhaustive()
    }
}

/// Station id from a redirect target like `/de/wetter/2950159-berlin`
fn station_from_redirect(target: &str) -> Result<StationId, KachelmannError> {
    let malformed = |reason: &str| KachelmannError::MalformedRedirect {
        location: target.to_string(),
        reason: reason.to_string(),
    };

    let segment = target.rsplit('/').next().unwrap_or_default();
    let (digits, _slug) = segment
        .split_once('-')
        .ok_or_else(|| malformed("no '-' in the last path segment"))?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("station id is not numeric"));
    }

    digits
        .parse::<StationId>()
        .map_err(|_| malformed("station id is out of range"))
}
