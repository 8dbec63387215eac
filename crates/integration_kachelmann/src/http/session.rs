//! Reusable sessions handed out one caller at a time

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};

use super::headers::HeaderConfig;
use super::transport::{Connector, HttpRequest, HttpResponse, HttpTransport, ReqwestConnector};
use crate::config::KachelmannConfig;
use crate::error::KachelmannError;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// A transport stamped with the header generation it was built from
pub struct Session {
    id: u64,
    generation: u64,
    transport: Arc<dyn HttpTransport>,
}

impl Session {
    /// Process-unique id of this session
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Header generation the session was built with
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Send a request with this session's default headers
    ///
    /// # Errors
    ///
    /// Returns a transport error if no response was received.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, KachelmannError> {
        self.transport.send(request).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Exclusive use of a provider's session until dropped
pub struct ScopedSession {
    guard: OwnedMutexGuard<Session>,
}

impl Deref for ScopedSession {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.guard
    }
}

impl fmt::Debug for ScopedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopedSession").field(&*self.guard).finish()
    }
}

/// Caches one session and replaces it after header changes
///
/// Checkouts are serialized: a second caller waits until the first
/// [`ScopedSession`] is dropped. Independent components should own separate
/// providers so they do not wait on each other; providers sharing a
/// [`HeaderConfig`] all pick up header changes on their next checkout.
pub struct SessionProvider {
    name: String,
    headers: Arc<HeaderConfig>,
    connector: Arc<dyn Connector>,
    slot: Arc<Mutex<Session>>,
}

impl SessionProvider {
    /// Create a provider and its first session
    ///
    /// # Errors
    ///
    /// Returns `SessionInit` if the connector cannot build a transport.
    pub fn new(
        name: impl Into<String>,
        headers: Arc<HeaderConfig>,
        connector: Arc<dyn Connector>,
    ) -> Result<Self, KachelmannError> {
        let name = name.into();
        let session = open_session(&name, &headers, connector.as_ref())?;

        Ok(Self {
            name,
            headers,
            connector,
            slot: Arc::new(Mutex::new(session)),
        })
    }

    /// Create a provider backed by reqwest
    ///
    /// # Errors
    ///
    /// Returns `SessionInit` if the HTTP client cannot be built.
    pub fn with_config(
        name: impl Into<String>,
        config: &KachelmannConfig,
        headers: Arc<HeaderConfig>,
    ) -> Result<Self, KachelmannError> {
        Self::new(name, headers, Arc::new(ReqwestConnector::new(config)))
    }

    /// Wait for exclusive use of the session
    ///
    /// The session is rebuilt first if the header generation moved since it
    /// was created.
    ///
    /// # Errors
    ///
    /// Returns `SessionInit` if a replacement session cannot be built. The
    /// stale session is kept and replacement is retried on the next checkout.
    #[instrument(skip(self), fields(provider = %self.name))]
    pub async fn checkout(&self) -> Result<ScopedSession, KachelmannError> {
        let mut guard = Arc::clone(&self.slot).lock_owned().await;

        let current = self.headers.generation();
        if guard.generation != current {
            debug!(
                session_id = guard.id,
                stale_generation = guard.generation,
                current_generation = current,
                "Headers changed, replacing session"
            );
            *guard = open_session(&self.name, &self.headers, self.connector.as_ref())?;
        }

        Ok(ScopedSession { guard })
    }

    /// Name used in log output
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The header configuration this provider follows
    #[must_use]
    pub const fn headers(&self) -> &Arc<HeaderConfig> {
        &self.headers
    }
}

impl fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionProvider")
            .field("name", &self.name)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

fn open_session(
    name: &str,
    headers: &HeaderConfig,
    connector: &dyn Connector,
) -> Result<Session, KachelmannError> {
    let (generation, snapshot) = headers.snapshot();
    let transport = connector.connect(&snapshot)?;
    let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);

    debug!(provider = %name, session_id = id, generation, "Created a new session");

    Ok(Session {
        id,
        generation,
        transport,
    })
}
