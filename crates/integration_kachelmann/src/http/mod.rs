//! HTTP session layer
//!
//! A [`SessionProvider`] hands out one reusable [`Session`] at a time and
//! rebuilds it lazily whenever the shared [`HeaderConfig`] changed since the
//! session was created. The actual HTTP round-trip sits behind the
//! [`HttpTransport`] trait so the resolver and the client can be exercised
//! against mocks.

mod headers;
mod session;
mod transport;

pub use headers::{DEFAULT_USER_AGENT, HeaderConfig, invalidate_sessions, set_user_agent};
pub use session::{ScopedSession, Session, SessionProvider};
pub use transport::{
    Connector, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestConnector,
};

#[cfg(test)]
pub(crate) use transport::{MockConnector, MockHttpTransport};
