//! kachelmannwetter.com forecast client
//!
//! Resolves a location to a station, fetches the hourly/daily forecast
//! fragment for it and parses the fragment into a [`NextHoursDaysData`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{Location, NextHoursDaysData, StationId};
use tracing::{debug, instrument, warn};

use crate::config::KachelmannConfig;
use crate::error::KachelmannError;
use crate::http::{HeaderConfig, HttpRequest, SessionProvider};
use crate::parser::parse_next_hours_days;
use crate::station::LocationResolver;

/// Fixed query parameters of the forecast endpoint
const FORECAST_PARAMS: [(&str, &str); 3] = [("lang", "de"), ("units", "de"), ("tf", "1")];

/// Forecast client trait
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Hourly and daily forecast for a location
    ///
    /// Returns `Ok(None)` when the location cannot be resolved or the
    /// forecast cannot be retrieved.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the page layout is not understood, and errors from
    /// location resolution that are not plain misses.
    async fn next_hours_days(
        &self,
        location: &Location,
    ) -> Result<Option<NextHoursDaysData>, KachelmannError>;
}

/// Forecast client backed by the public kachelmannwetter.com pages
pub struct KachelmannClient {
    sessions: SessionProvider,
    resolver: Arc<LocationResolver>,
    forecast_url: String,
}

impl KachelmannClient {
    /// Create a client using the process-wide header configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP clients
    /// cannot be built.
    pub fn new(config: &KachelmannConfig) -> Result<Self, KachelmannError> {
        Self::with_headers(config, HeaderConfig::global())
    }

    /// Create a client whose sessions follow the given headers
    ///
    /// The location resolver gets its own session provider so lookups and
    /// forecast downloads do not wait on each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP clients
    /// cannot be built.
    pub fn with_headers(
        config: &KachelmannConfig,
        headers: Arc<HeaderConfig>,
    ) -> Result<Self, KachelmannError> {
        config.validate()?;

        let resolver = LocationResolver::new(config, Arc::clone(&headers))?;
        let sessions = SessionProvider::with_config("KachelmannClient", config, headers)?;

        Ok(Self::from_parts(sessions, Arc::new(resolver), config))
    }

    /// Assemble a client from existing parts
    #[must_use]
    pub fn from_parts(
        sessions: SessionProvider,
        resolver: Arc<LocationResolver>,
        config: &KachelmannConfig,
    ) -> Self {
        Self {
            sessions,
            resolver,
            forecast_url: config.forecast_url(),
        }
    }

    /// The resolver used for location names
    #[must_use]
    pub const fn resolver(&self) -> &Arc<LocationResolver> {
        &self.resolver
    }

    /// Build the forecast request for a station
    #[must_use]
    pub fn forecast_request(&self, station_id: StationId) -> HttpRequest {
        HttpRequest::get(self.forecast_url.as_str())
            .with_query([("city_id", station_id.to_string())])
            .with_query(FORECAST_PARAMS)
    }

    /// Fetch the forecast fragment for a station
    ///
    /// Transport failures and non-2xx responses are logged and yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `SessionInit` if no session can be built.
    #[instrument(skip(self))]
    pub async fn fetch_forecast_html(
        &self,
        station_id: StationId,
    ) -> Result<Option<String>, KachelmannError> {
        let request = self.forecast_request(station_id);
        debug!(url = %request.url, "Fetching forecast");

        let session = self.sessions.checkout().await?;
        let response = match session.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Could not retrieve forecast");
                return Ok(None);
            },
        };
        drop(session);

        if !response.status.is_success() {
            warn!(
                status = response.status.as_u16(),
                url = %self.forecast_url,
                "Could not retrieve forecast"
            );
            return Ok(None);
        }

        Ok(Some(response.body))
    }
}

#[async_trait]
impl ForecastClient for KachelmannClient {
    #[instrument(skip(self))]
    async fn next_hours_days(
        &self,
        location: &Location,
    ) -> Result<Option<NextHoursDaysData>, KachelmannError> {
        let Some(station_id) = self.resolver.station_id(location).await? else {
            debug!("No station for location");
            return Ok(None);
        };

        let Some(html) = self.fetch_forecast_html(station_id).await? else {
            return Ok(None);
        };

        Ok(Some(parse_next_hours_days(&html)?))
    }
}

impl fmt::Debug for KachelmannClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KachelmannClient")
            .field("sessions", &self.sessions)
            .field("resolver", &self.resolver)
            .field("forecast_url", &self.forecast_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use domain::LocationResult;
    use reqwest::StatusCode;
    use reqwest::header::LOCATION;

    use super::*;
    use crate::http::{HttpMethod, HttpResponse, HttpTransport, MockConnector, MockHttpTransport};

    const FIXTURE: &str = include_str!("../tests/fixtures/nexthoursdays.html");

    fn provider(name: &str, transport: MockHttpTransport) -> SessionProvider {
        let transport: Arc<dyn HttpTransport> = Arc::new(transport);
        let mut connector = MockConnector::new();
        connector
            .expect_connect()
            .returning(move |_| Ok(Arc::clone(&transport)));
        SessionProvider::new(name, Arc::new(HeaderConfig::new()), Arc::new(connector)).unwrap()
    }

    fn client(search: MockHttpTransport, forecast: MockHttpTransport) -> KachelmannClient {
        let config = KachelmannConfig::for_testing("http://kachelmann.test/de/");
        let resolver = LocationResolver::with_session_provider(provider("resolver", search), &config);
        KachelmannClient::from_parts(provider("client", forecast), Arc::new(resolver), &config)
    }

    fn no_search() -> MockHttpTransport {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();
        transport
    }

    #[test]
    fn test_forecast_request() {
        let client = client(no_search(), MockHttpTransport::new());
        let request = client.forecast_request(StationId::new(2_950_159));

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "http://kachelmann.test/de/ajax_pub/weathernexthoursdays");
        assert!(request.follow_redirects);
        assert_eq!(request.query_param("city_id"), Some("2950159"));
        assert_eq!(request.query_param("lang"), Some("de"));
        assert_eq!(request.query_param("units"), Some("de"));
        assert_eq!(request.query_param("tf"), Some("1"));
    }

    #[tokio::test]
    async fn test_forecast_for_station_id() {
        let mut forecast = MockHttpTransport::new();
        forecast
            .expect_send()
            .withf(|req| req.query_param("city_id") == Some("12345"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(StatusCode::OK).with_body(FIXTURE)));

        let client = client(no_search(), forecast);
        let data = client
            .next_hours_days(&Location::from("12345"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(data.hours().len(), 2);
        assert_eq!(data.days().len(), 2);
    }

    #[tokio::test]
    async fn test_forecast_for_name() {
        let mut search = MockHttpTransport::new();
        search.expect_send().times(1).returning(|_| {
            Ok(HttpResponse::new(StatusCode::FOUND).with_header(LOCATION, "/de/wetter/2950159-berlin"))
        });
        let mut forecast = MockHttpTransport::new();
        forecast
            .expect_send()
            .withf(|req| req.query_param("city_id") == Some("2950159"))
            .times(2)
            .returning(|_| Ok(HttpResponse::new(StatusCode::OK).with_body(FIXTURE)));

        let client = client(search, forecast);
        let berlin = Location::from("Berlin");
        assert!(client.next_hours_days(&berlin).await.unwrap().is_some());
        assert!(client.next_hours_days(&berlin).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_location_skips_forecast() {
        let mut search = MockHttpTransport::new();
        search
            .expect_send()
            .returning(|_| Ok(HttpResponse::new(StatusCode::OK)));
        let mut forecast = MockHttpTransport::new();
        forecast.expect_send().never();

        let client = client(search, forecast);
        assert!(client.next_hours_days(&Location::from("Atlantis")).await.unwrap().is_none());
        assert!(
            client
                .next_hours_days(&Location::from(LocationResult::CouldNotRetrieve))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_error_status_yields_none() {
        let mut forecast = MockHttpTransport::new();
        forecast
            .expect_send()
            .returning(|_| Ok(HttpResponse::new(StatusCode::SERVICE_UNAVAILABLE)));

        let client = client(no_search(), forecast);
        assert!(client.next_hours_days(&Location::from(7_u32)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transport_error_yields_none() {
        let mut forecast = MockHttpTransport::new();
        forecast
            .expect_send()
            .returning(|_| Err(KachelmannError::ConnectionFailed("refused".to_string())));

        let client = client(no_search(), forecast);
        assert!(client.fetch_forecast_html(StationId::new(7)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_layout_change_is_an_error() {
        let mut forecast = MockHttpTransport::new();
        forecast.expect_send().returning(|_| {
            Ok(HttpResponse::new(StatusCode::OK).with_body("<p>Wartungsarbeiten</p>"))
        });

        let client = client(no_search(), forecast);
        let err = client.next_hours_days(&Location::from(7_u32)).await.unwrap_err();
        assert!(matches!(err, KachelmannError::Parse(_)));
    }
}
