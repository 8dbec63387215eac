//! kachelmannwetter.com integration
//!
//! Scrapes the short-term forecast pages of <https://kachelmannwetter.com>.
//!
//! - [`http`]: sessions that follow a shared, mutable header configuration
//! - [`station`]: location name to station id resolution with a result cache
//! - [`parser`]: forecast fragment to [`domain::NextHoursDaysData`]
//! - [`client`]: the [`ForecastClient`] tying the three together
//!
//! ```no_run
//! use integration_kachelmann::{ForecastClient, KachelmannClient, KachelmannConfig};
//!
//! # async fn run() -> Result<(), integration_kachelmann::KachelmannError> {
//! let client = KachelmannClient::new(&KachelmannConfig::default())?;
//! if let Some(forecast) = client.next_hours_days(&"Berlin".into()).await? {
//!     for hour in forecast.hours() {
//!         println!("{} {}", hour.time_label(), hour.sky);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
mod config;
mod error;
pub mod http;
pub mod parser;
pub mod station;

pub use client::{ForecastClient, KachelmannClient};
pub use config::KachelmannConfig;
pub use error::{KachelmannError, ParseError};
pub use http::{HeaderConfig, SessionProvider, invalidate_sessions, set_user_agent};
pub use parser::parse_next_hours_days;
pub use station::LocationResolver;
