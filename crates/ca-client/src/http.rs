//! reqwest-backed transport
//!
//! The default `Transport` implementation. Basic auth is applied when a
//! username is present; the unauthenticated form serves the exchange-rate
//! fetch.

use std::time::Duration;

use ca_core::transport::{normalize_header_name, Response, Transport};
use ca_core::TransportError;
use reqwest::blocking::Client;

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Panics only if the TLS backend cannot be initialized.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("http client");
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, username: &str, password: &str) -> Result<Response, TransportError> {
        let mut request = self.client.get(url);
        if !username.is_empty() {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().map_err(|err| TransportError::Network {
            url: url.to_string(),
            message: err.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    normalize_header_name(name.as_str()),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .map_err(|err| TransportError::Network {
                url: url.to_string(),
                message: err.to_string(),
            })?
            .to_vec();

        Ok(Response { body, headers })
    }
}
