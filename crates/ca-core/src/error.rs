//! Core error types for CostAgent RS
//!
//! One taxonomy for the whole client: configuration failures are fatal at
//! construction, transport and parse failures propagate unmodified, and rate
//! derivation refuses to produce infinite values.

use thiserror::Error;

/// Core error type for all CostAgent operations
#[derive(Error, Debug)]
pub enum CaError {
    /// A credential field was empty at construction. Never retried.
    #[error("no {field} configured")]
    Config { field: &'static str },

    /// Network/HTTP failure from the transport collaborator.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The remote returned an empty body for a resource that requires one.
    #[error("empty response from {url}")]
    EmptyResponse { url: String },

    /// The parser collaborator could not produce a document.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A day-period rate cannot be converted without positive hours-per-day.
    #[error("cannot derive rates for billing period {billing_period:?} with {hours_per_day} hours per day")]
    RateDerivation {
        billing_period: String,
        hours_per_day: f64,
    },

    /// A freshly computed value could not be serialized for the cache provider.
    #[error("cache serialization failed for {namespace}/{key}")]
    Cache {
        namespace: &'static str,
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Transport-level failure, raised by `Transport` implementations.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("http status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Raised by `XmlParser` implementations on malformed input.
#[derive(Error, Debug)]
#[error("malformed xml: {0}")]
pub struct ParseError(pub String);
