//! Transport seam
//!
//! A transport takes a fully built URL plus basic-auth credentials and
//! returns the raw response. Implementations live outside this crate (the
//! client crate ships a reqwest-backed one); tests mock the trait.

use std::collections::HashMap;

use crate::error::TransportError;

/// A raw response: body bytes plus headers.
///
/// Header names are normalized to lower-snake-case (`User-Id` becomes
/// `user_id`) so header-derived entities read the same keys regardless of
/// the implementation.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub body: Vec<u8>,
    pub headers: HashMap<String, String>,
}

impl Response {
    /// Look up a header by its normalized name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&normalize_header_name(name))
            .map(String::as_str)
    }
}

/// Lower-snake-case normalization applied to all header names.
pub fn normalize_header_name(name: &str) -> String {
    name.to_ascii_lowercase().replace('-', "_")
}

/// Blocking HTTP GET against the remote service.
///
/// An empty `username` means the request is unauthenticated (used by the
/// exchange-rate fetch).
#[cfg_attr(feature = "mocks", mockall::automock)]
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, username: &str, password: &str) -> Result<Response, TransportError>;
}
