//! USD/GBP exchange-rate lookup
//!
//! Fetches a public currency page once, memoizes the parsed rate and falls
//! back to a fixed constant on any failure. Currency conversion must never
//! block cost reporting, so nothing here surfaces an error to the caller.
//!
//! Sharing one instance (behind an `Arc`) across agents gives the
//! process-wide memo; constructing a fresh instance gives tests isolation.

use std::sync::Arc;

use ca_core::{CaError, CaResult, ParseError, Transport, TransportError, XmlParser};
use once_cell::sync::OnceCell;
use tracing::warn;

/// Used whenever the rate page cannot be fetched or parsed.
pub const FALLBACK_USD_RATE: f64 = 1.6;

/// Page carrying the quoted rate.
pub const RATE_URL: &str = "http://www.xe.com";

/// The `<a>` element holding the USD/GBP quote.
const RATE_ELEMENT_ID: &str = "USDGBP31";

/// Memoized USD/GBP rate source.
pub struct ExchangeRates {
    transport: Arc<dyn Transport>,
    parser: Arc<dyn XmlParser>,
    memo: OnceCell<f64>,
}

impl ExchangeRates {
    pub fn new(transport: Arc<dyn Transport>, parser: Arc<dyn XmlParser>) -> Self {
        Self {
            transport,
            parser,
            memo: OnceCell::new(),
        }
    }

    /// A source pinned to a known rate. Never touches the network; useful for
    /// deterministic reporting and tests.
    pub fn fixed(rate: f64) -> Self {
        let memo = OnceCell::new();
        let _ = memo.set(rate);
        Self {
            transport: Arc::new(Offline),
            parser: Arc::new(Offline),
            memo,
        }
    }

    /// The memoized USD/GBP rate, fetching on first use.
    pub fn usd_rate(&self) -> f64 {
        *self.memo.get_or_init(|| match self.fetch() {
            Ok(rate) => rate,
            Err(err) => {
                warn!(%err, fallback = FALLBACK_USD_RATE, "exchange-rate lookup failed, using fallback");
                FALLBACK_USD_RATE
            }
        })
    }

    fn fetch(&self) -> CaResult<f64> {
        let response = self.transport.get(RATE_URL, "", "")?;
        let doc = self.parser.parse(&response.body)?;
        let quote = doc
            .select("a")
            .into_iter()
            .find(|node| node.attr("id") == Some(RATE_ELEMENT_ID))
            .ok_or_else(|| {
                CaError::Parse(ParseError(format!(
                    "no {RATE_ELEMENT_ID} element in rate page"
                )))
            })?;
        quote
            .text()
            .trim()
            .parse()
            .map_err(|err: std::num::ParseFloatError| CaError::Parse(ParseError(err.to_string())))
    }
}

/// Stand-in collaborator for pinned sources; never actually called.
struct Offline;

impl Transport for Offline {
    fn get(&self, url: &str, _: &str, _: &str) -> Result<ca_core::Response, TransportError> {
        Err(TransportError::Network {
            url: url.to_string(),
            message: "offline".to_string(),
        })
    }
}

impl XmlParser for Offline {
    fn parse(&self, _: &[u8]) -> Result<ca_core::Document, ParseError> {
        Err(ParseError("offline".to_string()))
    }
}
