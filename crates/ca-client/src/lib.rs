//! # ca-client
//!
//! The read-oriented client facade for CostAgent RS.
//!
//! An [`Agent`] owns the credentials and the transport/parser collaborators,
//! fetches raw XML resources, runs the entity resolvers over them and
//! memoizes each logical query through the cache gateway. The exchange-rate
//! service and a reqwest-backed transport live here too.

pub mod agent;
pub mod exchange;
pub mod http;
pub mod resolve;

pub use agent::{Agent, HOME_CURRENCY};
pub use exchange::{ExchangeRates, FALLBACK_USD_RATE};
pub use http::HttpTransport;
pub use resolve::ResolveContext;
