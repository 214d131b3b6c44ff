//! # ca-core
//!
//! Core types, traits, and utilities for CostAgent RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Credentials loading and validation
//! - The XML document model and parser seam
//! - The transport seam
//! - The cache provider seam and gateway

pub mod cache;
pub mod config;
pub mod error;
pub mod result;
pub mod transport;
pub mod xml;

pub use cache::{CacheGateway, CacheProvider, MemoryCacheProvider, Namespace};
pub use config::Credentials;
pub use error::{CaError, ParseError, TransportError};
pub use result::CaResult;
pub use transport::{Response, Transport};
pub use xml::{Document, Node, XmlParser};

/// Primary key type for remote entities.
pub type Id = i64;
