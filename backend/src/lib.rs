//! PartFinder backend library.
//!
//! Hexagonal layout: `domain` holds the marketplace rules and ports,
//! `inbound` the HTTP and WebSocket adapters, `outbound` the database,
//! change-feed, geocoding and hosted-service adapters.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
