//! Inbound adapters translating external requests into domain calls.
//!
//! [`http`] serves the JSON API and health endpoints; [`ws`] pushes live alerts
//! and answers debounced place searches over a WebSocket.

pub mod http;
pub mod ws;
