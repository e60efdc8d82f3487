//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: Diesel/PostgreSQL repositories and embedded migrations
//! - **change_feed**: in-process broadcast of inserted notification rows
//! - **geocoding**: Nominatim place search and reverse lookup
//! - **hosted**: sign-in and image storage on the hosted service
//!
//! Adapters translate between domain types and wire or row formats. They
//! contain no business logic.

pub mod change_feed;
pub mod geocoding;
pub mod hosted;
pub mod persistence;
