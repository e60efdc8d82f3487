//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every HTTP route, currently
//! trace-id propagation.

pub mod trace;

pub use trace::Trace;
