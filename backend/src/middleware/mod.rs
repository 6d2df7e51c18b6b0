//! Request middleware.
//!
//! Purpose: cross-cutting request lifecycle concerns that sit in front of
//! every handler.

pub mod request_trace;

pub use request_trace::RequestTrace;
