//! Folio application library
//!
//! Wires the book catalog and user account modules into the Folio kernel and
//! HTTP server.
#![recursion_limit = "256"]

pub mod app;
pub mod modules;

pub use app::App;
