//! Flat-file memory of user-declared facts
//!
//! Every fact is one line of a plain text log:
//! `[YYYY-MM-DD HH:MM] <body>`
//!
//! The whole log is loaded into a single blob at startup and that blob is
//! injected into every prompt sent to the inference backend.

pub mod store;

pub use store::MemoryStore;
