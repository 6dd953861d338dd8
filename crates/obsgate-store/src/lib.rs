//! Obsgate Store Library
//!
//! This crate is the single place that touches the `object_store` API surface.
//! It provides:
//!
//! - [`StoreHandle`] — a closed set of concrete backends, tagged with their
//!   capability set (`handle` module). URL signing is available only on the
//!   cloud backends; the classification is structural, derived from the
//!   variant, never from configuration.
//! - store resolution (`resolve` module) — a bound strategy that fixes one
//!   handle for the process lifetime, and an unbound strategy that produces a
//!   handle per request from a caller-supplied URL.
//! - the storage facade (`ops` module) — one free function per gateway
//!   operation, taking a resolved handle and a validated request.

pub mod handle;
pub mod ops;
pub mod resolve;

// Re-export commonly used types
pub use handle::{Backend, StoreHandle};
pub use resolve::{
    BoundResolver, ClientConfig, DefaultStoreFactory, StoreFactory, StoreResolver, UnboundResolver,
};
