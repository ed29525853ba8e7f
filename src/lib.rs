pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
/// Test fixtures shared with the router tests under `tests/`; not part of the public API
#[doc(hidden)]
pub mod testing;
