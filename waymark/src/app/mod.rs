//! Application bootstrap and lifecycle.
//!
//! [`WaymarkApp`] sequences the startup every frontend shares: file logging
//! first, then the Tokio runtime the location pipeline runs on. Frontends
//! hold the instance for the life of the process and spawn their pipeline
//! tasks on its handle.

mod bootstrap;
mod error;

pub use bootstrap::WaymarkApp;
pub use error::AppError;
