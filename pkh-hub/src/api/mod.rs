//! HTTP API for pkh-hub
//!
//! Thin shell over the library core: handlers parse/trim arguments,
//! delegate to the gateway or engine, and shape responses.

pub mod canonical;
pub mod documents;
pub mod health;

pub use canonical::canonical_routes;
pub use documents::document_routes;
pub use health::health_routes;
