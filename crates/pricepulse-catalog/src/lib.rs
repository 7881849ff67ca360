//! Typed HTTP client for the remote Catalog Service.
//!
//! The service owns search ranking, fuzzy grouping across retailers and
//! recommendations; this crate only issues the three read-only `GET` calls
//! and decodes their payloads into [`pricepulse_core`] types.

pub mod client;
pub mod error;
mod retry;

pub use client::CatalogClient;
pub use error::CatalogError;
