//! # Catalog Gateway Library
//!
//! Authenticated REST facade over a data-catalog API: caches the service
//! credential, guards routes behind catalog-issued bearer tokens and projects
//! raw lineage into a node/edge graph.
//!
//! Modules:
//! - `config` — YAML service configuration, defaults and validation
//! - `cache` — credential lifecycle and the single-flight credential cache
//! - `upstream` — HTTP client for the catalog API and its OAuth grants
//! - `auth` — user login, token validation and outbound request headers
//! - `lineage` — lineage endpoints and the graph projector
//! - `server` — axum routes, extractors and the error envelope

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod lineage;
pub mod observability;
pub mod server;
pub mod upstream;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::error::{GatewayError, GatewayResult};
pub use crate::lineage::graph::{project, LineageGraph};
