//! Client for the catalog search API.
//!
//! [`Catalog`] is the seam the search session talks to, [`CatalogClient`] is the implementation
//! that goes over the network.

pub mod client;
pub mod errors;
pub mod models;

pub use client::{Catalog, CatalogClient};
pub use errors::CatalogError;
pub use models::{MediaKind, SearchRequest, SearchResponse, SearchResult};
