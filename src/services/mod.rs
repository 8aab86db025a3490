//! Service layer for business logic
//!
//! HTTP handlers delegate to these services; none of them touch HTTP types.

pub mod geoip;
mod link_service;
mod ping_service;

pub use geoip::{GeoIpLookup, GeoIpProvider};
pub use link_service::*;
pub use ping_service::*;
