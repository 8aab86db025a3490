//! linkping - URL shortener with click analytics and a host ping checker
//!
//! # Architecture
//! - `storage`: SeaORM persistence for short links and click logs
//! - `services`: shortening, redirect recording, stats, ping and GeoIP
//! - `api`: HTTP routes and middleware
//! - `config`: TOML + environment configuration
//! - `runtime`: startup, server mode and shutdown
//! - `system`: logging setup

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
