//! Configuration
//!
//! Static configuration is loaded once at startup (TOML file + environment)
//! and handed to the HTTP layer as an immutable `Arc<StaticConfig>`.

pub mod args;
mod structs;

pub use args::Args;
pub use structs::*;
