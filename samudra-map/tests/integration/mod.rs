//! Integration tests for samudra-map
//!
//! Exercise the public API end to end on small lattices and rasters:
//! the reference scenarios, cross-algorithm properties, and live sessions on
//! tokio's paused clock.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p samudra-map --test integration
//! ```

mod common;
mod properties;
mod scenarios;
mod sessions;
