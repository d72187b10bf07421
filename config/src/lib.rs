//! # Config Crate
//!
//! Centralized configuration constants for the resin base tools.
//! All magic numbers used by the flattening, trimming, bevel and channel
//! engines are defined here so the geometry crates stay free of literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{BOTTOM_TOLERANCE, BASE_BEVEL_DEPTH};
//!
//! let floor = 0.0;
//! let snapped = [0.01, 0.04].iter().all(|z| *z < floor + BOTTOM_TOLERANCE);
//! assert!(snapped);
//! assert!(BASE_BEVEL_DEPTH > 0.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Exact values**: Changing a tolerance changes printed output

pub mod constants;

#[cfg(test)]
mod tests;
