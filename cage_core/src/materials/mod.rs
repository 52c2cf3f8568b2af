//! # Materials Database
//!
//! Reinforcing steel definitions and unit weight lookups.
//!
//! ## Example
//!
//! ```rust
//! use cage_core::materials::{BarSize, unit_weight};
//!
//! assert_eq!(BarSize::N24.unit_weight_kg_per_m(), 3.551);
//! assert_eq!(unit_weight("N24"), Some(3.551));
//! ```

pub mod rebar;

pub use rebar::{designations, unit_weight, BarSize};
