//! CLI command implementations.
//!
//! Commands return their output as text; `main` prints it.

pub mod cart;
pub mod catalog;
