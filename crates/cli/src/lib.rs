//! `cartrack` terminal front-end library crate.
//!
//! Re-exports internal modules for unit testing. The binary entrypoint
//! lives in `main.rs`.

pub mod commands;
pub mod render;
