//! Core types and trait definitions for the Census person registry.
//!
//! This crate is deliberately free of HTTP, database, and image
//! dependencies. Every other crate depends on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod person;
pub mod store;

pub use error::{Error, Result};
