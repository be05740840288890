//! Forkful - A lightweight terminal recipe browser.
//!
//! This crate fetches a recipe catalog from a remote JSON endpoint and loads
//! recipe images through a two-tier (memory + disk) cache fronted by an
//! asynchronous load coordinator.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing UI-facing state machines.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "forkful";
