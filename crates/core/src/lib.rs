//! PayFlow Core - Shared types library.
//!
//! This crate provides the domain types used across the PayFlow console:
//! - `admin` - API client, session store, view-models and console views
//! - `cli` - The `payflow` command-line front-end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! The remote services own every record; these types describe the JSON they
//! exchange with the console.
//!
//! # Modules
//!
//! - [`types`] - IDs, withdrawal status, withdrawal requests, analytics
//!   snapshots, admin profiles, and ruble formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
