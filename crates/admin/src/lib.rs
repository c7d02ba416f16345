//! PayFlow admin console library.
//!
//! Drives the withdrawal approval workflow against the PayFlow services:
//! sign in, list withdrawal requests, approve or reject pending ones, read
//! analytics and export them to Excel. All business rules live server-side;
//! this crate fetches snapshots, sends decisions and reloads.
//!
//! The `payflow` binary in `payflow-cli` is a thin front-end over
//! [`controller::AdminScreen`] and [`login::submit`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod login;
pub mod notify;
pub mod session;
pub mod viewmodel;
pub mod views;

#[cfg(test)]
mod testing;

pub use api::{AdminApi, PayflowClient};
pub use config::AdminConfig;
pub use controller::{AdminScreen, AdminTab, Mount, Route};
pub use error::{ClientError, WorkflowError};
pub use session::{FileSessionStore, Session, SessionStore};
