//! # directory
//!
//! `directory` talks to the users collection of a cloud directory service.
//! It owns the client-credentials login against the identity endpoint and
//! the four user calls (lookup, create, patch, delete) plus license
//! assignment.
//!
//! The bearer token is acquired lazily by the [`Session`] and kept for the
//! rest of the process. There is no refresh.
mod client;

pub use client::*;
pub mod config;
pub mod error;
pub mod schema;
pub mod session;

pub use error::{DirectoryError, DirectoryResult};
pub use reqwest::StatusCode;
pub use session::{Session, SessionToken};
