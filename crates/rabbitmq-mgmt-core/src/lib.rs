//! # rabbitmq-mgmt-core
//!
//! Shared foundation for the RabbitMQ HTTP Management API client.
//!
//! This crate provides the error taxonomy, HTTP client tuning, endpoint
//! configuration, and path/query encoding helpers used by the management
//! client crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status classification
//! - [`config`] - Management endpoint configuration
//! - [`client`] - HTTP client tuning and retry policies
//! - [`path`] - Percent-encoding of path segments
//! - [`query`] - Query parameter assembly

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod path;
pub mod query;

// Re-export commonly used types
pub use error::{Error, Result};
