//! RabbitMQ HTTP Management API client.
//!
//! Provides an asynchronous client for the HTTP API exposed by the
//! `rabbitmq_management` plugin. Every operation encodes its path parameters,
//! issues a single request against the `/api/` root with basic-auth
//! credentials, and returns the server's JSON response unchanged.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ManagementClient, ManagementClientBuilder};
pub use models::{
    ExchangeDefinition, PermissionsDefinition, QueueDefinition, QueueListQuery, UserDefinition,
    VhostDefinition,
};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = rabbitmq_mgmt_core::Result<T>;
