//! Publish API metadata, readme, changelog and taxonomy classification to an
//! Apimap catalog from a CI pipeline.
//!
//! - [`apimap`] - Token exchange, HTTP transport and resource synchronization
//! - [`catalog`] - Ordered upload of one API version
//! - [`config`] - Action inputs
//! - [`payload`] - Local payload files and catalog documents
//! - [`pipeline`] - Runner workflow commands, OIDC token and event context
//! - [`logging`] - Subscriber setup

pub mod apimap;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod payload;
pub mod pipeline;
