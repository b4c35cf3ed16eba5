//! Apimap catalog interaction module
//!
//! This module provides the pieces needed to talk to an Apimap instance:
//! credential exchange, the HTTP transport, and the idempotent resource
//! synchronizer built on top of it.
//!
//! # Module Structure
//!
//! - [`auth`] - Exchange a federated identity token for an Apimap bearer token
//! - [`http`] - HTTP transport bound to a base endpoint and bearer credential
//! - [`rest`] - Get-or-create and create-or-update resource algorithms
//!
//! # Example
//!
//! ```ignore
//! use apimap_sync::apimap::{http::ApimapHttpClient, rest};
//!
//! async fn example(bearer: Option<&str>) -> anyhow::Result<()> {
//!     let client = ApimapHttpClient::new("https://apimap.example.com/", bearer)?;
//!     let resource = rest::Resource::json("api", "billing-api", serde_json::json!({}));
//!     let outcome = rest::get_or_create(&client, &resource, None).await;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod http;
pub mod rest;
