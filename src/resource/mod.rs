//! Resource abstraction layer
//!
//! Every resource kind in the control plane exposes the same operations over
//! `/<collection>` and `/<collection>/<id>`. This module implements them once,
//! parameterized by the kind's schema.
//!
//! # Architecture
//!
//! - [`kind`] - Traits describing a kind: path, payloads, status
//! - [`client`] - The generic create/list/get/filter/update/delete engine
//! - [`filter`] - Single-parameter collection filters and their validation
//! - [`status`] - Lifecycle state machines shared by all status enums
//!
//! # Example
//!
//! ```no_run
//! use traceforce::{Client, ClientOptions};
//! use traceforce::models::UpdateDatalakeRequest;
//!
//! # async fn example(client: Client, id: &str) -> traceforce::Result<()> {
//! let renamed = client
//!     .datalakes()
//!     .update(id, &UpdateDatalakeRequest::rename("analytics"))
//!     .await?;
//! println!("{} is {}", renamed.name, renamed.status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod filter;
pub mod kind;
pub mod status;

pub use client::ResourceClient;
pub use filter::{FilterShape, ResourceFilter};
pub use kind::{HasStatus, Resource, Updatable};
pub use status::{count_by_status, Lifecycle};
