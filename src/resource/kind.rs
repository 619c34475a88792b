//! Resource kinds
//!
//! A resource kind is described once, as a trait implementation on its
//! response type: where it lives, what its create and update payloads look
//! like, and which pre-checks run before a create is sent.

use super::status::Lifecycle;
use crate::api::error::ValidationError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A resource kind served under `/<COLLECTION>` and `/<COLLECTION>/<id>`.
pub trait Resource: DeserializeOwned + Send + 'static {
    /// Plural path segment of the collection.
    const COLLECTION: &'static str;
    /// Human readable name used in logs.
    const KIND: &'static str;

    /// Creation payload. Never carries server-assigned fields.
    type Create: Serialize + Sync;

    /// Server-assigned identifier.
    fn id(&self) -> &str;

    /// Checks run before a create request is issued.
    fn validate_create(_request: &Self::Create) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// A resource kind supporting partial (PATCH) updates.
pub trait Updatable: Resource {
    /// Update payload: only descriptive, mutable fields. Absent fields are
    /// left untouched by the server.
    type Update: Serialize + Sync;
}

/// A resource kind carrying a server-owned lifecycle status.
pub trait HasStatus: Resource {
    type Status: Lifecycle;

    fn status(&self) -> Self::Status;
}
