//! Connections
//!
//! Environment-scoped connectivity records.

use crate::api::error::Result;
use crate::resource::{HasStatus, Lifecycle, Resource, ResourceClient, ResourceFilter, Updatable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
}

impl Lifecycle for ConnectionStatus {
    const INITIAL: Self = Self::Disconnected;
    const ALL: &'static [Self] = &[Self::Disconnected, Self::Connected];

    fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
        }
    }

    fn can_transition(self, to: Self) -> bool {
        self != to
    }

    fn is_operational(self) -> bool {
        self == Self::Connected
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    #[serde(default)]
    pub org_id: Option<String>,
    pub name: String,
    pub environment_type: String,
    pub environment_native_id: String,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateConnectionRequest {
    pub name: String,
    /// Kind of environment, e.g. `aws` or `gcp`.
    pub environment_type: String,
    pub environment_native_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateConnectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateConnectionRequest {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl Resource for Connection {
    const COLLECTION: &'static str = "connections";
    const KIND: &'static str = "connection";

    type Create = CreateConnectionRequest;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Updatable for Connection {
    type Update = UpdateConnectionRequest;
}

impl HasStatus for Connection {
    type Status = ConnectionStatus;

    fn status(&self) -> ConnectionStatus {
        self.status
    }
}

impl ResourceClient<'_, Connection> {
    /// Find the connection with the given name.
    pub async fn get_by_name(&self, name: &str) -> Result<Connection> {
        self.find_one(&ResourceFilter::text("name", name)).await
    }
}
