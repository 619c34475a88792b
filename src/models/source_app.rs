//! Source apps
//!
//! SaaS applications whose data is pulled into a hosting environment. Which
//! datalakes a source app feeds is modelled by
//! [`SourceAppDatalakeLink`](super::SourceAppDatalakeLink), not by a field here.

use crate::api::error::{Result, ValidationError};
use crate::api::identifier;
use crate::resource::{HasStatus, Lifecycle, Resource, ResourceClient, ResourceFilter, Updatable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceAppStatus {
    Pending,
    Deployed,
    Connected,
    Disconnected,
}

impl Lifecycle for SourceAppStatus {
    const INITIAL: Self = Self::Pending;
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Deployed,
        Self::Connected,
        Self::Disconnected,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Deployed => "deployed",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }

    fn can_transition(self, to: Self) -> bool {
        use SourceAppStatus::*;
        matches!(
            (self, to),
            (Pending, Deployed) | (Deployed, Connected) | (Connected, Disconnected) | (Disconnected, Connected)
        )
    }

    fn is_operational(self) -> bool {
        self == Self::Connected
    }
}

impl fmt::Display for SourceAppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceAppType {
    Salesforce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceApp {
    pub id: String,
    pub hosting_environment_id: String,
    #[serde(rename = "type")]
    pub kind: SourceAppType,
    pub name: String,
    pub status: SourceAppStatus,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub pod_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSourceAppRequest {
    pub hosting_environment_id: String,
    #[serde(rename = "type")]
    pub kind: SourceAppType,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateSourceAppRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateSourceAppRequest {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl Resource for SourceApp {
    const COLLECTION: &'static str = "source-apps";
    const KIND: &'static str = "source app";

    type Create = CreateSourceAppRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate_create(request: &CreateSourceAppRequest) -> std::result::Result<(), ValidationError> {
        identifier::validate_field("hosting_environment_id", &request.hosting_environment_id)
    }
}

impl Updatable for SourceApp {
    type Update = UpdateSourceAppRequest;
}

impl HasStatus for SourceApp {
    type Status = SourceAppStatus;

    fn status(&self) -> SourceAppStatus {
        self.status
    }
}

impl ResourceClient<'_, SourceApp> {
    /// List source apps belonging to one hosting environment.
    pub async fn list_by_hosting_environment(
        &self,
        hosting_environment_id: &str,
    ) -> Result<Vec<SourceApp>> {
        self.filter(&ResourceFilter::identifier(
            "hosting_environment_id",
            hosting_environment_id,
        ))
        .await
    }
}
