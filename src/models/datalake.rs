//! Datalakes
//!
//! A warehouse deployed inside a hosting environment.

use crate::api::error::{Result, ValidationError};
use crate::api::identifier;
use crate::resource::{HasStatus, Lifecycle, Resource, ResourceClient, ResourceFilter, Updatable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatalakeStatus {
    Pending,
    Deployed,
    Ready,
    Failed,
}

impl Lifecycle for DatalakeStatus {
    const INITIAL: Self = Self::Pending;
    const ALL: &'static [Self] = &[Self::Pending, Self::Deployed, Self::Ready, Self::Failed];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Deployed => "deployed",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    fn can_transition(self, to: Self) -> bool {
        use DatalakeStatus::*;
        matches!(
            (self, to),
            (Pending, Deployed) | (Deployed, Ready) | (Pending, Failed) | (Deployed, Failed)
        )
    }

    fn is_operational(self) -> bool {
        self == Self::Ready
    }
}

impl fmt::Display for DatalakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatalakeType {
    #[serde(rename = "bigquery")]
    BigQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datalake {
    pub id: String,
    pub hosting_environment_id: String,
    #[serde(rename = "type")]
    pub kind: DatalakeType,
    pub name: String,
    pub status: DatalakeStatus,
    #[serde(default)]
    pub environment_native_id: String,
    #[serde(default)]
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateDatalakeRequest {
    pub hosting_environment_id: String,
    #[serde(rename = "type")]
    pub kind: DatalakeType,
    pub name: String,
    pub environment_native_id: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateDatalakeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateDatalakeRequest {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl Resource for Datalake {
    const COLLECTION: &'static str = "datalakes";
    const KIND: &'static str = "datalake";

    type Create = CreateDatalakeRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate_create(request: &CreateDatalakeRequest) -> std::result::Result<(), ValidationError> {
        identifier::validate_field("hosting_environment_id", &request.hosting_environment_id)
    }
}

impl Updatable for Datalake {
    type Update = UpdateDatalakeRequest;
}

impl HasStatus for Datalake {
    type Status = DatalakeStatus;

    fn status(&self) -> DatalakeStatus {
        self.status
    }
}

impl ResourceClient<'_, Datalake> {
    /// List datalakes deployed in one hosting environment.
    pub async fn list_by_hosting_environment(
        &self,
        hosting_environment_id: &str,
    ) -> Result<Vec<Datalake>> {
        self.filter(&ResourceFilter::identifier(
            "hosting_environment_id",
            hosting_environment_id,
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_datalake() {
        let datalake: Datalake = serde_json::from_value(json!({
            "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "hosting_environment_id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "bigquery",
            "name": "analytics",
            "status": "deployed",
            "environment_native_id": "test-project-id",
            "region": "us-central1",
            "created_at": "2025-01-15T10:30:00Z",
            "updated_at": "2025-01-16T08:00:00.123Z"
        }))
        .unwrap();

        assert_eq!(datalake.kind, DatalakeType::BigQuery);
        assert_eq!(datalake.status, DatalakeStatus::Deployed);
        assert_eq!(datalake.region, "us-central1");
        assert!(datalake.updated_at > datalake.created_at);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_value::<DatalakeStatus>(json!("Ready"));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_requires_valid_hosting_environment_id() {
        let mut request = CreateDatalakeRequest {
            hosting_environment_id: String::new(),
            kind: DatalakeType::BigQuery,
            name: "analytics".to_string(),
            environment_native_id: "test-project-id".to_string(),
            region: "us-central1".to_string(),
        };
        assert!(matches!(
            Datalake::validate_create(&request),
            Err(ValidationError::EmptyIdentifier {
                field: "hosting_environment_id"
            })
        ));

        request.hosting_environment_id = "550e8400-e29b-41d4-a716-446655440000".to_string();
        assert!(Datalake::validate_create(&request).is_ok());
        assert_eq!(
            serde_json::to_value(&request).unwrap()["type"],
            json!("bigquery")
        );
    }
}
