//! Hosting environments
//!
//! The cloud account or project a customer connects to Traceforce. Created
//! `pending`; the post-connection call moves it to `connected` once the
//! customer-side infrastructure is in place.

use crate::api::error::{Result, ValidationError};
use crate::api::identifier;
use crate::resource::{HasStatus, Lifecycle, Resource, ResourceClient, ResourceFilter, Updatable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostingEnvironmentStatus {
    Pending,
    Connected,
    Disconnected,
}

impl Lifecycle for HostingEnvironmentStatus {
    const INITIAL: Self = Self::Pending;
    const ALL: &'static [Self] = &[Self::Pending, Self::Connected, Self::Disconnected];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }

    fn can_transition(self, to: Self) -> bool {
        use HostingEnvironmentStatus::*;
        matches!(
            (self, to),
            (Pending, Connected) | (Pending, Disconnected) | (Connected, Disconnected) | (Disconnected, Connected)
        )
    }

    fn is_operational(self) -> bool {
        self == Self::Connected
    }
}

impl fmt::Display for HostingEnvironmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostingEnvironmentType {
    CustomerManaged,
    TraceforceManaged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudProvider {
    Aws,
    Gcp,
    Azure,
}

/// A hosting environment as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostingEnvironment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HostingEnvironmentType,
    #[serde(default)]
    pub cloud_provider: Option<CloudProvider>,
    pub native_id: String,
    pub status: HostingEnvironmentStatus,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub control_plane_aws_account_id: Option<String>,
    #[serde(default)]
    pub control_plane_role_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateHostingEnvironmentRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HostingEnvironmentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<CloudProvider>,
    pub native_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateHostingEnvironmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateHostingEnvironmentRequest {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Infrastructure details reported once the customer side is provisioned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfrastructureMetadata {
    /// JSON document mapping module names to versions, sent as a string.
    pub terraform_module_versions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_plane_aws_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_plane_role_name: Option<String>,
}

impl InfrastructureMetadata {
    /// Encode `versions` into the nested module-version document.
    pub fn from_module_versions(versions: &BTreeMap<String, String>) -> serde_json::Result<Self> {
        Ok(Self {
            terraform_module_versions: serde_json::to_string(versions)?,
            control_plane_aws_account_id: None,
            control_plane_role_name: None,
        })
    }

    /// Check the nested document independently of the outer request.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        const FIELD: &str = "terraform_module_versions";

        if self.terraform_module_versions.trim().is_empty() {
            return Err(ValidationError::EmptyNestedDocument { field: FIELD });
        }

        serde_json::from_str::<serde_json::Value>(&self.terraform_module_versions)
            .map(|_| ())
            .map_err(|source| ValidationError::MalformedNestedDocument {
                field: FIELD,
                source,
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostConnectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infrastructure: Option<InfrastructureMetadata>,
}

impl PostConnectionRequest {
    pub fn new(infrastructure: InfrastructureMetadata) -> Self {
        Self {
            infrastructure: Some(infrastructure),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        match &self.infrastructure {
            Some(infrastructure) => infrastructure.validate(),
            None => Err(ValidationError::NilRequest {
                operation: "post-connection",
            }),
        }
    }
}

impl Resource for HostingEnvironment {
    const COLLECTION: &'static str = "hosting-environments";
    const KIND: &'static str = "hosting environment";

    type Create = CreateHostingEnvironmentRequest;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Updatable for HostingEnvironment {
    type Update = UpdateHostingEnvironmentRequest;
}

impl HasStatus for HostingEnvironment {
    type Status = HostingEnvironmentStatus;

    fn status(&self) -> HostingEnvironmentStatus {
        self.status
    }
}

impl ResourceClient<'_, HostingEnvironment> {
    /// Find the hosting environment with the given name.
    pub async fn get_by_name(&self, name: &str) -> Result<HostingEnvironment> {
        self.find_one(&ResourceFilter::text("name", name)).await
    }

    /// Report that customer-side infrastructure is in place, moving the
    /// environment from `pending` to `connected`.
    ///
    /// The id, the payload and its nested module-version document are all
    /// checked before anything is sent.
    #[tracing::instrument(skip(self, request))]
    pub async fn post_connection(
        &self,
        id: &str,
        request: &PostConnectionRequest,
    ) -> Result<HostingEnvironment> {
        identifier::validate(id)?;
        request.validate()?;

        let env: HostingEnvironment = self.post_action(id, "post-connection", request).await?;

        if env.status != HostingEnvironmentStatus::Connected {
            tracing::warn!(
                "Post-connection for {} returned status {}, expected connected",
                id,
                env.status
            );
        }
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "prod",
            "type": "customer_managed",
            "cloud_provider": "gcp",
            "native_id": "test-project-123",
            "status": "pending",
            "org_id": "org-1",
            "created_at": "2025-01-15T10:30:00Z",
            "updated_at": "2025-01-15T10:30:00Z"
        })
    }

    #[test]
    fn test_decode_hosting_environment() {
        let env: HostingEnvironment = serde_json::from_value(sample()).unwrap();

        assert_eq!(env.kind, HostingEnvironmentType::CustomerManaged);
        assert_eq!(env.cloud_provider, Some(CloudProvider::Gcp));
        assert_eq!(env.status, HostingEnvironmentStatus::Pending);
        assert_eq!(env.org_id.as_deref(), Some("org-1"));
        assert!(env.control_plane_role_name.is_none());
    }

    #[test]
    fn test_decode_without_cloud_provider() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("cloud_provider");

        let env: HostingEnvironment = serde_json::from_value(value).unwrap();
        assert!(env.cloud_provider.is_none());
    }

    #[test]
    fn test_create_request_has_no_server_fields() {
        let request = CreateHostingEnvironmentRequest {
            name: "prod".to_string(),
            kind: HostingEnvironmentType::TraceforceManaged,
            cloud_provider: Some(CloudProvider::Aws),
            native_id: "123456789012".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "prod",
                "type": "traceforce_managed",
                "cloud_provider": "aws",
                "native_id": "123456789012"
            })
        );
    }

    #[test]
    fn test_update_request_only_sends_present_fields() {
        assert_eq!(
            serde_json::to_value(UpdateHostingEnvironmentRequest::default()).unwrap(),
            json!({})
        );
        assert_eq!(
            serde_json::to_value(UpdateHostingEnvironmentRequest::rename("x")).unwrap(),
            json!({"name": "x"})
        );
    }

    #[test]
    fn test_post_connection_request_validation() {
        assert!(matches!(
            PostConnectionRequest::default().validate(),
            Err(ValidationError::NilRequest { .. })
        ));

        let mut metadata = InfrastructureMetadata {
            terraform_module_versions: String::new(),
            control_plane_aws_account_id: None,
            control_plane_role_name: None,
        };
        assert!(matches!(
            PostConnectionRequest::new(metadata.clone()).validate(),
            Err(ValidationError::EmptyNestedDocument { .. })
        ));

        metadata.terraform_module_versions = "not json".to_string();
        assert!(matches!(
            PostConnectionRequest::new(metadata.clone()).validate(),
            Err(ValidationError::MalformedNestedDocument { .. })
        ));

        metadata.terraform_module_versions = "{}".to_string();
        assert!(PostConnectionRequest::new(metadata).validate().is_ok());
    }

    #[test]
    fn test_module_versions_are_nested_as_string() {
        let versions = BTreeMap::from([("datalake".to_string(), "1.4.0".to_string())]);
        let metadata = InfrastructureMetadata::from_module_versions(&versions).unwrap();
        let body = serde_json::to_value(PostConnectionRequest::new(metadata)).unwrap();

        assert_eq!(
            body,
            json!({
                "infrastructure": {
                    "terraform_module_versions": "{\"datalake\":\"1.4.0\"}"
                }
            })
        );
    }
}
