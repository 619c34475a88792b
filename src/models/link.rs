//! Source app to datalake links
//!
//! A pure association between a source app and a datalake. The hosting
//! environment id is derived by the server and read-only. Links cannot be
//! updated, only created and deleted.

use crate::api::error::{Result, ValidationError};
use crate::api::identifier;
use crate::resource::{Resource, ResourceClient, ResourceFilter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAppDatalakeLink {
    pub id: String,
    pub source_app_id: String,
    pub datalake_id: String,
    pub hosting_environment_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSourceAppDatalakeLinkRequest {
    pub source_app_id: String,
    pub datalake_id: String,
}

impl CreateSourceAppDatalakeLinkRequest {
    pub fn new(source_app_id: impl Into<String>, datalake_id: impl Into<String>) -> Self {
        Self {
            source_app_id: source_app_id.into(),
            datalake_id: datalake_id.into(),
        }
    }
}

impl Resource for SourceAppDatalakeLink {
    const COLLECTION: &'static str = "source-apps-datalakes";
    const KIND: &'static str = "source app datalake link";

    type Create = CreateSourceAppDatalakeLinkRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate_create(
        request: &CreateSourceAppDatalakeLinkRequest,
    ) -> std::result::Result<(), ValidationError> {
        identifier::validate_field("source_app_id", &request.source_app_id)?;
        identifier::validate_field("datalake_id", &request.datalake_id)
    }
}

impl ResourceClient<'_, SourceAppDatalakeLink> {
    /// List the datalakes a source app feeds.
    pub async fn list_by_source_app(&self, source_app_id: &str) -> Result<Vec<SourceAppDatalakeLink>> {
        self.filter(&ResourceFilter::identifier("source_app_id", source_app_id))
            .await
    }

    /// List the source apps feeding a datalake.
    pub async fn list_by_datalake(&self, datalake_id: &str) -> Result<Vec<SourceAppDatalakeLink>> {
        self.filter(&ResourceFilter::identifier("datalake_id", datalake_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_create_validation() {
        let cases = [
            (CreateSourceAppDatalakeLinkRequest::new("", VALID), "source_app_id cannot be empty"),
            (CreateSourceAppDatalakeLinkRequest::new(VALID, ""), "datalake_id cannot be empty"),
            (
                CreateSourceAppDatalakeLinkRequest::new("invalid-uuid", VALID),
                "invalid UUID format for source_app_id",
            ),
            (
                CreateSourceAppDatalakeLinkRequest::new(VALID, "invalid-uuid"),
                "invalid UUID format for datalake_id",
            ),
        ];

        for (request, expected) in cases {
            let err = SourceAppDatalakeLink::validate_create(&request).unwrap_err();
            assert!(err.to_string().contains(expected), "{}", err);
        }

        assert!(SourceAppDatalakeLink::validate_create(&CreateSourceAppDatalakeLinkRequest::new(
            VALID, VALID
        ))
        .is_ok());
    }
}
