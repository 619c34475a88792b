//! Collection filters
//!
//! A filter is a single query parameter on a collection GET. Identifier
//! filters must be well-formed UUIDs; text filters only need to be non-empty.

use crate::api::error::ValidationError;
use crate::api::identifier;

/// How a filter value is checked before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    /// Free text such as a resource name.
    Text,
    /// A parent resource identifier.
    Identifier,
}

/// Filter for resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFilter {
    pub param: &'static str,
    pub value: String,
    pub shape: FilterShape,
}

impl ResourceFilter {
    /// Filter on a free-text parameter, e.g. `name`.
    pub fn text(param: &'static str, value: &str) -> Self {
        Self {
            param,
            value: value.to_string(),
            shape: FilterShape::Text,
        }
    }

    /// Filter on a parent identifier, e.g. `hosting_environment_id`.
    pub fn identifier(param: &'static str, value: &str) -> Self {
        Self {
            param,
            value: value.to_string(),
            shape: FilterShape::Identifier,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.shape {
            FilterShape::Text if self.value.is_empty() => {
                Err(ValidationError::EmptyFilter { field: self.param })
            }
            FilterShape::Text => Ok(()),
            FilterShape::Identifier => identifier::validate_field(self.param, &self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_filter() {
        assert!(ResourceFilter::text("name", "my env").validate().is_ok());
        assert!(matches!(
            ResourceFilter::text("name", "").validate(),
            Err(ValidationError::EmptyFilter { field: "name" })
        ));
    }

    #[test]
    fn test_identifier_filter() {
        let valid = "550e8400-e29b-41d4-a716-446655440000";
        assert!(ResourceFilter::identifier("datalake_id", valid).validate().is_ok());

        assert!(matches!(
            ResourceFilter::identifier("datalake_id", "").validate(),
            Err(ValidationError::EmptyIdentifier { field: "datalake_id" })
        ));
        assert!(matches!(
            ResourceFilter::identifier("datalake_id", "bad-uuid").validate(),
            Err(ValidationError::MalformedIdentifier { field: "datalake_id", .. })
        ));
    }
}
