//! Resource identifier validation
//!
//! Every path-addressed call checks its identifiers here before a URL is
//! built, so malformed input never reaches the network.

use super::error::ValidationError;
use uuid::Uuid;

/// Length of the canonical hyphenated form (8-4-4-4-12).
const HYPHENATED_LEN: usize = 36;

/// Validate the `id` argument of an item operation.
pub fn validate(id: &str) -> Result<(), ValidationError> {
    validate_field("id", id)
}

/// Validate an identifier, naming `field` in the error.
///
/// Only the canonical hyphenated form is accepted, in either case. The
/// braced, URN and 32-digit simple forms that [`Uuid::try_parse`] also
/// understands are rejected.
pub fn validate_field(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyIdentifier { field });
    }

    if value.len() != HYPHENATED_LEN || Uuid::try_parse(value).is_err() {
        return Err(ValidationError::MalformedIdentifier {
            field,
            value: value.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_canonical_uuid() {
        assert!(validate("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate("550E8400-E29B-41D4-A716-446655440000").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            validate(""),
            Err(ValidationError::EmptyIdentifier { field: "id" })
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            validate("not-a-uuid"),
            Err(ValidationError::MalformedIdentifier { field: "id", .. })
        ));
        assert!(validate("550e8400-e29b-41d4-a716-44665544000g").is_err());
        assert!(validate("550e8400-e29b-41d4-a716-4466554400").is_err());
    }

    #[test]
    fn test_rejects_non_canonical_forms() {
        assert!(validate("550e8400e29b41d4a716446655440000").is_err());
        assert!(validate("{550e8400-e29b-41d4-a716-446655440000}").is_err());
        assert!(validate("urn:uuid:550e8400-e29b-41d4-a716-446655440000").is_err());
    }

    #[test]
    fn test_field_name_is_reported() {
        let err = validate_field("source_app_id", "").unwrap_err();
        assert_eq!(err.to_string(), "source_app_id cannot be empty");
    }
}
