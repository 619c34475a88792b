//! Header composition
//!
//! The header set is built once when the client is constructed: bearer
//! authorization plus a snapshot of the caller's constant headers. Reserved
//! headers always win over caller-supplied ones.

use super::error::ValidationError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use std::collections::HashMap;

/// Header names the client owns. Compared case-insensitively.
pub const RESERVED_HEADERS: &[&str] = &["authorization", "content-type"];

/// Returns true if `name` is owned by the client and cannot be overridden.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_HEADERS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Compose the header set attached to every request.
pub fn compose(api_key: &str, extra: &HashMap<String, String>) -> HashMap<String, String> {
    let mut headers = HashMap::with_capacity(extra.len() + 1);

    for (name, value) in extra {
        if is_reserved(name) {
            tracing::warn!("Ignoring extra header {:?}: reserved by the client", name);
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }

    headers.insert("Authorization".to_string(), format!("Bearer {}", api_key));
    headers
}

/// Convert a composed header set into a [`HeaderMap`].
///
/// The authorization value is marked sensitive so it never shows up in
/// `Debug` output.
pub fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, ValidationError> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ValidationError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let mut header_value =
            HeaderValue::from_str(value).map_err(|e| ValidationError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        if header_name == AUTHORIZATION {
            header_value.set_sensitive(true);
        }
        map.insert(header_name, header_value);
    }

    Ok(map)
}
