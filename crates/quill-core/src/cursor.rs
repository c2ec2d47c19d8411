//! Pagination cursor codec.
//!
//! A cursor is the metadata store's scan resumption key, carried to the
//! client as an opaque token: the key map is serialized as JSON and then
//! base64 encoded. Clients echo the token back verbatim to fetch the next
//! page; its internals are not part of the API contract.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::error::PostError;

/// A single key attribute, tagged with its scalar type.
///
/// Both variants carry the value as a string; `N` values are numerals in
/// string form, matching how the metadata store reports resumption keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAttr {
    S(String),
    N(String),
}

/// A scan resumption key: attribute name to typed value.
pub type ScanKey = BTreeMap<String, KeyAttr>;

/// Encodes a scan key as an opaque cursor token.
pub fn encode(key: &ScanKey) -> String {
    // Serializing a map of strings and tagged strings cannot fail.
    let json = serde_json::to_vec(key).unwrap_or_default();
    general_purpose::STANDARD.encode(json)
}

/// Decodes a cursor token back into a scan key.
///
/// Rejects tokens that are not valid base64, or whose payload is not a
/// JSON map of typed key attributes.
pub fn decode(cursor: &str) -> Result<ScanKey, PostError> {
    let bytes = general_purpose::STANDARD
        .decode(cursor)
        .map_err(|_| PostError::Validation("cursor is not valid base64".into()))?;
    serde_json::from_slice(&bytes)
        .map_err(|_| PostError::Validation("cursor does not decode to a scan key".into()))
}
