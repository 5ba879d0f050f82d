//! Value types exchanged with secret sources.
//!
//! Secret values and credentials travel as [`SecretString`] so they cannot leak
//! through `Debug`, `Display`, structured logging, or serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

const REDACTED: &str = "[REDACTED]";

/// A string whose contents are redacted everywhere except [`SecretString::expose_secret`].
///
/// The backing memory is zeroed on drop. Serializing writes `"[REDACTED]"`;
/// deserializing accepts the real value so credentials can be read from config.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the plain value. Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Take the plain value out. The emptied wrapper is still zeroed on drop.
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({})", REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One entry of an organization's secret listing. Carries no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretDescriptor {
    /// Opaque identifier assigned by the remote service
    pub id: String,

    pub organization_id: String,

    /// Human-readable name the secret was declared with
    pub key: String,

    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub revision_date: Option<DateTime<Utc>>,
}

impl SecretDescriptor {
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            key: key.into(),
            creation_date: None,
            revision_date: None,
        }
    }
}

/// A single secret as returned by "get value by id".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRecord {
    pub id: String,

    pub organization_id: String,

    pub key: String,

    pub value: SecretString,

    #[serde(default)]
    pub note: Option<String>,

    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub revision_date: Option<DateTime<Utc>>,
}

impl SecretRecord {
    /// Build a record from its descriptor and the fetched value.
    pub fn from_descriptor(descriptor: SecretDescriptor, value: impl Into<SecretString>) -> Self {
        Self {
            id: descriptor.id,
            organization_id: descriptor.organization_id,
            key: descriptor.key,
            value: value.into(),
            note: None,
            creation_date: descriptor.creation_date,
            revision_date: descriptor.revision_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_redacts_formatting() {
        let secret = SecretString::new("hunter2");
        assert_eq!(format!("{:?}", secret), "SecretString([REDACTED])");
        assert_eq!(secret.to_string(), "[REDACTED]");
        assert_eq!(secret.expose_secret(), "hunter2");
        assert_eq!(secret.len(), 7);
    }

    #[test]
    fn test_secret_string_serialization_redacts() {
        let json = serde_json::to_string(&SecretString::new("hunter2")).unwrap();
        assert_eq!(json, "\"[REDACTED]\"");

        let parsed: SecretString = serde_json::from_str("\"hunter2\"").unwrap();
        assert_eq!(parsed.into_inner(), "hunter2");
    }

    #[test]
    fn test_descriptor_deserializes_remote_payload() {
        let json = r#"{
            "id": "a1",
            "organizationId": "org-1",
            "key": "db-pass",
            "creationDate": "2024-01-02T03:04:05Z",
            "revisionDate": "2024-02-02T03:04:05Z"
        }"#;
        let descriptor: SecretDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.id, "a1");
        assert_eq!(descriptor.key, "db-pass");
        assert!(descriptor.creation_date.is_some());

        let minimal: SecretDescriptor =
            serde_json::from_str(r#"{"id":"a2","organizationId":"org-1","key":"api-key"}"#)
                .unwrap();
        assert_eq!(minimal, SecretDescriptor::new("a2", "org-1", "api-key"));
    }

    #[test]
    fn test_record_debug_hides_value() {
        let record =
            SecretRecord::from_descriptor(SecretDescriptor::new("a1", "org-1", "db-pass"), "pw");
        let debug = format!("{:?}", record);
        assert!(debug.contains("db-pass"));
        assert!(!debug.contains("\"pw\""));
        assert_eq!(record.value.expose_secret(), "pw");
    }
}
