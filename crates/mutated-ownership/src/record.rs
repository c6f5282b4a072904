//! Ownership records
//!
//! Provides [`OwnershipRecord`], one `metadata.managedFields` entry: a field
//! manager and the serialized field-path set it last applied.

use crate::error::RecordError;
use mutated_fieldpath::{DecodeError, FieldPathSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One managed-fields entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipRecord {
    /// Field manager (actor) identifier
    #[serde(default)]
    pub manager: String,

    /// `Apply` or `Update`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// API version the fields were recorded against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Last change timestamp, kept opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Encoding of `fields_v1`, normally `FieldsV1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_type: Option<String>,

    /// Serialized field-path set
    #[serde(default, rename = "fieldsV1", skip_serializing_if = "Option::is_none")]
    pub fields_v1: Option<Value>,

    /// Subresource the manager wrote through, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subresource: Option<String>,
}

impl OwnershipRecord {
    /// Create record with a manager and FieldsV1 payload
    #[must_use]
    pub fn new(manager: impl Into<String>, fields_v1: Value) -> Self {
        Self {
            manager: manager.into(),
            fields_type: Some("FieldsV1".to_string()),
            fields_v1: Some(fields_v1),
            ..Self::default()
        }
    }

    /// Decode the owned field-path set
    ///
    /// A string payload is treated as raw FieldsV1 JSON text.
    ///
    /// # Errors
    /// Returns [`DecodeError`] if the payload is missing or malformed
    pub fn decode_fields(&self) -> Result<FieldPathSet, DecodeError> {
        match &self.fields_v1 {
            None => Err(DecodeError::Missing),
            Some(Value::String(raw)) => FieldPathSet::from_fields_v1_slice(raw.as_bytes()),
            Some(value) => FieldPathSet::from_fields_v1(value),
        }
    }

    /// Raw payload for diagnostics
    #[must_use]
    pub fn raw_fields(&self) -> String {
        match &self.fields_v1 {
            None => String::new(),
            Some(Value::String(raw)) => raw.clone(),
            Some(value) => value.to_string(),
        }
    }

    /// Read `metadata.managedFields` of a resource
    ///
    /// A resource without the list has no records.
    ///
    /// # Errors
    /// Returns [`RecordError`] if the list or one of its entries has the wrong shape
    pub fn from_resource(resource: &Value) -> Result<Vec<Self>, RecordError> {
        let Some(entries) = resource.pointer("/metadata/managedFields") else {
            return Ok(Vec::new());
        };
        let entries = match entries {
            Value::Null => return Ok(Vec::new()),
            Value::Array(entries) => entries,
            Value::Bool(_) => return Err(RecordError::NotAList("boolean")),
            Value::Number(_) => return Err(RecordError::NotAList("number")),
            Value::String(_) => return Err(RecordError::NotAList("string")),
            Value::Object(_) => return Err(RecordError::NotAList("object")),
        };

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Self::deserialize(entry).map_err(|source| RecordError::InvalidEntry { index, source })
            })
            .collect()
    }
}
