//! Runtime validation of Endevor response payloads.
//!
//! The service's JSON is loosely typed and varies across versions, so no
//! payload is trusted until it decodes into one of the wire shapes below.
//! [`decode`] reports the first structural mismatch (missing field, wrong
//! primitive type, out-of-range stage number) as a [`ValidationError`]
//! naming the entity; extra fields are tolerated everywhere.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use endevor_types::{DependentElementAddress, Element, ElementAddress, StageNumber};

/// A response payload that does not conform to its expected structure.
#[derive(Debug, thiserror::Error)]
#[error("invalid {entity} in Endevor response: {source}")]
pub struct ValidationError {
    entity: &'static str,
    #[source]
    source: serde_json::Error,
}

impl ValidationError {
    /// The entity shape the payload failed to match.
    pub fn entity(&self) -> &'static str {
        self.entity
    }
}

/// Decode a raw JSON value into an expected shape, or report the first
/// structural mismatch.
pub(crate) fn decode<T: DeserializeOwned>(
    entity: &'static str,
    raw: serde_json::Value,
) -> Result<T, ValidationError> {
    serde_json::from_value(raw).map_err(|source| ValidationError { entity, source })
}

/// The JSON envelope wrapped around most Endevor responses.
///
/// Every field defaults: error bodies from older deployments omit pieces
/// of the envelope, and a partial envelope must still be loggable.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RestResponseBody {
    #[serde(default)]
    pub return_code: i32,
    #[serde(default)]
    pub reason_code: i32,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

/// One repository record from the instance listing; only the name is
/// consumed.
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryRecord {
    pub name: String,
}

/// One element record from a listing call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ElementRecord {
    pub env_name: String,
    pub stg_num: StageNumber,
    pub sys_name: String,
    pub sbs_name: String,
    pub type_name: String,
    pub elm_name: String,
    pub file_ext: String,
}

impl From<ElementRecord> for Element {
    fn from(record: ElementRecord) -> Self {
        Self {
            address: ElementAddress {
                environment: record.env_name,
                stage_number: record.stg_num,
                system: record.sys_name,
                subsystem: record.sbs_name,
                element_type: record.type_name,
                element: record.elm_name,
            },
            file_ext: record.file_ext,
        }
    }
}

/// One ACM component record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ComponentRecord {
    pub env_name: String,
    pub stg_num: StageNumber,
    pub sys_name: String,
    pub sbs_name: String,
    pub type_name: String,
    pub elm_name: String,
}

impl From<ComponentRecord> for DependentElementAddress {
    fn from(record: ComponentRecord) -> Self {
        Self {
            environment: record.env_name,
            stage_number: record.stg_num,
            system: record.sys_name,
            subsystem: record.sbs_name,
            element_type: record.type_name,
            element: record.elm_name,
        }
    }
}

/// The first data entry of an ACM query response: the queried element plus
/// its component list. Each component is validated individually so one
/// malformed entry cannot poison the rest.
#[derive(Debug, Deserialize)]
pub(crate) struct ComponentsRecord {
    pub components: Vec<serde_json::Value>,
}
