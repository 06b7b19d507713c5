//! Common types for the PingDirectory Configuration API

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Prefix of every configuration schema URN
pub const SCHEMA_URN_PREFIX: &str = "urn:pingidentity:schemas:configuration:2.0";

/// A configuration category served under `/config/<PATH>`
///
/// Implemented by the attribute struct of each category. The struct holds
/// every attribute of every type in the category as optional camelCase
/// fields.
pub trait ConfigCategory:
    Serialize + DeserializeOwned + Default + Clone + Debug + Send + Sync
{
    /// Path segment under `/config`, e.g. `access-token-validators`
    const PATH: &'static str;
    /// Schema name used in URNs, e.g. `access-token-validator`
    const SCHEMA: &'static str;
    /// Field naming the object in add requests, e.g. `validatorName`
    const NAME_FIELD: &'static str;

    fn collection_path() -> String {
        format!("/{}", Self::PATH)
    }

    fn object_path(name: &str) -> String {
        format!("/{}/{}", Self::PATH, urlencoding::encode(name))
    }

    /// Schema URN for an object of the given type; untyped categories
    /// such as locations have no type suffix
    fn schema_urn(type_name: Option<&str>) -> String {
        match type_name {
            Some(t) => format!("{}:{}:{}", SCHEMA_URN_PREFIX, Self::SCHEMA, t),
            None => format!("{}:{}", SCHEMA_URN_PREFIX, Self::SCHEMA),
        }
    }
}

/// A configuration object as returned by the server
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigObject<A> {
    #[serde(default)]
    pub schemas: Vec<String>,
    pub id: String,
    #[serde(flatten)]
    pub attributes: A,
}

impl<A: ConfigCategory> ConfigObject<A> {
    /// Type discriminator taken from the object's schema URN
    pub fn type_name(&self) -> Option<&str> {
        let prefix = format!("{}:{}:", SCHEMA_URN_PREFIX, A::SCHEMA);
        self.schemas.iter().find_map(|s| s.strip_prefix(&prefix))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(rename = "Resources", default = "Vec::new")]
    pub resources: Vec<T>,
    #[serde(rename = "totalResults", default)]
    pub total_results: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Remove,
    Replace,
}

/// A single PATCH instruction; values always travel as strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub op: OperationKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl Operation {
    pub fn new(op: OperationKind, path: &str) -> Self {
        Self {
            op,
            path: path.to_string(),
            value: None,
            values: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = Some(values);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub operations: Vec<Operation>,
}

impl UpdateRequest {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }
}

/// SCIM-style error body
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub status: Option<String>,
    #[serde(rename = "scimType")]
    pub scim_type: Option<String>,
    pub detail: Option<String>,
}
