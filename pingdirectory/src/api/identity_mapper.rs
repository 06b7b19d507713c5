//! Identity Mapper configuration objects

use super::common::ConfigCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityMapperAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_attribute: Option<Vec<String>>,
    #[serde(rename = "matchBaseDN", skip_serializing_if = "Option::is_none")]
    pub match_base_dn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_included_identity_mapper: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_included_identity_mapper: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_argument: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl ConfigCategory for IdentityMapperAttributes {
    const PATH: &'static str = "identity-mappers";
    const SCHEMA: &'static str = "identity-mapper";
    const NAME_FIELD: &'static str = "mapperName";
}
