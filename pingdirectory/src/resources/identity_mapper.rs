//! Identity Mapper resources

use std::collections::BTreeSet;
use tfplug::schema::{AttributeType, Schema, SchemaBuilder};
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};
use tfplug::Value;

use super::{
    computed_attribute, description_attribute, enabled_attribute, extension_argument_attribute,
    extension_class_attribute, id_attribute, name_attribute, require_for_type, type_attribute,
    ConfigModel, ConfigResource,
};
use crate::api::{ConfigObject, IdentityMapperAttributes, Operation};
use crate::convert::{
    bool_type_or_nil, is_empty_string, request_string, request_string_set, string_set,
    string_type_or_nil,
};
use crate::operations::{
    add_bool_operation_if_necessary, add_string_operation_if_necessary,
    add_string_set_operations_if_necessary,
};

pub type IdentityMapperResource = ConfigResource<IdentityMapperModel>;

pub const TYPES: &[&str] = &["exact-match", "regular-expression", "aggregate", "third-party"];

const LABEL: &str = "Identity Mapper";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityMapperModel {
    pub id: Value<String>,
    pub name: Value<String>,
    pub r#type: Value<String>,
    pub match_attribute: Value<BTreeSet<String>>,
    pub match_base_dn: Value<BTreeSet<String>>,
    pub match_filter: Value<String>,
    pub match_pattern: Value<String>,
    pub replace_pattern: Value<String>,
    pub all_included_identity_mapper: Value<BTreeSet<String>>,
    pub any_included_identity_mapper: Value<BTreeSet<String>>,
    pub extension_class: Value<String>,
    pub extension_argument: Value<BTreeSet<String>>,
    pub description: Value<String>,
    pub enabled: Value<bool>,
}

impl ConfigModel for IdentityMapperModel {
    type Attributes = IdentityMapperAttributes;

    const RESOURCE_NAME: &'static str = "identity_mapper";
    const LABEL: &'static str = LABEL;

    const TYPE_SPECIFIC: &'static [(&'static str, &'static [&'static str])] = &[
        ("match_attribute", &["exact-match", "regular-expression"]),
        ("match_base_dn", &["exact-match", "regular-expression"]),
        ("match_filter", &["exact-match", "regular-expression"]),
        ("match_pattern", &["regular-expression"]),
        ("replace_pattern", &["regular-expression"]),
        ("all_included_identity_mapper", &["aggregate"]),
        ("any_included_identity_mapper", &["aggregate"]),
        ("extension_class", &["third-party"]),
        ("extension_argument", &["third-party"]),
    ];

    fn schema(is_default: bool) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description(if is_default {
                "Manages an Identity Mapper that already exists on the server."
            } else {
                "Manages an Identity Mapper."
            })
            .attribute(id_attribute())
            .attribute(name_attribute(LABEL))
            .attribute(type_attribute(LABEL, TYPES, is_default))
            .attribute(
                computed_attribute(
                    "match_attribute",
                    AttributeType::string_set(),
                    "Specifies the attribute whose value should exactly match the ID string provided to this identity mapper.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "match_base_dn",
                    AttributeType::string_set(),
                    "Specifies the set of base DNs below which to search for users.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "match_filter",
                    AttributeType::String,
                    "An optional filter that mapped users must match.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "match_pattern",
                    AttributeType::String,
                    "Specifies the regular expression pattern that is used to identify portions of the ID string that will be replaced.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "replace_pattern",
                    AttributeType::String,
                    "Specifies the replacement pattern that should be used for substrings in the ID string that match the provided regular expression pattern.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "all_included_identity_mapper",
                    AttributeType::string_set(),
                    "The set of identity mappers that must all match the target entry. Each identity mapper must uniquely match the same target entry.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "any_included_identity_mapper",
                    AttributeType::string_set(),
                    "The set of identity mappers that will be used to identify the target entry. At least one identity mapper must uniquely match an entry.",
                )
                .build(),
            )
            .attribute(extension_class_attribute(LABEL))
            .attribute(extension_argument_attribute(LABEL, is_default))
            .attribute(description_attribute(LABEL, is_default))
            .attribute(enabled_attribute(LABEL, is_default))
            .build()
    }

    fn from_value(value: &DynamicValue) -> tfplug::Result<Self> {
        Ok(Self {
            id: value.get_value("id")?,
            name: value.get_value("name")?,
            r#type: value.get_value("type")?,
            match_attribute: value.get_value("match_attribute")?,
            match_base_dn: value.get_value("match_base_dn")?,
            match_filter: value.get_value("match_filter")?,
            match_pattern: value.get_value("match_pattern")?,
            replace_pattern: value.get_value("replace_pattern")?,
            all_included_identity_mapper: value.get_value("all_included_identity_mapper")?,
            any_included_identity_mapper: value.get_value("any_included_identity_mapper")?,
            extension_class: value.get_value("extension_class")?,
            extension_argument: value.get_value("extension_argument")?,
            description: value.get_value("description")?,
            enabled: value.get_value("enabled")?,
        })
    }

    fn to_value(&self) -> DynamicValue {
        let mut value = DynamicValue::object();
        value.set_value("id", &self.id);
        value.set_value("name", &self.name);
        value.set_value("type", &self.r#type);
        value.set_value("match_attribute", &self.match_attribute);
        value.set_value("match_base_dn", &self.match_base_dn);
        value.set_value("match_filter", &self.match_filter);
        value.set_value("match_pattern", &self.match_pattern);
        value.set_value("replace_pattern", &self.replace_pattern);
        value.set_value(
            "all_included_identity_mapper",
            &self.all_included_identity_mapper,
        );
        value.set_value(
            "any_included_identity_mapper",
            &self.any_included_identity_mapper,
        );
        value.set_value("extension_class", &self.extension_class);
        value.set_value("extension_argument", &self.extension_argument);
        value.set_value("description", &self.description);
        value.set_value("enabled", &self.enabled);
        value
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn type_name(&self) -> Option<&str> {
        self.r#type.as_deref()
    }

    fn add_request(&self) -> IdentityMapperAttributes {
        IdentityMapperAttributes {
            match_attribute: request_string_set(&self.match_attribute),
            match_base_dn: request_string_set(&self.match_base_dn),
            match_filter: request_string(&self.match_filter),
            match_pattern: request_string(&self.match_pattern),
            replace_pattern: request_string(&self.replace_pattern),
            all_included_identity_mapper: request_string_set(&self.all_included_identity_mapper),
            any_included_identity_mapper: request_string_set(&self.any_included_identity_mapper),
            extension_class: request_string(&self.extension_class),
            extension_argument: request_string_set(&self.extension_argument),
            description: request_string(&self.description),
            enabled: self.enabled.known().copied(),
        }
    }

    fn read_response(&mut self, object: &ConfigObject<IdentityMapperAttributes>, expected: &Self) {
        let a = &object.attributes;
        self.id = Value::Known(object.id.clone());
        self.r#type = object.type_name().map(str::to_string).into();
        self.match_attribute = string_set(a.match_attribute.clone());
        self.match_base_dn = string_set(a.match_base_dn.clone());
        self.match_filter = string_type_or_nil(
            a.match_filter.clone(),
            is_empty_string(&expected.match_filter),
        );
        self.match_pattern = string_type_or_nil(
            a.match_pattern.clone(),
            is_empty_string(&expected.match_pattern),
        );
        self.replace_pattern = string_type_or_nil(
            a.replace_pattern.clone(),
            is_empty_string(&expected.replace_pattern),
        );
        self.all_included_identity_mapper = string_set(a.all_included_identity_mapper.clone());
        self.any_included_identity_mapper = string_set(a.any_included_identity_mapper.clone());
        self.extension_class = string_type_or_nil(
            a.extension_class.clone(),
            is_empty_string(&expected.extension_class),
        );
        self.extension_argument = string_set(a.extension_argument.clone());
        self.description = string_type_or_nil(
            a.description.clone(),
            is_empty_string(&expected.description),
        );
        self.enabled = bool_type_or_nil(a.enabled);
    }

    fn create_operations(plan: &Self, state: &Self) -> Vec<Operation> {
        let mut ops = Vec::new();
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.match_attribute,
            &state.match_attribute,
            "matchAttribute",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.match_base_dn,
            &state.match_base_dn,
            "matchBaseDN",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.match_filter,
            &state.match_filter,
            "matchFilter",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.match_pattern,
            &state.match_pattern,
            "matchPattern",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.replace_pattern,
            &state.replace_pattern,
            "replacePattern",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.all_included_identity_mapper,
            &state.all_included_identity_mapper,
            "allIncludedIdentityMapper",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.any_included_identity_mapper,
            &state.any_included_identity_mapper,
            "anyIncludedIdentityMapper",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.extension_class,
            &state.extension_class,
            "extensionClass",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.extension_argument,
            &state.extension_argument,
            "extensionArgument",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.description,
            &state.description,
            "description",
        );
        add_bool_operation_if_necessary(&mut ops, &plan.enabled, &state.enabled, "enabled");
        ops
    }

    fn validate_type(type_name: &str, config: &DynamicValue) -> Vec<Diagnostic> {
        match type_name {
            "regular-expression" => require_for_type(LABEL, type_name, config, "match_pattern")
                .into_iter()
                .collect(),
            "third-party" => require_for_type(LABEL, type_name, config, "extension_class")
                .into_iter()
                .collect(),
            // either list of included mappers will do
            "aggregate" => {
                let all = require_for_type(LABEL, type_name, config, "all_included_identity_mapper");
                let any = require_for_type(LABEL, type_name, config, "any_included_identity_mapper");
                match (all, any) {
                    (Some(_), Some(_)) => vec![Diagnostic::error(
                        "Missing required attribute",
                        format!(
                            "At least one of 'all_included_identity_mapper' or 'any_included_identity_mapper' must be set for {} resources with 'type' '{}'",
                            LABEL, type_name
                        ),
                    )],
                    _ => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn type_defaults(type_name: &str) -> Vec<(&'static str, Dynamic)> {
        match type_name {
            "exact-match" | "regular-expression" => vec![(
                "match_attribute",
                Dynamic::List(vec![Dynamic::String("uid".to_string())]),
            )],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::api::OperationKind;
    use serde_json::json;

    fn s(v: &str) -> Value<String> {
        Value::Known(v.to_string())
    }

    fn set(values: &[&str]) -> Value<BTreeSet<String>> {
        Value::Known(values.iter().map(|v| v.to_string()).collect())
    }

    fn regex_mapper() -> IdentityMapperModel {
        IdentityMapperModel {
            name: s("email"),
            r#type: s("regular-expression"),
            match_attribute: set(&["mail"]),
            match_base_dn: set(&["ou=people,dc=example,dc=com"]),
            match_pattern: s("@example.com$"),
            replace_pattern: s(""),
            enabled: Value::Known(true),
            ..Default::default()
        }
    }

    #[test]
    fn add_request_body() {
        let body = serde_json::to_value(regex_mapper().add_request()).unwrap();
        assert_eq!(
            body,
            json!({
                "matchAttribute": ["mail"],
                "matchBaseDN": ["ou=people,dc=example,dc=com"],
                "matchPattern": "@example.com$",
                "enabled": true
            })
        );
    }

    #[test]
    fn read_response_keeps_configured_empty_replace_pattern() {
        let object: ConfigObject<IdentityMapperAttributes> = serde_json::from_value(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:identity-mapper:regular-expression"],
            "id": "email",
            "matchAttribute": ["mail"],
            "matchBaseDN": ["ou=people,dc=example,dc=com"],
            "matchPattern": "@example.com$",
            "enabled": true
        }))
        .unwrap();

        let expected = regex_mapper();
        let mut state = expected.clone();
        state.read_response(&object, &expected);

        assert_eq!(state.id, s("email"));
        assert_eq!(state.replace_pattern, s(""));
        assert_eq!(state.match_filter, Value::Null);
        assert_eq!(state.all_included_identity_mapper, set(&[]));
        assert_eq!(state.extension_argument, set(&[]));
    }

    #[test]
    fn base_dn_changes_use_server_path() {
        let state = regex_mapper();
        let mut plan = regex_mapper();
        plan.match_base_dn = set(&["ou=admins,dc=example,dc=com"]);

        let ops = IdentityMapperModel::create_operations(&plan, &state);
        assert_eq!(
            ops,
            vec![
                Operation::new(OperationKind::Add, "matchBaseDN")
                    .with_values(vec!["ou=admins,dc=example,dc=com".to_string()]),
                Operation::new(OperationKind::Remove, "matchBaseDN")
                    .with_values(vec!["ou=people,dc=example,dc=com".to_string()]),
            ]
        );
    }

    #[test]
    fn aggregate_needs_one_included_list() {
        let mut config = DynamicValue::object();
        assert_eq!(
            IdentityMapperModel::validate_type("aggregate", &config).len(),
            1
        );

        config.set_attribute(
            "any_included_identity_mapper",
            Dynamic::List(vec![Dynamic::String("Exact Match".to_string())]),
        );
        assert!(IdentityMapperModel::validate_type("aggregate", &config).is_empty());
    }

    #[test]
    fn regular_expression_needs_pattern() {
        let config = DynamicValue::object();
        let diags = IdentityMapperModel::validate_type("regular-expression", &config);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].detail.contains("'match_pattern'"));
        assert!(IdentityMapperModel::validate_type("exact-match", &config).is_empty());
    }

    #[test]
    fn match_attribute_defaults_to_uid() {
        let defaults = IdentityMapperModel::type_defaults("exact-match");
        assert_eq!(
            defaults,
            vec![(
                "match_attribute",
                Dynamic::List(vec![Dynamic::String("uid".to_string())])
            )]
        );
        assert!(IdentityMapperModel::type_defaults("aggregate").is_empty());
    }
}
