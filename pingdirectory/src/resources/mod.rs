//! Resource implementations
//!
//! Every configuration category is served by [`ConfigResource`], generic
//! over a [`ConfigModel`] that owns the category's schema, its typed
//! plan/state model and the mapping between that model and the
//! Configuration API.

pub mod access_token_validator;
mod config_resource;
pub mod identity_mapper;
pub mod location;
pub mod sasl_mechanism_handler;

pub use access_token_validator::{AccessTokenValidatorModel, AccessTokenValidatorResource};
pub use config_resource::ConfigResource;
pub use identity_mapper::{IdentityMapperModel, IdentityMapperResource};
pub use location::{LocationModel, LocationResource};
pub use sasl_mechanism_handler::{SaslMechanismHandlerModel, SaslMechanismHandlerResource};

use crate::api::{ApiError, ConfigCategory, ConfigObject, Operation};
use crate::version::ProductVersion;
use tfplug::defaults::StaticDefault;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, Schema};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{StringLength, StringOneOf, StringPattern};
use tfplug::TfplugError;

/// Durations such as `5 m`, `30s` or `2 hours`
pub(crate) const DURATION_PATTERN: &str =
    r"^\d+ ?(ms|milliseconds?|s|seconds?|m|minutes?|h|hours?|d|days?|w|weeks?)$";

/// A configuration category as seen by Terraform
pub trait ConfigModel: Clone + Send + Sync + Sized + 'static {
    type Attributes: ConfigCategory;

    /// Resource name without the provider prefix, e.g. `location`
    const RESOURCE_NAME: &'static str;
    /// Human readable name used in messages, e.g. `Location`
    const LABEL: &'static str;
    /// Attributes that only apply to some values of `type`
    const TYPE_SPECIFIC: &'static [(&'static str, &'static [&'static str])] = &[];
    /// Attributes missing from older servers, with the first version
    /// that supports them
    const VERSION_GATED: &'static [(&'static str, ProductVersion)] = &[];

    fn schema(is_default: bool) -> Schema;

    fn from_value(value: &DynamicValue) -> tfplug::Result<Self>;

    fn to_value(&self) -> DynamicValue;

    fn name(&self) -> Option<&str>;

    /// The `type` discriminator; `None` for untyped categories
    fn type_name(&self) -> Option<&str> {
        None
    }

    /// Body of an add request
    fn add_request(&self) -> Self::Attributes;

    /// Overwrite the model with what the server returned. `expected` is
    /// the plan or prior state and decides between null and `""` for
    /// strings the server omitted.
    fn read_response(&mut self, object: &ConfigObject<Self::Attributes>, expected: &Self);

    /// Operations that turn `state` into `plan`
    fn create_operations(plan: &Self, state: &Self) -> Vec<Operation>;

    /// Checks beyond attribute applicability, e.g. required attributes
    fn validate_type(_type_name: &str, _config: &DynamicValue) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Server defaults for a new object of the given type
    fn type_defaults(_type_name: &str) -> Vec<(&'static str, Dynamic)> {
        Vec::new()
    }
}

pub(crate) fn provider_not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}

pub(crate) fn invalid_model(err: TfplugError) -> Diagnostic {
    Diagnostic::error("Invalid resource data", err.to_string())
}

/// Error diagnostic for a failed API call, carrying the server's detail
pub(crate) fn api_error(action: &str, err: &ApiError) -> Diagnostic {
    let mut detail = format!("Error: {}", err);
    if let Some(server_detail) = err.detail() {
        detail.push_str(&format!(", detail: {}", server_detail));
    }
    tracing::error!("An error occurred while attempting to {}: {}", action, detail);
    Diagnostic::error(
        format!("An error occurred while attempting to {}", action),
        detail,
    )
}

pub(crate) fn resource_not_found(label: &str, name: &str) -> Diagnostic {
    tracing::warn!(name = %name, "{} not found, removing from state", label);
    Diagnostic::warning(
        "Resource not found",
        format!(
            "The requested {} '{}' could not be found on the server and will be removed from state",
            label, name
        ),
    )
}

pub(crate) fn id_attribute() -> Attribute {
    AttributeBuilder::new("id", AttributeType::String)
        .description("Placeholder name of this object required by Terraform.")
        .computed()
        .plan_modifier(UseStateForUnknown::create())
        .build()
}

pub(crate) fn name_attribute(label: &str) -> Attribute {
    AttributeBuilder::new("name", AttributeType::String)
        .description(&format!("Name of this {}.", label))
        .required()
        .validator(StringLength::at_least(1))
        .plan_modifier(RequiresReplace::create())
        .build()
}

/// `type` is fixed at creation; adopted objects report it back
pub(crate) fn type_attribute(label: &str, types: &[&str], is_default: bool) -> Attribute {
    let builder = AttributeBuilder::new("type", AttributeType::String)
        .description(&format!(
            "The type of {} resource. Options are [{}]",
            label,
            types.join(", ")
        ))
        .validator(StringOneOf::create(types));
    if is_default {
        builder
            .optional()
            .computed()
            .plan_modifier(UseStateForUnknown::create())
            .build()
    } else {
        builder
            .required()
            .plan_modifier(RequiresReplace::create())
            .build()
    }
}

/// Optional attribute the server fills in when left unset
pub(crate) fn computed_attribute(
    name: &str,
    r#type: AttributeType,
    description: &str,
) -> AttributeBuilder {
    AttributeBuilder::new(name, r#type)
        .description(description)
        .optional()
        .computed()
        .plan_modifier(UseStateForUnknown::create())
}

pub(crate) fn duration_attribute(name: &str, description: &str) -> Attribute {
    computed_attribute(name, AttributeType::String, description)
        .validator(StringPattern::create(
            DURATION_PATTERN,
            "must be a duration such as '5 m' or '30 s'",
        ))
        .build()
}

pub(crate) fn description_attribute(label: &str, is_default: bool) -> Attribute {
    let description = format!("A description for this {}", label);
    if is_default {
        computed_attribute("description", AttributeType::String, &description).build()
    } else {
        AttributeBuilder::new("description", AttributeType::String)
            .description(&description)
            .optional()
            .build()
    }
}

pub(crate) fn enabled_attribute(label: &str, is_default: bool) -> Attribute {
    let description = format!("Indicates whether this {} is enabled for use.", label);
    if is_default {
        computed_attribute("enabled", AttributeType::Bool, &description).build()
    } else {
        AttributeBuilder::new("enabled", AttributeType::Bool)
            .description(&description)
            .required()
            .build()
    }
}

pub(crate) fn extension_class_attribute(label: &str) -> Attribute {
    computed_attribute(
        "extension_class",
        AttributeType::String,
        &format!(
            "The fully-qualified name of the Java class providing the logic for the Third Party {}.",
            label
        ),
    )
    .build()
}

pub(crate) fn extension_argument_attribute(label: &str, is_default: bool) -> Attribute {
    let builder = computed_attribute(
        "extension_argument",
        AttributeType::string_set(),
        &format!(
            "The set of arguments used to customize the behavior for the Third Party {}. Each configuration property should be given in the form 'name=value'.",
            label
        ),
    );
    if is_default {
        builder.build()
    } else {
        builder.default(StaticDefault::string_set(&[])).build()
    }
}

/// Set in configuration with a known, non-empty value
fn is_configured(value: &Dynamic) -> bool {
    match value {
        Dynamic::Null | Dynamic::Unknown => false,
        Dynamic::String(s) => !s.is_empty(),
        Dynamic::List(items) => !items.is_empty() && value.is_wholly_known(),
        other => other.is_wholly_known(),
    }
}

fn applies_to(
    attribute: &str,
    type_name: &str,
    table: &[(&'static str, &'static [&'static str])],
) -> bool {
    table
        .iter()
        .find(|(name, _)| *name == attribute)
        .map_or(true, |(_, types)| types.contains(&type_name))
}

/// Errors for attributes set on a type they do not apply to
pub(crate) fn validate_type_specific(
    label: &str,
    type_name: &str,
    config: &DynamicValue,
    table: &[(&'static str, &'static [&'static str])],
) -> Vec<Diagnostic> {
    table
        .iter()
        .filter(|(name, types)| {
            !types.contains(&type_name) && is_configured(&config.get_attribute(name))
        })
        .map(|(name, _)| {
            Diagnostic::error(
                "Invalid attribute for type",
                format!(
                    "Attribute '{}' not supported by {} resources with 'type' '{}'",
                    name, label, type_name
                ),
            )
            .with_attribute(AttributePath::new(name))
        })
        .collect()
}

/// Error when an attribute the type needs is null or `""`; unknown passes
pub(crate) fn require_for_type(
    label: &str,
    type_name: &str,
    config: &DynamicValue,
    attribute: &str,
) -> Option<Diagnostic> {
    match config.get_attribute(attribute) {
        Dynamic::Null => {}
        Dynamic::String(s) if s.is_empty() => {}
        _ => return None,
    }
    Some(
        Diagnostic::error(
            "Missing required attribute",
            format!(
                "Attribute '{}' must be set for {} resources with 'type' '{}'",
                attribute, label, type_name
            ),
        )
        .with_attribute(AttributePath::new(attribute)),
    )
}

/// Replace unknown planned values with the given defaults
pub(crate) fn fill_unknown_defaults(plan: &mut DynamicValue, defaults: Vec<(&str, Dynamic)>) {
    for (name, value) in defaults {
        if plan.get_attribute(name).is_unknown() {
            plan.set_attribute(name, value);
        }
    }
}

/// Unknown values of attributes that do not apply to the type will never
/// be set by the server: plan them as null, or as the empty set
pub(crate) fn null_inapplicable_unknowns(
    plan: &mut DynamicValue,
    schema: &Schema,
    type_name: &str,
    table: &[(&'static str, &'static [&'static str])],
) {
    for attr in &schema.block.attributes {
        if applies_to(&attr.name, type_name, table) || !plan.get_attribute(&attr.name).is_unknown()
        {
            continue;
        }
        let value = match attr.r#type {
            AttributeType::Set(_) | AttributeType::List(_) => Dynamic::List(Vec::new()),
            _ => Dynamic::Null,
        };
        plan.set_attribute(&attr.name, value);
    }
}

/// Errors for attributes the configured server version does not support
pub(crate) fn check_version_gates(
    config: &DynamicValue,
    version: &ProductVersion,
    gates: &[(&'static str, ProductVersion)],
) -> Vec<Diagnostic> {
    gates
        .iter()
        .filter(|(name, minimum)| {
            !version.at_least(minimum) && is_configured(&config.get_attribute(name))
        })
        .map(|(name, minimum)| {
            Diagnostic::error(
                "Attribute not supported by PingDirectory version",
                format!(
                    "Attribute '{}' requires PingDirectory version {} or later, configured version is {}",
                    name, minimum, version
                ),
            )
            .with_attribute(AttributePath::new(name))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::version::{PINGDIRECTORY_9102, PINGDIRECTORY_9200, PINGDIRECTORY_9300};
    use tfplug::schema::{SchemaBuilder, ValidatorRequest};

    const TABLE: &[(&str, &[&str])] = &[
        ("match_pattern", &["regular-expression"]),
        ("match_attribute", &["exact-match", "regular-expression"]),
    ];

    fn config(pairs: &[(&str, Dynamic)]) -> DynamicValue {
        let mut value = DynamicValue::object();
        for (name, v) in pairs {
            value.set_attribute(name, v.clone());
        }
        value
    }

    fn list(values: &[&str]) -> Dynamic {
        Dynamic::List(values.iter().map(|v| Dynamic::String(v.to_string())).collect())
    }

    #[test]
    fn api_error_includes_server_detail() {
        let err = ApiError::Status {
            status: 400,
            message: "Bad Request".to_string(),
            detail: Some("Attribute clientID is required".to_string()),
        };
        let diag = api_error("create the Access Token Validator", &err);
        assert_eq!(
            diag.summary,
            "An error occurred while attempting to create the Access Token Validator"
        );
        assert!(diag.detail.starts_with("Error: API returned error (HTTP 400)"));
        assert!(diag
            .detail
            .ends_with(", detail: Attribute clientID is required"));

        let plain = api_error("read the Location", &ApiError::AuthError);
        assert_eq!(plain.detail, "Error: Authentication failed");
    }

    #[test]
    fn inapplicable_attributes_are_rejected() {
        let diags = validate_type_specific(
            "Identity Mapper",
            "exact-match",
            &config(&[
                ("match_pattern", Dynamic::String("^uid=(.*)$".to_string())),
                ("match_attribute", list(&["uid"])),
            ]),
            TABLE,
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].detail,
            "Attribute 'match_pattern' not supported by Identity Mapper resources with 'type' 'exact-match'"
        );
        assert_eq!(diags[0].attribute, Some(AttributePath::new("match_pattern")));
    }

    #[test]
    fn unknown_and_empty_values_are_not_configured() {
        let diags = validate_type_specific(
            "Identity Mapper",
            "aggregate",
            &config(&[
                ("match_pattern", Dynamic::Unknown),
                ("match_attribute", list(&[])),
            ]),
            TABLE,
        );
        assert!(diags.is_empty());

        let diags = validate_type_specific(
            "Identity Mapper",
            "aggregate",
            &config(&[("match_pattern", Dynamic::String(String::new()))]),
            TABLE,
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn required_attribute_missing() {
        let cfg = config(&[("match_pattern", Dynamic::Unknown)]);
        assert!(require_for_type("Identity Mapper", "regular-expression", &cfg, "match_pattern")
            .is_none());
        let diag = require_for_type("Identity Mapper", "third-party", &cfg, "extension_class")
            .unwrap();
        assert_eq!(diag.attribute, Some(AttributePath::new("extension_class")));

        let empty = config(&[("match_pattern", Dynamic::String(String::new()))]);
        let diag = require_for_type("Identity Mapper", "regular-expression", &empty, "match_pattern")
            .unwrap();
        assert_eq!(diag.summary, "Missing required attribute");
    }

    #[test]
    fn duration_units() {
        let attribute = duration_attribute("otp_validity", "Validity");
        let errors = |value: &str| {
            attribute.validators[0]
                .validate(ValidatorRequest {
                    config_value: Dynamic::String(value.to_string()),
                    path: AttributePath::new("otp_validity"),
                })
                .diagnostics
                .len()
        };

        for ok in [
            "250 ms", "250ms", "1 millisecond", "30 s", "30s", "1 second", "45 seconds",
            "5 m", "5m", "1 minute", "10 minutes", "1 h", "2 hours", "1 d", "7 days", "1 w",
            "2 weeks",
        ] {
            assert_eq!(errors(ok), 0, "{} should be accepted", ok);
        }
        for bad in ["5", "m", "5 mins", "5  m", "-5 s", "1.5 h", "5 M"] {
            assert_eq!(errors(bad), 1, "{} should be rejected", bad);
        }
    }

    #[test]
    fn plan_unknowns_follow_type() {
        let schema = SchemaBuilder::new()
            .attribute(AttributeBuilder::new("match_pattern", AttributeType::String).build())
            .attribute(
                AttributeBuilder::new("match_attribute", AttributeType::string_set()).build(),
            )
            .attribute(AttributeBuilder::new("description", AttributeType::String).build())
            .build();
        let mut plan = config(&[
            ("match_pattern", Dynamic::Unknown),
            ("match_attribute", Dynamic::Unknown),
            ("description", Dynamic::Unknown),
        ]);

        fill_unknown_defaults(&mut plan, vec![("match_attribute", list(&["uid"]))]);
        null_inapplicable_unknowns(&mut plan, &schema, "aggregate", TABLE);

        assert_eq!(plan.get_attribute("match_pattern"), Dynamic::Null);
        assert_eq!(plan.get_attribute("match_attribute"), list(&["uid"]));
        assert_eq!(plan.get_attribute("description"), Dynamic::Unknown);

        let mut plan = config(&[("match_attribute", Dynamic::Unknown)]);
        null_inapplicable_unknowns(&mut plan, &schema, "aggregate", TABLE);
        assert_eq!(plan.get_attribute("match_attribute"), Dynamic::List(vec![]));
    }

    #[test]
    fn version_gates() {
        let gates = &[("encryption_key_pair", PINGDIRECTORY_9200)];
        let cfg = config(&[(
            "encryption_key_pair",
            Dynamic::String("encryption-pair".to_string()),
        )]);

        let diags = check_version_gates(&cfg, &PINGDIRECTORY_9102, gates);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].detail.contains("9.2.0.0"));
        assert_eq!(
            diags[0].attribute,
            Some(AttributePath::new("encryption_key_pair"))
        );

        assert!(check_version_gates(&cfg, &PINGDIRECTORY_9300, gates).is_empty());
        assert!(check_version_gates(&config(&[]), &PINGDIRECTORY_9102, gates).is_empty());
    }

    #[test]
    fn type_attribute_differs_for_default_resources() {
        let creatable = type_attribute("Location", &["a", "b"], false);
        assert!(creatable.required);
        assert!(!creatable.computed);

        let adopted = type_attribute("Location", &["a", "b"], true);
        assert!(adopted.optional);
        assert!(adopted.computed);
        assert_eq!(adopted.description, "The type of Location resource. Options are [a, b]");
    }
}
