//! Access Token Validator resources
//!
//! `pingdirectory_access_token_validator` and
//! `pingdirectory_default_access_token_validator`.

use std::collections::BTreeSet;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{Int64AtLeast, StringOneOf};
use tfplug::Value;

use super::{
    computed_attribute, description_attribute, duration_attribute, enabled_attribute,
    extension_argument_attribute, extension_class_attribute, id_attribute, name_attribute,
    require_for_type, type_attribute, ConfigModel, ConfigResource,
};
use crate::api::{AccessTokenValidatorAttributes, ConfigObject, Operation};
use crate::convert::{
    bool_type_or_nil, int64_type_or_nil, is_empty_string, request_string, request_string_set,
    string_set, string_type_or_nil,
};
use crate::operations::{
    add_bool_operation_if_necessary, add_int64_operation_if_necessary,
    add_string_operation_if_necessary, add_string_set_operations_if_necessary,
};
use crate::version::PINGDIRECTORY_9200;

pub type AccessTokenValidatorResource = ConfigResource<AccessTokenValidatorModel>;

pub const TYPES: &[&str] = &["ping-federate", "jwt", "mock", "third-party"];

const SIGNING_ALGORITHMS: &[&str] = &[
    "HS256", "HS384", "HS512", "RS256", "RS384", "RS512", "ES256", "ES384", "ES512", "PS256",
    "PS384", "PS512",
];

const KEY_ENCRYPTION_ALGORITHMS: &[&str] = &[
    "RSA_OAEP",
    "RSA_OAEP_256",
    "ECDH_ES",
    "ECDH_ES_A128KW",
    "ECDH_ES_A192KW",
    "ECDH_ES_A256KW",
];

const CONTENT_ENCRYPTION_ALGORITHMS: &[&str] = &[
    "A128CBC_HS256",
    "A192CBC_HS384",
    "A256CBC_HS512",
    "A128GCM",
    "A192GCM",
    "A256GCM",
];

const LABEL: &str = "Access Token Validator";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessTokenValidatorModel {
    pub id: Value<String>,
    pub name: Value<String>,
    pub r#type: Value<String>,
    pub extension_class: Value<String>,
    pub extension_argument: Value<BTreeSet<String>>,
    pub allowed_signing_algorithm: Value<BTreeSet<String>>,
    pub signing_certificate: Value<BTreeSet<String>>,
    pub jwks_endpoint_path: Value<String>,
    pub encryption_key_pair: Value<String>,
    pub allowed_key_encryption_algorithm: Value<BTreeSet<String>>,
    pub allowed_content_encryption_algorithm: Value<BTreeSet<String>>,
    pub clock_skew_grace_period: Value<String>,
    pub client_id_claim_name: Value<String>,
    pub scope_claim_name: Value<String>,
    pub client_id: Value<String>,
    pub client_secret: Value<String>,
    pub client_secret_passphrase_provider: Value<String>,
    pub include_aud_parameter: Value<bool>,
    pub access_token_manager_id: Value<String>,
    pub endpoint_cache_refresh: Value<String>,
    pub authorization_server: Value<String>,
    pub identity_mapper: Value<String>,
    pub subject_claim_name: Value<String>,
    pub description: Value<String>,
    pub enabled: Value<bool>,
    pub evaluation_order_index: Value<i64>,
}

impl ConfigModel for AccessTokenValidatorModel {
    type Attributes = AccessTokenValidatorAttributes;

    const RESOURCE_NAME: &'static str = "access_token_validator";
    const LABEL: &'static str = LABEL;

    const TYPE_SPECIFIC: &'static [(&'static str, &'static [&'static str])] = &[
        ("extension_class", &["third-party"]),
        ("extension_argument", &["third-party"]),
        ("allowed_signing_algorithm", &["jwt"]),
        ("signing_certificate", &["jwt"]),
        ("jwks_endpoint_path", &["jwt"]),
        ("encryption_key_pair", &["jwt"]),
        ("allowed_key_encryption_algorithm", &["jwt"]),
        ("allowed_content_encryption_algorithm", &["jwt"]),
        ("clock_skew_grace_period", &["jwt"]),
        ("client_id_claim_name", &["jwt", "mock"]),
        ("scope_claim_name", &["jwt", "mock"]),
        ("client_id", &["ping-federate"]),
        ("client_secret", &["ping-federate"]),
        ("client_secret_passphrase_provider", &["ping-federate"]),
        ("include_aud_parameter", &["ping-federate"]),
        ("access_token_manager_id", &["ping-federate"]),
        ("endpoint_cache_refresh", &["ping-federate"]),
        ("authorization_server", &["ping-federate"]),
    ];

    const VERSION_GATED: &'static [(&'static str, crate::version::ProductVersion)] = &[
        ("encryption_key_pair", PINGDIRECTORY_9200),
        ("allowed_key_encryption_algorithm", PINGDIRECTORY_9200),
        ("allowed_content_encryption_algorithm", PINGDIRECTORY_9200),
    ];

    fn schema(is_default: bool) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description(if is_default {
                "Manages an Access Token Validator that already exists on the server."
            } else {
                "Manages an Access Token Validator."
            })
            .attribute(id_attribute())
            .attribute(name_attribute(LABEL))
            .attribute(type_attribute(LABEL, TYPES, is_default))
            .attribute(extension_class_attribute(LABEL))
            .attribute(extension_argument_attribute(LABEL, is_default))
            .attribute(
                computed_attribute(
                    "allowed_signing_algorithm",
                    AttributeType::string_set(),
                    "Specifies an allow list of JWT signing algorithms that will be accepted by the JWT Access Token Validator.",
                )
                .validator(StringOneOf::create(SIGNING_ALGORITHMS))
                .build(),
            )
            .attribute(
                computed_attribute(
                    "signing_certificate",
                    AttributeType::string_set(),
                    "Specifies the locally stored certificates that may be used to validate the signature of an incoming JWT access token.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "jwks_endpoint_path",
                    AttributeType::String,
                    "The relative path to JWKS endpoint from which to retrieve one or more public signing keys that may be used to validate the signature of an incoming JWT access token.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "encryption_key_pair",
                    AttributeType::String,
                    "The public-private key pair that is used to encrypt the JWT payload. Supported in PingDirectory product version 9.2.0.0+.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "allowed_key_encryption_algorithm",
                    AttributeType::string_set(),
                    "Specifies an allow list of JWT key encryption algorithms that will be accepted by the JWT Access Token Validator. Supported in PingDirectory product version 9.2.0.0+.",
                )
                .validator(StringOneOf::create(KEY_ENCRYPTION_ALGORITHMS))
                .build(),
            )
            .attribute(
                computed_attribute(
                    "allowed_content_encryption_algorithm",
                    AttributeType::string_set(),
                    "Specifies an allow list of JWT content encryption algorithms that will be accepted by the JWT Access Token Validator. Supported in PingDirectory product version 9.2.0.0+.",
                )
                .validator(StringOneOf::create(CONTENT_ENCRYPTION_ALGORITHMS))
                .build(),
            )
            .attribute(duration_attribute(
                "clock_skew_grace_period",
                "Specifies the amount of clock skew that is tolerated by the JWT Access Token Validator when evaluating whether a token is within its valid time interval.",
            ))
            .attribute(
                computed_attribute(
                    "client_id_claim_name",
                    AttributeType::String,
                    "The name of the token claim that contains the OAuth2 client Id.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "scope_claim_name",
                    AttributeType::String,
                    "The name of the token claim that contains the scopes granted by the token.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "client_id",
                    AttributeType::String,
                    "The client identifier to use when authenticating to the PingFederate authorization server.",
                )
                .build(),
            )
            .attribute(
                AttributeBuilder::new("client_secret", AttributeType::String)
                    .description("The client secret to use when authenticating to the PingFederate authorization server.")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                computed_attribute(
                    "client_secret_passphrase_provider",
                    AttributeType::String,
                    "The passphrase provider for obtaining the client secret to use when authenticating to the PingFederate authorization server.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "include_aud_parameter",
                    AttributeType::Bool,
                    "Whether to include the incoming request URL as the \"aud\" parameter when calling the PingFederate introspection endpoint.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "access_token_manager_id",
                    AttributeType::String,
                    "The Access Token Manager instance ID to specify when calling the PingFederate introspection endpoint.",
                )
                .build(),
            )
            .attribute(duration_attribute(
                "endpoint_cache_refresh",
                "How often the Access Token Validator should refresh its stored value of the PingFederate server's token introspection endpoint.",
            ))
            .attribute(
                computed_attribute(
                    "authorization_server",
                    AttributeType::String,
                    "Specifies the external server that will be used to aid in validating access tokens.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "identity_mapper",
                    AttributeType::String,
                    "Specifies the name of the Identity Mapper that should be used for associating user entries with Bearer token subject names.",
                )
                .build(),
            )
            .attribute(
                computed_attribute(
                    "subject_claim_name",
                    AttributeType::String,
                    "The name of the token claim that contains the subject, i.e. the logged-in user in an access token.",
                )
                .build(),
            )
            .attribute(description_attribute(LABEL, is_default))
            .attribute(enabled_attribute(LABEL, is_default))
            .attribute(
                computed_attribute(
                    "evaluation_order_index",
                    AttributeType::Number,
                    "When multiple Access Token Validators are defined for a single Directory Server, this property determines the evaluation order for determining the correct validator class for an access token received by the Directory Server.",
                )
                .validator(Int64AtLeast::create(0))
                .build(),
            )
            .build()
    }

    fn from_value(value: &DynamicValue) -> tfplug::Result<Self> {
        Ok(Self {
            id: value.get_value("id")?,
            name: value.get_value("name")?,
            r#type: value.get_value("type")?,
            extension_class: value.get_value("extension_class")?,
            extension_argument: value.get_value("extension_argument")?,
            allowed_signing_algorithm: value.get_value("allowed_signing_algorithm")?,
            signing_certificate: value.get_value("signing_certificate")?,
            jwks_endpoint_path: value.get_value("jwks_endpoint_path")?,
            encryption_key_pair: value.get_value("encryption_key_pair")?,
            allowed_key_encryption_algorithm: value.get_value("allowed_key_encryption_algorithm")?,
            allowed_content_encryption_algorithm: value
                .get_value("allowed_content_encryption_algorithm")?,
            clock_skew_grace_period: value.get_value("clock_skew_grace_period")?,
            client_id_claim_name: value.get_value("client_id_claim_name")?,
            scope_claim_name: value.get_value("scope_claim_name")?,
            client_id: value.get_value("client_id")?,
            client_secret: value.get_value("client_secret")?,
            client_secret_passphrase_provider: value
                .get_value("client_secret_passphrase_provider")?,
            include_aud_parameter: value.get_value("include_aud_parameter")?,
            access_token_manager_id: value.get_value("access_token_manager_id")?,
            endpoint_cache_refresh: value.get_value("endpoint_cache_refresh")?,
            authorization_server: value.get_value("authorization_server")?,
            identity_mapper: value.get_value("identity_mapper")?,
            subject_claim_name: value.get_value("subject_claim_name")?,
            description: value.get_value("description")?,
            enabled: value.get_value("enabled")?,
            evaluation_order_index: value.get_value("evaluation_order_index")?,
        })
    }

    fn to_value(&self) -> DynamicValue {
        let mut value = DynamicValue::object();
        value.set_value("id", &self.id);
        value.set_value("name", &self.name);
        value.set_value("type", &self.r#type);
        value.set_value("extension_class", &self.extension_class);
        value.set_value("extension_argument", &self.extension_argument);
        value.set_value("allowed_signing_algorithm", &self.allowed_signing_algorithm);
        value.set_value("signing_certificate", &self.signing_certificate);
        value.set_value("jwks_endpoint_path", &self.jwks_endpoint_path);
        value.set_value("encryption_key_pair", &self.encryption_key_pair);
        value.set_value(
            "allowed_key_encryption_algorithm",
            &self.allowed_key_encryption_algorithm,
        );
        value.set_value(
            "allowed_content_encryption_algorithm",
            &self.allowed_content_encryption_algorithm,
        );
        value.set_value("clock_skew_grace_period", &self.clock_skew_grace_period);
        value.set_value("client_id_claim_name", &self.client_id_claim_name);
        value.set_value("scope_claim_name", &self.scope_claim_name);
        value.set_value("client_id", &self.client_id);
        value.set_value("client_secret", &self.client_secret);
        value.set_value(
            "client_secret_passphrase_provider",
            &self.client_secret_passphrase_provider,
        );
        value.set_value("include_aud_parameter", &self.include_aud_parameter);
        value.set_value("access_token_manager_id", &self.access_token_manager_id);
        value.set_value("endpoint_cache_refresh", &self.endpoint_cache_refresh);
        value.set_value("authorization_server", &self.authorization_server);
        value.set_value("identity_mapper", &self.identity_mapper);
        value.set_value("subject_claim_name", &self.subject_claim_name);
        value.set_value("description", &self.description);
        value.set_value("enabled", &self.enabled);
        value.set_value("evaluation_order_index", &self.evaluation_order_index);
        value
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn type_name(&self) -> Option<&str> {
        self.r#type.as_deref()
    }

    fn add_request(&self) -> AccessTokenValidatorAttributes {
        AccessTokenValidatorAttributes {
            extension_class: request_string(&self.extension_class),
            extension_argument: request_string_set(&self.extension_argument),
            allowed_signing_algorithm: request_string_set(&self.allowed_signing_algorithm),
            signing_certificate: request_string_set(&self.signing_certificate),
            jwks_endpoint_path: request_string(&self.jwks_endpoint_path),
            encryption_key_pair: request_string(&self.encryption_key_pair),
            allowed_key_encryption_algorithm: request_string_set(
                &self.allowed_key_encryption_algorithm,
            ),
            allowed_content_encryption_algorithm: request_string_set(
                &self.allowed_content_encryption_algorithm,
            ),
            clock_skew_grace_period: request_string(&self.clock_skew_grace_period),
            client_id_claim_name: request_string(&self.client_id_claim_name),
            scope_claim_name: request_string(&self.scope_claim_name),
            client_id: request_string(&self.client_id),
            client_secret: request_string(&self.client_secret),
            client_secret_passphrase_provider: request_string(
                &self.client_secret_passphrase_provider,
            ),
            include_aud_parameter: self.include_aud_parameter.known().copied(),
            access_token_manager_id: request_string(&self.access_token_manager_id),
            endpoint_cache_refresh: request_string(&self.endpoint_cache_refresh),
            authorization_server: request_string(&self.authorization_server),
            identity_mapper: request_string(&self.identity_mapper),
            subject_claim_name: request_string(&self.subject_claim_name),
            description: request_string(&self.description),
            enabled: self.enabled.known().copied(),
            evaluation_order_index: self.evaluation_order_index.known().copied(),
        }
    }

    // client_secret is never returned by the server and stays as configured
    fn read_response(
        &mut self,
        object: &ConfigObject<AccessTokenValidatorAttributes>,
        expected: &Self,
    ) {
        let a = &object.attributes;
        self.id = Value::Known(object.id.clone());
        self.r#type = object.type_name().map(str::to_string).into();
        self.extension_class = string_type_or_nil(
            a.extension_class.clone(),
            is_empty_string(&expected.extension_class),
        );
        self.extension_argument = string_set(a.extension_argument.clone());
        self.allowed_signing_algorithm = string_set(a.allowed_signing_algorithm.clone());
        self.signing_certificate = string_set(a.signing_certificate.clone());
        self.jwks_endpoint_path = string_type_or_nil(
            a.jwks_endpoint_path.clone(),
            is_empty_string(&expected.jwks_endpoint_path),
        );
        self.encryption_key_pair = string_type_or_nil(
            a.encryption_key_pair.clone(),
            is_empty_string(&expected.encryption_key_pair),
        );
        self.allowed_key_encryption_algorithm =
            string_set(a.allowed_key_encryption_algorithm.clone());
        self.allowed_content_encryption_algorithm =
            string_set(a.allowed_content_encryption_algorithm.clone());
        self.clock_skew_grace_period = string_type_or_nil(
            a.clock_skew_grace_period.clone(),
            is_empty_string(&expected.clock_skew_grace_period),
        );
        self.client_id_claim_name = string_type_or_nil(
            a.client_id_claim_name.clone(),
            is_empty_string(&expected.client_id_claim_name),
        );
        self.scope_claim_name = string_type_or_nil(
            a.scope_claim_name.clone(),
            is_empty_string(&expected.scope_claim_name),
        );
        self.client_id =
            string_type_or_nil(a.client_id.clone(), is_empty_string(&expected.client_id));
        self.client_secret_passphrase_provider = string_type_or_nil(
            a.client_secret_passphrase_provider.clone(),
            is_empty_string(&expected.client_secret_passphrase_provider),
        );
        self.include_aud_parameter = bool_type_or_nil(a.include_aud_parameter);
        self.access_token_manager_id = string_type_or_nil(
            a.access_token_manager_id.clone(),
            is_empty_string(&expected.access_token_manager_id),
        );
        self.endpoint_cache_refresh = string_type_or_nil(
            a.endpoint_cache_refresh.clone(),
            is_empty_string(&expected.endpoint_cache_refresh),
        );
        self.authorization_server = string_type_or_nil(
            a.authorization_server.clone(),
            is_empty_string(&expected.authorization_server),
        );
        self.identity_mapper = string_type_or_nil(
            a.identity_mapper.clone(),
            is_empty_string(&expected.identity_mapper),
        );
        self.subject_claim_name = string_type_or_nil(
            a.subject_claim_name.clone(),
            is_empty_string(&expected.subject_claim_name),
        );
        self.description = string_type_or_nil(
            a.description.clone(),
            is_empty_string(&expected.description),
        );
        self.enabled = bool_type_or_nil(a.enabled);
        self.evaluation_order_index = int64_type_or_nil(a.evaluation_order_index);
    }

    fn create_operations(plan: &Self, state: &Self) -> Vec<Operation> {
        let mut ops = Vec::new();
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
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.allowed_signing_algorithm,
            &state.allowed_signing_algorithm,
            "allowedSigningAlgorithm",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.signing_certificate,
            &state.signing_certificate,
            "signingCertificate",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.jwks_endpoint_path,
            &state.jwks_endpoint_path,
            "jwksEndpointPath",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.encryption_key_pair,
            &state.encryption_key_pair,
            "encryptionKeyPair",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.allowed_key_encryption_algorithm,
            &state.allowed_key_encryption_algorithm,
            "allowedKeyEncryptionAlgorithm",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.allowed_content_encryption_algorithm,
            &state.allowed_content_encryption_algorithm,
            "allowedContentEncryptionAlgorithm",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.clock_skew_grace_period,
            &state.clock_skew_grace_period,
            "clockSkewGracePeriod",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.client_id_claim_name,
            &state.client_id_claim_name,
            "clientIDClaimName",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.scope_claim_name,
            &state.scope_claim_name,
            "scopeClaimName",
        );
        add_string_operation_if_necessary(&mut ops, &plan.client_id, &state.client_id, "clientID");
        add_string_operation_if_necessary(
            &mut ops,
            &plan.client_secret,
            &state.client_secret,
            "clientSecret",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.client_secret_passphrase_provider,
            &state.client_secret_passphrase_provider,
            "clientSecretPassphraseProvider",
        );
        add_bool_operation_if_necessary(
            &mut ops,
            &plan.include_aud_parameter,
            &state.include_aud_parameter,
            "includeAudParameter",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.access_token_manager_id,
            &state.access_token_manager_id,
            "accessTokenManagerID",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.endpoint_cache_refresh,
            &state.endpoint_cache_refresh,
            "endpointCacheRefresh",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.authorization_server,
            &state.authorization_server,
            "authorizationServer",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.identity_mapper,
            &state.identity_mapper,
            "identityMapper",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.subject_claim_name,
            &state.subject_claim_name,
            "subjectClaimName",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.description,
            &state.description,
            "description",
        );
        add_bool_operation_if_necessary(&mut ops, &plan.enabled, &state.enabled, "enabled");
        add_int64_operation_if_necessary(
            &mut ops,
            &plan.evaluation_order_index,
            &state.evaluation_order_index,
            "evaluationOrderIndex",
        );
        ops
    }

    fn validate_type(type_name: &str, config: &DynamicValue) -> Vec<Diagnostic> {
        let required = match type_name {
            "third-party" => Some("extension_class"),
            "ping-federate" => Some("client_id"),
            _ => None,
        };
        required
            .and_then(|attribute| require_for_type(LABEL, type_name, config, attribute))
            .into_iter()
            .collect()
    }

    fn type_defaults(type_name: &str) -> Vec<(&'static str, Dynamic)> {
        match type_name {
            "jwt" | "mock" => vec![
                ("client_id_claim_name", Dynamic::String("client_id".to_string())),
                ("scope_claim_name", Dynamic::String("scope".to_string())),
            ],
            "ping-federate" => vec![
                ("endpoint_cache_refresh", Dynamic::String("5 m".to_string())),
                ("include_aud_parameter", Dynamic::Bool(false)),
            ],
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

    fn jwt_plan() -> AccessTokenValidatorModel {
        AccessTokenValidatorModel {
            name: s("jwt1"),
            r#type: s("jwt"),
            allowed_signing_algorithm: set(&["RS256"]),
            client_id_claim_name: s("client_id"),
            scope_claim_name: s("scope"),
            jwks_endpoint_path: s(""),
            enabled: Value::Known(true),
            evaluation_order_index: Value::Known(1),
            ..Default::default()
        }
    }

    #[test]
    fn schema_shapes() {
        let schema = AccessTokenValidatorModel::schema(false);
        assert!(schema.attribute("name").unwrap().required);
        assert!(schema.attribute("type").unwrap().required);
        assert!(schema.attribute("enabled").unwrap().required);
        assert!(schema.attribute("client_secret").unwrap().sensitive);
        assert!(!schema.attribute("client_secret").unwrap().computed);
        assert!(schema.attribute("extension_argument").unwrap().default.is_some());
        assert_eq!(schema.block.attributes.len(), 26);

        let default_schema = AccessTokenValidatorModel::schema(true);
        assert!(default_schema.attribute("type").unwrap().computed);
        assert!(!default_schema.attribute("enabled").unwrap().required);
        assert!(default_schema
            .attribute("extension_argument")
            .unwrap()
            .default
            .is_none());
    }

    #[test]
    fn model_round_trips_through_state() {
        let model = jwt_plan();
        let restored = AccessTokenValidatorModel::from_value(&model.to_value()).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn add_request_skips_unset_values() {
        let mut plan = jwt_plan();
        plan.description = Value::Unknown;
        plan.extension_argument = set(&[]);
        let body = serde_json::to_value(plan.add_request()).unwrap();
        assert_eq!(
            body,
            json!({
                "allowedSigningAlgorithm": ["RS256"],
                "clientIDClaimName": "client_id",
                "scopeClaimName": "scope",
                "enabled": true,
                "evaluationOrderIndex": 1
            })
        );
    }

    #[test]
    fn read_response_keeps_empty_strings_and_secret() {
        let object: ConfigObject<AccessTokenValidatorAttributes> = serde_json::from_value(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:access-token-validator:ping-federate"],
            "id": "pf",
            "clientID": "pd-client",
            "endpointCacheRefresh": "5 m",
            "includeAudParameter": false,
            "enabled": true,
            "evaluationOrderIndex": 0
        }))
        .unwrap();

        let expected = AccessTokenValidatorModel {
            name: s("pf"),
            r#type: s("ping-federate"),
            client_secret: s("hunter2"),
            description: s(""),
            ..Default::default()
        };
        let mut state = expected.clone();
        state.read_response(&object, &expected);

        assert_eq!(state.id, s("pf"));
        assert_eq!(state.r#type, s("ping-federate"));
        assert_eq!(state.client_id, s("pd-client"));
        assert_eq!(state.client_secret, s("hunter2"));
        assert_eq!(state.description, s(""));
        assert_eq!(state.identity_mapper, Value::Null);
        assert_eq!(state.signing_certificate, set(&[]));
        assert_eq!(state.include_aud_parameter, Value::Known(false));
        assert_eq!(state.evaluation_order_index, Value::Known(0));
    }

    #[test]
    fn operations_follow_attribute_order() {
        let state = jwt_plan();
        let mut plan = jwt_plan();
        plan.allowed_signing_algorithm = set(&["ES256"]);
        plan.enabled = Value::Known(false);
        plan.client_id_claim_name = Value::Unknown;

        let ops = AccessTokenValidatorModel::create_operations(&plan, &state);
        assert_eq!(
            ops,
            vec![
                Operation::new(OperationKind::Add, "allowedSigningAlgorithm")
                    .with_values(vec!["ES256".to_string()]),
                Operation::new(OperationKind::Remove, "allowedSigningAlgorithm")
                    .with_values(vec!["RS256".to_string()]),
                Operation::new(OperationKind::Replace, "enabled").with_value("false"),
            ]
        );

        assert!(AccessTokenValidatorModel::create_operations(&state, &state).is_empty());
    }

    #[test]
    fn per_type_requirements() {
        let mut config = DynamicValue::object();
        config.set_attribute("type", Dynamic::String("ping-federate".to_string()));
        let diags = AccessTokenValidatorModel::validate_type("ping-federate", &config);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].detail.contains("'client_id'"));

        assert!(AccessTokenValidatorModel::validate_type("mock", &config).is_empty());
    }

    #[test]
    fn defaults_by_type() {
        let jwt = AccessTokenValidatorModel::type_defaults("jwt");
        assert_eq!(jwt.len(), 2);
        assert_eq!(jwt[0].0, "client_id_claim_name");
        assert!(AccessTokenValidatorModel::type_defaults("third-party").is_empty());
    }
}
