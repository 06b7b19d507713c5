//! SASL Mechanism Handler resources

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
use crate::api::{ConfigObject, Operation, SaslMechanismHandlerAttributes};
use crate::convert::{
    bool_type_or_nil, int64_type_or_nil, is_empty_string, request_string, request_string_set,
    string_set, string_type_or_nil,
};
use crate::operations::{
    add_bool_operation_if_necessary, add_int64_operation_if_necessary,
    add_string_operation_if_necessary, add_string_set_operations_if_necessary,
};

pub type SaslMechanismHandlerResource = ConfigResource<SaslMechanismHandlerModel>;

pub const TYPES: &[&str] = &[
    "unboundid-ms-chap-v2",
    "unboundid-totp",
    "unboundid-yubikey-otp",
    "external",
    "digest-md5",
    "plain",
    "anonymous",
    "unboundid-certificate-plus-password",
    "unboundid-delivered-otp",
    "cram-md5",
    "oauth-bearer",
    "third-party",
    "gssapi",
];

const QUALITY_OF_PROTECTION: &[&str] = &["auth", "auth-int", "auth-conf"];

const LABEL: &str = "SASL Mechanism Handler";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaslMechanismHandlerModel {
    pub id: Value<String>,
    pub name: Value<String>,
    pub r#type: Value<String>,
    pub description: Value<String>,
    pub enabled: Value<bool>,
    pub identity_mapper: Value<String>,
    pub extension_class: Value<String>,
    pub extension_argument: Value<BTreeSet<String>>,
    pub shared_secret_attribute_type: Value<String>,
    pub time_interval_duration: Value<String>,
    pub adjacent_intervals_to_check: Value<i64>,
    pub require_static_password: Value<bool>,
    pub prevent_totp_reuse: Value<bool>,
    pub yubikey_client_id: Value<String>,
    pub yubikey_api_key: Value<String>,
    pub yubikey_api_key_passphrase_provider: Value<String>,
    pub yubikey_validation_server_base_url: Value<BTreeSet<String>>,
    pub http_proxy_external_server: Value<String>,
    pub key_manager_provider: Value<String>,
    pub trust_manager_provider: Value<String>,
    pub otp_validity_duration: Value<String>,
    pub access_token_validator: Value<BTreeSet<String>>,
    pub id_token_validator: Value<BTreeSet<String>>,
    pub require_both_access_token_and_id_token: Value<bool>,
    pub alternate_authorization_identity_mapper: Value<String>,
    pub certificate_mapper: Value<String>,
    pub certificate_attribute: Value<String>,
    pub server_fqdn: Value<String>,
    pub realm: Value<String>,
    pub allowed_quality_of_protection: Value<BTreeSet<String>>,
    pub kdc_address: Value<String>,
    pub keytab: Value<String>,
    pub principal_name: Value<String>,
}

fn string_attribute(name: &str, description: &str) -> tfplug::schema::Attribute {
    computed_attribute(name, AttributeType::String, description).build()
}

fn bool_attribute(name: &str, description: &str) -> tfplug::schema::Attribute {
    computed_attribute(name, AttributeType::Bool, description).build()
}

fn string_set_attribute(name: &str, description: &str) -> tfplug::schema::Attribute {
    computed_attribute(name, AttributeType::string_set(), description).build()
}

impl ConfigModel for SaslMechanismHandlerModel {
    type Attributes = SaslMechanismHandlerAttributes;

    const RESOURCE_NAME: &'static str = "sasl_mechanism_handler";
    const LABEL: &'static str = LABEL;

    const TYPE_SPECIFIC: &'static [(&'static str, &'static [&'static str])] = &[
        (
            "identity_mapper",
            &[
                "unboundid-ms-chap-v2",
                "unboundid-totp",
                "unboundid-yubikey-otp",
                "digest-md5",
                "plain",
                "unboundid-delivered-otp",
                "cram-md5",
                "oauth-bearer",
                "gssapi",
            ],
        ),
        ("extension_class", &["third-party"]),
        ("extension_argument", &["third-party"]),
        ("shared_secret_attribute_type", &["unboundid-totp"]),
        ("time_interval_duration", &["unboundid-totp"]),
        ("adjacent_intervals_to_check", &["unboundid-totp"]),
        (
            "require_static_password",
            &["unboundid-totp", "unboundid-yubikey-otp"],
        ),
        ("prevent_totp_reuse", &["unboundid-totp"]),
        ("yubikey_client_id", &["unboundid-yubikey-otp"]),
        ("yubikey_api_key", &["unboundid-yubikey-otp"]),
        ("yubikey_api_key_passphrase_provider", &["unboundid-yubikey-otp"]),
        ("yubikey_validation_server_base_url", &["unboundid-yubikey-otp"]),
        ("http_proxy_external_server", &["unboundid-yubikey-otp"]),
        ("key_manager_provider", &["unboundid-yubikey-otp"]),
        ("trust_manager_provider", &["unboundid-yubikey-otp"]),
        ("otp_validity_duration", &["unboundid-delivered-otp"]),
        ("access_token_validator", &["oauth-bearer"]),
        ("id_token_validator", &["oauth-bearer"]),
        ("require_both_access_token_and_id_token", &["oauth-bearer"]),
        ("alternate_authorization_identity_mapper", &["oauth-bearer"]),
        (
            "certificate_mapper",
            &["external", "unboundid-certificate-plus-password"],
        ),
        ("certificate_attribute", &["external"]),
        ("server_fqdn", &["digest-md5", "gssapi"]),
        ("realm", &["digest-md5", "gssapi"]),
        ("allowed_quality_of_protection", &["digest-md5", "gssapi"]),
        ("kdc_address", &["gssapi"]),
        ("keytab", &["gssapi"]),
        ("principal_name", &["gssapi"]),
    ];

    fn schema(is_default: bool) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description(if is_default {
                "Manages a SASL Mechanism Handler that already exists on the server."
            } else {
                "Manages a SASL Mechanism Handler."
            })
            .attribute(id_attribute())
            .attribute(name_attribute(LABEL))
            .attribute(type_attribute(LABEL, TYPES, is_default))
            .attribute(description_attribute(LABEL, is_default))
            .attribute(enabled_attribute(LABEL, is_default))
            .attribute(string_attribute(
                "identity_mapper",
                "The identity mapper that should be used to identify the entry associated with the username provided in the bind request.",
            ))
            .attribute(extension_class_attribute(LABEL))
            .attribute(extension_argument_attribute(LABEL, is_default))
            .attribute(string_attribute(
                "shared_secret_attribute_type",
                "The name or OID of the attribute that will be used to hold the shared secret key used during TOTP processing.",
            ))
            .attribute(duration_attribute(
                "time_interval_duration",
                "The duration of the time interval used for TOTP processing.",
            ))
            .attribute(
                computed_attribute(
                    "adjacent_intervals_to_check",
                    AttributeType::Number,
                    "The number of adjacent time intervals (both before and after the current time) that should be checked when performing authentication.",
                )
                .validator(Int64AtLeast::create(0))
                .build(),
            )
            .attribute(bool_attribute(
                "require_static_password",
                "Indicates whether to require a static password (as might be held in the userPassword attribute, or whatever password attribute is defined in the password policy governing the user) in addition to the one-time password.",
            ))
            .attribute(bool_attribute(
                "prevent_totp_reuse",
                "Indicates whether to prevent clients from re-using TOTP passwords.",
            ))
            .attribute(string_attribute(
                "yubikey_client_id",
                "The client ID to include in requests to the YubiKey validation server.",
            ))
            .attribute(
                AttributeBuilder::new("yubikey_api_key", AttributeType::String)
                    .description("The API key needed to verify signatures generated by the YubiKey validation server.")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(string_attribute(
                "yubikey_api_key_passphrase_provider",
                "The passphrase provider to use to obtain the API key needed to verify signatures generated by the YubiKey validation server.",
            ))
            .attribute(string_set_attribute(
                "yubikey_validation_server_base_url",
                "The base URL of the validation server to use to verify one-time passwords.",
            ))
            .attribute(string_attribute(
                "http_proxy_external_server",
                "A reference to an HTTP proxy server that should be used for requests sent to the YubiKey validation service.",
            ))
            .attribute(string_attribute(
                "key_manager_provider",
                "Specifies which key manager provider should be used to obtain a client certificate to present to the validation server when performing HTTPS communication.",
            ))
            .attribute(string_attribute(
                "trust_manager_provider",
                "Specifies which trust manager provider should be used to determine whether to trust the certificate presented by the server when performing HTTPS communication.",
            ))
            .attribute(duration_attribute(
                "otp_validity_duration",
                "The maximum length of time that a one-time password value should be considered valid.",
            ))
            .attribute(string_set_attribute(
                "access_token_validator",
                "An access token validator that will ensure that each presented OAuth access token is authentic and trustworthy.",
            ))
            .attribute(string_set_attribute(
                "id_token_validator",
                "An ID token validator that will ensure that each presented OpenID Connect ID token is authentic and trustworthy.",
            ))
            .attribute(bool_attribute(
                "require_both_access_token_and_id_token",
                "Indicates whether bind requests will be required to have both an OAuth access token (in the \"auth\" element of the bind request) and an OpenID Connect ID token (in the \"pingidentityidtoken\" element of the bind request).",
            ))
            .attribute(string_attribute(
                "alternate_authorization_identity_mapper",
                "The identity mapper that will be used to map an alternate authorization identity (provided in the GS2 header of the encoded OAUTHBEARER bind request credentials) to the corresponding local entry.",
            ))
            .attribute(string_attribute(
                "certificate_mapper",
                "Specifies the name of the certificate mapper that should be used to match client certificates to user entries.",
            ))
            .attribute(string_attribute(
                "certificate_attribute",
                "Specifies the name of the attribute to hold user certificates.",
            ))
            .attribute(string_attribute(
                "server_fqdn",
                "Specifies the DNS-resolvable fully-qualified domain name for the server that is used when validating the digest-uri parameter during the authentication process.",
            ))
            .attribute(string_attribute(
                "realm",
                "Specifies the realm that is to be used by the server for authentication.",
            ))
            .attribute(
                computed_attribute(
                    "allowed_quality_of_protection",
                    AttributeType::string_set(),
                    "The behavior that the server should exhibit when a client requests a quality of protection.",
                )
                .validator(StringOneOf::create(QUALITY_OF_PROTECTION))
                .build(),
            )
            .attribute(string_attribute(
                "kdc_address",
                "Specifies the address of the KDC that is to be used for Kerberos processing.",
            ))
            .attribute(string_attribute(
                "keytab",
                "Specifies the path to the keytab file that should be used for Kerberos processing.",
            ))
            .attribute(string_attribute(
                "principal_name",
                "Specifies the principal name.",
            ))
            .build()
    }

    fn from_value(value: &DynamicValue) -> tfplug::Result<Self> {
        Ok(Self {
            id: value.get_value("id")?,
            name: value.get_value("name")?,
            r#type: value.get_value("type")?,
            description: value.get_value("description")?,
            enabled: value.get_value("enabled")?,
            identity_mapper: value.get_value("identity_mapper")?,
            extension_class: value.get_value("extension_class")?,
            extension_argument: value.get_value("extension_argument")?,
            shared_secret_attribute_type: value.get_value("shared_secret_attribute_type")?,
            time_interval_duration: value.get_value("time_interval_duration")?,
            adjacent_intervals_to_check: value.get_value("adjacent_intervals_to_check")?,
            require_static_password: value.get_value("require_static_password")?,
            prevent_totp_reuse: value.get_value("prevent_totp_reuse")?,
            yubikey_client_id: value.get_value("yubikey_client_id")?,
            yubikey_api_key: value.get_value("yubikey_api_key")?,
            yubikey_api_key_passphrase_provider: value
                .get_value("yubikey_api_key_passphrase_provider")?,
            yubikey_validation_server_base_url: value
                .get_value("yubikey_validation_server_base_url")?,
            http_proxy_external_server: value.get_value("http_proxy_external_server")?,
            key_manager_provider: value.get_value("key_manager_provider")?,
            trust_manager_provider: value.get_value("trust_manager_provider")?,
            otp_validity_duration: value.get_value("otp_validity_duration")?,
            access_token_validator: value.get_value("access_token_validator")?,
            id_token_validator: value.get_value("id_token_validator")?,
            require_both_access_token_and_id_token: value
                .get_value("require_both_access_token_and_id_token")?,
            alternate_authorization_identity_mapper: value
                .get_value("alternate_authorization_identity_mapper")?,
            certificate_mapper: value.get_value("certificate_mapper")?,
            certificate_attribute: value.get_value("certificate_attribute")?,
            server_fqdn: value.get_value("server_fqdn")?,
            realm: value.get_value("realm")?,
            allowed_quality_of_protection: value.get_value("allowed_quality_of_protection")?,
            kdc_address: value.get_value("kdc_address")?,
            keytab: value.get_value("keytab")?,
            principal_name: value.get_value("principal_name")?,
        })
    }

    fn to_value(&self) -> DynamicValue {
        let mut value = DynamicValue::object();
        value.set_value("id", &self.id);
        value.set_value("name", &self.name);
        value.set_value("type", &self.r#type);
        value.set_value("description", &self.description);
        value.set_value("enabled", &self.enabled);
        value.set_value("identity_mapper", &self.identity_mapper);
        value.set_value("extension_class", &self.extension_class);
        value.set_value("extension_argument", &self.extension_argument);
        value.set_value(
            "shared_secret_attribute_type",
            &self.shared_secret_attribute_type,
        );
        value.set_value("time_interval_duration", &self.time_interval_duration);
        value.set_value(
            "adjacent_intervals_to_check",
            &self.adjacent_intervals_to_check,
        );
        value.set_value("require_static_password", &self.require_static_password);
        value.set_value("prevent_totp_reuse", &self.prevent_totp_reuse);
        value.set_value("yubikey_client_id", &self.yubikey_client_id);
        value.set_value("yubikey_api_key", &self.yubikey_api_key);
        value.set_value(
            "yubikey_api_key_passphrase_provider",
            &self.yubikey_api_key_passphrase_provider,
        );
        value.set_value(
            "yubikey_validation_server_base_url",
            &self.yubikey_validation_server_base_url,
        );
        value.set_value(
            "http_proxy_external_server",
            &self.http_proxy_external_server,
        );
        value.set_value("key_manager_provider", &self.key_manager_provider);
        value.set_value("trust_manager_provider", &self.trust_manager_provider);
        value.set_value("otp_validity_duration", &self.otp_validity_duration);
        value.set_value("access_token_validator", &self.access_token_validator);
        value.set_value("id_token_validator", &self.id_token_validator);
        value.set_value(
            "require_both_access_token_and_id_token",
            &self.require_both_access_token_and_id_token,
        );
        value.set_value(
            "alternate_authorization_identity_mapper",
            &self.alternate_authorization_identity_mapper,
        );
        value.set_value("certificate_mapper", &self.certificate_mapper);
        value.set_value("certificate_attribute", &self.certificate_attribute);
        value.set_value("server_fqdn", &self.server_fqdn);
        value.set_value("realm", &self.realm);
        value.set_value(
            "allowed_quality_of_protection",
            &self.allowed_quality_of_protection,
        );
        value.set_value("kdc_address", &self.kdc_address);
        value.set_value("keytab", &self.keytab);
        value.set_value("principal_name", &self.principal_name);
        value
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn type_name(&self) -> Option<&str> {
        self.r#type.as_deref()
    }

    fn add_request(&self) -> SaslMechanismHandlerAttributes {
        SaslMechanismHandlerAttributes {
            description: request_string(&self.description),
            enabled: self.enabled.known().copied(),
            identity_mapper: request_string(&self.identity_mapper),
            extension_class: request_string(&self.extension_class),
            extension_argument: request_string_set(&self.extension_argument),
            shared_secret_attribute_type: request_string(&self.shared_secret_attribute_type),
            time_interval_duration: request_string(&self.time_interval_duration),
            adjacent_intervals_to_check: self.adjacent_intervals_to_check.known().copied(),
            require_static_password: self.require_static_password.known().copied(),
            prevent_totp_reuse: self.prevent_totp_reuse.known().copied(),
            yubikey_client_id: request_string(&self.yubikey_client_id),
            yubikey_api_key: request_string(&self.yubikey_api_key),
            yubikey_api_key_passphrase_provider: request_string(
                &self.yubikey_api_key_passphrase_provider,
            ),
            yubikey_validation_server_base_url: request_string_set(
                &self.yubikey_validation_server_base_url,
            ),
            http_proxy_external_server: request_string(&self.http_proxy_external_server),
            key_manager_provider: request_string(&self.key_manager_provider),
            trust_manager_provider: request_string(&self.trust_manager_provider),
            otp_validity_duration: request_string(&self.otp_validity_duration),
            access_token_validator: request_string_set(&self.access_token_validator),
            id_token_validator: request_string_set(&self.id_token_validator),
            require_both_access_token_and_id_token: self
                .require_both_access_token_and_id_token
                .known()
                .copied(),
            alternate_authorization_identity_mapper: request_string(
                &self.alternate_authorization_identity_mapper,
            ),
            certificate_mapper: request_string(&self.certificate_mapper),
            certificate_attribute: request_string(&self.certificate_attribute),
            server_fqdn: request_string(&self.server_fqdn),
            realm: request_string(&self.realm),
            allowed_quality_of_protection: request_string_set(&self.allowed_quality_of_protection),
            kdc_address: request_string(&self.kdc_address),
            keytab: request_string(&self.keytab),
            principal_name: request_string(&self.principal_name),
        }
    }

    fn read_response(
        &mut self,
        object: &ConfigObject<SaslMechanismHandlerAttributes>,
        expected: &Self,
    ) {
        let a = &object.attributes;
        let string = |value: &Option<String>, expected: &Value<String>| {
            string_type_or_nil(value.clone(), is_empty_string(expected))
        };

        self.id = Value::Known(object.id.clone());
        self.r#type = object.type_name().map(str::to_string).into();
        self.description = string(&a.description, &expected.description);
        self.enabled = bool_type_or_nil(a.enabled);
        self.identity_mapper = string(&a.identity_mapper, &expected.identity_mapper);
        self.extension_class = string(&a.extension_class, &expected.extension_class);
        self.extension_argument = string_set(a.extension_argument.clone());
        self.shared_secret_attribute_type = string(
            &a.shared_secret_attribute_type,
            &expected.shared_secret_attribute_type,
        );
        self.time_interval_duration =
            string(&a.time_interval_duration, &expected.time_interval_duration);
        self.adjacent_intervals_to_check = int64_type_or_nil(a.adjacent_intervals_to_check);
        self.require_static_password = bool_type_or_nil(a.require_static_password);
        self.prevent_totp_reuse = bool_type_or_nil(a.prevent_totp_reuse);
        self.yubikey_client_id = string(&a.yubikey_client_id, &expected.yubikey_client_id);
        // yubikey_api_key is write-only
        self.yubikey_api_key_passphrase_provider = string(
            &a.yubikey_api_key_passphrase_provider,
            &expected.yubikey_api_key_passphrase_provider,
        );
        self.yubikey_validation_server_base_url =
            string_set(a.yubikey_validation_server_base_url.clone());
        self.http_proxy_external_server = string(
            &a.http_proxy_external_server,
            &expected.http_proxy_external_server,
        );
        self.key_manager_provider =
            string(&a.key_manager_provider, &expected.key_manager_provider);
        self.trust_manager_provider =
            string(&a.trust_manager_provider, &expected.trust_manager_provider);
        self.otp_validity_duration =
            string(&a.otp_validity_duration, &expected.otp_validity_duration);
        self.access_token_validator = string_set(a.access_token_validator.clone());
        self.id_token_validator = string_set(a.id_token_validator.clone());
        self.require_both_access_token_and_id_token =
            bool_type_or_nil(a.require_both_access_token_and_id_token);
        self.alternate_authorization_identity_mapper = string(
            &a.alternate_authorization_identity_mapper,
            &expected.alternate_authorization_identity_mapper,
        );
        self.certificate_mapper = string(&a.certificate_mapper, &expected.certificate_mapper);
        self.certificate_attribute =
            string(&a.certificate_attribute, &expected.certificate_attribute);
        self.server_fqdn = string(&a.server_fqdn, &expected.server_fqdn);
        self.realm = string(&a.realm, &expected.realm);
        self.allowed_quality_of_protection = string_set(a.allowed_quality_of_protection.clone());
        self.kdc_address = string(&a.kdc_address, &expected.kdc_address);
        self.keytab = string(&a.keytab, &expected.keytab);
        self.principal_name = string(&a.principal_name, &expected.principal_name);
    }

    fn create_operations(plan: &Self, state: &Self) -> Vec<Operation> {
        let mut ops = Vec::new();
        add_string_operation_if_necessary(
            &mut ops,
            &plan.description,
            &state.description,
            "description",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.identity_mapper,
            &state.identity_mapper,
            "identityMapper",
        );
        add_bool_operation_if_necessary(&mut ops, &plan.enabled, &state.enabled, "enabled");
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
            &plan.shared_secret_attribute_type,
            &state.shared_secret_attribute_type,
            "sharedSecretAttributeType",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.time_interval_duration,
            &state.time_interval_duration,
            "timeIntervalDuration",
        );
        add_int64_operation_if_necessary(
            &mut ops,
            &plan.adjacent_intervals_to_check,
            &state.adjacent_intervals_to_check,
            "adjacentIntervalsToCheck",
        );
        add_bool_operation_if_necessary(
            &mut ops,
            &plan.require_static_password,
            &state.require_static_password,
            "requireStaticPassword",
        );
        add_bool_operation_if_necessary(
            &mut ops,
            &plan.prevent_totp_reuse,
            &state.prevent_totp_reuse,
            "preventTOTPReuse",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.yubikey_client_id,
            &state.yubikey_client_id,
            "yubikeyClientID",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.yubikey_api_key,
            &state.yubikey_api_key,
            "yubikeyAPIKey",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.yubikey_api_key_passphrase_provider,
            &state.yubikey_api_key_passphrase_provider,
            "yubikeyAPIKeyPassphraseProvider",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.yubikey_validation_server_base_url,
            &state.yubikey_validation_server_base_url,
            "yubikeyValidationServerBaseURL",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.http_proxy_external_server,
            &state.http_proxy_external_server,
            "httpProxyExternalServer",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.key_manager_provider,
            &state.key_manager_provider,
            "keyManagerProvider",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.trust_manager_provider,
            &state.trust_manager_provider,
            "trustManagerProvider",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.otp_validity_duration,
            &state.otp_validity_duration,
            "otpValidityDuration",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.access_token_validator,
            &state.access_token_validator,
            "accessTokenValidator",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.id_token_validator,
            &state.id_token_validator,
            "idTokenValidator",
        );
        add_bool_operation_if_necessary(
            &mut ops,
            &plan.require_both_access_token_and_id_token,
            &state.require_both_access_token_and_id_token,
            "requireBothAccessTokenAndIDToken",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.alternate_authorization_identity_mapper,
            &state.alternate_authorization_identity_mapper,
            "alternateAuthorizationIdentityMapper",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.certificate_mapper,
            &state.certificate_mapper,
            "certificateMapper",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.certificate_attribute,
            &state.certificate_attribute,
            "certificateAttribute",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.server_fqdn,
            &state.server_fqdn,
            "serverFqdn",
        );
        add_string_operation_if_necessary(&mut ops, &plan.realm, &state.realm, "realm");
        add_string_set_operations_if_necessary(
            &mut ops,
            &plan.allowed_quality_of_protection,
            &state.allowed_quality_of_protection,
            "allowedQualityOfProtection",
        );
        add_string_operation_if_necessary(
            &mut ops,
            &plan.kdc_address,
            &state.kdc_address,
            "kdcAddress",
        );
        add_string_operation_if_necessary(&mut ops, &plan.keytab, &state.keytab, "keytab");
        add_string_operation_if_necessary(
            &mut ops,
            &plan.principal_name,
            &state.principal_name,
            "principalName",
        );
        ops
    }

    fn validate_type(type_name: &str, config: &DynamicValue) -> Vec<Diagnostic> {
        if type_name != "third-party" {
            return Vec::new();
        }
        require_for_type(LABEL, type_name, config, "extension_class")
            .into_iter()
            .collect()
    }

    fn type_defaults(type_name: &str) -> Vec<(&'static str, Dynamic)> {
        match type_name {
            "unboundid-totp" => vec![
                (
                    "shared_secret_attribute_type",
                    Dynamic::String("ds-auth-totp-shared-secret".to_string()),
                ),
                ("time_interval_duration", Dynamic::String("30 s".to_string())),
                ("adjacent_intervals_to_check", Dynamic::Number(2.0)),
                ("require_static_password", Dynamic::Bool(true)),
                ("prevent_totp_reuse", Dynamic::Bool(false)),
            ],
            "unboundid-yubikey-otp" => vec![
                ("require_static_password", Dynamic::Bool(true)),
                (
                    "yubikey_validation_server_base_url",
                    Dynamic::List(vec![Dynamic::String("https://api.yubico.com".to_string())]),
                ),
            ],
            "unboundid-delivered-otp" => vec![(
                "otp_validity_duration",
                Dynamic::String("5 m".to_string()),
            )],
            "oauth-bearer" => vec![(
                "require_both_access_token_and_id_token",
                Dynamic::Bool(false),
            )],
            "digest-md5" | "gssapi" => vec![(
                "allowed_quality_of_protection",
                Dynamic::List(vec![Dynamic::String("auth".to_string())]),
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

    #[test]
    fn add_request_uses_server_field_names() {
        let plan = SaslMechanismHandlerModel {
            name: s("yubi"),
            r#type: s("unboundid-yubikey-otp"),
            enabled: Value::Known(true),
            yubikey_client_id: s("1234"),
            yubikey_api_key: s("secret"),
            yubikey_validation_server_base_url: set(&["https://api.yubico.com"]),
            require_static_password: Value::Known(true),
            identity_mapper: Value::Unknown,
            ..Default::default()
        };

        let body = serde_json::to_value(plan.add_request()).unwrap();
        assert_eq!(
            body,
            json!({
                "enabled": true,
                "requireStaticPassword": true,
                "yubikeyClientID": "1234",
                "yubikeyAPIKey": "secret",
                "yubikeyValidationServerBaseURL": ["https://api.yubico.com"]
            })
        );
    }

    #[test]
    fn read_response_leaves_api_key_alone() {
        let object: ConfigObject<SaslMechanismHandlerAttributes> = serde_json::from_value(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:sasl-mechanism-handler:unboundid-totp"],
            "id": "TOTP",
            "identityMapper": "Exact Match",
            "sharedSecretAttributeType": "ds-auth-totp-shared-secret",
            "timeIntervalDuration": "30 s",
            "adjacentIntervalsToCheck": 2,
            "requireStaticPassword": true,
            "preventTOTPReuse": false,
            "enabled": true
        }))
        .unwrap();

        let mut state = SaslMechanismHandlerModel {
            name: s("TOTP"),
            yubikey_api_key: s("kept"),
            ..Default::default()
        };
        let expected = state.clone();
        state.read_response(&object, &expected);

        assert_eq!(state.r#type, s("unboundid-totp"));
        assert_eq!(state.identity_mapper, s("Exact Match"));
        assert_eq!(state.adjacent_intervals_to_check, Value::Known(2));
        assert_eq!(state.prevent_totp_reuse, Value::Known(false));
        assert_eq!(state.yubikey_api_key, s("kept"));
        assert_eq!(state.access_token_validator, set(&[]));
        assert_eq!(state.realm, Value::Null);
    }

    #[test]
    fn operations_for_oauth_bearer_change() {
        let state = SaslMechanismHandlerModel {
            name: s("OAUTHBEARER"),
            r#type: s("oauth-bearer"),
            enabled: Value::Known(true),
            access_token_validator: set(&["jwt1"]),
            require_both_access_token_and_id_token: Value::Known(false),
            ..Default::default()
        };
        let mut plan = state.clone();
        plan.access_token_validator = set(&["jwt1", "pf"]);
        plan.require_both_access_token_and_id_token = Value::Known(true);
        plan.description = s("bearer tokens");

        let ops = SaslMechanismHandlerModel::create_operations(&plan, &state);
        assert_eq!(
            ops,
            vec![
                Operation::new(OperationKind::Replace, "description").with_value("bearer tokens"),
                Operation::new(OperationKind::Add, "accessTokenValidator")
                    .with_values(vec!["pf".to_string()]),
                Operation::new(OperationKind::Replace, "requireBothAccessTokenAndIDToken")
                    .with_value("true"),
            ]
        );
    }

    #[test]
    fn third_party_requires_extension_class() {
        let config = DynamicValue::object();
        let diags = SaslMechanismHandlerModel::validate_type("third-party", &config);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].detail.contains("'extension_class'"));
        assert!(SaslMechanismHandlerModel::validate_type("plain", &config).is_empty());
    }

    #[test]
    fn totp_defaults() {
        let defaults = SaslMechanismHandlerModel::type_defaults("unboundid-totp");
        let names: Vec<&str> = defaults.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "shared_secret_attribute_type",
                "time_interval_duration",
                "adjacent_intervals_to_check",
                "require_static_password",
                "prevent_totp_reuse",
            ]
        );
        assert!(SaslMechanismHandlerModel::type_defaults("anonymous").is_empty());
    }

    #[test]
    fn schema_marks_api_key_sensitive() {
        let schema = SaslMechanismHandlerModel::schema(false);
        let key = schema.attribute("yubikey_api_key").unwrap();
        assert!(key.sensitive);
        assert!(!key.computed);
        assert_eq!(schema.block.attributes.len(), 33);
    }
}
