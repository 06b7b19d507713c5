//! SASL Mechanism Handler configuration objects

use super::common::ConfigCategory;
use serde::{Deserialize, Serialize};

/// Attributes of every SASL mechanism handler type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaslMechanismHandlerAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_mapper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_argument: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_secret_attribute_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_interval_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjacent_intervals_to_check: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_static_password: Option<bool>,
    #[serde(rename = "preventTOTPReuse", skip_serializing_if = "Option::is_none")]
    pub prevent_totp_reuse: Option<bool>,
    #[serde(rename = "yubikeyClientID", skip_serializing_if = "Option::is_none")]
    pub yubikey_client_id: Option<String>,
    #[serde(rename = "yubikeyAPIKey", skip_serializing_if = "Option::is_none")]
    pub yubikey_api_key: Option<String>,
    #[serde(
        rename = "yubikeyAPIKeyPassphraseProvider",
        skip_serializing_if = "Option::is_none"
    )]
    pub yubikey_api_key_passphrase_provider: Option<String>,
    #[serde(
        rename = "yubikeyValidationServerBaseURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub yubikey_validation_server_base_url: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_proxy_external_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_manager_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_manager_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_validity_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_validator: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token_validator: Option<Vec<String>>,
    #[serde(
        rename = "requireBothAccessTokenAndIDToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub require_both_access_token_and_id_token: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_authorization_identity_mapper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_mapper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_fqdn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_quality_of_protection: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kdc_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keytab: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_name: Option<String>,
}

impl ConfigCategory for SaslMechanismHandlerAttributes {
    const PATH: &'static str = "sasl-mechanism-handlers";
    const SCHEMA: &'static str = "sasl-mechanism-handler";
    const NAME_FIELD: &'static str = "handlerName";
}
