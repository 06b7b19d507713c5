//! Access Token Validator configuration objects

use super::common::ConfigCategory;
use serde::{Deserialize, Serialize};

/// Attributes of every access token validator type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenValidatorAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_argument: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_signing_algorithm: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwks_endpoint_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_key_pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_key_encryption_algorithm: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_content_encryption_algorithm: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_skew_grace_period: Option<String>,
    #[serde(rename = "clientIDClaimName", skip_serializing_if = "Option::is_none")]
    pub client_id_claim_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_claim_name: Option<String>,
    #[serde(rename = "clientID", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret_passphrase_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_aud_parameter: Option<bool>,
    #[serde(rename = "accessTokenManagerID", skip_serializing_if = "Option::is_none")]
    pub access_token_manager_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_cache_refresh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_mapper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_claim_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_order_index: Option<i64>,
}

impl ConfigCategory for AccessTokenValidatorAttributes {
    const PATH: &'static str = "access-token-validators";
    const SCHEMA: &'static str = "access-token-validator";
    const NAME_FIELD: &'static str = "validatorName";
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::api::common::ConfigObject;
    use crate::api::config_api::add_request_body;
    use serde_json::json;

    #[test]
    fn add_body_carries_schema_and_name() {
        let attributes = AccessTokenValidatorAttributes {
            client_id: Some("pd".to_string()),
            enabled: Some(true),
            ..Default::default()
        };

        let body = add_request_body(
            "pingfed",
            Some("ping-federate"),
            &attributes,
        )
        .unwrap();

        assert_eq!(
            body,
            json!({
                "schemas": ["urn:pingidentity:schemas:configuration:2.0:access-token-validator:ping-federate"],
                "validatorName": "pingfed",
                "clientID": "pd",
                "enabled": true
            })
        );
    }

    #[test]
    fn response_exposes_type_from_schema() {
        let object: ConfigObject<AccessTokenValidatorAttributes> = serde_json::from_value(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:access-token-validator:jwt"],
            "id": "jwt1",
            "allowedSigningAlgorithm": ["RS256", "ES256"],
            "clientIDClaimName": "client_id",
            "evaluationOrderIndex": 5,
            "enabled": false,
            "meta": {"resourceType": "JWT Access Token Validator"}
        }))
        .unwrap();

        assert_eq!(object.type_name(), Some("jwt"));
        assert_eq!(object.id, "jwt1");
        assert_eq!(
            object.attributes.client_id_claim_name.as_deref(),
            Some("client_id")
        );
        assert_eq!(object.attributes.evaluation_order_index, Some(5));
        assert_eq!(object.attributes.allowed_signing_algorithm.unwrap().len(), 2);
    }
}
