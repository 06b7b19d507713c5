//! Provider configuration
//!
//! Every attribute of the provider block may instead come from a
//! `PINGDIRECTORY_PROVIDER_<ATTRIBUTE>` environment variable. The provider
//! block wins when both are set.

use std::collections::BTreeSet;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

const ENV_PREFIX: &str = "PINGDIRECTORY_PROVIDER_";

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub https_host: String,
    pub username: String,
    pub password: String,
    pub insecure_trust_all_certs: bool,
    pub ca_certificate_pem_files: Vec<String>,
    pub product_version: String,
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .description("PingDirectory provider configuration")
        .attribute(
            AttributeBuilder::new("https_host", AttributeType::String)
                .description("URI for PingDirectory HTTPS port. Default value can be set with the PINGDIRECTORY_PROVIDER_HTTPS_HOST environment variable.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("username", AttributeType::String)
                .description("Username for PingDirectory admin user. Default value can be set with the PINGDIRECTORY_PROVIDER_USERNAME environment variable.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("password", AttributeType::String)
                .description("Password for PingDirectory admin user. Default value can be set with the PINGDIRECTORY_PROVIDER_PASSWORD environment variable.")
                .optional()
                .sensitive()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("insecure_trust_all_certs", AttributeType::Bool)
                .description("Set to true to trust any certificate when connecting to the PingDirectory server. This is insecure and should not be enabled outside of testing. Default value can be set with the PINGDIRECTORY_PROVIDER_INSECURE_TRUST_ALL_CERTS environment variable.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("ca_certificate_pem_files", AttributeType::string_set())
                .description("Paths to files containing PEM-encoded certificates to be trusted as root CAs when connecting to the PingDirectory server. Default value can be set with the PINGDIRECTORY_PROVIDER_CA_CERTIFICATE_PEM_FILES environment variable, using commas to delimit multiple PEM files if necessary.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("product_version", AttributeType::String)
                .description("Version of the PingDirectory server being configured. Default value can be set with the PINGDIRECTORY_PROVIDER_PRODUCT_VERSION environment variable.")
                .optional()
                .build(),
        )
        .build()
}

fn env_var(attribute: &str) -> Option<String> {
    std::env::var(format!("{}{}", ENV_PREFIX, attribute.to_uppercase()))
        .ok()
        .filter(|v| !v.is_empty())
}

fn string_attribute(config: &DynamicValue, attribute: &str) -> Option<String> {
    config
        .get_value::<String>(attribute)
        .ok()
        .and_then(|v| v.into_known())
        .filter(|v| !v.is_empty())
        .or_else(|| env_var(attribute))
}

fn required(
    config: &DynamicValue,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    match string_attribute(config, attribute) {
        Some(value) => value,
        None => {
            diagnostics.push(
                Diagnostic::error(
                    format!("Unable to find {}", attribute),
                    format!(
                        "{} cannot be an empty string. Either set it in the configuration or use the {}{} environment variable.",
                        attribute,
                        ENV_PREFIX,
                        attribute.to_uppercase()
                    ),
                )
                .with_attribute(AttributePath::new(attribute)),
            );
            String::new()
        }
    }
}

impl ProviderConfig {
    /// Read the provider block, falling back to the environment
    pub fn from_config(config: &DynamicValue) -> Result<Self, Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();

        let https_host = required(config, "https_host", &mut diagnostics);
        let username = required(config, "username", &mut diagnostics);
        let password = required(config, "password", &mut diagnostics);
        let product_version = required(config, "product_version", &mut diagnostics);

        let insecure_trust_all_certs = match config
            .get_value::<bool>("insecure_trust_all_certs")
            .ok()
            .and_then(|v| v.into_known())
        {
            Some(value) => value,
            None => match env_var("insecure_trust_all_certs") {
                Some(raw) => raw.parse::<bool>().unwrap_or_else(|_| {
                    diagnostics.push(Diagnostic::error(
                        "Invalid insecure_trust_all_certs",
                        format!(
                            "Failed to parse {}INSECURE_TRUST_ALL_CERTS value '{}' as a boolean",
                            ENV_PREFIX, raw
                        ),
                    ));
                    false
                }),
                None => false,
            },
        };

        let ca_certificate_pem_files = match config
            .get_value::<BTreeSet<String>>("ca_certificate_pem_files")
            .ok()
            .and_then(|v| v.into_known())
            .filter(|files| !files.is_empty())
        {
            Some(files) => files.into_iter().collect(),
            None => env_var("ca_certificate_pem_files")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };

        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }

        Ok(Self {
            https_host,
            username,
            password,
            insecure_trust_all_certs,
            ca_certificate_pem_files,
            product_version,
        })
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tfplug::types::Dynamic;

    const VARS: &[&str] = &[
        "PINGDIRECTORY_PROVIDER_HTTPS_HOST",
        "PINGDIRECTORY_PROVIDER_USERNAME",
        "PINGDIRECTORY_PROVIDER_PASSWORD",
        "PINGDIRECTORY_PROVIDER_INSECURE_TRUST_ALL_CERTS",
        "PINGDIRECTORY_PROVIDER_CA_CERTIFICATE_PEM_FILES",
        "PINGDIRECTORY_PROVIDER_PRODUCT_VERSION",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    fn config(pairs: &[(&str, Dynamic)]) -> DynamicValue {
        let mut value = DynamicValue::object();
        for (name, v) in pairs {
            value.set_attribute(name, v.clone());
        }
        value
    }

    fn s(v: &str) -> Dynamic {
        Dynamic::String(v.to_string())
    }

    #[test]
    #[serial]
    fn reads_provider_block() {
        clear_env();
        let parsed = ProviderConfig::from_config(&config(&[
            ("https_host", s("https://localhost:1443")),
            ("username", s("cn=administrator")),
            ("password", s("2FederateM0re")),
            ("insecure_trust_all_certs", Dynamic::Bool(true)),
            ("ca_certificate_pem_files", Dynamic::List(vec![s("/tmp/ca.pem")])),
            ("product_version", s("9.3.0.0")),
        ]))
        .unwrap();

        assert_eq!(parsed.https_host, "https://localhost:1443");
        assert_eq!(parsed.username, "cn=administrator");
        assert!(parsed.insecure_trust_all_certs);
        assert_eq!(parsed.ca_certificate_pem_files, vec!["/tmp/ca.pem"]);
        assert_eq!(parsed.product_version, "9.3.0.0");
    }

    #[test]
    #[serial]
    fn falls_back_to_environment() {
        clear_env();
        std::env::set_var("PINGDIRECTORY_PROVIDER_HTTPS_HOST", "https://env:1443");
        std::env::set_var("PINGDIRECTORY_PROVIDER_USERNAME", "env-user");
        std::env::set_var("PINGDIRECTORY_PROVIDER_PASSWORD", "env-pass");
        std::env::set_var("PINGDIRECTORY_PROVIDER_PRODUCT_VERSION", "9.2.0.0");
        std::env::set_var("PINGDIRECTORY_PROVIDER_INSECURE_TRUST_ALL_CERTS", "true");
        std::env::set_var(
            "PINGDIRECTORY_PROVIDER_CA_CERTIFICATE_PEM_FILES",
            "/a.pem, /b.pem",
        );

        let parsed = ProviderConfig::from_config(&config(&[("username", s("block-user"))])).unwrap();
        clear_env();

        assert_eq!(parsed.https_host, "https://env:1443");
        assert_eq!(parsed.username, "block-user");
        assert_eq!(parsed.password, "env-pass");
        assert!(parsed.insecure_trust_all_certs);
        assert_eq!(parsed.ca_certificate_pem_files, vec!["/a.pem", "/b.pem"]);
    }

    #[test]
    #[serial]
    fn missing_values_are_errors() {
        clear_env();
        let errors = ProviderConfig::from_config(&config(&[(
            "https_host",
            s("https://localhost:1443"),
        )]))
        .unwrap_err();

        let summaries: Vec<_> = errors.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(
            summaries,
            vec![
                "Unable to find username",
                "Unable to find password",
                "Unable to find product_version"
            ]
        );
        assert_eq!(errors[0].attribute, Some(AttributePath::new("username")));
    }

    #[test]
    #[serial]
    fn insecure_defaults_to_false() {
        clear_env();
        let parsed = ProviderConfig::from_config(&config(&[
            ("https_host", s("https://localhost:1443")),
            ("username", s("u")),
            ("password", s("p")),
            ("product_version", s("9.3.0.0")),
        ]))
        .unwrap();
        assert!(!parsed.insecure_trust_all_certs);
        assert!(parsed.ca_certificate_pem_files.is_empty());
    }

    #[test]
    fn schema_marks_password_sensitive() {
        let schema = schema();
        assert!(schema.attribute("password").unwrap().sensitive);
        assert_eq!(schema.block.attributes.len(), 6);
    }
}
