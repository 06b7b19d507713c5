//! Terraform provider for PingDirectory server configuration

pub mod api;
pub mod config;
pub mod convert;
pub mod data_sources;
pub mod operations;
pub mod provider_data;
pub mod resources;
pub mod version;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory, StopProviderRequest, StopProviderResponse,
    ValidateProviderConfigRequest, ValidateProviderConfigResponse,
};
use tfplug::types::{AttributePath, Diagnostic, ServerCapabilities};
use tfplug::{DataSourceWithConfigure, ResourceWithConfigure};

use crate::api::{Client, ClientOptions};
use crate::config::ProviderConfig;
use crate::data_sources::{
    AccessTokenValidatorDataSource, AccessTokenValidatorsDataSource, IdentityMapperDataSource,
    IdentityMappersDataSource, LocationDataSource, LocationsDataSource,
    SaslMechanismHandlerDataSource, SaslMechanismHandlersDataSource,
};
use crate::resources::{
    AccessTokenValidatorResource, IdentityMapperResource, LocationResource,
    SaslMechanismHandlerResource,
};

pub use provider_data::PingDirectoryProviderData;

#[derive(Default)]
pub struct PingDirectoryProvider;

impl PingDirectoryProvider {
    pub fn new() -> Self {
        Self
    }

    async fn build_provider_data(
        config: ProviderConfig,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<PingDirectoryProviderData> {
        let product_version = match version::resolve(&config.product_version) {
            Ok(resolved) => {
                if let Some(warning) = resolved.warning {
                    tracing::warn!("{}", warning);
                    diagnostics.push(
                        Diagnostic::warning("Unrecognized PingDirectory version", warning)
                            .with_attribute(AttributePath::new("product_version")),
                    );
                }
                resolved.version
            }
            Err(e) => {
                diagnostics.push(
                    Diagnostic::error("Unsupported PingDirectory version", e.to_string())
                        .with_attribute(AttributePath::new("product_version")),
                );
                return None;
            }
        };

        let mut options = ClientOptions {
            insecure_trust_all_certs: config.insecure_trust_all_certs,
            ..Default::default()
        };
        for path in &config.ca_certificate_pem_files {
            match tokio::fs::read(path).await {
                Ok(pem) => options.ca_certificates.push(pem),
                Err(e) => {
                    diagnostics.push(
                        Diagnostic::error(
                            "Failed to read CA certificate",
                            format!("Unable to read CA PEM certificate file {}: {}", path, e),
                        )
                        .with_attribute(AttributePath::new("ca_certificate_pem_files")),
                    );
                    return None;
                }
            }
        }
        if config.insecure_trust_all_certs {
            tracing::warn!("Trusting all server certificates, this should only be used for testing");
        }

        match Client::with_options(
            &config.https_host,
            &config.username,
            &config.password,
            options,
        ) {
            Ok(client) => {
                tracing::info!(
                    host = %config.https_host,
                    version = %product_version,
                    "Configured PingDirectory provider"
                );
                Some(PingDirectoryProviderData::new(client, product_version))
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to create API client",
                    e.to_string(),
                ));
                None
            }
        }
    }
}

fn register_resource<R, F>(map: &mut HashMap<String, ResourceFactory>, make: F)
where
    R: ResourceWithConfigure + 'static,
    F: Fn() -> R + Send + Sync + 'static,
{
    let type_name = make().type_name().to_string();
    map.insert(
        type_name,
        Box::new(move || Box::new(make()) as Box<dyn ResourceWithConfigure>),
    );
}

fn register_data_source<D, F>(map: &mut HashMap<String, DataSourceFactory>, make: F)
where
    D: DataSourceWithConfigure + 'static,
    F: Fn() -> D + Send + Sync + 'static,
{
    let type_name = make().type_name().to_string();
    map.insert(
        type_name,
        Box::new(move || Box::new(make()) as Box<dyn DataSourceWithConfigure>),
    );
}

#[async_trait]
impl Provider for PingDirectoryProvider {
    fn type_name(&self) -> &str {
        "pingdirectory"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
            server_capabilities: ServerCapabilities {
                plan_destroy: false,
                get_provider_schema_optional: false,
            },
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: config::schema(),
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        tracing::debug!(terraform_version = %request.terraform_version, "Configuring provider");

        let config = match ProviderConfig::from_config(&request.config) {
            Ok(config) => config,
            Err(diagnostics) => {
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        };

        let mut diagnostics = vec![];
        let provider_data = Self::build_provider_data(config, &mut diagnostics).await;

        ConfigureProviderResponse {
            diagnostics,
            provider_data: provider_data
                .map(|data| Arc::new(data) as Arc<dyn std::any::Any + Send + Sync>),
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        ValidateProviderConfigResponse::default()
    }

    async fn stop(&self, _ctx: Context, _request: StopProviderRequest) -> StopProviderResponse {
        StopProviderResponse { error: None }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut resources = HashMap::new();
        register_resource(&mut resources, AccessTokenValidatorResource::new);
        register_resource(&mut resources, AccessTokenValidatorResource::new_default);
        register_resource(&mut resources, SaslMechanismHandlerResource::new);
        register_resource(&mut resources, SaslMechanismHandlerResource::new_default);
        register_resource(&mut resources, IdentityMapperResource::new);
        register_resource(&mut resources, IdentityMapperResource::new_default);
        register_resource(&mut resources, LocationResource::new);
        resources
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut data_sources = HashMap::new();
        register_data_source(&mut data_sources, AccessTokenValidatorDataSource::new);
        register_data_source(&mut data_sources, AccessTokenValidatorsDataSource::new);
        register_data_source(&mut data_sources, SaslMechanismHandlerDataSource::new);
        register_data_source(&mut data_sources, SaslMechanismHandlersDataSource::new);
        register_data_source(&mut data_sources, IdentityMapperDataSource::new);
        register_data_source(&mut data_sources, IdentityMappersDataSource::new);
        register_data_source(&mut data_sources, LocationDataSource::new);
        register_data_source(&mut data_sources, LocationsDataSource::new);
        data_sources
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tfplug::types::{ClientCapabilities, Dynamic, DynamicValue};

    fn configure_request(pairs: &[(&str, &str)]) -> ConfigureProviderRequest {
        let mut config = DynamicValue::object();
        for (name, value) in pairs {
            config.set_attribute(name, Dynamic::String(value.to_string()));
        }
        ConfigureProviderRequest {
            terraform_version: "1.9.0".to_string(),
            config,
            client_capabilities: ClientCapabilities::default(),
        }
    }

    fn clear_env() {
        for var in [
            "PINGDIRECTORY_PROVIDER_HTTPS_HOST",
            "PINGDIRECTORY_PROVIDER_USERNAME",
            "PINGDIRECTORY_PROVIDER_PASSWORD",
            "PINGDIRECTORY_PROVIDER_INSECURE_TRUST_ALL_CERTS",
            "PINGDIRECTORY_PROVIDER_CA_CERTIFICATE_PEM_FILES",
            "PINGDIRECTORY_PROVIDER_PRODUCT_VERSION",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn registers_every_resource() {
        let provider = PingDirectoryProvider::new();
        let mut names: Vec<String> = provider.resources().into_keys().collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "pingdirectory_access_token_validator",
                "pingdirectory_default_access_token_validator",
                "pingdirectory_default_identity_mapper",
                "pingdirectory_default_sasl_mechanism_handler",
                "pingdirectory_identity_mapper",
                "pingdirectory_location",
                "pingdirectory_sasl_mechanism_handler",
            ]
        );
    }

    #[test]
    fn registers_every_data_source() {
        let provider = PingDirectoryProvider::new();
        let data_sources = provider.data_sources();
        assert_eq!(data_sources.len(), 8);
        for name in [
            "pingdirectory_access_token_validator",
            "pingdirectory_access_token_validators",
            "pingdirectory_sasl_mechanism_handler",
            "pingdirectory_sasl_mechanism_handlers",
            "pingdirectory_identity_mapper",
            "pingdirectory_identity_mappers",
            "pingdirectory_location",
            "pingdirectory_locations",
        ] {
            let factory = data_sources.get(name).unwrap();
            assert_eq!(factory().type_name(), name);
        }
    }

    #[tokio::test]
    #[serial]
    async fn configure_builds_provider_data() {
        clear_env();
        let mut provider = PingDirectoryProvider::new();
        let response = provider
            .configure(
                Context::new(),
                configure_request(&[
                    ("https_host", "https://localhost:1443"),
                    ("username", "cn=administrator"),
                    ("password", "2FederateM0re"),
                    ("product_version", "9.3.0.0"),
                ]),
            )
            .await;

        assert!(response.diagnostics.is_empty());
        let data = PingDirectoryProviderData::from_any(response.provider_data).unwrap();
        assert_eq!(data.product_version, version::PINGDIRECTORY_9300);
        assert_eq!(data.client.base_url(), "https://localhost:1443/config");
    }

    #[tokio::test]
    #[serial]
    async fn configure_warns_on_unknown_patch() {
        clear_env();
        let mut provider = PingDirectoryProvider::new();
        let response = provider
            .configure(
                Context::new(),
                configure_request(&[
                    ("https_host", "https://localhost:1443"),
                    ("username", "cn=administrator"),
                    ("password", "2FederateM0re"),
                    ("product_version", "9.2.0.5"),
                ]),
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(!response.diagnostics[0].is_error());
        let data = PingDirectoryProviderData::from_any(response.provider_data).unwrap();
        assert_eq!(data.product_version, version::PINGDIRECTORY_9201);
    }

    #[tokio::test]
    #[serial]
    async fn configure_rejects_unsupported_version() {
        clear_env();
        let mut provider = PingDirectoryProvider::new();
        let response = provider
            .configure(
                Context::new(),
                configure_request(&[
                    ("https_host", "https://localhost:1443"),
                    ("username", "cn=administrator"),
                    ("password", "2FederateM0re"),
                    ("product_version", "8.3.0.0"),
                ]),
            )
            .await;

        assert!(response.provider_data.is_none());
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "Unsupported PingDirectory version"
        );
    }

    #[tokio::test]
    #[serial]
    async fn configure_reports_unreadable_ca_file() {
        clear_env();
        std::env::set_var(
            "PINGDIRECTORY_PROVIDER_CA_CERTIFICATE_PEM_FILES",
            "/nonexistent/ca.pem",
        );
        let mut provider = PingDirectoryProvider::new();
        let response = provider
            .configure(
                Context::new(),
                configure_request(&[
                    ("https_host", "https://localhost:1443"),
                    ("username", "cn=administrator"),
                    ("password", "2FederateM0re"),
                    ("product_version", "9.3.0.0"),
                ]),
            )
            .await;
        clear_env();

        assert!(response.provider_data.is_none());
        assert_eq!(response.diagnostics[0].summary, "Failed to read CA certificate");
    }

    #[tokio::test]
    #[serial]
    async fn configure_requires_credentials() {
        clear_env();
        let mut provider = PingDirectoryProvider::new();
        let response = provider
            .configure(Context::new(), configure_request(&[]))
            .await;

        assert!(response.provider_data.is_none());
        assert_eq!(response.diagnostics.len(), 4);
        assert!(response.diagnostics.iter().all(|d| d.is_error()));
    }
}
