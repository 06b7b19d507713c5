//! gRPC service implementation of the Terraform Plugin Protocol v6
//!
//! `GrpcProviderServer` translates protocol messages into calls on the
//! [`Provider`] trait family. Resources and data sources are built from the
//! provider's factories for every request and configured with the data the
//! provider returned from `configure`, so no per-resource locking is needed.

use crate::context::Context;
use crate::data_source::{
    ConfigureDataSourceRequest, DataSourceSchemaRequest, DataSourceWithConfigure,
    ReadDataSourceRequest, ValidateDataSourceConfigRequest,
};
use crate::error::TfplugError;
use crate::proto;
use crate::proto::provider_server::Provider as ProtoProvider;
use crate::provider::{
    ConfigureProviderRequest, DataSourceFactory, Provider, ProviderMetadataRequest,
    ProviderSchemaRequest, ResourceFactory, StopProviderRequest, ValidateProviderConfigRequest,
};
use crate::resource::{
    ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest,
    ImportResourceStateRequest, ModifyPlanRequest, ReadResourceRequest, ResourceSchemaRequest,
    ResourceWithConfigure, UpdateResourceRequest, ValidateResourceConfigRequest,
};
use crate::schema::{DefaultRequest, PlanModifierRequest, Schema, ValidatorRequest};
use crate::types::{
    has_errors, AttributePath, AttributePathStep, ClientCapabilities, Diagnostic,
    DiagnosticSeverity, Dynamic, DynamicValue,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Request, Response, Status};
use tracing::{debug, warn};

type ProviderData = Option<Arc<dyn Any + Send + Sync>>;

pub struct GrpcProviderServer<P: Provider> {
    provider: Arc<RwLock<P>>,
    resources: Arc<HashMap<String, ResourceFactory>>,
    data_sources: Arc<HashMap<String, DataSourceFactory>>,
    provider_data: Arc<RwLock<ProviderData>>,
    ctx: Context,
}

impl<P: Provider + 'static> GrpcProviderServer<P> {
    pub fn new(provider: P) -> Self {
        Self::with_context(provider, Context::new())
    }

    /// Server whose requests share `ctx`; cancelling it (or `StopProvider`)
    /// cancels in-flight work.
    pub fn with_context(provider: P, ctx: Context) -> Self {
        let resources = provider.resources();
        let data_sources = provider.data_sources();
        Self {
            provider: Arc::new(RwLock::new(provider)),
            resources: Arc::new(resources),
            data_sources: Arc::new(data_sources),
            provider_data: Arc::new(RwLock::new(None)),
            ctx,
        }
    }

    async fn resource(
        &self,
        type_name: &str,
    ) -> std::result::Result<(Box<dyn ResourceWithConfigure>, Vec<Diagnostic>), Status> {
        let factory = self
            .resources
            .get(type_name)
            .ok_or_else(|| TfplugError::ResourceNotFound(type_name.to_string()))?;
        let mut resource = factory();
        let provider_data = self.provider_data.read().await.clone();
        let response = resource
            .configure(self.ctx.clone(), ConfigureResourceRequest { provider_data })
            .await;
        Ok((resource, response.diagnostics))
    }

    async fn data_source(
        &self,
        type_name: &str,
    ) -> std::result::Result<(Box<dyn DataSourceWithConfigure>, Vec<Diagnostic>), Status> {
        let factory = self
            .data_sources
            .get(type_name)
            .ok_or_else(|| TfplugError::DataSourceNotFound(type_name.to_string()))?;
        let mut data_source = factory();
        let provider_data = self.provider_data.read().await.clone();
        let response = data_source
            .configure(self.ctx.clone(), ConfigureDataSourceRequest { provider_data })
            .await;
        Ok((data_source, response.diagnostics))
    }

    async fn resource_schema(&self, resource: &dyn ResourceWithConfigure) -> Schema {
        resource
            .schema(self.ctx.clone(), ResourceSchemaRequest)
            .await
            .schema
    }
}

#[tonic::async_trait]
impl<P: Provider + 'static> ProtoProvider for GrpcProviderServer<P> {
    async fn get_metadata(
        &self,
        _request: Request<proto::get_metadata::Request>,
    ) -> std::result::Result<Response<proto::get_metadata::Response>, Status> {
        let metadata = self
            .provider
            .read()
            .await
            .metadata(self.ctx.clone(), ProviderMetadataRequest)
            .await;

        let mut resources: Vec<_> = self.resources.keys().cloned().collect();
        resources.sort();
        let mut data_sources: Vec<_> = self.data_sources.keys().cloned().collect();
        data_sources.sort();

        Ok(Response::new(proto::get_metadata::Response {
            server_capabilities: Some(server_capabilities_to_proto(
                &metadata.server_capabilities,
            )),
            diagnostics: vec![],
            data_sources: data_sources
                .into_iter()
                .map(|type_name| proto::get_metadata::DataSourceMetadata { type_name })
                .collect(),
            resources: resources
                .into_iter()
                .map(|type_name| proto::get_metadata::ResourceMetadata { type_name })
                .collect(),
        }))
    }

    async fn get_provider_schema(
        &self,
        _request: Request<proto::get_provider_schema::Request>,
    ) -> std::result::Result<Response<proto::get_provider_schema::Response>, Status> {
        let provider = self.provider.read().await;
        let provider_schema = provider
            .schema(self.ctx.clone(), ProviderSchemaRequest)
            .await;
        let metadata = provider
            .metadata(self.ctx.clone(), ProviderMetadataRequest)
            .await;
        drop(provider);

        let mut diagnostics = provider_schema.diagnostics;

        let mut resource_schemas = HashMap::new();
        for (type_name, factory) in self.resources.iter() {
            let response = factory()
                .schema(self.ctx.clone(), ResourceSchemaRequest)
                .await;
            diagnostics.extend(response.diagnostics);
            resource_schemas.insert(type_name.clone(), schema_to_proto(&response.schema));
        }

        let mut data_source_schemas = HashMap::new();
        for (type_name, factory) in self.data_sources.iter() {
            let response = factory()
                .schema(self.ctx.clone(), DataSourceSchemaRequest)
                .await;
            diagnostics.extend(response.diagnostics);
            data_source_schemas.insert(type_name.clone(), schema_to_proto(&response.schema));
        }

        Ok(Response::new(proto::get_provider_schema::Response {
            provider: Some(schema_to_proto(&provider_schema.schema)),
            resource_schemas,
            data_source_schemas,
            diagnostics: diagnostics_to_proto(diagnostics),
            provider_meta: None,
            server_capabilities: Some(server_capabilities_to_proto(
                &metadata.server_capabilities,
            )),
        }))
    }

    async fn validate_provider_config(
        &self,
        request: Request<proto::validate_provider_config::Request>,
    ) -> std::result::Result<Response<proto::validate_provider_config::Response>, Status> {
        let req = request.into_inner();
        let config = decode_dynamic_value(&req.config)?;

        let provider = self.provider.read().await;
        let schema = provider
            .schema(self.ctx.clone(), ProviderSchemaRequest)
            .await
            .schema;
        let mut diagnostics = validate_attributes(&schema, &config);
        diagnostics.extend(
            provider
                .validate(self.ctx.clone(), ValidateProviderConfigRequest { config })
                .await
                .diagnostics,
        );

        Ok(Response::new(proto::validate_provider_config::Response {
            diagnostics: diagnostics_to_proto(diagnostics),
        }))
    }

    async fn validate_resource_config(
        &self,
        request: Request<proto::validate_resource_config::Request>,
    ) -> std::result::Result<Response<proto::validate_resource_config::Response>, Status> {
        let req = request.into_inner();
        let config = decode_dynamic_value(&req.config)?;
        let (resource, mut diagnostics) = self.resource(&req.type_name).await?;
        let schema = self.resource_schema(resource.as_ref()).await;

        diagnostics.extend(validate_attributes(&schema, &config));
        diagnostics.extend(
            resource
                .validate(
                    self.ctx.clone(),
                    ValidateResourceConfigRequest {
                        type_name: req.type_name,
                        config,
                        client_capabilities: client_capabilities_from_proto(
                            req.client_capabilities,
                        ),
                    },
                )
                .await
                .diagnostics,
        );

        Ok(Response::new(proto::validate_resource_config::Response {
            diagnostics: diagnostics_to_proto(diagnostics),
        }))
    }

    async fn validate_data_resource_config(
        &self,
        request: Request<proto::validate_data_resource_config::Request>,
    ) -> std::result::Result<Response<proto::validate_data_resource_config::Response>, Status>
    {
        let req = request.into_inner();
        let config = decode_dynamic_value(&req.config)?;
        let (data_source, mut diagnostics) = self.data_source(&req.type_name).await?;
        let schema = data_source
            .schema(self.ctx.clone(), DataSourceSchemaRequest)
            .await
            .schema;

        diagnostics.extend(validate_attributes(&schema, &config));
        diagnostics.extend(
            data_source
                .validate(
                    self.ctx.clone(),
                    ValidateDataSourceConfigRequest {
                        type_name: req.type_name,
                        config,
                    },
                )
                .await
                .diagnostics,
        );

        Ok(Response::new(proto::validate_data_resource_config::Response {
            diagnostics: diagnostics_to_proto(diagnostics),
        }))
    }

    async fn upgrade_resource_state(
        &self,
        request: Request<proto::upgrade_resource_state::Request>,
    ) -> std::result::Result<Response<proto::upgrade_resource_state::Response>, Status> {
        let req = request.into_inner();
        let (resource, _) = self.resource(&req.type_name).await?;
        let schema = self.resource_schema(resource.as_ref()).await;

        let raw_json = req.raw_state.map(|raw| raw.json).unwrap_or_default();
        if req.version > schema.version {
            return Ok(Response::new(proto::upgrade_resource_state::Response {
                upgraded_state: None,
                diagnostics: diagnostics_to_proto(vec![Diagnostic::error(
                    "Unable to Upgrade Resource State",
                    format!(
                        "Stored state version {} of {} is newer than the provider's schema version {}",
                        req.version, req.type_name, schema.version
                    ),
                )]),
            }));
        }

        let state = DynamicValue::decode_json(&raw_json)?;
        let upgraded = conform_to_schema(state, &schema);

        Ok(Response::new(proto::upgrade_resource_state::Response {
            upgraded_state: Some(encode_dynamic_value(&upgraded)?),
            diagnostics: vec![],
        }))
    }

    async fn configure_provider(
        &self,
        request: Request<proto::configure_provider::Request>,
    ) -> std::result::Result<Response<proto::configure_provider::Response>, Status> {
        let req = request.into_inner();
        let config = decode_dynamic_value(&req.config)?;
        debug!(terraform_version = %req.terraform_version, "configuring provider");

        let response = self
            .provider
            .write()
            .await
            .configure(
                self.ctx.clone(),
                ConfigureProviderRequest {
                    terraform_version: req.terraform_version,
                    config,
                    client_capabilities: client_capabilities_from_proto(req.client_capabilities),
                },
            )
            .await;

        if !has_errors(&response.diagnostics) {
            *self.provider_data.write().await = response.provider_data;
        }

        Ok(Response::new(proto::configure_provider::Response {
            diagnostics: diagnostics_to_proto(response.diagnostics),
        }))
    }

    async fn read_resource(
        &self,
        request: Request<proto::read_resource::Request>,
    ) -> std::result::Result<Response<proto::read_resource::Response>, Status> {
        let req = request.into_inner();
        let current_state = decode_dynamic_value(&req.current_state)?;
        let (resource, mut diagnostics) = self.resource(&req.type_name).await?;

        if has_errors(&diagnostics) || current_state.is_null() {
            return Ok(Response::new(proto::read_resource::Response {
                new_state: req.current_state,
                diagnostics: diagnostics_to_proto(diagnostics),
                private: req.private,
            }));
        }

        let schema = self.resource_schema(resource.as_ref()).await;
        let response = resource
            .read(
                self.ctx.clone(),
                ReadResourceRequest {
                    type_name: req.type_name.clone(),
                    current_state,
                    private: req.private,
                    client_capabilities: client_capabilities_from_proto(req.client_capabilities),
                },
            )
            .await;
        diagnostics.extend(response.diagnostics);

        let new_state = match response.new_state {
            Some(state) => conform_to_schema(state, &schema),
            None => {
                debug!(type_name = %req.type_name, "resource no longer exists, removing from state");
                DynamicValue::null()
            }
        };

        Ok(Response::new(proto::read_resource::Response {
            new_state: Some(encode_dynamic_value(&new_state)?),
            diagnostics: diagnostics_to_proto(diagnostics),
            private: response.private,
        }))
    }

    async fn plan_resource_change(
        &self,
        request: Request<proto::plan_resource_change::Request>,
    ) -> std::result::Result<Response<proto::plan_resource_change::Response>, Status> {
        let req = request.into_inner();
        let prior_state = decode_dynamic_value(&req.prior_state)?;
        let proposed_new_state = decode_dynamic_value(&req.proposed_new_state)?;
        let config = decode_dynamic_value(&req.config)?;

        // Destroy plans pass through untouched
        if proposed_new_state.is_null() {
            return Ok(Response::new(proto::plan_resource_change::Response {
                planned_state: req.proposed_new_state,
                requires_replace: vec![],
                planned_private: req.prior_private,
                diagnostics: vec![],
                legacy_type_system: false,
            }));
        }

        let (resource, mut diagnostics) = self.resource(&req.type_name).await?;
        let schema = self.resource_schema(resource.as_ref()).await;

        let outcome = plan_attributes(&schema, &prior_state, proposed_new_state, &config);
        let mut planned_state = outcome.planned_state;
        let mut requires_replace = outcome.requires_replace;
        let mut planned_private = req.prior_private.clone();
        diagnostics.extend(outcome.diagnostics);

        if !has_errors(&diagnostics) {
            if let Some(modifier) = resource.as_modify_plan() {
                let response = modifier
                    .modify_plan(
                        self.ctx.clone(),
                        ModifyPlanRequest {
                            type_name: req.type_name.clone(),
                            config,
                            prior_state,
                            proposed_new_state: planned_state.clone(),
                            prior_private: req.prior_private,
                        },
                    )
                    .await;
                diagnostics.extend(response.diagnostics);
                planned_state = conform_to_schema(response.planned_state, &schema);
                planned_private = response.planned_private;
                for path in response.requires_replace {
                    if !requires_replace.contains(&path) {
                        requires_replace.push(path);
                    }
                }
            }
        }

        Ok(Response::new(proto::plan_resource_change::Response {
            planned_state: Some(encode_dynamic_value(&planned_state)?),
            requires_replace: requires_replace.iter().map(path_to_proto).collect(),
            planned_private,
            diagnostics: diagnostics_to_proto(diagnostics),
            legacy_type_system: false,
        }))
    }

    async fn apply_resource_change(
        &self,
        request: Request<proto::apply_resource_change::Request>,
    ) -> std::result::Result<Response<proto::apply_resource_change::Response>, Status> {
        let req = request.into_inner();
        let prior_state = decode_dynamic_value(&req.prior_state)?;
        let planned_state = decode_dynamic_value(&req.planned_state)?;
        let config = decode_dynamic_value(&req.config)?;

        let (resource, mut diagnostics) = self.resource(&req.type_name).await?;
        if has_errors(&diagnostics) {
            return Ok(Response::new(proto::apply_resource_change::Response {
                new_state: req.prior_state,
                private: req.planned_private,
                diagnostics: diagnostics_to_proto(diagnostics),
                legacy_type_system: false,
            }));
        }
        let schema = self.resource_schema(resource.as_ref()).await;

        let (new_state, private) = if planned_state.is_null() {
            let response = resource
                .delete(
                    self.ctx.clone(),
                    DeleteResourceRequest {
                        type_name: req.type_name.clone(),
                        prior_state: prior_state.clone(),
                        planned_private: req.planned_private.clone(),
                    },
                )
                .await;
            let failed = has_errors(&response.diagnostics);
            diagnostics.extend(response.diagnostics);
            // A failed delete leaves the object in state
            if failed {
                (prior_state, req.planned_private)
            } else {
                (DynamicValue::null(), Vec::new())
            }
        } else if prior_state.is_null() {
            let response = resource
                .create(
                    self.ctx.clone(),
                    CreateResourceRequest {
                        type_name: req.type_name.clone(),
                        planned_state,
                        config,
                        planned_private: req.planned_private,
                    },
                )
                .await;
            diagnostics.extend(response.diagnostics);
            (response.new_state, response.private)
        } else {
            let response = resource
                .update(
                    self.ctx.clone(),
                    UpdateResourceRequest {
                        type_name: req.type_name.clone(),
                        prior_state,
                        planned_state,
                        config,
                        planned_private: req.planned_private,
                    },
                )
                .await;
            diagnostics.extend(response.diagnostics);
            (response.new_state, response.private)
        };

        let new_state = resolve_unknowns(conform_to_schema(new_state, &schema), &req.type_name);

        Ok(Response::new(proto::apply_resource_change::Response {
            new_state: Some(encode_dynamic_value(&new_state)?),
            private,
            diagnostics: diagnostics_to_proto(diagnostics),
            legacy_type_system: false,
        }))
    }

    async fn import_resource_state(
        &self,
        request: Request<proto::import_resource_state::Request>,
    ) -> std::result::Result<Response<proto::import_resource_state::Response>, Status> {
        let req = request.into_inner();
        let (resource, mut diagnostics) = self.resource(&req.type_name).await?;

        let Some(importer) = resource.as_import_state() else {
            diagnostics.push(Diagnostic::error(
                "Resource Import Not Implemented",
                format!("Resource type {} does not support import", req.type_name),
            ));
            return Ok(Response::new(proto::import_resource_state::Response {
                imported_resources: vec![],
                diagnostics: diagnostics_to_proto(diagnostics),
            }));
        };

        let schema = self.resource_schema(resource.as_ref()).await;
        let response = importer
            .import_state(
                self.ctx.clone(),
                ImportResourceStateRequest {
                    type_name: req.type_name,
                    id: req.id,
                    client_capabilities: client_capabilities_from_proto(req.client_capabilities),
                },
            )
            .await;
        diagnostics.extend(response.diagnostics);

        let imported_resources = response
            .imported_resources
            .into_iter()
            .map(|imported| {
                let state = conform_to_schema(imported.state, &schema);
                Ok(proto::import_resource_state::ImportedResource {
                    type_name: imported.type_name,
                    state: Some(encode_dynamic_value(&state)?),
                    private: imported.private,
                })
            })
            .collect::<std::result::Result<Vec<_>, Status>>()?;

        Ok(Response::new(proto::import_resource_state::Response {
            imported_resources,
            diagnostics: diagnostics_to_proto(diagnostics),
        }))
    }

    async fn read_data_source(
        &self,
        request: Request<proto::read_data_source::Request>,
    ) -> std::result::Result<Response<proto::read_data_source::Response>, Status> {
        let req = request.into_inner();
        let config = decode_dynamic_value(&req.config)?;
        let (data_source, mut diagnostics) = self.data_source(&req.type_name).await?;
        if has_errors(&diagnostics) {
            return Ok(Response::new(proto::read_data_source::Response {
                state: None,
                diagnostics: diagnostics_to_proto(diagnostics),
            }));
        }

        let schema = data_source
            .schema(self.ctx.clone(), DataSourceSchemaRequest)
            .await
            .schema;
        let response = data_source
            .read(
                self.ctx.clone(),
                ReadDataSourceRequest {
                    type_name: req.type_name.clone(),
                    config,
                    client_capabilities: client_capabilities_from_proto(req.client_capabilities),
                },
            )
            .await;
        diagnostics.extend(response.diagnostics);

        let state = resolve_unknowns(conform_to_schema(response.state, &schema), &req.type_name);

        Ok(Response::new(proto::read_data_source::Response {
            state: Some(encode_dynamic_value(&state)?),
            diagnostics: diagnostics_to_proto(diagnostics),
        }))
    }

    async fn stop_provider(
        &self,
        _request: Request<proto::stop_provider::Request>,
    ) -> std::result::Result<Response<proto::stop_provider::Response>, Status> {
        self.ctx.cancel();
        let response = self
            .provider
            .read()
            .await
            .stop(self.ctx.clone(), StopProviderRequest)
            .await;

        Ok(Response::new(proto::stop_provider::Response {
            error: response.error.unwrap_or_default(),
        }))
    }
}

pub(crate) struct PlanOutcome {
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Framework side of planning for a create or update
///
/// 1. Optional+computed attributes absent from config take their default.
/// 2. Remaining computed attributes absent from config become unknown when
///    the resource is being created or anything changed.
/// 3. Attribute plan modifiers run in schema order.
pub(crate) fn plan_attributes(
    schema: &Schema,
    prior_state: &DynamicValue,
    proposed_new_state: DynamicValue,
    config: &DynamicValue,
) -> PlanOutcome {
    let prior_state_exists = !prior_state.is_null();
    let prior_state = conform_to_schema(prior_state.clone(), schema);
    let mut planned_state = conform_to_schema(proposed_new_state, schema);
    let mut diagnostics = Vec::new();
    let mut requires_replace = Vec::new();

    for attr in &schema.block.attributes {
        if !attr.computed || !config.get_attribute(&attr.name).is_null() {
            continue;
        }
        if let Some(default) = &attr.default {
            let value = default
                .default_value(DefaultRequest {
                    path: AttributePath::new(&attr.name),
                })
                .value;
            planned_state.set_attribute(&attr.name, value);
        }
    }

    let has_changes = !prior_state_exists || planned_state != prior_state;
    if has_changes {
        for attr in &schema.block.attributes {
            if attr.computed
                && attr.default.is_none()
                && config.get_attribute(&attr.name).is_null()
            {
                planned_state.set_attribute(&attr.name, Dynamic::Unknown);
            }
        }
    }

    for attr in &schema.block.attributes {
        if attr.plan_modifiers.is_empty() {
            continue;
        }
        let path = AttributePath::new(&attr.name);
        let mut plan_value = planned_state.get_attribute(&attr.name);
        let mut replace = false;

        for modifier in &attr.plan_modifiers {
            let response = modifier.modify(PlanModifierRequest {
                config_value: config.get_attribute(&attr.name),
                state_value: prior_state.get_attribute(&attr.name),
                plan_value,
                path: path.clone(),
                prior_state_exists,
            });
            plan_value = response.plan_value;
            replace |= response.requires_replace;
            diagnostics.extend(response.diagnostics);
        }

        planned_state.set_attribute(&attr.name, plan_value);
        if replace {
            requires_replace.push(path);
        }
    }

    PlanOutcome {
        planned_state,
        requires_replace,
        diagnostics,
    }
}

/// Run attribute validators over configuration values
pub(crate) fn validate_attributes(schema: &Schema, config: &DynamicValue) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for attr in &schema.block.attributes {
        let value = config.get_attribute(&attr.name);
        if value.is_null() || !value.is_wholly_known() {
            continue;
        }
        for validator in &attr.validators {
            diagnostics.extend(
                validator
                    .validate(ValidatorRequest {
                        config_value: value.clone(),
                        path: AttributePath::new(&attr.name),
                    })
                    .diagnostics,
            );
        }
    }
    diagnostics
}

/// Terraform expects every schema attribute in an object; absent ones are
/// filled with null and attributes outside the schema are dropped.
pub(crate) fn conform_to_schema(value: DynamicValue, schema: &Schema) -> DynamicValue {
    match value.value {
        Dynamic::Map(mut attrs) => {
            let conformed = schema
                .block
                .attributes
                .iter()
                .map(|attr| {
                    let v = attrs.remove(&attr.name).unwrap_or_default();
                    (attr.name.clone(), v)
                })
                .collect();
            DynamicValue::new(Dynamic::Map(conformed))
        }
        other => DynamicValue::new(other),
    }
}

// Applied state may not contain unknowns
fn resolve_unknowns(mut value: DynamicValue, type_name: &str) -> DynamicValue {
    if let Dynamic::Map(attrs) = &mut value.value {
        for (name, v) in attrs.iter_mut() {
            if !v.is_wholly_known() {
                warn!(type_name, attribute = %name, "unknown value after apply, setting to null");
                *v = Dynamic::Null;
            }
        }
    }
    value
}

fn decode_dynamic_value(
    value: &Option<proto::DynamicValue>,
) -> std::result::Result<DynamicValue, Status> {
    let Some(value) = value else {
        return Ok(DynamicValue::null());
    };
    let decoded = if !value.msgpack.is_empty() {
        DynamicValue::decode_msgpack(&value.msgpack)?
    } else {
        DynamicValue::decode_json(&value.json)?
    };
    Ok(decoded)
}

fn encode_dynamic_value(value: &DynamicValue) -> std::result::Result<proto::DynamicValue, Status> {
    Ok(proto::DynamicValue {
        msgpack: value.encode_msgpack()?,
        json: vec![],
    })
}

fn schema_to_proto(schema: &Schema) -> proto::Schema {
    proto::Schema {
        version: schema.version,
        block: Some(proto::schema::Block {
            version: schema.block.version,
            attributes: schema
                .block
                .attributes
                .iter()
                .map(|attr| proto::schema::Attribute {
                    name: attr.name.clone(),
                    r#type: attr.r#type.to_bytes(),
                    description: attr.description.clone(),
                    required: attr.required,
                    optional: attr.optional,
                    computed: attr.computed,
                    sensitive: attr.sensitive,
                    description_kind: proto::StringKind::Plain as i32,
                    deprecated: attr.deprecated,
                })
                .collect(),
            block_types: vec![],
            description: schema.block.description.clone(),
            description_kind: match schema.block.description_kind {
                crate::schema::StringKind::Plain => proto::StringKind::Plain as i32,
                crate::schema::StringKind::Markdown => proto::StringKind::Markdown as i32,
            },
            deprecated: schema.block.deprecated,
        }),
    }
}

fn server_capabilities_to_proto(
    capabilities: &crate::types::ServerCapabilities,
) -> proto::ServerCapabilities {
    proto::ServerCapabilities {
        plan_destroy: capabilities.plan_destroy,
        get_provider_schema_optional: capabilities.get_provider_schema_optional,
        move_resource_state: false,
    }
}

fn client_capabilities_from_proto(
    capabilities: Option<proto::ClientCapabilities>,
) -> ClientCapabilities {
    capabilities
        .map(|c| ClientCapabilities {
            deferral_allowed: c.deferral_allowed,
            write_only_attributes_allowed: c.write_only_attributes_allowed,
        })
        .unwrap_or_default()
}

fn path_to_proto(path: &AttributePath) -> proto::AttributePath {
    use proto::attribute_path::step::Selector;

    proto::AttributePath {
        steps: path
            .steps
            .iter()
            .map(|step| proto::attribute_path::Step {
                selector: Some(match step {
                    AttributePathStep::AttributeName(name) => Selector::AttributeName(name.clone()),
                    AttributePathStep::ElementKeyString(key) => {
                        Selector::ElementKeyString(key.clone())
                    }
                    AttributePathStep::ElementKeyInt(idx) => Selector::ElementKeyInt(*idx),
                }),
            })
            .collect(),
    }
}

fn diagnostics_to_proto(diagnostics: Vec<Diagnostic>) -> Vec<proto::Diagnostic> {
    diagnostics
        .into_iter()
        .map(|diag| proto::Diagnostic {
            severity: match diag.severity {
                DiagnosticSeverity::Invalid => proto::diagnostic::Severity::Invalid as i32,
                DiagnosticSeverity::Error => proto::diagnostic::Severity::Error as i32,
                DiagnosticSeverity::Warning => proto::diagnostic::Severity::Warning as i32,
            },
            summary: diag.summary,
            detail: diag.detail,
            attribute: diag.attribute.as_ref().map(path_to_proto),
        })
        .collect()
}
