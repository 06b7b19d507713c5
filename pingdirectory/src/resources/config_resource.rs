//! Generic resource over one configuration category
//!
//! `pingdirectory_<category>` adds and deletes objects on the server.
//! `pingdirectory_default_<category>` manages an object that ships with the
//! server: create adopts it and applies the plan as a modification, delete
//! only forgets it.

use async_trait::async_trait;
use std::marker::PhantomData;
use tfplug::context::Context;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ModifyPlanRequest,
    ModifyPlanResponse, ReadResourceRequest, ReadResourceResponse, Resource,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, ResourceWithModifyPlan, UpdateResourceRequest,
    UpdateResourceResponse, ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

use super::{
    api_error, check_version_gates, fill_unknown_defaults, invalid_model,
    null_inapplicable_unknowns, provider_not_configured, resource_not_found,
    validate_type_specific, ConfigModel,
};
use crate::api::UpdateRequest;
use crate::operations::log_update_operations;
use crate::provider_data::PingDirectoryProviderData;

pub struct ConfigResource<M> {
    type_name: String,
    is_default: bool,
    provider_data: Option<PingDirectoryProviderData>,
    _model: PhantomData<fn() -> M>,
}

impl<M: ConfigModel> Default for ConfigResource<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ConfigModel> ConfigResource<M> {
    /// `pingdirectory_<category>`
    pub fn new() -> Self {
        Self {
            type_name: format!("pingdirectory_{}", M::RESOURCE_NAME),
            is_default: false,
            provider_data: None,
            _model: PhantomData,
        }
    }

    /// `pingdirectory_default_<category>`
    pub fn new_default() -> Self {
        Self {
            type_name: format!("pingdirectory_default_{}", M::RESOURCE_NAME),
            is_default: true,
            provider_data: None,
            _model: PhantomData,
        }
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    fn data(&self) -> Result<&PingDirectoryProviderData, Diagnostic> {
        self.provider_data.as_ref().ok_or_else(provider_not_configured)
    }

    fn object_name(model: &M) -> Result<String, Diagnostic> {
        model.name().map(str::to_string).ok_or_else(|| {
            Diagnostic::error("Missing name", "The 'name' attribute must be known")
                .with_attribute(AttributePath::new("name"))
        })
    }

    async fn add(&self, data: &PingDirectoryProviderData, plan: &M) -> Result<M, Diagnostic> {
        let name = Self::object_name(plan)?;
        let object = data
            .client
            .config::<M::Attributes>()
            .add(&name, plan.type_name(), &plan.add_request())
            .await
            .map_err(|e| api_error(&format!("create the {}", M::LABEL), &e))?;

        let mut state = plan.clone();
        state.read_response(&object, plan);
        Ok(state)
    }

    /// Read the existing object, then modify it to match the plan
    async fn adopt(&self, data: &PingDirectoryProviderData, plan: &M) -> Result<M, Diagnostic> {
        let name = Self::object_name(plan)?;
        let api = data.client.config::<M::Attributes>();
        let object = api
            .get(&name)
            .await
            .map_err(|e| api_error(&format!("read the {}", M::LABEL), &e))?;

        if let Some(planned_type) = plan.type_name() {
            if object.type_name() != Some(planned_type) {
                return Err(Diagnostic::error(
                    "Type mismatch",
                    format!(
                        "The {} '{}' has type '{}' on the server, but the plan has type '{}'",
                        M::LABEL,
                        name,
                        object.type_name().unwrap_or_default(),
                        planned_type
                    ),
                )
                .with_attribute(AttributePath::new("type")));
            }
        }

        let mut state = plan.clone();
        state.read_response(&object, plan);

        let operations = M::create_operations(plan, &state);
        if operations.is_empty() {
            return Ok(state);
        }

        log_update_operations(&operations);
        let object = api
            .update(&name, &UpdateRequest::new(operations))
            .await
            .map_err(|e| api_error(&format!("update the {}", M::LABEL), &e))?;

        let mut state = plan.clone();
        state.read_response(&object, plan);
        Ok(state)
    }
}

#[async_trait]
impl<M: ConfigModel> Resource for ConfigResource<M> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: M::schema(self.is_default),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = vec![];

        if let Some(type_name) = request.config.get_attribute("type").as_str() {
            diagnostics.extend(validate_type_specific(
                M::LABEL,
                type_name,
                &request.config,
                M::TYPE_SPECIFIC,
            ));
            diagnostics.extend(M::validate_type(type_name, &request.config));
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = match self.data() {
            Ok(data) => match M::from_value(&request.planned_state) {
                Ok(plan) if self.is_default => self.adopt(data, &plan).await,
                Ok(plan) => self.add(data, &plan).await,
                Err(e) => Err(invalid_model(e)),
            },
            Err(diag) => Err(diag),
        };

        match result {
            Ok(state) => CreateResourceResponse {
                new_state: state.to_value(),
                private: vec![],
                diagnostics: vec![],
            },
            Err(diag) => CreateResourceResponse {
                new_state: DynamicValue::null(),
                private: vec![],
                diagnostics: vec![diag],
            },
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let data = match self.data() {
            Ok(data) => data,
            Err(diag) => {
                diagnostics.push(diag);
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                };
            }
        };

        let (mut state, name) = match M::from_value(&request.current_state)
            .map_err(invalid_model)
            .and_then(|state| Self::object_name(&state).map(|name| (state, name)))
        {
            Ok(found) => found,
            Err(diag) => {
                diagnostics.push(diag);
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                };
            }
        };

        match data.client.config::<M::Attributes>().get(&name).await {
            Ok(object) => {
                let expected = state.clone();
                state.read_response(&object, &expected);
                ReadResourceResponse {
                    new_state: Some(state.to_value()),
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) if e.is_not_found() => {
                diagnostics.push(resource_not_found(M::LABEL, &name));
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) => {
                diagnostics.push(api_error(&format!("read the {}", M::LABEL), &e));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                }
            }
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let data = match self.data() {
            Ok(data) => data,
            Err(diag) => {
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics: vec![diag],
                }
            }
        };

        let models = M::from_value(&request.planned_state)
            .and_then(|plan| M::from_value(&request.prior_state).map(|state| (plan, state)));
        let (plan, state) = match models {
            Ok(models) => models,
            Err(e) => {
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics: vec![invalid_model(e)],
                }
            }
        };

        let operations = M::create_operations(&plan, &state);
        if operations.is_empty() {
            tracing::debug!("No changes to apply to {} '{}'", M::LABEL, plan.name().unwrap_or_default());
            return UpdateResourceResponse {
                new_state: request.planned_state,
                private: request.planned_private,
                diagnostics: vec![],
            };
        }

        let name = match Self::object_name(&plan) {
            Ok(name) => name,
            Err(diag) => {
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics: vec![diag],
                }
            }
        };

        log_update_operations(&operations);
        match data
            .client
            .config::<M::Attributes>()
            .update(&name, &UpdateRequest::new(operations))
            .await
        {
            Ok(object) => {
                let mut new_state = plan.clone();
                new_state.read_response(&object, &plan);
                UpdateResourceResponse {
                    new_state: new_state.to_value(),
                    private: request.planned_private,
                    diagnostics: vec![],
                }
            }
            Err(e) => UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics: vec![api_error(&format!("update the {}", M::LABEL), &e)],
            },
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        if self.is_default {
            tracing::debug!("{} is part of the server configuration, removing from state only", M::LABEL);
            return DeleteResourceResponse::default();
        }

        let data = match self.data() {
            Ok(data) => data,
            Err(diag) => {
                return DeleteResourceResponse {
                    diagnostics: vec![diag],
                }
            }
        };

        let name = match M::from_value(&request.prior_state)
            .map_err(invalid_model)
            .and_then(|state| Self::object_name(&state))
        {
            Ok(name) => name,
            Err(diag) => {
                return DeleteResourceResponse {
                    diagnostics: vec![diag],
                }
            }
        };

        match data.client.config::<M::Attributes>().delete(&name).await {
            Ok(()) => DeleteResourceResponse::default(),
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} '{}' already deleted", M::LABEL, name);
                DeleteResourceResponse::default()
            }
            Err(e) => DeleteResourceResponse {
                diagnostics: vec![api_error(&format!("delete the {}", M::LABEL), &e)],
            },
        }
    }

    fn as_import_state(&self) -> Option<&dyn ResourceWithImportState> {
        Some(self)
    }

    fn as_modify_plan(&self) -> Option<&dyn ResourceWithModifyPlan> {
        Some(self)
    }
}

#[async_trait]
impl<M: ConfigModel> ResourceWithConfigure for ConfigResource<M> {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        // Validation runs before the provider is configured
        self.provider_data = PingDirectoryProviderData::from_any(request.provider_data);
        ConfigureResourceResponse::default()
    }
}

#[async_trait]
impl<M: ConfigModel> ResourceWithImportState for ConfigResource<M> {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse::default();
        tfplug::import_state_passthrough_id(
            &ctx,
            AttributePath::new("name"),
            &request,
            &mut response,
        );
        response
    }
}

#[async_trait]
impl<M: ConfigModel> ResourceWithModifyPlan for ConfigResource<M> {
    async fn modify_plan(&self, _ctx: Context, request: ModifyPlanRequest) -> ModifyPlanResponse {
        let mut planned_state = request.proposed_new_state;
        let mut diagnostics = vec![];

        if !planned_state.is_null() {
            if let Some(data) = &self.provider_data {
                diagnostics.extend(check_version_gates(
                    &request.config,
                    &data.product_version,
                    M::VERSION_GATED,
                ));
            }

            if let Some(type_name) = planned_state
                .get_attribute("type")
                .as_str()
                .map(str::to_string)
            {
                if request.prior_state.is_null() && !self.is_default {
                    fill_unknown_defaults(&mut planned_state, M::type_defaults(&type_name));
                }
                null_inapplicable_unknowns(
                    &mut planned_state,
                    &M::schema(self.is_default),
                    &type_name,
                    M::TYPE_SPECIFIC,
                );
            }
        }

        ModifyPlanResponse {
            planned_state,
            requires_replace: vec![],
            planned_private: request.prior_private,
            diagnostics,
        }
    }
}
