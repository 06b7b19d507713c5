//! Single-object data source

use async_trait::async_trait;
use std::marker::PhantomData;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

use super::object_schema;
use crate::provider_data::PingDirectoryProviderData;
use crate::resources::{api_error, invalid_model, provider_not_configured, ConfigModel};

/// `pingdirectory_<category>`: one object read by name
pub struct ConfigObjectDataSource<M> {
    type_name: String,
    provider_data: Option<PingDirectoryProviderData>,
    _model: PhantomData<fn() -> M>,
}

impl<M: ConfigModel> Default for ConfigObjectDataSource<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ConfigModel> ConfigObjectDataSource<M> {
    pub fn new() -> Self {
        Self {
            type_name: format!("pingdirectory_{}", M::RESOURCE_NAME),
            provider_data: None,
            _model: PhantomData,
        }
    }

    async fn read_object(
        &self,
        data: &PingDirectoryProviderData,
        config: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let mut model = M::from_value(config).map_err(invalid_model)?;
        let name = model.name().map(str::to_string).ok_or_else(|| {
            Diagnostic::error("Missing name", "The 'name' attribute must be set")
                .with_attribute(AttributePath::new("name"))
        })?;

        tracing::debug!(name = %name, "Reading {}", M::LABEL);
        let object = data
            .client
            .config::<M::Attributes>()
            .get(&name)
            .await
            .map_err(|e| api_error(&format!("read the {}", M::LABEL), &e))?;

        let expected = model.clone();
        model.read_response(&object, &expected);
        Ok(model.to_value())
    }
}

#[async_trait]
impl<M: ConfigModel> DataSource for ConfigObjectDataSource<M> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: object_schema::<M>(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse::default()
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let result = match &self.provider_data {
            Some(data) => self.read_object(data, &request.config).await,
            None => Err(provider_not_configured()),
        };

        match result {
            Ok(state) => ReadDataSourceResponse {
                state,
                diagnostics: vec![],
            },
            Err(diag) => ReadDataSourceResponse {
                state: DynamicValue::null(),
                diagnostics: vec![diag],
            },
        }
    }
}

#[async_trait]
impl<M: ConfigModel> DataSourceWithConfigure for ConfigObjectDataSource<M> {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        self.provider_data = PingDirectoryProviderData::from_any(request.provider_data);
        ConfigureDataSourceResponse::default()
    }
}
