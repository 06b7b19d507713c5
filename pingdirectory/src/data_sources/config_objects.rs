//! List data source

use async_trait::async_trait;
use std::marker::PhantomData;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::types::{Dynamic, DynamicValue};

use super::list_schema;
use crate::provider_data::PingDirectoryProviderData;
use crate::resources::{api_error, provider_not_configured, ConfigModel};

/// `pingdirectory_<category>s`: names of the objects matching `filter`
pub struct ConfigObjectsDataSource<M> {
    type_name: String,
    provider_data: Option<PingDirectoryProviderData>,
    _model: PhantomData<fn() -> M>,
}

impl<M: ConfigModel> Default for ConfigObjectsDataSource<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ConfigModel> ConfigObjectsDataSource<M> {
    pub fn new() -> Self {
        Self {
            type_name: format!("pingdirectory_{}s", M::RESOURCE_NAME),
            provider_data: None,
            _model: PhantomData,
        }
    }
}

#[async_trait]
impl<M: ConfigModel> DataSource for ConfigObjectsDataSource<M> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: list_schema::<M>(),
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
        let Some(data) = &self.provider_data else {
            return ReadDataSourceResponse {
                state: DynamicValue::null(),
                diagnostics: vec![provider_not_configured()],
            };
        };

        let filter = request.config.get_attribute("filter");
        let response = match data
            .client
            .config::<M::Attributes>()
            .list(filter.as_str().filter(|f| !f.is_empty()))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics: vec![api_error(&format!("list the {} objects", M::LABEL), &e)],
                }
            }
        };
        tracing::debug!(
            total = response.total_results,
            "Listed {} objects",
            M::LABEL
        );

        let mut ids: Vec<String> = response.resources.into_iter().map(|o| o.id).collect();
        ids.sort();
        ids.dedup();

        let mut state = DynamicValue::object();
        state.set_attribute("id", Dynamic::String(format!("{}s", M::RESOURCE_NAME)));
        state.set_attribute("filter", filter);
        state.set_attribute(
            "ids",
            Dynamic::List(ids.into_iter().map(Dynamic::String).collect()),
        );

        ReadDataSourceResponse {
            state,
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl<M: ConfigModel> DataSourceWithConfigure for ConfigObjectsDataSource<M> {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        self.provider_data = PingDirectoryProviderData::from_any(request.provider_data);
        ConfigureDataSourceResponse::default()
    }
}
