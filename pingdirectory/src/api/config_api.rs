//! Generic CRUD access to one configuration category

use serde_json::{Map, Value};
use std::marker::PhantomData;

use super::client::Client;
use super::common::{ConfigCategory, ConfigObject, ListResponse, UpdateRequest};
use super::error::ApiError;

/// Configuration API for the category `C`
pub struct ConfigApi<'a, C> {
    client: &'a Client,
    _category: PhantomData<C>,
}

impl<'a, C: ConfigCategory> ConfigApi<'a, C> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            _category: PhantomData,
        }
    }

    /// POST /config/{category}
    pub async fn add(
        &self,
        name: &str,
        type_name: Option<&str>,
        attributes: &C,
    ) -> Result<ConfigObject<C>, ApiError> {
        let body = add_request_body::<C>(name, type_name, attributes)?;
        tracing::debug!("Add request: {}", body);
        self.client.post(&C::collection_path(), &body).await
    }

    /// GET /config/{category}/{name}
    pub async fn get(&self, name: &str) -> Result<ConfigObject<C>, ApiError> {
        self.client.get(&C::object_path(name)).await
    }

    /// PATCH /config/{category}/{name}
    pub async fn update(
        &self,
        name: &str,
        request: &UpdateRequest,
    ) -> Result<ConfigObject<C>, ApiError> {
        self.client.patch(&C::object_path(name), request).await
    }

    /// DELETE /config/{category}/{name}
    pub async fn delete(&self, name: &str) -> Result<(), ApiError> {
        self.client.delete(&C::object_path(name)).await
    }

    /// GET /config/{category}?filter={filter}
    pub async fn list(&self, filter: Option<&str>) -> Result<ListResponse<ConfigObject<C>>, ApiError> {
        let query: Vec<(&str, &str)> = filter.map(|f| ("filter", f)).into_iter().collect();
        self.client
            .get_with_query(&C::collection_path(), &query)
            .await
    }
}

/// Add body: the attributes plus `schemas` and the category's name field
pub fn add_request_body<C: ConfigCategory>(
    name: &str,
    type_name: Option<&str>,
    attributes: &C,
) -> Result<Value, ApiError> {
    let mut body = match serde_json::to_value(attributes)
        .map_err(|e| ApiError::ParseError(format!("Failed to serialize request: {}", e)))?
    {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    body.insert(
        "schemas".to_string(),
        Value::Array(vec![Value::String(C::schema_urn(type_name))]),
    );
    body.insert(C::NAME_FIELD.to_string(), Value::String(name.to_string()));
    Ok(Value::Object(body))
}
