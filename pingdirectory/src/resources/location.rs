//! Location resource
//!
//! Locations have no `type` and nothing shipped with the server to adopt,
//! so there is no `default_` variant.

use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::Value;

use super::{description_attribute, id_attribute, name_attribute, ConfigModel, ConfigResource};
use crate::api::{ConfigObject, LocationAttributes, Operation};
use crate::convert::{is_empty_string, request_string, string_type_or_nil};
use crate::operations::add_string_operation_if_necessary;

pub type LocationResource = ConfigResource<LocationModel>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationModel {
    pub id: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
}

impl ConfigModel for LocationModel {
    type Attributes = LocationAttributes;

    const RESOURCE_NAME: &'static str = "location";
    const LABEL: &'static str = "Location";

    fn schema(_is_default: bool) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Location.")
            .attribute(id_attribute())
            .attribute(name_attribute(Self::LABEL))
            .attribute(description_attribute(Self::LABEL, false))
            .build()
    }

    fn from_value(value: &DynamicValue) -> tfplug::Result<Self> {
        Ok(Self {
            id: value.get_value("id")?,
            name: value.get_value("name")?,
            description: value.get_value("description")?,
        })
    }

    fn to_value(&self) -> DynamicValue {
        let mut value = DynamicValue::object();
        value.set_value("id", &self.id);
        value.set_value("name", &self.name);
        value.set_value("description", &self.description);
        value
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn add_request(&self) -> LocationAttributes {
        LocationAttributes {
            description: request_string(&self.description),
        }
    }

    fn read_response(&mut self, object: &ConfigObject<LocationAttributes>, expected: &Self) {
        self.id = Value::Known(object.id.clone());
        self.description = string_type_or_nil(
            object.attributes.description.clone(),
            is_empty_string(&expected.description),
        );
    }

    fn create_operations(plan: &Self, state: &Self) -> Vec<Operation> {
        let mut ops = Vec::new();
        add_string_operation_if_necessary(
            &mut ops,
            &plan.description,
            &state.description,
            "description",
        );
        ops
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

    #[test]
    fn schema_has_no_type() {
        let schema = LocationModel::schema(false);
        assert!(schema.attribute("type").is_none());
        assert!(schema.attribute("description").unwrap().optional);
        assert_eq!(schema.block.attributes.len(), 3);
    }

    #[test]
    fn empty_description_is_not_sent() {
        let model = LocationModel {
            name: s("Austin"),
            description: s(""),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(model.add_request()).unwrap(), json!({}));
    }

    #[test]
    fn read_response_sets_id() {
        let object: ConfigObject<LocationAttributes> = serde_json::from_value(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:location"],
            "id": "Austin",
            "description": "Texas datacenter"
        }))
        .unwrap();
        let mut state = LocationModel {
            name: s("Austin"),
            ..Default::default()
        };
        let expected = state.clone();
        state.read_response(&object, &expected);
        assert_eq!(state.id, s("Austin"));
        assert_eq!(state.description, s("Texas datacenter"));
        assert_eq!(state.type_name(), None);
    }

    #[test]
    fn removing_description() {
        let state = LocationModel {
            name: s("Austin"),
            description: s("Texas datacenter"),
            ..Default::default()
        };
        let plan = LocationModel {
            description: Value::Null,
            ..state.clone()
        };
        assert_eq!(
            LocationModel::create_operations(&plan, &state),
            vec![Operation::new(OperationKind::Remove, "description")]
        );
    }
}
