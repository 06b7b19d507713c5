//! Data sources
//!
//! Every resource category also has a single-object data source that reads
//! one object by name and a list data source that returns the names of all
//! objects matching an optional filter.

mod config_object;
mod config_objects;

pub use config_object::ConfigObjectDataSource;
pub use config_objects::ConfigObjectsDataSource;

use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, Schema, SchemaBuilder};

use crate::resources::{
    AccessTokenValidatorModel, ConfigModel, IdentityMapperModel, LocationModel,
    SaslMechanismHandlerModel,
};

pub type AccessTokenValidatorDataSource = ConfigObjectDataSource<AccessTokenValidatorModel>;
pub type AccessTokenValidatorsDataSource = ConfigObjectsDataSource<AccessTokenValidatorModel>;
pub type SaslMechanismHandlerDataSource = ConfigObjectDataSource<SaslMechanismHandlerModel>;
pub type SaslMechanismHandlersDataSource = ConfigObjectsDataSource<SaslMechanismHandlerModel>;
pub type IdentityMapperDataSource = ConfigObjectDataSource<IdentityMapperModel>;
pub type IdentityMappersDataSource = ConfigObjectsDataSource<IdentityMapperModel>;
pub type LocationDataSource = ConfigObjectDataSource<LocationModel>;
pub type LocationsDataSource = ConfigObjectsDataSource<LocationModel>;

/// The resource schema with `name` as the only input. Everything else is
/// read from the server, so validators, plan modifiers and defaults go.
pub(crate) fn object_schema<M: ConfigModel>() -> Schema {
    let resource = M::schema(false);
    let attributes = resource.block.attributes.into_iter().map(|attr| {
        if attr.name == "name" {
            return AttributeBuilder::new("name", attr.r#type)
                .description(&attr.description)
                .required()
                .build();
        }
        computed_only(attr)
    });

    SchemaBuilder::new()
        .version(0)
        .description(&format!("Describes a {}.", M::LABEL))
        .attributes(attributes)
        .build()
}

fn computed_only(attr: Attribute) -> Attribute {
    let builder = AttributeBuilder::new(&attr.name, attr.r#type)
        .description(&attr.description)
        .computed();
    if attr.sensitive {
        builder.sensitive().build()
    } else {
        builder.build()
    }
}

pub(crate) fn list_schema<M: ConfigModel>() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description(&format!("Lists {} objects.", M::LABEL))
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("Placeholder name of this object required by Terraform.")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("filter", AttributeType::String)
                .description("SCIM filter used when searching the configuration.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("ids", AttributeType::string_set())
                .description(&format!(
                    "Names of the {} objects found in the configuration.",
                    M::LABEL
                ))
                .computed()
                .build(),
        )
        .build()
}
