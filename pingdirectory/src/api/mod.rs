//! Client for the PingDirectory Configuration API
//!
//! Every configuration category lives under `/config/<category>` and speaks
//! the same protocol: add with a POST carrying the schema URN and the object
//! name, read with GET, modify with a PATCH of operations, remove with
//! DELETE and list with an optional SCIM filter.

pub mod access_token_validator;
pub mod client;
pub mod common;
pub mod config_api;
pub mod error;
pub mod identity_mapper;
pub mod location;
pub mod sasl_mechanism_handler;

pub use access_token_validator::AccessTokenValidatorAttributes;
pub use client::{Client, ClientOptions, RetryConfig};
pub use common::{
    ConfigCategory, ConfigObject, ListResponse, Operation, OperationKind, UpdateRequest,
};
pub use config_api::ConfigApi;
pub use error::ApiError;
pub use identity_mapper::IdentityMapperAttributes;
pub use location::LocationAttributes;
pub use sasl_mechanism_handler::SaslMechanismHandlerAttributes;
