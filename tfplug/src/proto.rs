//! Protocol buffer types for Terraform Plugin Protocol v6
//!
//! Generated at build time by tonic_build from `proto/tfplugin6.proto`.
//!
//! - Top-level messages become structs (e.g., `DynamicValue`, `Schema`)
//! - RPC methods have nested `Request` and `Response` types in snake_case modules
//!   (e.g., `get_provider_schema::Request`, `read_resource::Response`)
//! - Enum fields are carried as `i32`
//!
//! Some generated names clash with framework types; always use the `proto::`
//! prefix for the generated ones.

#![allow(clippy::all)]

include!(concat!(env!("OUT_DIR"), "/tfplugin6.rs"));
