use mockito::{Matcher, Server, ServerGuard};
use pingdirectory::PingDirectoryProvider;
use serde_json::json;
use serial_test::serial;
use tfplug::context::Context;
use tfplug::data_source::{ConfigureDataSourceRequest, ReadDataSourceRequest};
use tfplug::provider::ConfigureProviderRequest;
use tfplug::resource::{
    ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest, ModifyPlanRequest,
    ReadResourceRequest, ResourceWithConfigure, UpdateResourceRequest,
};
use tfplug::types::{ClientCapabilities, Dynamic, DynamicValue};
use tfplug::Provider;

fn s(v: &str) -> Dynamic {
    Dynamic::String(v.to_string())
}

fn list(values: &[&str]) -> Dynamic {
    Dynamic::List(values.iter().map(|v| s(v)).collect())
}

fn object(pairs: &[(&str, Dynamic)]) -> DynamicValue {
    let mut value = DynamicValue::object();
    for (name, v) in pairs {
        value.set_attribute(name, v.clone());
    }
    value
}

async fn configured_provider_data(
    server: &ServerGuard,
) -> Option<std::sync::Arc<dyn std::any::Any + Send + Sync>> {
    for var in [
        "PINGDIRECTORY_PROVIDER_HTTPS_HOST",
        "PINGDIRECTORY_PROVIDER_USERNAME",
        "PINGDIRECTORY_PROVIDER_PASSWORD",
        "PINGDIRECTORY_PROVIDER_CA_CERTIFICATE_PEM_FILES",
        "PINGDIRECTORY_PROVIDER_PRODUCT_VERSION",
    ] {
        std::env::remove_var(var);
    }

    let mut provider = PingDirectoryProvider::new();
    let response = provider
        .configure(
            Context::new(),
            ConfigureProviderRequest {
                terraform_version: "1.9.0".to_string(),
                config: object(&[
                    ("https_host", s(&server.url())),
                    ("username", s("cn=administrator")),
                    ("password", s("2FederateM0re")),
                    ("product_version", s("9.3.0.0")),
                ]),
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    response.provider_data
}

async fn resource(server: &ServerGuard, type_name: &str) -> Box<dyn ResourceWithConfigure> {
    let provider_data = configured_provider_data(server).await;
    let factories = PingDirectoryProvider::new().resources();
    let mut resource = factories.get(type_name).unwrap()();
    resource
        .configure(Context::new(), ConfigureResourceRequest { provider_data })
        .await;
    resource
}

fn location_body(description: Option<&str>) -> String {
    let mut body = json!({
        "schemas": ["urn:pingidentity:schemas:configuration:2.0:location"],
        "id": "Austin"
    });
    if let Some(description) = description {
        body["description"] = json!(description);
    }
    body.to_string()
}

#[tokio::test]
#[serial]
async fn location_lifecycle() {
    let mut server = Server::new_async().await;
    let add = server
        .mock("POST", "/config/locations")
        .match_body(Matcher::Json(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:location"],
            "locationName": "Austin",
            "description": "primary"
        })))
        .with_status(201)
        .with_body(location_body(Some("primary")))
        .create_async()
        .await;
    let get = server
        .mock("GET", "/config/locations/Austin")
        .with_body(location_body(Some("primary")))
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/config/locations/Austin")
        .match_body(Matcher::Json(json!({
            "operations": [{"op": "remove", "path": "description"}]
        })))
        .with_body(location_body(None))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/config/locations/Austin")
        .with_status(204)
        .create_async()
        .await;

    let location = resource(&server, "pingdirectory_location").await;

    let planned = object(&[
        ("id", Dynamic::Unknown),
        ("name", s("Austin")),
        ("description", s("primary")),
    ]);
    let created = location
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "pingdirectory_location".to_string(),
                planned_state: planned.clone(),
                config: planned,
                planned_private: vec![],
            },
        )
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(created.new_state.get_attribute("id"), s("Austin"));

    let read = location
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "pingdirectory_location".to_string(),
                current_state: created.new_state.clone(),
                private: vec![],
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;
    assert!(read.diagnostics.is_empty());
    let current = read.new_state.unwrap();
    assert_eq!(current.get_attribute("description"), s("primary"));

    let planned = object(&[
        ("id", s("Austin")),
        ("name", s("Austin")),
        ("description", Dynamic::Null),
    ]);
    let updated = location
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "pingdirectory_location".to_string(),
                prior_state: current,
                planned_state: planned.clone(),
                config: planned,
                planned_private: vec![],
            },
        )
        .await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(updated.new_state.get_attribute("description"), Dynamic::Null);

    let deleted = location
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "pingdirectory_location".to_string(),
                prior_state: updated.new_state,
                planned_private: vec![],
            },
        )
        .await;
    assert!(deleted.diagnostics.is_empty());

    add.assert_async().await;
    get.assert_async().await;
    patch.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
#[serial]
async fn missing_object_is_removed_from_state() {
    let mut server = Server::new_async().await;
    let get = server
        .mock("GET", "/config/locations/Austin")
        .with_status(404)
        .with_body(
            json!({
                "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
                "status": "404",
                "detail": "The Location 'Austin' does not exist"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let location = resource(&server, "pingdirectory_location").await;
    let read = location
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "pingdirectory_location".to_string(),
                current_state: object(&[
                    ("id", s("Austin")),
                    ("name", s("Austin")),
                    ("description", Dynamic::Null),
                ]),
                private: vec![],
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;

    assert!(read.new_state.is_none());
    assert_eq!(read.diagnostics.len(), 1);
    assert!(!read.diagnostics[0].is_error());
    get.assert_async().await;
}

#[tokio::test]
#[serial]
async fn create_failure_reports_server_detail() {
    let mut server = Server::new_async().await;
    let add = server
        .mock("POST", "/config/locations")
        .with_status(400)
        .with_body(
            json!({
                "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
                "status": "400",
                "detail": "An entry with DN 'cn=Austin' already exists"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let location = resource(&server, "pingdirectory_location").await;
    let planned = object(&[
        ("id", Dynamic::Unknown),
        ("name", s("Austin")),
        ("description", Dynamic::Null),
    ]);
    let created = location
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "pingdirectory_location".to_string(),
                planned_state: planned.clone(),
                config: planned,
                planned_private: vec![],
            },
        )
        .await;

    assert!(created.new_state.is_null());
    assert_eq!(created.diagnostics.len(), 1);
    assert_eq!(
        created.diagnostics[0].summary,
        "An error occurred while attempting to create the Location"
    );
    assert!(created.diagnostics[0]
        .detail
        .contains("already exists"));
    add.assert_async().await;
}

#[tokio::test]
#[serial]
async fn unchanged_plan_sends_nothing() {
    let server = Server::new_async().await;
    let location = resource(&server, "pingdirectory_location").await;

    let state = object(&[
        ("id", s("Austin")),
        ("name", s("Austin")),
        ("description", s("primary")),
    ]);
    let updated = location
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "pingdirectory_location".to_string(),
                prior_state: state.clone(),
                planned_state: state.clone(),
                config: state.clone(),
                planned_private: vec![],
            },
        )
        .await;

    // no mocks are registered, any request would fail
    assert!(updated.diagnostics.is_empty());
    assert_eq!(updated.new_state, state);
}

#[tokio::test]
#[serial]
async fn default_identity_mapper_is_adopted() {
    let mut server = Server::new_async().await;
    let existing = json!({
        "schemas": ["urn:pingidentity:schemas:configuration:2.0:identity-mapper:exact-match"],
        "id": "Exact Match",
        "matchAttribute": ["uid"],
        "matchBaseDN": ["dc=example,dc=com"],
        "enabled": true
    });
    let mut modified = existing.clone();
    modified["description"] = json!("managed");

    let get = server
        .mock("GET", "/config/identity-mappers/Exact%20Match")
        .with_body(existing.to_string())
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/config/identity-mappers/Exact%20Match")
        .match_body(Matcher::Json(json!({
            "operations": [{"op": "replace", "path": "description", "value": "managed"}]
        })))
        .with_body(modified.to_string())
        .create_async()
        .await;

    let mapper = resource(&server, "pingdirectory_default_identity_mapper").await;
    let planned = object(&[
        ("id", Dynamic::Unknown),
        ("name", s("Exact Match")),
        ("type", s("exact-match")),
        ("match_attribute", list(&["uid"])),
        ("match_base_dn", Dynamic::Unknown),
        ("match_filter", Dynamic::Unknown),
        ("match_pattern", Dynamic::Null),
        ("replace_pattern", Dynamic::Null),
        ("all_included_identity_mapper", list(&[])),
        ("any_included_identity_mapper", list(&[])),
        ("extension_class", Dynamic::Null),
        ("extension_argument", list(&[])),
        ("description", s("managed")),
        ("enabled", Dynamic::Bool(true)),
    ]);
    let created = mapper
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "pingdirectory_default_identity_mapper".to_string(),
                planned_state: planned.clone(),
                config: planned,
                planned_private: vec![],
            },
        )
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(created.new_state.get_attribute("id"), s("Exact Match"));
    assert_eq!(
        created.new_state.get_attribute("match_base_dn"),
        list(&["dc=example,dc=com"])
    );
    assert_eq!(created.new_state.get_attribute("match_filter"), Dynamic::Null);
    assert_eq!(created.new_state.get_attribute("description"), s("managed"));

    // default resources are only forgotten
    let deleted = mapper
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "pingdirectory_default_identity_mapper".to_string(),
                prior_state: created.new_state,
                planned_private: vec![],
            },
        )
        .await;
    assert!(deleted.diagnostics.is_empty());

    get.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test]
#[serial]
async fn default_resource_rejects_other_type() {
    let mut server = Server::new_async().await;
    let _get = server
        .mock("GET", "/config/identity-mappers/Exact%20Match")
        .with_body(
            json!({
                "schemas": ["urn:pingidentity:schemas:configuration:2.0:identity-mapper:exact-match"],
                "id": "Exact Match",
                "enabled": true
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mapper = resource(&server, "pingdirectory_default_identity_mapper").await;
    let planned = object(&[
        ("name", s("Exact Match")),
        ("type", s("regular-expression")),
        ("match_pattern", s("^(.*)@example.com$")),
    ]);
    let created = mapper
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "pingdirectory_default_identity_mapper".to_string(),
                planned_state: planned.clone(),
                config: planned,
                planned_private: vec![],
            },
        )
        .await;

    assert_eq!(created.diagnostics.len(), 1);
    assert_eq!(created.diagnostics[0].summary, "Type mismatch");
}

#[tokio::test]
#[serial]
async fn plan_fills_type_defaults() {
    let server = Server::new_async().await;
    let handler = resource(&server, "pingdirectory_sasl_mechanism_handler").await;
    let modifier = handler.as_modify_plan().unwrap();

    let proposed = object(&[
        ("id", Dynamic::Unknown),
        ("name", s("TOTP")),
        ("type", s("unboundid-totp")),
        ("enabled", Dynamic::Bool(true)),
        ("identity_mapper", s("Exact Match")),
        ("time_interval_duration", Dynamic::Unknown),
        ("adjacent_intervals_to_check", Dynamic::Unknown),
        ("realm", Dynamic::Unknown),
        ("allowed_quality_of_protection", Dynamic::Unknown),
    ]);
    let response = modifier
        .modify_plan(
            Context::new(),
            ModifyPlanRequest {
                type_name: "pingdirectory_sasl_mechanism_handler".to_string(),
                config: object(&[("name", s("TOTP")), ("type", s("unboundid-totp"))]),
                prior_state: DynamicValue::null(),
                proposed_new_state: proposed,
                prior_private: vec![],
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    let plan = response.planned_state;
    assert_eq!(plan.get_attribute("time_interval_duration"), s("30 s"));
    assert_eq!(
        plan.get_attribute("adjacent_intervals_to_check"),
        Dynamic::Number(2.0)
    );
    assert_eq!(plan.get_attribute("realm"), Dynamic::Null);
    assert_eq!(
        plan.get_attribute("allowed_quality_of_protection"),
        Dynamic::List(vec![])
    );
    assert!(plan.get_attribute("id").is_unknown());
}

#[tokio::test]
#[serial]
async fn list_data_source_returns_names() {
    let mut server = Server::new_async().await;
    let list_mock = server
        .mock("GET", "/config/identity-mappers")
        .match_query(Matcher::UrlEncoded("filter".into(), "enabled eq true".into()))
        .with_body(
            json!({
                "schemas": ["urn:ietf:params:scim:api:messages:2.0:ListResponse"],
                "totalResults": 2,
                "Resources": [
                    {
                        "schemas": ["urn:pingidentity:schemas:configuration:2.0:identity-mapper:exact-match"],
                        "id": "Exact Match"
                    },
                    {
                        "schemas": ["urn:pingidentity:schemas:configuration:2.0:identity-mapper:aggregate"],
                        "id": "All Admin Users"
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider_data = configured_provider_data(&server).await;
    let factories = PingDirectoryProvider::new().data_sources();
    let mut data_source = factories.get("pingdirectory_identity_mappers").unwrap()();
    data_source
        .configure(Context::new(), ConfigureDataSourceRequest { provider_data })
        .await;

    let response = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "pingdirectory_identity_mappers".to_string(),
                config: object(&[("filter", s("enabled eq true"))]),
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(
        response.state.get_attribute("ids"),
        list(&["All Admin Users", "Exact Match"])
    );
    list_mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn object_data_source_reads_by_name() {
    let mut server = Server::new_async().await;
    let get = server
        .mock("GET", "/config/locations/Austin")
        .with_body(location_body(Some("primary")))
        .create_async()
        .await;

    let provider_data = configured_provider_data(&server).await;
    let factories = PingDirectoryProvider::new().data_sources();
    let mut data_source = factories.get("pingdirectory_location").unwrap()();
    data_source
        .configure(Context::new(), ConfigureDataSourceRequest { provider_data })
        .await;

    let response = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "pingdirectory_location".to_string(),
                config: object(&[
                    ("id", Dynamic::Null),
                    ("name", s("Austin")),
                    ("description", Dynamic::Null),
                ]),
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    assert_eq!(response.state.get_attribute("id"), s("Austin"));
    assert_eq!(response.state.get_attribute("description"), s("primary"));
    get.assert_async().await;
}

#[tokio::test]
async fn unconfigured_resource_reports_error() {
    let factories = PingDirectoryProvider::new().resources();
    let location = factories.get("pingdirectory_location").unwrap()();
    let read = location
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "pingdirectory_location".to_string(),
                current_state: object(&[("name", s("Austin"))]),
                private: vec![],
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;

    assert_eq!(read.diagnostics.len(), 1);
    assert_eq!(read.diagnostics[0].summary, "Provider not configured");
}
