//! Location configuration objects

use super::common::ConfigCategory;
use serde::{Deserialize, Serialize};

/// Locations have no type discriminator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConfigCategory for LocationAttributes {
    const PATH: &'static str = "locations";
    const SCHEMA: &'static str = "location";
    const NAME_FIELD: &'static str = "locationName";
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::api::{Client, Operation, OperationKind, UpdateRequest};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn location_crud_paths() {
        let mut server = Server::new_async().await;
        let body = json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:location"],
            "id": "Austin TX",
            "description": "primary"
        })
        .to_string();

        let add = server
            .mock("POST", "/config/locations")
            .match_body(Matcher::Json(json!({
                "schemas": ["urn:pingidentity:schemas:configuration:2.0:location"],
                "locationName": "Austin TX",
                "description": "primary"
            })))
            .with_status(201)
            .with_body(&body)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/config/locations/Austin%20TX")
            .with_body(&body)
            .create_async()
            .await;
        let patch = server
            .mock("PATCH", "/config/locations/Austin%20TX")
            .match_body(Matcher::Json(json!({
                "operations": [{"op": "remove", "path": "description"}]
            })))
            .with_body(
                json!({
                    "schemas": ["urn:pingidentity:schemas:configuration:2.0:location"],
                    "id": "Austin TX"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/config/locations/Austin%20TX")
            .with_status(204)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "admin", "secret").unwrap();
        let api = client.config::<LocationAttributes>();

        let attributes = LocationAttributes {
            description: Some("primary".to_string()),
        };
        let added = api.add("Austin TX", None, &attributes).await.unwrap();
        assert_eq!(added.attributes, attributes);
        assert_eq!(added.type_name(), None);

        let fetched = api.get("Austin TX").await.unwrap();
        assert_eq!(fetched.id, "Austin TX");

        let updated = api
            .update(
                "Austin TX",
                &UpdateRequest::new(vec![Operation::new(OperationKind::Remove, "description")]),
            )
            .await
            .unwrap();
        assert_eq!(updated.attributes.description, None);

        api.delete("Austin TX").await.unwrap();

        add.assert_async().await;
        get.assert_async().await;
        patch.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn location_list_with_filter() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/config/locations")
            .match_query(Matcher::UrlEncoded("filter".into(), "Austin".into()))
            .with_body(
                json!({
                    "schemas": ["urn:ietf:params:scim:api:messages:2.0:ListResponse"],
                    "totalResults": 1,
                    "Resources": [{
                        "schemas": ["urn:pingidentity:schemas:configuration:2.0:location"],
                        "id": "Austin"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = Client::new(&server.url(), "admin", "secret").unwrap();
        let list = client
            .config::<LocationAttributes>()
            .list(Some("Austin"))
            .await
            .unwrap();
        assert_eq!(list.total_results, 1);
        assert_eq!(list.resources[0].id, "Austin");

        mock.assert_async().await;
    }
}
