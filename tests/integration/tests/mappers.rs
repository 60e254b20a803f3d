//! Protocol mapper synchronization through client and scope resources.

use std::collections::BTreeMap;

use kc_admin::dto::{ClientRepresentation, ProtocolMapperRepresentation};
use kc_admin::location::extract_id;
use kc_admin::{AdminClient, MapperOwner};
use kc_model::{MapperSpec, OPENID_CONNECT};

use crate::common::{TestEnv, client, key, scope};

const ATTRIBUTE_MAPPER: &str = "oidc-usermodel-attribute-mapper";

fn attribute(name: &str, claim: &str) -> MapperSpec {
    MapperSpec::new(name, ATTRIBUTE_MAPPER)
        .with_config("user.attribute", name)
        .with_config("claim.name", claim)
}

fn observed(spec: &MapperSpec) -> ProtocolMapperRepresentation {
    ProtocolMapperRepresentation {
        protocol: Some(OPENID_CONNECT.to_string()),
        config: spec.config.clone(),
        ..ProtocolMapperRepresentation::new(&spec.name, &spec.protocol_mapper)
    }
}

fn names(mappers: &[ProtocolMapperRepresentation]) -> Vec<&str> {
    mappers.iter().map(|m| m.name.as_str()).collect()
}

#[tokio::test]
async fn replaces_mapper_set_with_minimal_calls() {
    let env = TestEnv::with_realm();
    let owner = env.admin.seed_client("demo", ClientRepresentation::new("web"));
    env.admin.seed_mapper(&owner, observed(&attribute("a", "a")));
    let b_id = env.admin.seed_mapper(&owner, observed(&attribute("b", "old")));

    let (store, controller) = env.clients();
    let mut resource = client("web", "web");
    resource.spec.mappers = vec![attribute("b", "new"), attribute("c", "c")];
    store.apply(resource.clone());

    assert!(controller.apply(&resource).await.is_success());

    let mut writes = env.admin.writes();
    writes.sort();
    assert_eq!(
        writes,
        [
            "create_protocol_mapper c",
            "delete_protocol_mapper a",
            "update_protocol_mapper b"
        ]
    );
    let stored = env.admin.stored_mappers(&owner);
    assert_eq!(names(&stored), ["b", "c"]);
    assert_eq!(stored[0].id.as_deref(), Some(b_id.as_str()));
    assert_eq!(stored[0].config["claim.name"], "new");
}

#[tokio::test]
async fn partial_failure_converges_without_recreating() {
    let env = TestEnv::with_realm();
    env.admin.fail("create_protocol_mapper b", 500);
    let (store, controller) = env.clients();
    let mut resource = client("web", "web");
    resource.spec.mappers = vec![attribute("a", "a"), attribute("b", "b"), attribute("c", "c")];
    store.apply(resource.clone());

    assert!(controller.apply(&resource).await.is_failure());
    let status = store.status_of(&key("web")).unwrap();
    assert_eq!(
        status.error.as_deref(),
        Some("ApiError: Keycloak returned 500 with: injected failure")
    );

    assert_eq!(controller.retry().await, 1);

    let owner = env.admin.stored_client("demo", "web").unwrap().id.unwrap();
    assert_eq!(names(&env.admin.stored_mappers(&owner)), ["a", "b", "c"]);
    assert_eq!(env.admin.count("create_client web"), 1);
    assert_eq!(env.admin.count("create_protocol_mapper a"), 1);
    assert_eq!(env.admin.count("create_protocol_mapper b"), 2);
    assert_eq!(env.admin.count("create_protocol_mapper c"), 1);
    assert_eq!(store.status_of(&key("web")).unwrap().error, None);
}

#[tokio::test]
async fn duplicate_declared_names_fail_before_any_write() {
    let env = TestEnv::with_realm();
    let owner = env.admin.seed_client("demo", ClientRepresentation::new("web"));
    env.admin.seed_mapper(&owner, observed(&attribute("legacy", "legacy")));
    let (store, controller) = env.clients();
    let mut resource = client("web", "web");
    resource.spec.mappers = vec![attribute("email", "email"), attribute("email", "mail")];
    store.apply(resource.clone());

    assert!(controller.apply(&resource).await.is_failure());

    assert!(env.admin.writes().is_empty());
    assert_eq!(
        store.status_of(&key("web")).unwrap().error.as_deref(),
        Some("DuplicateName: mapper 'email' is declared more than once")
    );
}

#[tokio::test]
async fn observed_duplicates_are_collapsed() {
    let env = TestEnv::with_realm();
    let owner = env.admin.seed_client("demo", ClientRepresentation::new("web"));
    let first = env.admin.seed_mapper(&owner, observed(&attribute("email", "email")));
    env.admin.seed_mapper(&owner, observed(&attribute("email", "email")));
    let (store, controller) = env.clients();
    let mut resource = client("web", "web");
    resource.spec.mappers = vec![attribute("email", "email")];
    store.apply(resource.clone());

    assert!(controller.apply(&resource).await.is_success());

    assert_eq!(env.admin.writes(), ["delete_protocol_mapper email"]);
    let stored = env.admin.stored_mappers(&owner);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id.as_deref(), Some(first.as_str()));
}

#[tokio::test]
async fn empty_declaration_removes_all_mappers() {
    let env = TestEnv::with_realm();
    let owner = env.admin.seed_client("demo", ClientRepresentation::new("web"));
    env.admin.seed_mapper(&owner, observed(&attribute("a", "a")));
    env.admin.seed_mapper(&owner, observed(&attribute("b", "b")));
    let (store, controller) = env.clients();
    store.apply(client("web", "web"));

    controller.apply(&client("web", "web")).await;

    assert!(env.admin.stored_mappers(&owner).is_empty());
    assert_eq!(env.admin.writes().len(), 2);
}

#[tokio::test]
async fn scope_carries_attributes_and_mappers() {
    let env = TestEnv::with_realm();
    let (store, controller) = env.scopes();
    let mut resource = scope("profile", "profile");
    resource.spec.include_in_token_scope = Some(true);
    resource.spec.gui_order = Some(3);
    resource.spec.mappers = vec![attribute("locale", "locale")];
    store.apply(resource.clone());

    assert!(controller.apply(&resource).await.is_success());
    assert!(controller.apply(&resource).await.is_success());

    let stored = env.admin.stored_scope("demo", "profile").unwrap();
    assert_eq!(stored.protocol.as_deref(), Some(OPENID_CONNECT));
    let expected: BTreeMap<String, String> = [
        ("gui.order".to_string(), "3".to_string()),
        ("include.in.token.scope".to_string(), "true".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(stored.attributes, Some(expected));

    let mappers = env.admin.stored_mappers(stored.id.as_deref().unwrap());
    assert_eq!(names(&mappers), ["locale"]);
    assert_eq!(
        env.admin.writes(),
        ["create_client_scope profile", "create_protocol_mapper locale"]
    );
}

#[tokio::test]
async fn created_mapper_id_is_the_last_identifier_in_location() {
    let env = TestEnv::with_realm();
    let owner = env.admin.seed_client("demo", ClientRepresentation::new("web"));

    let id = env
        .admin
        .create_protocol_mapper(
            "demo",
            MapperOwner::Client(&owner),
            &observed(&attribute("email", "email")),
        )
        .await
        .unwrap();

    assert_ne!(id, owner);
    let location = format!("/admin/realms/demo/clients/{owner}/protocol-mappers/models/{id}");
    assert_eq!(extract_id(&location), Some(id.as_str()));
    let stored = env.admin.stored_mappers(&owner);
    assert_eq!(stored[0].id.as_deref(), Some(id.as_str()));
}
