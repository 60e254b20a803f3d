//! Status reporting and the retry sweep.

use kc_admin::dto::RealmRepresentation;

use crate::common::{TestEnv, key, realm};

const BOOM: &str = "ApiError: Keycloak returned 500 with: injected failure";

#[tokio::test]
async fn repeated_failure_is_written_once() {
    let env = TestEnv::new();
    env.admin.fail("create_realm demo", 500);
    env.admin.fail("create_realm demo", 500);
    env.admin.fail("create_realm demo", 403);
    let (store, controller) = env.realms();
    store.apply(realm("demo", "demo"));

    controller.apply(&realm("demo", "demo")).await;
    controller.apply(&realm("demo", "demo")).await;
    assert_eq!(store.status_writes(), 1);
    assert_eq!(store.status_of(&key("demo")).unwrap().error.as_deref(), Some(BOOM));

    controller.apply(&realm("demo", "demo")).await;
    assert_eq!(store.status_writes(), 2);
    assert_eq!(
        store.status_of(&key("demo")).unwrap().error.as_deref(),
        Some("ApiError: Keycloak returned 403 with: injected failure")
    );

    assert!(controller.apply(&realm("demo", "demo")).await.is_success());
    assert_eq!(store.status_writes(), 3);
    assert_eq!(store.status_of(&key("demo")).unwrap().error, None);
}

#[tokio::test]
async fn retry_applies_only_failed_resources() {
    let env = TestEnv::new();
    env.admin.fail("create_realm first", 500);
    env.admin.fail("create_realm third", 500);
    let (store, controller) = env.realms();
    for name in ["first", "second", "third"] {
        store.apply(realm(name, name));
        controller.apply(&realm(name, name)).await;
    }
    assert_eq!(store.status_of(&key("first")).unwrap().error.as_deref(), Some(BOOM));
    assert_eq!(store.status_of(&key("second")).unwrap().error, None);
    assert_eq!(store.status_of(&key("third")).unwrap().error.as_deref(), Some(BOOM));
    env.admin.clear_calls();

    assert_eq!(controller.retry().await, 2);

    let calls = env.admin.calls();
    assert_eq!(env.admin.writes(), ["create_realm first", "create_realm third"]);
    assert!(!calls.iter().any(|c| c.ends_with("second")));
    for name in ["first", "second", "third"] {
        assert_eq!(store.status_of(&key(name)).unwrap().error, None, "{name} still failed");
    }

    env.admin.clear_calls();
    assert_eq!(controller.retry().await, 0);
    assert!(env.admin.calls().is_empty());
}

#[tokio::test]
async fn retry_includes_never_reconciled_resources() {
    let env = TestEnv::new();
    env.admin.seed_realm(RealmRepresentation::new("healthy"));
    let (store, controller) = env.realms();
    store.apply(realm("healthy", "healthy"));
    controller.apply(&realm("healthy", "healthy")).await;
    store.apply(realm("fresh", "fresh"));
    env.admin.clear_calls();

    assert_eq!(controller.retry().await, 1);

    assert_eq!(env.admin.writes(), ["create_realm fresh"]);
    let status = store.status_of(&key("fresh")).unwrap();
    assert!(status.is_recorded());
    assert_eq!(status.error, None);
}

#[tokio::test]
async fn status_of_deleted_resource_is_not_written() {
    let env = TestEnv::new();
    let (store, controller) = env.realms();
    store.apply(realm("demo", "demo"));
    store.remove(&key("demo"));

    assert!(controller.apply(&realm("demo", "demo")).await.is_success());
    assert_eq!(store.status_writes(), 0);
}

#[tokio::test]
async fn timestamp_uses_second_precision() {
    let env = TestEnv::new();
    let (store, controller) = env.realms();
    store.apply(realm("demo", "demo"));

    controller.apply(&realm("demo", "demo")).await;

    let timestamp = store.status_of(&key("demo")).unwrap().timestamp.unwrap();
    assert_eq!(timestamp.len(), "2024-03-01T12:30:05Z".len());
    assert!(timestamp.ends_with('Z'));
}
