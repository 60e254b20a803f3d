//! Realm reconciliation.

use kc_admin::dto::RealmRepresentation;
use kc_controller::ReconciliationOutcome;

use crate::common::{TestEnv, key, realm};

#[tokio::test]
async fn creates_missing_realm_once() {
    let env = TestEnv::new();
    let (store, controller) = env.realms();
    let mut resource = realm("demo", "demo");
    resource.spec.display_name = Some("Demo".to_string());
    store.apply(resource.clone());

    assert!(controller.apply(&resource).await.is_success());
    assert!(controller.apply(&resource).await.is_success());

    assert_eq!(env.admin.writes(), ["create_realm demo"]);
    let stored = env.admin.stored_realm("demo").unwrap();
    assert_eq!(stored.display_name.as_deref(), Some("Demo"));
    assert_eq!(store.status_writes(), 1);
}

#[tokio::test]
async fn unset_attributes_are_left_alone() {
    let env = TestEnv::new();
    env.admin.seed_realm(RealmRepresentation {
        enabled: Some(true),
        login_theme: Some("corporate".to_string()),
        ..RealmRepresentation::new("demo")
    });
    let (store, controller) = env.realms();
    let mut resource = realm("demo", "demo");
    resource.spec.display_name = Some("Demo".to_string());
    store.apply(resource.clone());

    controller.apply(&resource).await;

    assert_eq!(env.admin.writes(), ["update_realm demo"]);
    let stored = env.admin.stored_realm("demo").unwrap();
    assert_eq!(stored.display_name.as_deref(), Some("Demo"));
    assert_eq!(stored.enabled, Some(true));
    assert_eq!(stored.login_theme.as_deref(), Some("corporate"));
}

#[tokio::test]
async fn matching_realm_is_not_written() {
    let env = TestEnv::new();
    env.admin.seed_realm(RealmRepresentation {
        enabled: Some(true),
        ..RealmRepresentation::new("demo")
    });
    let (store, controller) = env.realms();
    let mut resource = realm("demo", "demo");
    resource.spec.enabled = Some(true);
    store.apply(resource.clone());

    assert!(controller.apply(&resource).await.is_success());

    assert!(env.admin.writes().is_empty());
    let status = store.status_of(&key("demo")).unwrap();
    assert!(status.is_recorded());
    assert_eq!(status.error, None);
}

#[tokio::test]
async fn missing_keycloak_skips_without_status() {
    let env = TestEnv::disconnected();
    let (store, controller) = env.realms();
    store.apply(realm("demo", "demo"));

    let outcome = controller.apply(&realm("demo", "demo")).await;

    assert_eq!(
        outcome,
        ReconciliationOutcome::NotReady {
            reason: "keycloak default not found".to_string()
        }
    );
    assert!(env.admin.calls().is_empty());
    assert_eq!(store.status_of(&key("demo")), None);
}

#[tokio::test]
async fn delete_removes_the_realm() {
    let env = TestEnv::with_realm();
    let (_store, controller) = env.realms();

    assert!(controller.delete(&realm("demo", "demo")).await.is_success());

    assert_eq!(env.admin.writes(), ["delete_realm demo"]);
    assert!(env.admin.stored_realm("demo").is_none());
}

#[tokio::test]
async fn delete_of_unknown_realm_is_quiet() {
    let env = TestEnv::new();
    let (_store, controller) = env.realms();

    assert!(controller.delete(&realm("gone", "gone")).await.is_success());
    assert!(env.admin.writes().is_empty());

    let env = TestEnv::disconnected();
    let (_store, controller) = env.realms();
    assert!(controller.delete(&realm("gone", "gone")).await.is_success());
}
