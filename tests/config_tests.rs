//! Integration tests for configuration loading

use std::io::Write;
use tempfile::NamedTempFile;
use this_admin::core::error::ConfigError;
use this_admin::prelude::*;

const ACADEMY_YAML: &str = r#"
api:
  base_url: https://admin.academy.test/api
  timeout_ms: 2500
  token: session-token

routes:
  - route_name: academies
    entity_name: academy
  - route_name: players
    entity_name: player
  - route_name: player-profiles
    entity_name: player_profile
  - route_name: users
    entity_name: user

permissions:
  - entity: player
    read: authenticated
    create: role:coach
    update: any_role:coach,manager
    delete: admin_only
  - entity: user
    service: platform
    read: public
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(ACADEMY_YAML);
    let config = AdminConfig::from_yaml_file(file.path()).unwrap();

    assert_eq!(config.api.base_url, "https://admin.academy.test/api");
    assert_eq!(config.api.timeout_ms, 2500);
    assert_eq!(config.api.token.as_deref(), Some("session-token"));
    assert_eq!(config.routes.len(), 4);
    assert_eq!(config.permissions.len(), 2);
    assert_eq!(config.permissions[1].service, AccessService::Platform);
}

#[test]
fn test_registry_from_config() {
    let config = AdminConfig::from_yaml_str(ACADEMY_YAML).unwrap();
    let registry = config.registry();

    assert_eq!(registry.resolve("player-profiles"), "player_profile");
    assert_eq!(registry.resolve("coaches"), "coaches");
    assert_eq!(registry.route_for("player_profile"), Some("player-profiles"));
}

#[test]
fn test_guard_from_config() {
    let guard = AdminConfig::from_yaml_str(ACADEMY_YAML)
        .unwrap()
        .access_guard();
    let manager = Subject::user("u-manager", ["manager"]);
    let admin = Subject::Admin {
        admin_id: "root".to_string(),
    };
    let project = AccessService::Project;

    assert!(guard.has_access("player", AccessOperation::Update, project, &manager));
    assert!(!guard.has_access("player", AccessOperation::Create, project, &manager));
    assert!(!guard.has_access("player", AccessOperation::Delete, project, &manager));
    assert!(guard.has_access("player", AccessOperation::Delete, project, &admin));

    // Policies are scoped to their service
    assert!(guard.has_access("user", AccessOperation::Read, AccessService::Platform, &Subject::Anonymous));
    assert!(!guard.has_access("user", AccessOperation::Read, project, &Subject::Anonymous));

    // Unconfigured entities are denied
    assert!(!guard.has_access("academy", AccessOperation::Read, project, &admin));
}

#[test]
fn test_client_from_config() {
    let config = AdminConfig::from_yaml_str(ACADEMY_YAML).unwrap();
    let api = ApiClient::from_config(&config.api).unwrap();
    assert_eq!(api.base_url(), "https://admin.academy.test/api");
    assert_eq!(
        api.resource::<PlayerProfile>().url(Some("p1")),
        "https://admin.academy.test/api/player-profiles/p1"
    );
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = AdminConfig::from_yaml_file(&path).unwrap_err();
    assert!(matches!(
        err,
        AdminError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[test]
fn test_parse_error_names_the_file() {
    let file = write_config("api: [not, a, mapping");
    let err = AdminConfig::from_yaml_file(file.path()).unwrap_err();

    match err {
        AdminError::Config(ConfigError::ParseError { file: Some(name), .. }) => {
            assert_eq!(name, file.path().display().to_string());
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_invalid_policy_in_file() {
    let file = write_config(
        r#"
permissions:
  - entity: academy
    read: everyone
"#,
    );
    let err = AdminConfig::from_yaml_file(file.path()).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("everyone"));
}
