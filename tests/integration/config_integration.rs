//! Integration tests for the configuration system

use clonekit::access::{allowlist_admin_role, factory_role, Authorizer, DEFAULT_ADMIN_ROLE};
use clonekit::config::{ClonekitConfig, ConfigLoader};
use clonekit::types::Address;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_config_grants_become_roles() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("clonekit.toml");
    std::fs::write(
        &config_file,
        r#"
[registry]
store_path = "data/registry"
admins = ["0x0101010101010101010101010101010101010101"]
factory_operators = ["0x0202020202020202020202020202020202020202"]
allowlist_admins = ["0x0303030303030303030303030303030303030303"]

[allowlist]
sort_leaves = true
encoding = "claim"

[logging]
level = "info"
format = "json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.registry.store_path, PathBuf::from("data/registry"));
    assert!(config.allowlist.tree_options().sort_leaves);

    let roles = config.registry.role_table();
    assert!(roles.has_role(&DEFAULT_ADMIN_ROLE, &Address([1u8; 20])));
    assert!(roles.has_role(&factory_role(), &Address([2u8; 20])));
    assert!(roles.has_role(&allowlist_admin_role(), &Address([3u8; 20])));
    assert!(!roles.has_role(&factory_role(), &Address([3u8; 20])));
}

#[test]
fn test_workspace_env_file_overrides_base() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[registry]\nstore_path = \"base\"\n",
    )
    .unwrap();
    std::fs::write(
        config_dir.join("development.toml"),
        "[registry]\nstore_path = \"dev\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load_with_global(temp_dir.path(), None).unwrap();
    assert_eq!(config.registry.store_path, PathBuf::from("dev"));
}

#[test]
fn test_invalid_logging_section_fails_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("clonekit.toml");
    std::fs::write(&config_file, "[logging]\noutput = \"syslog\"\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("syslog"));
    assert_ne!(config, ClonekitConfig::default());
}
