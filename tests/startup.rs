//! Startup refuses to produce a server when anything it needs is missing.

use std::fs;

use aaz_dev_server::services::InitError;
use aaz_dev_server::{bootstrap, StartupError};

mod common;

#[test]
fn test_missing_aaz_repository_fails_before_bind() {
    let mut fx = common::fixture();
    fx.config.paths.aaz_path = fx.dir.path().join("does-not-exist");

    match bootstrap(fx.config.clone()) {
        Err(StartupError::Backend(InitError::MissingDirectory { what, .. })) => assert_eq!(what, "aaz"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("startup should fail"),
    }
}

#[test]
fn test_missing_command_tree_fails() {
    let fx = common::fixture();
    fs::remove_file(fx.dir.path().join("aaz/Commands/tree.json")).unwrap();

    assert!(matches!(
        bootstrap(fx.config.clone()),
        Err(StartupError::Backend(InitError::MissingTree { .. }))
    ));
}

#[test]
fn test_corrupt_command_tree_fails() {
    let fx = common::fixture();
    fs::write(fx.dir.path().join("aaz/Commands/tree.json"), "[]").unwrap();

    assert!(matches!(
        bootstrap(fx.config.clone()),
        Err(StartupError::Backend(InitError::Load { .. }))
    ));
}

#[test]
fn test_missing_extension_repository_fails() {
    let mut fx = common::fixture();
    fx.config.paths.cli_extension_path = fx.dir.path().join("nowhere");

    assert!(matches!(
        bootstrap(fx.config.clone()),
        Err(StartupError::Backend(InitError::MissingDirectory { .. }))
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let mut fx = common::fixture();
    fx.config.cli.default_profile = "unknown".to_string();

    let err = bootstrap(fx.config.clone()).err().expect("startup should fail");
    assert!(matches!(err, StartupError::Config(_)));
    assert!(err.to_string().contains("default_profile"));
}
