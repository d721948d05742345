//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use roster_config::{ConfigError, RosterConfig};
use std::path::PathBuf;

#[test]
fn loads_database_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/roster/registration.db"
busy_timeout_ms = 250
"#,
        )?;

        let config: RosterConfig = Figment::from(Serialized::defaults(RosterConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/roster/registration.db")
        );
        assert_eq!(config.database.busy_timeout_ms, 250);
        Ok(())
    });
}

#[test]
fn loads_policy_and_catalog_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[policy]
registration_open = false
max_courses_limit = 4

[catalog]
strict_cycle_check = true
default_semester = "fall"
"#,
        )?;

        let config: RosterConfig = Figment::from(Serialized::defaults(RosterConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(!config.policy.registration_open);
        assert_eq!(config.policy.max_courses_limit, 4);
        assert!(config.catalog.strict_cycle_check);
        assert_eq!(config.catalog.default_semester, "fall");
        Ok(())
    });
}

#[test]
fn partial_section_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
listen_addr = "0.0.0.0:8080"
"#,
        )?;

        let config: RosterConfig = Figment::from(Serialized::defaults(RosterConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert!(config.server.cors_permissive);
        assert_eq!(config.database.busy_timeout_ms, 5000);
        assert_eq!(config.general.default_limit, 50);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[policy]
max_courses_limit = 4
"#,
        )?;
        jail.set_env("ROSTER_POLICY__MAX_COURSES_LIMIT", "3");

        let config: RosterConfig = Figment::from(Serialized::defaults(RosterConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ROSTER_").split("__"))
            .extract()?;

        assert_eq!(config.policy.max_courses_limit, 3);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".roster")).map_err(|e| e.to_string())?;
        jail.create_file(
            ".roster/config.toml",
            r#"
[general]
default_limit = 10
"#,
        )?;

        let config = RosterConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.general.default_limit, 10);
        Ok(())
    });
}

#[test]
fn invalid_limit_in_toml_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[policy]
max_courses_limit = 0
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(RosterConfig::default()))
            .merge(Toml::file("config.toml"));
        let err = RosterConfig::from_figment(figment).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "policy.max_courses_limit"));
        Ok(())
    });
}

#[test]
fn malformed_value_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
busy_timeout_ms = "soon"
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(RosterConfig::default()))
            .merge(Toml::file("config.toml"));
        let err = RosterConfig::from_figment(figment).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}
