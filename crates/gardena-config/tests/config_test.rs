#![allow(clippy::unwrap_used)]
// Config file loading against real files in a temp directory.

use std::io::Write;

use gardena_config::{ConfigError, IdentifierMode, load_config_from};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.default_profile.as_deref(), Some("default"));
    assert_eq!(config.defaults.timeout, 30);
    assert!(config.profiles.is_empty());
}

#[test]
fn profiles_are_read_from_toml() {
    let file = write_config(
        r#"
default_profile = "garden"

[defaults]
timeout = 12

[profiles.garden]
username = "me@example.com"
location_id = "L1"
mower_id = "M1"
start_duration = 240
manufacturer = "Husqvarna"

[profiles.cabin]
username = "cabin@example.com"
identifiers = "discover"
"#,
    );

    let config = load_config_from(file.path()).unwrap();
    assert_eq!(config.defaults.timeout, 12);
    assert_eq!(config.active_profile_name(None), "garden");
    assert_eq!(config.active_profile_name(Some("cabin")), "cabin");
    assert_eq!(config.profile_names(), ["cabin", "garden"]);

    let garden = config.profile("garden").unwrap();
    assert_eq!(garden.identifier_mode(), IdentifierMode::Static);
    assert_eq!(garden.start_duration, Some(240));
    assert_eq!(garden.manufacturer.as_deref(), Some("Husqvarna"));

    let cabin = config.profile("cabin").unwrap();
    assert_eq!(cabin.identifier_mode(), IdentifierMode::Discover);
}

#[test]
fn unknown_profile_lists_alternatives() {
    let file = write_config("[profiles.garden]\nusername = \"u\"\n");
    let config = load_config_from(file.path()).unwrap();

    match config.profile("lawn") {
        Err(ConfigError::ProfileNotFound { name, available }) => {
            assert_eq!(name, "lawn");
            assert_eq!(available, ["garden"]);
        }
        other => panic!("expected ProfileNotFound, got: {other:?}"),
    }
}

#[test]
fn invalid_identifier_mode_is_rejected() {
    let file = write_config("[profiles.garden]\nidentifiers = \"sometimes\"\n");
    let result = load_config_from(file.path());
    assert!(matches!(result, Err(ConfigError::Figment(_))), "got: {result:?}");
}

#[test]
fn redacted_toml_hides_password() {
    let file = write_config(
        "[profiles.garden]\nusername = \"u\"\npassword = \"hunter2\"\n",
    );
    let config = load_config_from(file.path()).unwrap();

    let shown = config.redacted().to_toml().unwrap();
    assert!(!shown.contains("hunter2"), "password leaked:\n{shown}");
    assert!(shown.contains("********"));
}
