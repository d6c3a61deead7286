//! Config loading and defaults integration tests

use std::path::PathBuf;

use registrar::Config;

#[test]
fn full_config_parses() {
    let toml_str = r#"
[bot]
name = "Bursar"
prefix = "?"
invite_link = "https://discord.com/oauth2/authorize?client_id=1234"

[auth]
admins = [100200300, 400500600]

[guild]
required_channels = ["general", "course-registration"]
required_roles = ["Student"]

[sync]
refresh_interval_secs = 900

[storage]
db_path = "/var/lib/registrar/courses.db"
reset_on_start = true

[messages]
path = "replies.json"

[colors]
default = 0x2F3136
success = 0x43B581
failure = 0xF04747
"#;

    let config: Config = toml::from_str(toml_str).expect("valid TOML");

    assert_eq!(config.bot.name, "Bursar");
    assert_eq!(config.bot.prefix, "?");
    assert_eq!(
        config.bot.invite_link.as_deref(),
        Some("https://discord.com/oauth2/authorize?client_id=1234")
    );
    assert_eq!(config.auth.admins, vec![100200300, 400500600]);
    assert_eq!(
        config.guild.required_channels,
        vec!["general", "course-registration"]
    );
    assert_eq!(config.guild.required_roles, vec!["Student"]);
    assert_eq!(config.sync.refresh_interval_secs, 900);
    assert_eq!(
        config.storage.db_path,
        PathBuf::from("/var/lib/registrar/courses.db")
    );
    assert!(config.storage.reset_on_start);
    assert_eq!(config.messages.path, Some(PathBuf::from("replies.json")));
    assert_eq!(config.colors.default, 0x2F3136);
    assert_eq!(config.colors.success, 0x43B581);
    assert_eq!(config.colors.failure, 0xF04747);

    config.validate().expect("full config validates");
}

#[test]
fn empty_toml_uses_defaults() {
    let config: Config = toml::from_str("").expect("empty TOML");

    assert_eq!(config.bot.name, "Registrar");
    assert_eq!(config.bot.prefix, "!");
    assert_eq!(config.bot.invite_link, None);
    assert!(config.auth.admins.is_empty());
    assert_eq!(config.guild.required_channels, vec!["general"]);
    assert!(config.guild.required_roles.is_empty());
    assert_eq!(config.sync.refresh_interval_secs, 3600);
    assert_eq!(config.storage.db_path, PathBuf::from("registrar.db"));
    assert!(!config.storage.reset_on_start);
    assert_eq!(config.messages.path, None);

    config.validate().expect("defaults validate");
}

#[test]
fn partial_section_keeps_other_defaults() {
    let toml_str = r#"
[bot]
prefix = "$"

[sync]
"#;

    let config: Config = toml::from_str(toml_str).expect("valid TOML");

    assert_eq!(config.bot.prefix, "$");
    // untouched fields fall back to their defaults
    assert_eq!(config.bot.name, "Registrar");
    assert_eq!(config.sync.refresh_interval_secs, 3600);
}

#[test]
fn db_path_override_pattern() {
    // Simulate the pattern from main.rs: CLI flag beats the config file
    let mut config: Config = toml::from_str("[storage]\ndb_path = \"from-file.db\"").unwrap();
    assert_eq!(config.storage.db_path, PathBuf::from("from-file.db"));

    let cli_db_path = Some(PathBuf::from("/tmp/override.db"));
    if let Some(db_path) = cli_db_path {
        config.storage.db_path = db_path;
    }
    assert_eq!(config.storage.db_path, PathBuf::from("/tmp/override.db"));
}

#[test]
fn validation_rejects_bad_values() {
    let mut config = Config::default();
    config.bot.name = "   ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.bot.prefix = String::new();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.bot.prefix = "! ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.sync.refresh_interval_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.guild.required_channels = vec!["general".to_string(), String::new()];
    assert!(config.validate().is_err());
}

#[test]
fn invalid_toml_returns_error() {
    let bad_toml = "this is not valid { toml }}}";
    let result: Result<Config, _> = toml::from_str(bad_toml);
    assert!(result.is_err(), "Invalid TOML should produce an error");
}
