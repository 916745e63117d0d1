use std::{env, fs};

use revocation_server::StorageBackend;
use revocation_server::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("revocation.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
body_limit_bytes = 1024

[storage]
backend = "postgres"

[storage.postgres]
host = "db"
database = "revocation"
user = "registry"
password = "secret"
pool_size = 4
application_name = "revocation-staging"

[revocation]
max_time_delta_ms = 3600000
hash_salt = "pepper"

[[authorization.rules]]
required_user_claims = { realm = "/services" }
allowed_revocation_claims = { realm = "/employees" }

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.storage.backend, StorageBackend::Postgres);
    assert_eq!(
        cfg.storage.postgres.connection_url(),
        "postgres://registry:secret@db:5432/revocation"
    );
    assert_eq!(cfg.storage.postgres.pool_size, 4);
    assert_eq!(cfg.storage.postgres.application_name, "revocation-staging");
    assert_eq!(cfg.revocation.max_time_delta_ms, 3_600_000);
    assert_eq!(cfg.revocation.hash_salt, "pepper");
    assert_eq!(cfg.authorization.rules.len(), 1);
    assert_eq!(
        cfg.authorization.rules[0]
            .required_user_claims()
            .get("realm")
            .map(String::as_str),
        Some("/services")
    );
    assert_eq!(cfg.logging.level, "debug");

    // 2) Env override wins over file
    unsafe {
        env::set_var("REVOCATION__SERVER__PORT", "9090");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.server.port, 9090);
    unsafe {
        env::remove_var("REVOCATION__SERVER__PORT");
    }

    // 3) Invalid values are rejected
    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[revocation]\nmax_time_delta_ms = 0\n").expect("write toml");
    assert!(load_config(bad.to_str()).is_err());

    // 4) Missing file falls back to defaults
    let missing = dir.path().join("missing.toml");
    let cfg_default = load_config(missing.to_str()).expect("defaults");
    assert_eq!(cfg_default.server.port, 8080);
    assert_eq!(cfg_default.storage.backend, StorageBackend::Memory);
}
