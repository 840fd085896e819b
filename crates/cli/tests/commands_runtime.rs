use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use grocery_cli::commands::{config, doctor, seed};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn seed_adds_demo_customers_to_empty_datastore() {
    let dir = TempDir::new().expect("temp dir");
    let storage = dir.path().join("database.json");

    with_env(&[("GROCERY_STORAGE_PATH", storage.to_str().expect("utf8 path"))], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.starts_with("demo customers ready: 3 added, 0 already present"));
        assert!(message.contains("  - added 1: Tom"));
        assert!(message.contains("  - added 3: Richard"));
    });

    let persisted: Value =
        serde_json::from_str(&fs::read_to_string(&storage).expect("datastore written"))
            .expect("datastore json");
    assert_eq!(
        persisted,
        serde_json::json!({
            "Customers": [
                { "Id": 1, "Name": "Tom" },
                { "Id": 2, "Name": "Smith" },
                { "Id": 3, "Name": "Richard" }
            ]
        })
    );
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = TempDir::new().expect("temp dir");
    let storage = dir.path().join("database.json");

    with_env(&[("GROCERY_STORAGE_PATH", storage.to_str().expect("utf8 path"))], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let after_first = fs::read_to_string(&storage).expect("datastore written");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let payload = parse_payload(&second.output);
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.starts_with("demo customers ready: 0 added, 3 already present"));

        assert_eq!(fs::read_to_string(&storage).expect("datastore"), after_first);
    });
}

#[test]
fn seed_reports_datastore_failure_for_corrupt_file() {
    let dir = TempDir::new().expect("temp dir");
    let storage = dir.path().join("database.json");
    fs::write(&storage, "{\"Customers\": [").expect("write corrupt datastore");

    with_env(&[("GROCERY_STORAGE_PATH", storage.to_str().expect("utf8 path"))], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 4, "expected seed execution failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "seed_execution");
    });

    assert_eq!(fs::read_to_string(&storage).expect("datastore"), "{\"Customers\": [");
}

#[test]
fn seed_returns_config_failure_for_invalid_port() {
    with_env(&[("GROCERY_SERVER_PORT", "not-a-port")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_passes_for_missing_datastore_file() {
    let dir = TempDir::new().expect("temp dir");
    let storage = dir.path().join("database.json");

    with_env(&[("GROCERY_STORAGE_PATH", storage.to_str().expect("utf8 path"))], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass");
        assert_eq!(report["checks"][0]["name"], "config_validation");
        assert_eq!(report["checks"][1]["name"], "datastore_readability");
        assert_eq!(report["checks"][1]["status"], "pass");
    });
}

#[test]
fn doctor_fails_for_corrupt_datastore() {
    let dir = TempDir::new().expect("temp dir");
    let storage = dir.path().join("database.json");
    fs::write(&storage, "[1, 2").expect("write corrupt datastore");

    with_env(&[("GROCERY_STORAGE_PATH", storage.to_str().expect("utf8 path"))], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [fail] datastore_readability:"));
    });
}

#[test]
fn doctor_skips_datastore_when_config_is_invalid() {
    with_env(&[("GROCERY_LOGGING_FORMAT", "xml")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 1);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][0]["status"], "fail");
        assert_eq!(report["checks"][1]["status"], "skipped");
    });
}

#[test]
fn config_attributes_env_and_default_sources() {
    with_env(&[("GROCERY_SERVER_PORT", "9191"), ("GROCERY_LOG_LEVEL", "debug")], || {
        let output = config::run();

        assert!(output.starts_with("effective config (source precedence: env > file > default):"));
        assert!(output.contains("- server.port = 9191 (source: env (GROCERY_SERVER_PORT))"));
        assert!(output.contains("- logging.level = debug (source: env (GROCERY_LOG_LEVEL))"));
        assert!(output.contains("- server.bind_address = 127.0.0.1 (source: default)"));
        assert!(output.contains("- cors.allowed_origins = <any> (source: default)"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "GROCERY_STORAGE_PATH",
        "GROCERY_SERVER_BIND_ADDRESS",
        "GROCERY_SERVER_PORT",
        "GROCERY_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "GROCERY_CORS_ALLOWED_ORIGINS",
        "GROCERY_LOGGING_LEVEL",
        "GROCERY_LOGGING_FORMAT",
        "GROCERY_LOG_LEVEL",
        "GROCERY_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
