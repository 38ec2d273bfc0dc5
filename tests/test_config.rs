use code_optimizer::config::{self, Config, LogFormat};
use globset::{Glob, GlobSetBuilder};
use std::sync::Mutex;
use std::time::Duration;

// Environment is process-global; serialize the tests that touch it
static ENV_LOCK: Mutex<()> = Mutex::new(());

const KEYS: &[&str] = &[
    "CODE_OPTIMIZER_MAX_SOURCE_BYTES",
    "CODE_OPTIMIZER_MAX_DEPTH",
    "CODE_OPTIMIZER_TIMEOUT_MS",
    "CODE_OPTIMIZER_IGNORE_GLOBS",
    "CODE_OPTIMIZER_LOG_FORMAT",
    "CODE_OPTIMIZER_CONFIG",
];

fn with_env<F: FnOnce()>(pairs: &[(&str, &str)], f: F) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = KEYS.iter().map(|k| (*k, std::env::var(k).ok())).collect();
    for k in KEYS {
        std::env::remove_var(k);
    }
    for (k, v) in pairs {
        std::env::set_var(k, v);
    }
    f();
    for (k, v) in saved {
        match v {
            Some(val) => std::env::set_var(k, val),
            None => std::env::remove_var(k),
        }
    }
}

#[test]
fn config_loads_from_env_and_json() {
    let td = tempfile::tempdir().unwrap();
    let cfg_file = td.path().join("code-optimizer.json");
    let cfg_text = r#"{
      "max_source_bytes": 2048,
      "log_format": "json",
      "ignore_globs": ["**/vendor/**", "**/*_pb2.py"]
    }"#;
    std::fs::write(&cfg_file, cfg_text).unwrap();

    with_env(
        &[
            ("CODE_OPTIMIZER_MAX_SOURCE_BYTES", "100"),
            ("CODE_OPTIMIZER_MAX_DEPTH", "64"),
            ("CODE_OPTIMIZER_TIMEOUT_MS", "250"),
            ("CODE_OPTIMIZER_CONFIG", cfg_file.to_str().unwrap()),
        ],
        || {
            let cfg = config::load_config().unwrap();
            // JSON overrides env when both are present
            assert_eq!(cfg.max_source_bytes, 2048);
            assert_eq!(cfg.max_nesting_depth, 64);
            assert_eq!(cfg.timeout, Duration::from_millis(250));
            assert_eq!(cfg.log_format, LogFormat::Json);
            assert!(config::should_ignore_path(&cfg, "src/vendor/lib.py"));
            assert!(config::should_ignore_path(&cfg, "proto/msg_pb2.py"));
            assert!(!config::should_ignore_path(&cfg, "src/app.py"));
            assert_eq!(cfg.parse_limits().max_source_bytes, 2048);
        },
    );
}

#[test]
fn env_globs_and_bad_numbers() {
    let td = tempfile::tempdir().unwrap();
    let missing = td.path().join("absent.json");
    with_env(
        &[
            ("CODE_OPTIMIZER_TIMEOUT_MS", "soon"),
            ("CODE_OPTIMIZER_IGNORE_GLOBS", "**/migrations/**, **/build/**"),
            ("CODE_OPTIMIZER_LOG_FORMAT", "TEXT"),
        ],
        || {
            // no explicit file and none in the default location relative to a fresh dir
            let prev = std::env::current_dir().unwrap();
            std::env::set_current_dir(td.path()).unwrap();
            let cfg = config::load_config();
            std::env::set_current_dir(prev).unwrap();

            let cfg = cfg.unwrap();
            assert_eq!(cfg.timeout, Config::default().timeout);
            assert_eq!(cfg.log_format, LogFormat::Text);
            assert!(config::should_ignore_path(&cfg, "app/migrations/0001.py"));
            assert!(config::should_ignore_path(&cfg, "out/build/gen.py"));
        },
    );

    with_env(&[("CODE_OPTIMIZER_CONFIG", missing.to_str().unwrap())], || {
        assert!(config::load_config().is_err(), "explicit config path must exist");
    });
}

#[test]
fn invalid_json_is_an_error() {
    let td = tempfile::tempdir().unwrap();
    let cfg_file = td.path().join("bad.json");
    std::fs::write(&cfg_file, "{ not json").unwrap();
    with_env(&[("CODE_OPTIMIZER_CONFIG", cfg_file.to_str().unwrap())], || {
        let err = config::load_config().unwrap_err();
        assert!(err.to_string().contains("invalid JSON"), "{err:#}");
    });
}

#[test]
fn default_config_ignores_nothing() {
    let cfg = Config::default();
    assert!(!config::should_ignore_path(&cfg, "anything.py"));
    assert!(!config::should_ignore_path(&cfg, ""));

    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new("*.py").unwrap());
    let cfg = Config {
        ignore_globs: Some(builder.build().unwrap()),
        ..Default::default()
    };
    assert!(config::should_ignore_path(&cfg, "x.py"));
    assert!(!config::should_ignore_path(&cfg, ""));
}

#[test]
fn ignored_overrides_are_reported_as_warnings() {
    let td = tempfile::tempdir().unwrap();
    let cfg_file = td.path().join("globs.json");
    std::fs::write(&cfg_file, r#"{"ignore_globs": ["[", "**/ok/**"]}"#).unwrap();
    with_env(
        &[
            ("CODE_OPTIMIZER_TIMEOUT_MS", "soon"),
            ("CODE_OPTIMIZER_CONFIG", cfg_file.to_str().unwrap()),
        ],
        || {
            let (cfg, warnings) = config::load_config_with_warnings().unwrap();
            assert_eq!(cfg.timeout, Config::default().timeout);
            assert!(config::should_ignore_path(&cfg, "x/ok/y.py"));
            assert_eq!(warnings.len(), 2, "{warnings:?}");
            assert!(warnings[0].contains("CODE_OPTIMIZER_TIMEOUT_MS=soon"));
            assert!(warnings[1].contains("invalid glob '['"));
        },
    );
}
