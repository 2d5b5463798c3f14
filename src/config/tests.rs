use std::io::Write;

use serial_test::serial;

use super::*;

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp config file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn with_legacy_host<T>(value: Option<&str>, body: impl FnOnce() -> T) -> T {
    let previous = env::var(LEGACY_HOST_ENV).ok();
    // SAFETY: every test touching the process environment runs under #[serial].
    unsafe {
        match value {
            Some(value) => env::set_var(LEGACY_HOST_ENV, value),
            None => env::remove_var(LEGACY_HOST_ENV),
        }
    }
    let result = body();
    unsafe {
        match previous {
            Some(value) => env::set_var(LEGACY_HOST_ENV, value),
            None => env::remove_var(LEGACY_HOST_ENV),
        }
    }
    result
}

#[test]
fn defaults_disable_the_cache_manager() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert!(settings.cache_manager.host.is_none());
    assert!(settings.cache_manager.request_timeout.is_none());
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.cache_manager.host = Some("http://from-file:8080".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = Overrides {
        cache_manager_host: Some("http://from-cli:9090".to_string()),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_legacy_host(Some("http://legacy".to_string()));
    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    let host = settings.cache_manager.host.expect("host configured");
    assert_eq!(host.as_str(), "http://from-cli:9090/");
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn legacy_host_fills_only_a_missing_host() {
    let mut raw = RawSettings::default();
    raw.apply_legacy_host(Some("http://legacy:8080".to_string()));
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.cache_manager.host.map(String::from),
        Some("http://legacy:8080/".to_string())
    );

    let mut raw = RawSettings::default();
    raw.cache_manager.host = Some("http://configured".to_string());
    raw.apply_legacy_host(Some("http://legacy:8080".to_string()));
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.cache_manager.host.map(String::from),
        Some("http://configured/".to_string())
    );
}

#[test]
fn blank_host_counts_as_absent() {
    let mut raw = RawSettings::default();
    raw.cache_manager.host = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.cache_manager.host.is_none());
}

#[test]
fn malformed_host_is_rejected() {
    for host in ["not a url", "ftp://cache.internal", "unix:/var/run/cache.sock"] {
        let mut raw = RawSettings::default();
        raw.cache_manager.host = Some(host.to_string());

        let err = Settings::from_raw(raw).expect_err("invalid host");
        assert!(
            matches!(err, LoadError::Invalid { key: "cache_manager.host", .. }),
            "unexpected error for {host}: {err}"
        );
    }
}

#[test]
fn request_timeout_must_be_positive() {
    let mut raw = RawSettings::default();
    raw.apply_overrides(&Overrides {
        request_timeout_seconds: Some(0),
        ..Default::default()
    });
    assert!(Settings::from_raw(raw).is_err());

    let mut raw = RawSettings::default();
    raw.apply_overrides(&Overrides {
        request_timeout_seconds: Some(15),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.cache_manager.request_timeout,
        Some(Duration::from_secs(15))
    );
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    raw.apply_overrides(&Overrides {
        log_json: Some(true),
        ..Default::default()
    });

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());
    let err = Settings::from_raw(raw).expect_err("invalid level");
    assert!(matches!(err, LoadError::Invalid { key: "logging.level", .. }));
}

#[test]
fn parse_notify_arguments() {
    let args = CliArgs::parse_from([
        "cache-bridge",
        "notify",
        "delete",
        "--event-file",
        "/tmp/event.json",
        "--cache-manager-host",
        "http://cache.internal",
    ]);

    assert_eq!(
        args.overrides.cache_manager_host.as_deref(),
        Some("http://cache.internal")
    );
    match args.command {
        Command::Notify(notify) => {
            assert_eq!(notify.change, ChangeArg::Delete);
            assert_eq!(ChangeKind::from(notify.change), ChangeKind::Deleted);
            assert_eq!(notify.event_file, std::path::Path::new("/tmp/event.json"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn notify_reads_stdin_by_default() {
    let args = CliArgs::parse_from(["cache-bridge", "notify", "create"]);
    match args.command {
        Command::Notify(notify) => {
            assert_eq!(notify.change, ChangeArg::Create);
            assert_eq!(notify.event_file, std::path::Path::new("-"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_status_arguments() {
    let args = CliArgs::parse_from([
        "cache-bridge",
        "--log-json",
        "true",
        "status",
        "/news/article-1",
    ]);

    assert_eq!(args.overrides.log_json, Some(true));
    match args.command {
        Command::Status(status) => assert_eq!(status.url, "/news/article-1"),
        _ => panic!("wrong command parsed"),
    }
}

#[test]
#[serial]
fn load_reads_config_file() {
    let file = config_file(
        r#"
[logging]
level = "warn"

[cache_manager]
host = "http://cache.internal:8080"
request_timeout_seconds = 3
"#,
    );
    let path = file.path().to_string_lossy().into_owned();
    let args = CliArgs::parse_from(["cache-bridge", "--config-file", &path, "check-config"]);

    let settings = with_legacy_host(Some("http://legacy"), || load(&args)).expect("settings");

    assert_eq!(
        settings.cache_manager.host.map(String::from),
        Some("http://cache.internal:8080/".to_string())
    );
    assert_eq!(
        settings.cache_manager.request_timeout,
        Some(Duration::from_secs(3))
    );
    assert_eq!(settings.logging.level, LevelFilter::WARN);
}

#[test]
#[serial]
fn load_falls_back_to_legacy_environment_variable() {
    let file = config_file("[logging]\nlevel = \"info\"\n");
    let path = file.path().to_string_lossy().into_owned();
    let args = CliArgs::parse_from(["cache-bridge", "--config-file", &path, "check-config"]);

    let settings =
        with_legacy_host(Some("http://legacy:7070"), || load(&args)).expect("settings");
    assert_eq!(
        settings.cache_manager.host.map(String::from),
        Some("http://legacy:7070/".to_string())
    );

    let settings = with_legacy_host(None, || load(&args)).expect("settings");
    assert!(settings.cache_manager.host.is_none());
}

#[test]
fn missing_config_file_is_an_error() {
    let args = CliArgs::parse_from([
        "cache-bridge",
        "--config-file",
        "/nonexistent/cache-bridge.toml",
        "check-config",
    ]);
    assert!(matches!(load(&args), Err(LoadError::Build(_))));
}
