use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.public_port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        public_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_run_without_database_or_webhook() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert!(settings.database.url.is_none());
    assert!(settings.admin.token.is_none());
    assert!(settings.cache.enable_response_cache);
    assert!(settings.cache.webhook_url.is_none());
    assert_eq!(settings.cache.response_limit, DEFAULT_CACHE_RESPONSE_LIMIT);
    assert_eq!(settings.server.admin_addr.port(), DEFAULT_ADMIN_PORT);
}

#[test]
fn blank_database_url_counts_as_unset() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".into());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn short_admin_token_is_rejected() {
    let mut raw = RawSettings::default();
    raw.admin.token = Some("short".into());
    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(err, LoadError::Invalid { key: "admin.token", .. }));
}

#[test]
fn admin_token_is_redacted_in_debug_output() {
    let mut raw = RawSettings::default();
    raw.admin.token = Some("correct-horse-battery".into());
    let settings = Settings::from_raw(raw).expect("valid settings");
    let rendered = format!("{:?}", settings.admin);
    assert!(!rendered.contains("correct-horse"));
}

#[test]
fn webhook_secret_is_redacted_in_debug_output() {
    let mut raw = RawSettings::default();
    raw.cache.webhook_secret = Some("shared-frontend-secret".into());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.cache.webhook_secret.as_deref(),
        Some("shared-frontend-secret")
    );
    let rendered = format!("{:?}", settings.cache);
    assert!(!rendered.contains("shared-frontend-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn webhook_url_must_be_http() {
    let mut raw = RawSettings::default();
    raw.cache.webhook_url = Some("ftp://frontend/revalidate".into());
    assert!(Settings::from_raw(raw).is_err());

    let mut raw = RawSettings::default();
    raw.cache.webhook_url = Some("http://frontend:3000/api/revalidate".into());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.cache.webhook_url.map(|url| url.to_string()),
        Some("http://frontend:3000/api/revalidate".to_string())
    );
}

#[test]
fn listeners_must_not_collide() {
    let mut raw = RawSettings::default();
    raw.server.admin_port = Some(DEFAULT_PUBLIC_PORT);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["bulletin"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_seed_settings_arguments() {
    let args = CliArgs::parse_from([
        "bulletin",
        "seed-settings",
        "--database-url",
        "postgres://example",
    ]);

    match args.command.expect("seed-settings command") {
        Command::SeedSettings(seed) => {
            assert_eq!(
                seed.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn serve_flags_reach_settings() {
    let args = CliArgs::parse_from([
        "bulletin",
        "serve",
        "--cache-responses",
        "false",
        "--database-url",
        "postgres://db/bulletin",
    ]);
    let Some(Command::Serve(serve)) = args.command else {
        panic!("expected serve command");
    };

    let mut raw = RawSettings::default();
    raw.apply_serve_overrides(&serve.overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(!settings.cache.enable_response_cache);
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://db/bulletin")
    );
}
