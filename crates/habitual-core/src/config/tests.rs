use super::*;

#[test]
fn test_defaults_when_sections_missing() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.bot.name, "Habitual");
    assert_eq!(cfg.bot.language, "English");
    assert_eq!(cfg.store.db_path, "~/.habitual/data/habits.db");
    assert_eq!(cfg.conversation.session_ttl_minutes, 30);
    assert!(cfg.scheduler.enabled);
    assert_eq!(cfg.scheduler.poll_interval_secs, 60);
    assert_eq!(cfg.scheduler.tolerance_minutes, 5);
    assert_eq!(cfg.scheduler.channel, "telegram");
    assert_eq!(cfg.dispatcher.workers, 4);
    assert_eq!(cfg.dispatcher.max_attempts, 3);
    assert_eq!(cfg.dispatcher.backoff_secs, 2);
    assert!(cfg.channel.telegram.is_none());
}

#[test]
fn test_full_config_from_toml() {
    let toml_str = r#"
        [bot]
        language = "Russian"

        [channel.telegram]
        enabled = true
        bot_token = "123:abc"
        allowed_users = [42]

        [scheduler]
        poll_interval_secs = 30
        tolerance_minutes = 2

        [dispatcher]
        workers = 8
        max_attempts = 5
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.bot.language, "Russian");
    assert_eq!(cfg.bot.data_dir, "~/.habitual");
    let tg = cfg.channel.telegram.unwrap();
    assert!(tg.enabled);
    assert_eq!(tg.bot_token, "123:abc");
    assert_eq!(tg.allowed_users, vec![42]);
    assert_eq!(cfg.scheduler.poll_interval_secs, 30);
    assert_eq!(cfg.scheduler.tolerance_minutes, 2);
    assert_eq!(cfg.dispatcher.workers, 8);
    assert_eq!(cfg.dispatcher.max_attempts, 5);
    assert_eq!(cfg.dispatcher.backoff_secs, 2);
}

#[test]
fn test_session_ttl_zero_disables() {
    let cfg = ConversationConfig {
        session_ttl_minutes: 0,
    };
    assert!(cfg.session_ttl().is_none());
    let cfg = ConversationConfig::default();
    assert_eq!(cfg.session_ttl(), Some(Duration::from_secs(30 * 60)));
}

#[test]
fn test_token_fallback_fills_empty_token() {
    let mut cfg: Config = toml::from_str("[channel.telegram]\nenabled = true\n").unwrap();
    apply_token_fallback(&mut cfg, Some("from-env".into()));
    assert_eq!(cfg.channel.telegram.unwrap().bot_token, "from-env");
}

#[test]
fn test_token_fallback_keeps_configured_token() {
    let mut cfg: Config =
        toml::from_str("[channel.telegram]\nenabled = true\nbot_token = \"file\"\n").unwrap();
    apply_token_fallback(&mut cfg, Some("from-env".into()));
    assert_eq!(cfg.channel.telegram.unwrap().bot_token, "file");
}

#[test]
fn test_token_fallback_creates_telegram_section() {
    let mut cfg = Config::default();
    apply_token_fallback(&mut cfg, Some("from-env".into()));
    let tg = cfg.channel.telegram.unwrap();
    assert!(tg.enabled);
    assert_eq!(tg.bot_token, "from-env");

    let mut cfg = Config::default();
    apply_token_fallback(&mut cfg, Some(String::new()));
    assert!(cfg.channel.telegram.is_none());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/__habitual_test__/config.toml").unwrap();
    assert_eq!(cfg.bot.name, "Habitual");
}

#[test]
fn test_load_rejects_malformed_file() {
    let tmp = std::env::temp_dir().join(format!("__habitual_cfg_{}__", std::process::id()));
    let _ = std::fs::create_dir_all(&tmp);
    let path = tmp.join("config.toml");
    std::fs::write(&path, "[scheduler\nenabled = ").unwrap();
    let err = load(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, HabitualError::Config(_)));
    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn test_shellexpand_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let expanded = shellexpand("~/.habitual/data");
        assert_eq!(expanded, format!("{}/.habitual/data", home.to_string_lossy()));
    }
    assert_eq!(shellexpand("/abs/path"), "/abs/path");
}
