use nudge_bot::config::{Config, MAX_WAKE_COOLDOWN_MINUTES};
use std::env;
use std::sync::Mutex;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const OPTIONAL_VARS: [&str; 7] = [
    "DATABASE_URL",
    "HTTP_PORT",
    "TOGGL_API_URL",
    "WAKE_COOLDOWN_MINUTES",
    "SEND_TIMEOUT_SECS",
    "WEBHOOK_URL",
    "WEBHOOK_PORT",
];

fn reset_env() {
    env::remove_var("TELEGRAM_BOT_TOKEN");
    for key in OPTIONAL_VARS {
        env::remove_var(key);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    reset_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("TOGGL_API_URL", "http://localhost:9999/api/v9/");
    env::set_var("WAKE_COOLDOWN_MINUTES", "15");
    env::set_var("SEND_TIMEOUT_SECS", "3");
    env::set_var("WEBHOOK_URL", "https://bot.example.org/hook");
    env::set_var("WEBHOOK_PORT", "9443");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.toggl_api_url, "http://localhost:9999/api/v9");
    assert_eq!(config.wake_cooldown_minutes, 15);
    assert_eq!(config.send_timeout_secs, 3);
    let webhook = config.webhook.unwrap();
    assert_eq!(webhook.url.as_str(), "https://bot.example.org/hook");
    assert_eq!(webhook.port, 9443);

    reset_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    reset_env();

    // Only set required token, let others use defaults
    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "required_token");
    assert_eq!(config.database_url, "sqlite:./data/nudge.db");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.toggl_api_url, "https://api.track.toggl.com/api/v9");
    assert_eq!(config.wake_cooldown_minutes, 60);
    assert_eq!(config.send_timeout_secs, 10);
    assert!(config.webhook.is_none());

    reset_env();
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    reset_env();

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("TELEGRAM_BOT_TOKEN must be set"));

    env::set_var("TELEGRAM_BOT_TOKEN", "   ");
    assert!(Config::from_env().is_err());

    reset_env();
}

#[test]
fn test_config_blank_values_use_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    reset_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "token");
    env::set_var("DATABASE_URL", "");
    env::set_var("HTTP_PORT", " ");
    env::set_var("WEBHOOK_URL", "");

    let config = Config::from_env().unwrap();
    assert_eq!(config.database_url, "sqlite:./data/nudge.db");
    assert_eq!(config.http_port, 3000);
    assert!(config.webhook.is_none());

    reset_env();
}

#[test]
fn test_config_invalid_numbers() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    reset_env();
    env::set_var("TELEGRAM_BOT_TOKEN", "token");

    let cases = [
        ("HTTP_PORT", "not_a_number", "Invalid HTTP_PORT"),
        ("HTTP_PORT", "70000", "Invalid HTTP_PORT"),
        ("WAKE_COOLDOWN_MINUTES", "0", "Invalid WAKE_COOLDOWN_MINUTES"),
        ("WAKE_COOLDOWN_MINUTES", "-5", "Invalid WAKE_COOLDOWN_MINUTES"),
        ("WAKE_COOLDOWN_MINUTES", "525601", "Invalid WAKE_COOLDOWN_MINUTES"),
        ("WAKE_COOLDOWN_MINUTES", "1000000000000", "Invalid WAKE_COOLDOWN_MINUTES"),
        ("SEND_TIMEOUT_SECS", "soon", "Invalid SEND_TIMEOUT_SECS"),
    ];

    for (key, value, expected) in cases {
        env::set_var(key, value);
        let error = Config::from_env().unwrap_err().to_string();
        assert!(error.contains(expected), "{}={} gave '{}'", key, value, error);
        env::remove_var(key);
    }

    reset_env();
}

#[test]
fn test_config_cooldown_upper_bound_is_accepted() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    reset_env();
    env::set_var("TELEGRAM_BOT_TOKEN", "token");
    env::set_var("WAKE_COOLDOWN_MINUTES", MAX_WAKE_COOLDOWN_MINUTES.to_string());

    let config = Config::from_env().unwrap();
    assert_eq!(config.wake_cooldown_minutes, 525_600);

    reset_env();
}

#[test]
fn test_config_invalid_webhook() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    reset_env();
    env::set_var("TELEGRAM_BOT_TOKEN", "token");

    env::set_var("WEBHOOK_URL", "not a url");
    assert!(Config::from_env().unwrap_err().to_string().contains("Invalid WEBHOOK_URL"));

    env::set_var("WEBHOOK_URL", "https://bot.example.org/hook");
    env::set_var("WEBHOOK_PORT", "3000");
    assert!(Config::from_env()
        .unwrap_err()
        .to_string()
        .contains("WEBHOOK_PORT must differ from HTTP_PORT"));

    reset_env();
}

#[test]
fn test_database_url_without_bot_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    reset_env();

    assert_eq!(Config::database_url_from_env(), "sqlite:./data/nudge.db");
    env::set_var("DATABASE_URL", "sqlite:/tmp/other.db");
    assert_eq!(Config::database_url_from_env(), "sqlite:/tmp/other.db");

    reset_env();
}
