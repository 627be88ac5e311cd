use std::env;

use pretty_assertions::assert_eq;
use serial_test::serial;

use paylog::config::Config;

fn clear_env() {
    for key in [
        "DATABASE_URL",
        "JWT_SECRET",
        "JWT_EXPIRATION_DAYS",
        "HOST",
        "PORT",
        "ENVIRONMENT",
    ] {
        unsafe { env::remove_var(key) };
    }
}

#[test]
#[serial]
fn defaults_apply_when_env_is_empty() {
    clear_env();

    let config = Config::from_env_only().unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.environment, "development");
    assert_eq!(config.jwt_expiration_days, 30);
    assert!(!config.is_production());
}

#[test]
#[serial]
fn environment_variables_override_defaults() {
    clear_env();
    unsafe {
        env::set_var("DATABASE_URL", "postgres://db.internal:5432/paylog");
        env::set_var("PORT", "9090");
        env::set_var("ENVIRONMENT", "production");
    }

    let config = Config::from_env_only().unwrap();

    assert_eq!(config.database_url, "postgres://db.internal:5432/paylog");
    assert_eq!(config.port, 9090);
    assert!(config.is_production());
    assert_eq!(config.server_address(), "127.0.0.1:9090");

    clear_env();
}

#[test]
#[serial]
fn unparseable_port_falls_back() {
    clear_env();
    unsafe { env::set_var("PORT", "not-a-port") };

    let config = Config::from_env_only().unwrap();
    assert_eq!(config.port, 8080);

    clear_env();
}
