use email_delivery::settings::{ENV_FROM, ENV_HOST, ENV_PASS, ENV_PORT, ENV_TO, ENV_USER};
use email_delivery::{DeliveryError, SmtpMailer, SmtpSettings};
use serial_test::serial;
use std::env;

const ALL_KEYS: [&str; 6] = [ENV_FROM, ENV_TO, ENV_HOST, ENV_PORT, ENV_USER, ENV_PASS];

fn clear_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

fn set_required_env() {
    env::set_var(ENV_FROM, "radar@example.com");
    env::set_var(ENV_TO, "reader@example.com,other@example.com");
    env::set_var(ENV_HOST, "smtp.example.com");
    env::set_var(ENV_USER, "radar");
    env::set_var(ENV_PASS, "pa55");
}

#[test]
#[serial]
fn settings_load_from_process_environment() {
    clear_env();
    set_required_env();
    env::set_var(ENV_PORT, "not-a-port");

    let settings = SmtpSettings::from_env().expect("settings should load");
    assert_eq!(settings.port, 587);
    assert_eq!(settings.recipients().len(), 2);

    clear_env();
}

#[test]
#[serial]
fn missing_credential_fails_before_any_connection() {
    clear_env();
    set_required_env();
    env::remove_var(ENV_PASS);

    let err = SmtpMailer::from_env().err().expect("mailer must not build");
    assert!(matches!(err, DeliveryError::MissingSetting(ENV_PASS)));

    clear_env();
}
