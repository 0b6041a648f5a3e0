use clap::Parser;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use pdfdupe::cli::Cli;
use pdfdupe::config::{Config, ENV_PREFIX};
use pdfdupe::error::ExitCode;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.extension, "pdf");
}

#[test]
fn test_config_env_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "extension = \"txt\"\nbuffer_size = 1024\n").unwrap();

    std::env::set_var("PDFDUPE_TEST_ONLY_BUFFER_SIZE", "4096");

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("PDFDUPE_TEST_ONLY_"))
        .extract()
        .unwrap();

    assert_eq!(config.extension, "txt");
    assert_eq!(config.buffer_size, 4096);

    std::env::remove_var("PDFDUPE_TEST_ONLY_BUFFER_SIZE");
}

#[test]
fn test_config_figment_reads_given_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "color = false\n").unwrap();

    let config: Config = Config::figment(Some(&path)).extract().unwrap();
    assert!(!config.color);
    assert_eq!(ENV_PREFIX, "PDFDUPE_");
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "buffer_size = \"not a number\"\n").unwrap();

    assert_eq!(Config::load(Some(&path)), Config::default());
}

#[test]
fn test_cli_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "extension = \"txt\"\n").unwrap();

    let cli = Cli::try_parse_from(["pdfdupe", "/tmp", "-e", ".DjVu"]).unwrap();
    let mut config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .extract()
        .unwrap();
    config.merge_cli(&cli);

    assert_eq!(config.validate().unwrap().extension, "djvu");
}

#[test]
fn test_write_config_via_run_app() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("pdfdupe.toml");
    let cli = Cli::try_parse_from([
        "pdfdupe",
        "--config",
        path.to_str().unwrap(),
        "--extension",
        "txt",
        "--write-config",
        "--quiet",
    ])
    .unwrap();

    let code = pdfdupe::run_app(cli).unwrap();

    assert_eq!(code, ExitCode::Success);
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("extension = \"txt\""));
}

#[test]
fn test_run_app_rejects_empty_extension() {
    let dir = tempdir().unwrap();
    let cli = Cli::try_parse_from([
        "pdfdupe",
        dir.path().to_str().unwrap(),
        "--config",
        dir.path().join("absent.toml").to_str().unwrap(),
        "--extension",
        ".",
        "--quiet",
    ])
    .unwrap();

    let err = pdfdupe::run_app(cli).unwrap_err();
    assert_eq!(pdfdupe::error::exit_code_for(&err), ExitCode::GeneralError);
    assert!(format!("{:#}", err).contains("extension must not be empty"));
}
