use super::{apply_env, load_settings, sanitize, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_dir(label: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("marketplace_cli_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

#[test]
fn missing_file_yields_defaults() {
    let dir = temp_dir("missing");
    let settings = load_settings(&dir.join("absent.toml")).expect("load");

    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.scroll_buffer, 1);
    assert_eq!(settings.placeholder_count, 10);
    assert_eq!(settings.password_max_len, 24);

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn file_values_override_defaults() {
    let dir = temp_dir("file");
    let path = dir.join("marketplace.toml");
    fs::write(&path, "page_size = 20\ncatalog_size = 100\n").expect("write config");

    let settings = load_settings(&path).expect("load");
    assert_eq!(settings.page_size, 20);
    assert_eq!(settings.catalog_size, 100);
    assert_eq!(settings.scroll_buffer, 1);

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn malformed_file_is_an_error() {
    let dir = temp_dir("malformed");
    let path = dir.join("marketplace.toml");
    fs::write(&path, "page_size = \"lots\"\n").expect("write config");

    let err = load_settings(&path).expect_err("should fail");
    assert!(err.to_string().contains("failed to parse config file"));

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn env_overrides_and_ignores_garbage() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("APP__PAGE_SIZE", "5"),
        ("APP__SCROLL_BUFFER", "two"),
        ("APP__PLACEHOLDER_COUNT", " 3 "),
    ]);
    let mut settings = Settings::default();

    apply_env(&mut settings, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.page_size, 5);
    assert_eq!(settings.scroll_buffer, 1);
    assert_eq!(settings.placeholder_count, 3);
}

#[test]
fn zero_page_size_and_buffer_fall_back_to_defaults() {
    let settings = sanitize(Settings {
        page_size: 0,
        scroll_buffer: 0,
        placeholder_count: 0,
        password_max_len: 0,
        catalog_size: 0,
    });

    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.scroll_buffer, 1);
    assert_eq!(settings.placeholder_count, 0);
    assert_eq!(settings.password_max_len, 24);
}
