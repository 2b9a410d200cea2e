use std::{fs, path::Path};

use anyhow::Context;
use client_core::{
    endless_scroll::DEFAULT_BUFFER,
    product_feed::{DEFAULT_PAGE_SIZE, DEFAULT_PLACEHOLDER_COUNT},
    registration::DEFAULT_PASSWORD_MAX_LEN,
    FeedOptions,
};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub page_size: usize,
    pub scroll_buffer: usize,
    pub placeholder_count: usize,
    pub password_max_len: usize,
    pub catalog_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scroll_buffer: DEFAULT_BUFFER,
            placeholder_count: DEFAULT_PLACEHOLDER_COUNT,
            password_max_len: DEFAULT_PASSWORD_MAX_LEN,
            catalog_size: 45,
        }
    }
}

impl Settings {
    pub fn feed_options(&self) -> FeedOptions {
        FeedOptions {
            page_size: self.page_size,
            scroll_buffer: self.scroll_buffer,
            placeholder_count: self.placeholder_count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    page_size: Option<usize>,
    scroll_buffer: Option<usize>,
    placeholder_count: Option<usize>,
    password_max_len: Option<usize>,
    catalog_size: Option<usize>,
}

/// Defaults, then `path` if it exists, then `APP__*` environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let file_cfg = toml::from_str::<FileSettings>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        apply_file(&mut settings, file_cfg);
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(sanitize(settings))
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.page_size {
        settings.page_size = v;
    }
    if let Some(v) = file_cfg.scroll_buffer {
        settings.scroll_buffer = v;
    }
    if let Some(v) = file_cfg.placeholder_count {
        settings.placeholder_count = v;
    }
    if let Some(v) = file_cfg.password_max_len {
        settings.password_max_len = v;
    }
    if let Some(v) = file_cfg.catalog_size {
        settings.catalog_size = v;
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let fields: [(&str, &mut usize); 5] = [
        ("APP__PAGE_SIZE", &mut settings.page_size),
        ("APP__SCROLL_BUFFER", &mut settings.scroll_buffer),
        ("APP__PLACEHOLDER_COUNT", &mut settings.placeholder_count),
        ("APP__PASSWORD_MAX_LEN", &mut settings.password_max_len),
        ("APP__CATALOG_SIZE", &mut settings.catalog_size),
    ];

    for (key, slot) in fields {
        if let Some(raw) = lookup(key) {
            match raw.trim().parse::<usize>() {
                Ok(parsed) => *slot = parsed,
                Err(_) => warn!(key, value = %raw, "ignoring non-numeric setting"),
            }
        }
    }
}

fn sanitize(mut settings: Settings) -> Settings {
    let defaults = Settings::default();
    if settings.page_size == 0 {
        warn!("page_size must be positive; using default");
        settings.page_size = defaults.page_size;
    }
    if settings.scroll_buffer == 0 {
        warn!("scroll_buffer must be positive; using default");
        settings.scroll_buffer = defaults.scroll_buffer;
    }
    if settings.password_max_len == 0 {
        settings.password_max_len = defaults.password_max_len;
    }
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
