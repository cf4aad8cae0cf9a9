use std::sync::LazyLock;

static BIND: LazyLock<String> =
    LazyLock::new(|| std::env::var("RELAYD_BIND").unwrap_or("0.0.0.0:3000".to_owned()));
const FALLBACK_ALLOWED_ORIGINS: [&str; 1] = ["example.com"];
static ALLOWED_ORIGINS: LazyLock<Vec<String>> = LazyLock::new(|| {
    if let Ok(origins_text) = std::env::var("RELAYD_ALLOWED_ORIGINS") {
        origins_text
            .split(',')
            .map(|s| s.trim().to_owned())
            .collect()
    } else {
        FALLBACK_ALLOWED_ORIGINS
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
});
const DEFAULT_TIMEOUT_SECS: u64 = 60;
static CONNECT_TIMEOUT_SECS: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("RELAYD_CONNECT_TIMEOUT_SECS")
        .unwrap_or(DEFAULT_TIMEOUT_SECS.to_string())
        .parse()
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
});

pub const CONTENT_TYPE_VALUE_TEXT_HTML: &str = "text/html; charset=utf-8";

pub fn bind() -> &'static str {
    &BIND
}

pub fn allowed_origins() -> &'static Vec<String> {
    &ALLOWED_ORIGINS
}

pub fn connect_timeout_secs() -> u64 {
    *CONNECT_TIMEOUT_SECS
}
