/// Application-level constants
pub const APP_NAME: &str = "Prontua";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default clinic backend when `PRONTUA_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3333";

/// Per-request timeout for both gateways.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Base URL of the clinic REST backend.
pub fn api_base_url() -> String {
    match std::env::var("PRONTUA_API_URL") {
        Ok(url) if !url.trim().is_empty() => normalize_base(&url),
        _ => DEFAULT_API_URL.to_string(),
    }
}

/// Base URL of the blob-storage service.
/// Falls back to the API base — the backend proxies `/arquivos` by default.
pub fn storage_base_url() -> String {
    match std::env::var("PRONTUA_STORAGE_URL") {
        Ok(url) if !url.trim().is_empty() => normalize_base(&url),
        _ => api_base_url(),
    }
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
