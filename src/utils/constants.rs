//! Shared constants and platform invariants

pub const DEFAULT_OAUTH_URL: &str = "https://master-atomic-io.auth.us-east-1.amazoncognito.com";
pub const OAUTH_TOKEN_PATH: &str = "/oauth2/token";
pub const PLATFORM_DOMAIN: &str = "atomic.io";
pub const API_VERSION: &str = "v1";

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_TOKEN_SAFETY_MARGIN_SECS: u64 = 60;
/// used when the token endpoint omits `expires_in`
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

// Identity token (JWT) requirements of the platform
pub const JWT_AUDIENCE: &str = "https://atomic.io";
pub const JWT_MAX_TTL_DAYS: i64 = 7;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// `https://{org}.customer-api.atomic.io/v1/`
pub fn default_api_base_url(organization_id: &str) -> String {
    format!("https://{}.customer-api.{}/{}/", organization_id, PLATFORM_DOMAIN, API_VERSION)
}
