//! HTTP plumbing shared by every backend
//!
//! This module handles:
//! - Client construction with the timeouts and user agent all backends share
//! - Request ID generation for log correlation
//! - Mapping non-success responses to provider errors

pub mod error;

pub use error::map_http_error;

use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use uuid::Uuid;

/// Default user agent
pub const USER_AGENT: &str = concat!("switchboard/", env!("CARGO_PKG_VERSION"));

/// Header carrying the per-request correlation ID
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Connect timeout applied to every backend client
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client a provider holds for its lifetime
pub fn build_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    ClientBuilder::new()
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(request_timeout)
        .user_agent(USER_AGENT)
        .gzip(true)
        .build()
}

/// Fresh correlation ID for one outbound request
pub fn request_id() -> Uuid {
    Uuid::new_v4()
}

/// Join a base URL and an endpoint path without doubling slashes
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://api.openai.com/v1/", "/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(join_url("http://localhost:1234", "models"), "http://localhost:1234/models");
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
