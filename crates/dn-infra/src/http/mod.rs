mod backend;
mod external_ip;

pub use backend::HttpBackend;
pub use external_ip::HttpExternalIp;

use std::time::Duration;

/// Shared client for all backend calls.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}
