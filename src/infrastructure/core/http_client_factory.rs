use crate::domain::errors::GatewayError;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use url::Url;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Client with transient-error retries and the given request timeout.
    ///
    /// Connection probes keep `max_retries` low so a dead endpoint is reported
    /// quickly.
    pub fn create_client(timeout: Duration, max_retries: u32) -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Joins `path` onto `base_url` and appends `params` as an encoded query.
/// reqwest-middleware does not expose `.query()`, so the URL is built up front.
pub fn build_url(
    base_url: &str,
    path: &str,
    params: &[(&str, &str)],
) -> Result<Url, GatewayError> {
    let joined = format!("{}{}", base_url.trim_end_matches('/'), path);
    let url = if params.is_empty() {
        Url::parse(&joined)
    } else {
        Url::parse_with_params(&joined, params)
    };
    url.map_err(|e| GatewayError::validation(format!("Invalid URL {}: {}", joined, e)))
}
