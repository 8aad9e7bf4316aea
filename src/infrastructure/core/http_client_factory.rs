use anyhow::{Context, Result};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use url::Url;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client, adding retry middleware only when `max_retries > 0`.
    pub fn create_client(max_retries: u32, timeout: Duration) -> ClientWithMiddleware {
        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("pricecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        let builder = ClientBuilder::new(client);
        if max_retries == 0 {
            return builder.build();
        }

        // Exponential backoff on transient failures (5xx, timeouts, connection resets)
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
        builder
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Builds a URL with percent-encoded query parameters.
///
/// reqwest-middleware 0.5 doesn't expose `.query()`, so the query string is
/// attached to the URL up front.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> Result<Url>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    Url::parse_with_params(
        base_url,
        params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())),
    )
    .with_context(|| format!("Invalid URL: {}", base_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_with_query() {
        let url = build_url_with_query(
            "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart",
            &[("vs_currency", "inr"), ("days", "365"), ("interval", "daily")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart?vs_currency=inr&days=365&interval=daily"
        );
    }

    #[test]
    fn test_build_url_encodes_values() {
        let url = build_url_with_query("http://localhost/x", &[("q", "a b&c")]).unwrap();
        assert_eq!(url.query(), Some("q=a+b%26c"));
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        let params: [(&str, &str); 0] = [];
        assert!(build_url_with_query("not a url", &params).is_err());
    }
}
