//! Fetch Module
//!
//! The fetch functions an [`ExpiringCache`](super::ExpiringCache) can wrap.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

// == Fetch ==
/// A single-argument fetch keyed by a resource identifier (e.g. a URL).
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, resource: &str) -> Result<String>;
}

// == Closure Fetcher ==
/// Adapts an async closure into a [`Fetch`].
pub struct FnFetcher<F> {
    func: F,
}

/// Wraps `func` so it can be used wherever a [`Fetch`] is expected.
pub fn fetch_fn<F, Fut>(func: F) -> FnFetcher<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    FnFetcher { func }
}

#[async_trait]
impl<F, Fut> Fetch for FnFetcher<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    async fn fetch(&self, resource: &str) -> Result<String> {
        (self.func)(resource.to_string()).await
    }
}

// == HTTP Fetcher ==
/// Fetches a URL with an HTTP GET and returns the body text.
///
/// Non-2xx responses are reported as fetch errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[tokio::test]
    async fn test_fn_fetcher() {
        let fetcher = fetch_fn(|url: String| async move {
            Ok::<_, CacheError>(format!("<html>{}</html>", url))
        });

        let body = fetcher.fetch("http://example.com").await.unwrap();
        assert_eq!(body, "<html>http://example.com</html>");
    }

    #[tokio::test]
    async fn test_http_fetcher_invalid_url() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();

        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }
}
