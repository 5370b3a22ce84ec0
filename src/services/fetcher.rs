//! Politeness-gated page fetcher.
//!
//! [`Transport`] issues a single GET and reports whatever came back;
//! [`PoliteFetcher`] layers the rate limit, the retry policy and status
//! classification on top of it.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, RawPage};
use crate::services::throttle::RateLimiter;

/// Issues one GET request. Non-success statuses are returned, not raised.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawPage>;
}

/// [`Transport`] over a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with the configured user agent and timeout.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<RawPage> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawPage::new(url, status, body))
    }
}

/// How a single attempt ended.
enum Attempt {
    Done(RawPage),
    Retry(String),
    Fail(AppError),
}

/// Fetches pages one at a time under a [`RateLimiter`], retrying
/// rate-limit and server errors with exponential backoff.
pub struct PoliteFetcher<T> {
    transport: T,
    max_retries: u32,
    max_backoff: Duration,
}

impl<T: Transport> PoliteFetcher<T> {
    pub fn new(transport: T, config: &CrawlerConfig) -> Self {
        Self {
            transport,
            max_retries: config.max_retries,
            max_backoff: config.max_backoff(),
        }
    }

    pub fn with_retries(transport: T, max_retries: u32, max_backoff: Duration) -> Self {
        Self {
            transport,
            max_retries,
            max_backoff,
        }
    }

    /// Fetch `url`.
    ///
    /// Every attempt, retries included, passes through `limiter`. A 404
    /// yields [`AppError::NotFound`] immediately; 429, 5xx and transport
    /// failures are retried up to `max_retries` times before surfacing as
    /// [`AppError::Fetch`].
    pub async fn fetch(&self, limiter: &mut RateLimiter, url: &str) -> Result<RawPage> {
        let mut attempt = 0;
        loop {
            limiter.acquire().await;
            log::debug!("GET {} (attempt {})", url, attempt + 1);

            let reason = match self.attempt(url).await {
                Attempt::Done(page) => return Ok(page),
                Attempt::Fail(err) => return Err(err),
                Attempt::Retry(reason) => reason,
            };

            if attempt >= self.max_retries {
                return Err(AppError::fetch(
                    url,
                    format!("{reason} (gave up after {} attempts)", attempt + 1),
                ));
            }

            let wait = limiter.backoff(attempt, self.max_backoff);
            log::warn!(
                "{} for {}; retrying in {} ms",
                reason,
                url,
                wait.as_millis()
            );
            limiter.pause(wait).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, url: &str) -> Attempt {
        let page = match self.transport.get(url).await {
            Ok(page) => page,
            Err(err) if err.is_retryable() => return Attempt::Retry(err.to_string()),
            Err(err) => return Attempt::Fail(AppError::fetch(url, err)),
        };

        if page.is_success() {
            return Attempt::Done(page);
        }
        match page.status {
            404 => Attempt::Fail(AppError::not_found(url)),
            429 | 500..=599 => Attempt::Retry(format!("HTTP {}", page.status)),
            status => Attempt::Fail(AppError::fetch(url, format!("HTTP {status}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::testutil::{FakeClock, StaticTransport};

    fn limiter(clock: &Arc<FakeClock>) -> RateLimiter {
        RateLimiter::with_clock(Duration::from_secs(3), clock.clone())
    }

    #[tokio::test]
    async fn success_returns_body() {
        let transport = StaticTransport::new().page("https://x/a.htm", "<html>a</html>");
        let fetcher = PoliteFetcher::with_retries(transport, 3, Duration::from_secs(60));
        let clock = Arc::new(FakeClock::new());

        let page = fetcher.fetch(&mut limiter(&clock), "https://x/a.htm").await.unwrap();
        assert_eq!(page.body, "<html>a</html>");
        assert_eq!(page.status, 200);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let transport = StaticTransport::new().status("https://x/a.htm", 404);
        let fetcher = PoliteFetcher::with_retries(transport.clone(), 3, Duration::from_secs(60));
        let clock = Arc::new(FakeClock::new());

        let err = fetcher
            .fetch(&mut limiter(&clock), "https://x/a.htm")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(transport.hits("https://x/a.htm"), 1);
    }

    #[tokio::test]
    async fn server_errors_retry_then_fail() {
        let transport = StaticTransport::new().status("https://x/a.htm", 503);
        let fetcher = PoliteFetcher::with_retries(transport.clone(), 2, Duration::from_secs(60));
        let clock = Arc::new(FakeClock::new());

        let err = fetcher
            .fetch(&mut limiter(&clock), "https://x/a.htm")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
        assert_eq!(transport.hits("https://x/a.htm"), 3);
        // Backoffs of 6s and 12s, each above the 3s politeness delay.
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(6), Duration::from_secs(12)]
        );
    }

    #[tokio::test]
    async fn rate_limited_then_recovers() {
        let transport = StaticTransport::new()
            .sequence("https://x/a.htm", vec![(429, ""), (200, "<html>ok</html>")]);
        let fetcher = PoliteFetcher::with_retries(transport.clone(), 3, Duration::from_secs(60));
        let clock = Arc::new(FakeClock::new());

        let page = fetcher.fetch(&mut limiter(&clock), "https://x/a.htm").await.unwrap();
        assert_eq!(page.body, "<html>ok</html>");
        assert_eq!(transport.hits("https://x/a.htm"), 2);
    }

    #[tokio::test]
    async fn client_errors_other_than_404_fail_fast() {
        let transport = StaticTransport::new().status("https://x/a.htm", 403);
        let fetcher = PoliteFetcher::with_retries(transport.clone(), 3, Duration::from_secs(60));
        let clock = Arc::new(FakeClock::new());

        let err = fetcher
            .fetch(&mut limiter(&clock), "https://x/a.htm")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
        assert_eq!(transport.hits("https://x/a.htm"), 1);
    }

    #[tokio::test]
    async fn reqwest_transport_reports_status_without_raising() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boxscores/missing.htm"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/years/2023/week_1.htm"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>week</html>"))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::new(&CrawlerConfig::default()).unwrap();

        let missing = transport
            .get(&format!("{}/boxscores/missing.htm", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(missing.status, 404);

        let week = transport
            .get(&format!("{}/years/2023/week_1.htm", mock_server.uri()))
            .await
            .unwrap();
        assert!(week.is_success());
        assert_eq!(week.body, "<html>week</html>");
    }

    #[tokio::test]
    async fn polite_fetcher_over_http_retries_429() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/players/A/"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/players/A/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>A</html>"))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::new(&CrawlerConfig::default()).unwrap();
        let fetcher = PoliteFetcher::with_retries(transport, 3, Duration::from_secs(60));
        let clock = Arc::new(FakeClock::new());

        let page = fetcher
            .fetch(
                &mut limiter(&clock),
                &format!("{}/players/A/", mock_server.uri()),
            )
            .await
            .unwrap();
        assert_eq!(page.body, "<html>A</html>");
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(6)]);
    }
}
