//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for HTML pages, plain-text bodies and images
//! - Detection of the site's "redirected to the home page" signal
//! - Error classification into the closed `FetchError` set

use crate::config::{CrawlerConfig, SiteConfig};
use crate::{FetchError, FetchResult, TululuError};
use reqwest::{redirect::Policy, Client, Response};
use url::Url;

/// A fetched HTML document together with the URL it was finally served from
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// Final URL after redirects; relative links on the page resolve against it
    pub url: Url,
    /// Decoded document text
    pub html: String,
}

/// A fetched binary resource (book text or cover image)
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Raw body bytes, written to disk verbatim
    pub body: Vec<u8>,
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed (up to 10 hops) so that the final URL can be
/// compared against the home page. No timeout is set unless
/// `request-timeout-ms` is configured.
///
/// # Example
///
/// ```no_run
/// use tululu_parser::config::{CrawlerConfig, SiteConfig};
/// use tululu_parser::crawler::build_http_client;
///
/// let client = build_http_client(&SiteConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    site: &SiteConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(site.user_agent.as_str())
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = crawler.request_timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Fails with `Redirected` when the response was served from the home page
///
/// The site answers requests for missing or restricted resources by
/// redirecting to its root instead of returning an error status.
pub fn check_for_redirect(response_url: &Url, home_url: &Url, requested: &str) -> FetchResult<()> {
    if response_url == home_url {
        return Err(FetchError::Redirected {
            url: requested.to_string(),
        });
    }
    Ok(())
}

/// Classifies a transport-level reqwest error
fn classify_transport_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_redirect() {
        // Redirect loop or chain too long: the site is bouncing us around
        // instead of serving the resource.
        return FetchError::Redirected {
            url: url.to_string(),
        };
    }

    if let Some(status) = error.status() {
        return FetchError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        };
    }

    FetchError::Connection {
        url: url.to_string(),
        source: error,
    }
}

/// Fetches pages and binary assets from the catalogue site
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    home_url: Url,
}

impl Fetcher {
    /// Creates a fetcher for the site described by `site`
    pub fn new(site: &SiteConfig, crawler: &CrawlerConfig) -> Result<Self, TululuError> {
        let home_url = Url::parse(&site.base_url)?;
        let client = build_http_client(site, crawler)?;
        Ok(Self { client, home_url })
    }

    /// Fetches an HTML page
    ///
    /// # Returns
    ///
    /// * `Ok(PageResponse)` - The decoded document and its final URL
    /// * `Err(FetchError)` - Redirected, HTTP error status, or transport failure
    pub async fn fetch_page(&self, url: &Url) -> FetchResult<PageResponse> {
        let response = self.send(url, &[]).await?;
        let final_url = response.url().clone();

        let html = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url.as_str(), e))?;

        Ok(PageResponse {
            url: final_url,
            html,
        })
    }

    /// Fetches a binary resource, optionally with query parameters
    pub async fn fetch_bytes(&self, url: &Url, query: &[(&str, &str)]) -> FetchResult<RawResponse> {
        let response = self.send(url, query).await?;
        let final_url = response.url().clone();
        let status = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(url.as_str(), e))?;

        Ok(RawResponse {
            url: final_url,
            status,
            body: body.to_vec(),
        })
    }

    /// Issues the GET request and validates the response
    ///
    /// # Validation Order
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | DNS / connect / timeout / reset | `Connection` |
    /// | Final URL is the home page (any status) | `Redirected` |
    /// | Non-2xx status | `Http` |
    async fn send(&self, url: &Url, query: &[(&str, &str)]) -> FetchResult<Response> {
        tracing::debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(url.as_str(), e))?;

        check_for_redirect(response.url(), &self.home_url, url.as_str())?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}
