use super::rate_limit::rate_limit_reset;
use crate::config::Config;
use crate::error::FetchError;
use crate::gh_api_organizations_response::Organization;
use crate::gh_api_search_repo_response::{Repository, SearchResponse};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// The two github endpoints the pipelines talk to.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// `GET {search_url}?q={query}`, returns the `items` of the envelope.
    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>, FetchError>;

    /// `GET {url}` where `url` is an owner's *organizations_url*.
    async fn fetch_organizations(&self, url: &str) -> Result<Vec<Organization>, FetchError>;
}

/// Creates and sets standard github api request headers:
/// 1. **authorization**, only when an api token is configured.
/// 2. **X-GitHub-Api-Version**, github api version.
/// 3. **user-agent**, github refuses requests without one.
/// 4. **accept**, github's json media type.
fn get_requests_headers(config: &Config) -> Result<HeaderMap, FetchError> {
    let header_value = |name: &'static str, value: &str| {
        HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
            name,
            reason: e.to_string(),
        })
    };

    let mut headers = HeaderMap::new();
    if let Some(token) = &config.api_token {
        let mut value = header_value("authorization", &format!("Bearer {}", token))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    headers.insert(
        "x-github-api-version",
        header_value("X-GitHub-Api-Version", &config.api_version)?,
    );
    headers.insert(USER_AGENT, header_value("user-agent", &config.user_agent)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    Ok(headers)
}

/// `reqwest` backed implementation of [`GithubApi`].
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    search_url: String,
    headers: HeaderMap,
}

impl GithubClient {
    pub fn new(client: Client, config: &Config) -> Result<GithubClient, FetchError> {
        Ok(GithubClient {
            client,
            search_url: config.search_url.clone(),
            headers: get_requests_headers(config)?,
        })
    }

    /// Sends the request and decodes the body as `T`, classifying every
    /// failure: transport, ratelimit, status, then body shape.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T, FetchError> {
        let response = request
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            if let Some(reset) = rate_limit_reset(response.headers(), status, Utc::now()) {
                warn!("Rate limit hit on {}, resets at {}", url, reset);
                return Err(FetchError::RateLimited {
                    url: url.to_owned(),
                    reset,
                });
            }
            return Err(FetchError::Status {
                url: url.to_owned(),
                status,
            });
        }
        info!("Request successful: {}", status);

        let response_body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_owned(),
                source,
            })?;
        serde_json::from_str(&response_body).map_err(|source| FetchError::Malformed {
            url: url.to_owned(),
            source,
        })
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>, FetchError> {
        info!("Searching repositories matching '{}'", query);
        let request = self.client.get(&self.search_url).query(&[("q", query)]);
        let response: SearchResponse = self.get_json(&self.search_url, request).await?;
        debug!(
            "Search '{}' returned {} of {} repositories",
            query,
            response.items.len(),
            response.total_count
        );
        Ok(response.items)
    }

    async fn fetch_organizations(&self, url: &str) -> Result<Vec<Organization>, FetchError> {
        info!("Getting organizations from {}", url);
        let request = self.client.get(url);
        self.get_json(url, request).await
    }
}
