//! HTTP client for the Catalog Service.
//!
//! Wraps `reqwest` with typed decoding, status mapping and bounded retry.
//! Every request is a plain `GET` with no body and no auth headers.

use std::time::Duration;

use pricepulse_core::{AppConfig, Product, Recommendation};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::CatalogError;
use crate::retry::RetryPolicy;

/// Client for the Catalog Service's `search`, `product` and `recommend`
/// endpoints.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl CatalogClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// `base_url` may carry a path prefix (`https://host/api`); endpoint paths
    /// are appended beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] if `base_url` does not parse as
    /// an absolute URL, or [`CatalogError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so appended segments land under the
        // configured prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| CatalogError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot carry path segments".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            retry: RetryPolicy {
                max_retries,
                backoff_base_ms,
            },
        })
    }

    /// Builds a client from the catalog settings in [`AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(
            &config.catalog_url,
            config.catalog_timeout_secs,
            &config.user_agent,
            config.catalog_max_retries,
            config.catalog_retry_backoff_base_ms,
        )
    }

    /// Runs a free-text search: `GET /search?query={query}`.
    ///
    /// The query is percent-encoded; callers pass it exactly as typed.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Http`] on network failure after all retries.
    /// - [`CatalogError::UnexpectedStatus`] on a non-2xx, non-404 status.
    /// - [`CatalogError::Deserialize`] if the body is not a product list.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        let url = self.build_url(&["search"], &[("query", query)]);
        self.get_json(url, "search").await
    }

    /// Fetches one grouped product: `GET /product/{id}`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if the catalog has no such product.
    /// - otherwise as [`CatalogClient::search`].
    pub async fn product(&self, id: i64) -> Result<Product, CatalogError> {
        let url = self.build_url(&["product", &id.to_string()], &[]);
        self.get_json(url, "product").await
    }

    /// Fetches recommendations for a product: `GET /recommend/{id}`.
    ///
    /// # Errors
    ///
    /// As [`CatalogClient::product`].
    pub async fn recommendations(&self, id: i64) -> Result<Vec<Recommendation>, CatalogError> {
        let url = self.build_url(&["recommend", &id.to_string()], &[]);
        self.get_json(url, "recommend").await
    }

    /// Probes the catalog root (`GET /`). Any 2xx counts as healthy; the
    /// body is ignored. Not retried.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] or [`CatalogError::UnexpectedStatus`]
    /// when the catalog is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), CatalogError> {
        let url = self.base_url.clone();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }

    /// Appends `segments` to the base path and `query` as percent-encoded
    /// pairs.
    fn build_url(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET with retry, maps non-2xx statuses, and decodes the body.
    async fn get_json<T>(&self, url: Url, context: &str) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        let label = url.to_string();
        self.retry.run(context, &label, || {
            let url = url.clone();
            async move {
                tracing::debug!(url = %url, "catalog request");
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();

                if status == StatusCode::NOT_FOUND {
                    return Err(CatalogError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(CatalogError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|e| CatalogError::Deserialize {
                    context: format!("{context} response from {url}"),
                    source: e,
                })
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
