//! The HTTP adapter shared by all three providers.
//!
//! [`HttpProvider`] turns a [`Filter`] into one GET request using the
//! provider's [`ProviderProfile`], then decodes the body with the profile's
//! schema.  It never retries and never returns a partial page.
//!
//! ## For contributors
//!
//! Request construction ([`ProviderProfile::query_params`]) and decoding
//! (`decode` in each schema module) are pure functions, so tests exercise
//! them without touching the network.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::profile::{ProviderProfile, QueryMode};
use super::{FetchError, Filter, NewsProvider, Page, Source};

/// A news provider reached over HTTPS.
pub struct HttpProvider {
    profile: &'static ProviderProfile,
    client: reqwest::Client,
    api_key: String,
    /// Overrides [`ProviderProfile::base_url`] for local test servers.
    base_url: Option<String>,
}

impl HttpProvider {
    /// Create an adapter for `source`.
    ///
    /// # Arguments
    ///
    /// * `client`: shared HTTP client; timeouts are configured there.
    /// * `api_key`: the provider's secret, sent as a query parameter.
    pub fn new(source: Source, client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            profile: ProviderProfile::for_source(source),
            client,
            api_key: api_key.into(),
            base_url: None,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Full request URL for `mode`, without query string.
    pub fn endpoint(&self, mode: QueryMode) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or(self.profile.base_url)
            .trim_end_matches('/');
        format!("{base}{}", self.profile.path(mode))
    }
}

#[async_trait]
impl NewsProvider for HttpProvider {
    fn source(&self) -> Source {
        self.profile.source
    }

    #[instrument(skip(self, filter), fields(source = %self.profile.source))]
    async fn fetch_page(&self, filter: &Filter, page: u32) -> Result<Page, FetchError> {
        let source = self.profile.source;
        let mode = QueryMode::for_filter(filter);
        let url = self.endpoint(mode);
        let params = self.profile.query_params(filter, page);
        debug!(%url, ?mode, ?params, "requesting page");

        let response = self
            .client
            .get(&url)
            .query(&[(self.profile.key_param, self.api_key.as_str())])
            .query(&params)
            .send()
            .await
            .map_err(|e| FetchError::transport(source, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "provider returned non-success status");
            return Err(FetchError::status(source, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(source, e.without_url()))?;

        let decoded = (self.profile.decode)(&body, page).map_err(|e| {
            warn!(error = %e, "response did not match provider schema");
            FetchError::decode(source, e)
        })?;

        debug!(
            count = decoded.articles.len(),
            has_more = decoded.has_more,
            "decoded page"
        );
        Ok(decoded)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
