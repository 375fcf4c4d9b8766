//! Cronofy API client.
//!
//! [`CronofyClient`] holds only immutable configuration (base URL, token,
//! transport handle), so one instance can serve concurrent callers.
//!
//! ```ignore
//! use cronofy_api::{CallContext, ClientConfig, CronofyClient, EventsRequest};
//!
//! let client = CronofyClient::new(ClientConfig::new(token))?;
//! let ctx = CallContext::background().with_timeout(Duration::from_secs(30));
//! let page = client.list_events(&ctx, &EventsRequest::new()).await?;
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::context::CallContext;
use crate::decode::decode;
use crate::error::{ApiError, ApiResult};
use crate::model::{Calendar, EventsResponse, Pages};
use crate::normalize::normalize_events;
use crate::query::EventsRequest;
use crate::raw_event::{CalendarsEnvelope, EventsEnvelope};
use crate::transport::{ReqwestTransport, Transport, TransportConfig, TransportRequest};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.cronofy.com/v1";

/// Configuration consumed by [`CronofyClient::new`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Bearer token presented on every call.
    pub access_token: String,
    /// Overrides [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,
    /// Pre-built transport; a [`ReqwestTransport`] is built when absent.
    pub transport: Option<Arc<dyn Transport>>,
    /// Timeouts for the default transport.
    pub transport_config: TransportConfig,
}

impl ClientConfig {
    /// Creates a configuration for the given token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: None,
            transport: None,
            transport_config: TransportConfig::default(),
        }
    }

    /// Builder method to override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builder method to supply a transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builder method to tune the default transport.
    pub fn with_transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport.as_ref().map(|_| "<custom>"))
            .field("transport_config", &self.transport_config)
            .finish()
    }
}

/// Client for the calendars and events endpoints.
#[derive(Clone)]
pub struct CronofyClient {
    access_token: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for CronofyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CronofyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CronofyClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Fails if the base URL does not parse or the default transport cannot
    /// be built.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let raw_base = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = raw_base.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|source| ApiError::InvalidUrl {
            url: raw_base.to_string(),
            source,
        })?;

        let transport: Arc<dyn Transport> = match config.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&config.transport_config).map_err(
                |source| ApiError::Transport {
                    operation: "new_client",
                    url: parsed,
                    source,
                },
            )?),
        };

        Ok(Self {
            access_token: config.access_token,
            base_url,
            transport,
        })
    }

    /// Returns the base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists the calendars of every linked profile.
    pub async fn list_calendars(&self, ctx: &CallContext) -> ApiResult<Vec<Calendar>> {
        let url = self.endpoint("/calendars", None)?;
        let envelope: CalendarsEnvelope = self.get(ctx, "list_calendars", url).await?;
        Ok(envelope
            .calendars
            .unwrap_or_default()
            .into_iter()
            .map(Calendar::from)
            .collect())
    }

    /// Lists one page of events matching `request`.
    ///
    /// Pagination is reported in [`EventsResponse::pages`] but not followed;
    /// see [`CronofyClient::next_page`] and [`CronofyClient::list_all_events`].
    pub async fn list_events(
        &self,
        ctx: &CallContext,
        request: &EventsRequest,
    ) -> ApiResult<EventsResponse> {
        let url = self.endpoint("/events", Some(&request.to_query_string()))?;
        let envelope: EventsEnvelope = self.get(ctx, "list_events", url).await?;
        Ok(into_events_response(envelope))
    }

    /// Fetches the page after `pages`, if there is one.
    pub async fn next_page(
        &self,
        ctx: &CallContext,
        pages: &Pages,
    ) -> ApiResult<Option<EventsResponse>> {
        let Some(next) = pages.next_page.as_deref().filter(|next| !next.is_empty()) else {
            return Ok(None);
        };
        let url = Url::parse(next).map_err(|source| ApiError::InvalidUrl {
            url: next.to_string(),
            source,
        })?;
        let envelope: EventsEnvelope = self.get(ctx, "next_page", url).await?;
        Ok(Some(into_events_response(envelope)))
    }

    /// Lists events across every page.
    ///
    /// The returned `pages` describe the last page fetched. A next-page link
    /// that was already visited ends the walk.
    pub async fn list_all_events(
        &self,
        ctx: &CallContext,
        request: &EventsRequest,
    ) -> ApiResult<EventsResponse> {
        let mut combined = self.list_events(ctx, request).await?;
        let mut visited = HashSet::new();

        while let Some(next) = combined.pages.next_page.clone() {
            if !visited.insert(next.clone()) {
                warn!(url = %next, "next page link repeats, stopping");
                break;
            }
            debug!(
                current = combined.pages.current,
                total = combined.pages.total,
                "following next page"
            );
            let Some(page) = self.next_page(ctx, &combined.pages).await? else {
                break;
            };
            combined.pages = page.pages;
            combined.events.extend(page.events);
            combined.failures.extend(page.failures);
        }

        Ok(combined)
    }

    fn endpoint(&self, path: &str, query: Option<&str>) -> ApiResult<Url> {
        let raw = match query {
            Some(query) if !query.is_empty() => format!("{}{}?{}", self.base_url, path, query),
            _ => format!("{}{}", self.base_url, path),
        };
        Url::parse(&raw).map_err(|source| ApiError::InvalidUrl { url: raw, source })
    }

    async fn get<T>(&self, ctx: &CallContext, operation: &'static str, url: Url) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        if ctx.is_cancelled() {
            return Err(ApiError::Cancelled { operation, url });
        }
        debug!(operation, url = %url, "GET");

        let request = TransportRequest::get(url.clone(), &self.access_token);
        let response = ctx
            .run(self.transport.execute(request))
            .await
            .map_err(|interruption| ApiError::interrupted(interruption, operation, url.clone()))?
            .map_err(|source| ApiError::Transport {
                operation,
                url: url.clone(),
                source,
            })?;

        decode(operation, &url, response)
    }
}

fn into_events_response(envelope: EventsEnvelope) -> EventsResponse {
    let (events, failures) = normalize_events(envelope.events.unwrap_or_default());
    EventsResponse {
        pages: envelope.pages.map(Pages::from).unwrap_or_default(),
        events,
        failures,
    }
}
