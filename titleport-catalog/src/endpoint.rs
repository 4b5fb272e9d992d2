//! Service endpoint discovery.
//!
//! The title service URL is not configured directly. The configured initial
//! endpoint answers `GET /config/v1/environment` with the service URL to use.
//! Both URLs are validated; the lookup runs on every top-level operation.

use titleport_fetch::{FetchContext, HttpRequest};
use tracing::{debug, error, instrument};
use url::Url;

use crate::error::CatalogError;
use crate::request::{execute, service_url};
use crate::trace::CallSite;

/// Discovery path on the initial endpoint.
const ENVIRONMENT_PATH: &str = "/config/v1/environment";

/// Body field carrying the title service URL.
const SERVICE_URL_FIELD: &str = "titlesServiceUrl";

/// Resolves the title service base URL.
#[derive(Debug, Clone)]
pub struct ServiceEndpointResolver {
    ctx: FetchContext,
}

impl ServiceEndpointResolver {
    /// Creates a resolver using the context's configured endpoint.
    pub fn new(ctx: FetchContext) -> Self {
        Self { ctx }
    }

    /// Resolves the service URL.
    ///
    /// A malformed configured endpoint fails before any request is sent.
    #[instrument(skip(self, token), fields(endpoint = %self.ctx.settings.endpoint))]
    pub async fn resolve(&self, token: &str) -> Result<Url, CatalogError> {
        let result = self.discover(token).await;
        match &result {
            Ok(url) => debug!(service_url = %url, "Resolved title service URL"),
            Err(e) => error!(error = %e, "Failed to resolve title service URL"),
        }
        result
    }

    async fn discover(&self, token: &str) -> Result<Url, CatalogError> {
        let endpoint = &self.ctx.settings.endpoint;
        let initial = Url::parse(endpoint).map_err(|e| {
            CatalogError::Configuration(format!("Invalid service endpoint {endpoint:?}: {e}"))
        })?;

        let request = HttpRequest::get(service_url(&initial, ENVIRONMENT_PATH)?).bearer(token);
        let response = execute(&self.ctx, request, CallSite::General).await?;

        let body = response.json_value();
        let raw = body
            .get(SERVICE_URL_FIELD)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                CatalogError::InvalidResponse(format!("missing `{SERVICE_URL_FIELD}` in response body"))
            })?;

        Url::parse(raw).map_err(|e| {
            CatalogError::InvalidResponse(format!("Invalid title service URL {raw:?}: {e}"))
        })
    }
}
