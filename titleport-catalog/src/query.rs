//! Catalog queries.
//!
//! Read-mostly operations against `/catalog/v1/users`. Every call resolves
//! the service URL first.

use serde_json::json;
use titleport_core::{
    ActiveExperienceSet, ElementType, LaunchInfo, MANIFEST_LOOKUP_ELEMENT_TYPES,
    TITLE_LOOKUP_ELEMENT_TYPES, TelemetryEvent, events, properties,
};
use titleport_fetch::{FetchContext, HttpRequest};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::endpoint::ServiceEndpointResolver;
use crate::error::CatalogError;
use crate::request::{execute, resource_url, service_url};
use crate::trace::CallSite;

/// Telemetry component name for catalog events.
pub const TELEMETRY_COMPONENT: &str = "core";

const LAUNCH_INFO_PATH: &str = "/catalog/v1/users/titles/launchInfo";
const TITLES_PATH: &str = "/catalog/v1/users/titles";
const ACQUISITIONS_PATH: &str = "/catalog/v1/users/acquisitions";
const UI_TYPES_PATH: &str = "/catalog/v1/users/uitypes";

/// Queries the title catalog.
#[derive(Debug, Clone)]
pub struct CatalogQueryClient {
    ctx: FetchContext,
    resolver: ServiceEndpointResolver,
}

impl CatalogQueryClient {
    /// Creates a query client.
    pub fn new(ctx: FetchContext) -> Self {
        let resolver = ServiceEndpointResolver::new(ctx.clone());
        Self { ctx, resolver }
    }

    /// Fetches launch info for a manifest id.
    ///
    /// A 404 means the app was never extended to this host and surfaces as
    /// [`CatalogError::NotProvisioned`].
    #[instrument(skip(self, token))]
    pub async fn get_launch_info_by_manifest_id(
        &self,
        token: &str,
        manifest_id: &str,
    ) -> Result<LaunchInfo, CatalogError> {
        let service = self.resolver.resolve(token).await?;
        debug!("Getting launch info by manifest id");

        let body = json!({
            "Id": manifest_id,
            "IdType": "ManifestId",
            "Filter": {
                "SupportedElementTypes": MANIFEST_LOOKUP_ELEMENT_TYPES,
            },
        });
        let request = HttpRequest::post(service_url(&service, LAUNCH_INFO_PATH)?)
            .bearer(token)
            .json(body);

        let response = execute(&self.ctx, request, CallSite::LaunchInfoByManifestId)
            .await
            .inspect_err(|e| error!(error = %e, "Get launch info failed"))?;
        let info = LaunchInfo::new(response.json_value());
        debug!(launch_info = %info.document(), "Launch info received");
        Ok(info)
    }

    /// Returns the title id acquired for a manifest id.
    pub async fn retrieve_title_id(
        &self,
        token: &str,
        manifest_id: &str,
    ) -> Result<Option<String>, CatalogError> {
        let info = self.get_launch_info_by_manifest_id(token, manifest_id).await?;
        let title_id = info.title_id().map(str::to_string);
        debug!(title_id = ?title_id, "Title id");
        Ok(title_id)
    }

    /// Returns the app id acquired for a manifest id.
    pub async fn retrieve_app_id(
        &self,
        token: &str,
        manifest_id: &str,
    ) -> Result<Option<String>, CatalogError> {
        let info = self.get_launch_info_by_manifest_id(token, manifest_id).await?;
        let app_id = info.app_id().map(str::to_string);
        debug!(app_id = ?app_id, "App id");
        Ok(app_id)
    }

    /// Fetches launch info for a title id.
    #[instrument(skip(self, token))]
    pub async fn get_launch_info_by_title_id(
        &self,
        token: &str,
        title_id: &str,
    ) -> Result<LaunchInfo, CatalogError> {
        let service = self.resolver.resolve(token).await?;
        debug!("Getting launch info by title id");

        let url = resource_url(&service, TITLES_PATH, &[title_id, "launchInfo"])?;
        let request = HttpRequest::get(url)
            .query("SupportedElementTypes", &ElementType::join(TITLE_LOOKUP_ELEMENT_TYPES))
            .bearer(token);

        let response = execute(&self.ctx, request, CallSite::General).await?;
        let info = LaunchInfo::new(response.json_value());
        info!(launch_info = %info.document(), "Launch info received");
        Ok(info)
    }

    /// Removes an acquired title from the user's catalog.
    #[instrument(skip(self, token))]
    pub async fn unacquire(&self, token: &str, title_id: &str) -> Result<(), CatalogError> {
        let service = self.resolver.resolve(token).await?;
        debug!("Unacquiring title");

        let url = resource_url(&service, ACQUISITIONS_PATH, &[title_id])?;
        execute(&self.ctx, HttpRequest::delete(url).bearer(token), CallSite::General).await?;

        debug!("Unacquiring done");
        Ok(())
    }

    /// Fetches the experiences active for the user.
    ///
    /// With `ensure_up_to_date`, a response signalling that the service cache
    /// is refreshing is followed by one wait and one refetch.
    #[instrument(skip(self, token))]
    pub async fn get_active_experiences(
        &self,
        token: &str,
        ensure_up_to_date: bool,
    ) -> Result<ActiveExperienceSet, CatalogError> {
        let service = self.resolver.resolve(token).await?;
        let url = service_url(&service, UI_TYPES_PATH)?;

        let mut set = self.fetch_experiences(&url, token).await?;

        if ensure_up_to_date {
            if let Some(delay) = set.refresh_delay() {
                debug!(delay_secs = delay.as_secs_f64(), "Active experiences refreshing, waiting");
                tokio::time::sleep(delay).await;
                set = self.fetch_experiences(&url, token).await?;
            }
        }

        Ok(set)
    }

    async fn fetch_experiences(
        &self,
        url: &Url,
        token: &str,
    ) -> Result<ActiveExperienceSet, CatalogError> {
        let request = HttpRequest::get(url.clone()).bearer(token);
        let response = execute(&self.ctx, request, CallSite::General).await?;
        let set = ActiveExperienceSet::from_body(&response.json_value());
        debug!(
            status = response.status,
            active = ?set.active_experiences,
            "Active experiences"
        );
        Ok(set)
    }

    /// Returns whether Copilot is enabled for the user.
    ///
    /// Never fails: any error is reported to telemetry and yields `None`,
    /// as does a response without an experience list.
    pub async fn get_copilot_status(&self, token: &str, ensure_up_to_date: bool) -> Option<bool> {
        match self.get_active_experiences(token, ensure_up_to_date).await {
            Ok(set) => {
                let allowed = set.copilot_allowed();
                let value = allowed.map_or_else(|| "undefined".to_string(), |a| a.to_string());
                self.ctx.telemetry.send(
                    TelemetryEvent::new(TELEMETRY_COMPONENT, events::CHECK_COPILOT)
                        .with_property(properties::IS_COPILOT_ALLOWED, value),
                );
                allowed
            }
            Err(e) => {
                error!(error = %e, "Failed to get copilot status");
                self.ctx.telemetry.send(
                    TelemetryEvent::new(TELEMETRY_COMPONENT, events::CHECK_COPILOT)
                        .with_error(e.to_string())
                        .with_property(
                            properties::CHECK_COPILOT_TRACING_ID,
                            e.tracing_id().unwrap_or_default(),
                        ),
                );
                None
            }
        }
    }
}
