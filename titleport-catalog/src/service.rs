//! Package service facade.
//!
//! [`PackageService`] composes endpoint discovery, upload, polling and the
//! catalog queries behind one value built from a [`FetchContext`].

use std::future::Future;
use std::path::Path;

use titleport_core::{ActiveExperienceSet, LaunchInfo, TitleRecord, UploadResponse};
use titleport_fetch::{FetchContext, RetryPolicy};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::endpoint::ServiceEndpointResolver;
use crate::error::CatalogError;
use crate::poller::AcquisitionPoller;
use crate::query::CatalogQueryClient;
use crate::upload::PackageUploader;
use crate::validate::check_zip_bytes;

/// Client for the title service.
#[derive(Debug, Clone)]
pub struct PackageService {
    ctx: FetchContext,
    resolver: ServiceEndpointResolver,
    uploader: PackageUploader,
    poller: AcquisitionPoller,
    queries: CatalogQueryClient,
}

impl PackageService {
    /// Creates a service client.
    pub fn new(ctx: FetchContext) -> Self {
        Self {
            resolver: ServiceEndpointResolver::new(ctx.clone()),
            uploader: PackageUploader::new(ctx.clone()),
            poller: AcquisitionPoller::new(ctx.clone()),
            queries: CatalogQueryClient::new(ctx.clone()),
            ctx,
        }
    }

    /// Returns the context this service was built from.
    pub fn context(&self) -> &FetchContext {
        &self.ctx
    }

    /// Returns the configured retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.ctx.settings.retry
    }

    /// Runs `operation` under the configured retry policy.
    pub async fn with_retry<T, F, Fut>(&self, operation: F) -> Result<T, CatalogError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        self.ctx.settings.retry.run(operation).await
    }

    /// Resolves the title service URL.
    pub async fn title_service_url(&self, token: &str) -> Result<Url, CatalogError> {
        self.resolver.resolve(token).await
    }

    // ========================================================================
    // Sideloading
    // ========================================================================

    /// Sideloads an XML add-in manifest.
    ///
    /// The file is read before the service URL is resolved, so a missing
    /// file sends no request.
    #[instrument(skip(self, token), fields(path = %path.display()))]
    pub async fn sideload_xml_manifest(
        &self,
        token: &str,
        path: &Path,
    ) -> Result<TitleRecord, CatalogError> {
        let bytes = read_package(path).await?;
        let service = self.resolver.resolve(token).await?;
        info!("Sideloading XML manifest");

        let upload = self
            .uploader
            .upload_manifest(&service, token, &file_name(path), bytes)
            .await?;

        let record = match upload {
            UploadResponse::Immediate(record) => record,
            UploadResponse::Deferred(job) => {
                debug!(status_id = job.as_str(), "Acquiring package");
                self.poller
                    .wait_for_title(&service, token, job.as_str())
                    .await?
            }
            UploadResponse::Unexpected(status) => {
                return Err(CatalogError::UnexpectedResponse { status });
            }
        };

        log_title(&record);
        Ok(record)
    }

    /// Sideloads a zip app package.
    ///
    /// The archive is checked before anything is sent; a failed check is
    /// logged and the upload goes ahead.
    #[instrument(skip(self, token), fields(path = %path.display()))]
    pub async fn sideload_package(
        &self,
        token: &str,
        path: &Path,
    ) -> Result<TitleRecord, CatalogError> {
        let bytes = read_package(path).await?;
        match check_zip_bytes(&bytes) {
            Ok(entries) => debug!(entries, "Package archive looks valid"),
            Err(e) => warn!(error = %e, "Package validation failed, uploading anyway"),
        }

        let service = self.resolver.resolve(token).await?;
        info!("Sideloading app package");

        let operation = self
            .uploader
            .upload_package(&service, token, &file_name(path), bytes)
            .await?;
        let status_id = self
            .uploader
            .start_acquisition(&service, token, operation.as_str())
            .await?;

        let record = self
            .poller
            .wait_for_title(&service, token, status_id.as_str())
            .await?;
        log_title(&record);
        Ok(record)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Fetches launch info for a manifest id.
    pub async fn get_launch_info_by_manifest_id(
        &self,
        token: &str,
        manifest_id: &str,
    ) -> Result<LaunchInfo, CatalogError> {
        self.queries
            .get_launch_info_by_manifest_id(token, manifest_id)
            .await
    }

    /// Returns the title id acquired for a manifest id.
    pub async fn retrieve_title_id(
        &self,
        token: &str,
        manifest_id: &str,
    ) -> Result<Option<String>, CatalogError> {
        self.queries.retrieve_title_id(token, manifest_id).await
    }

    /// Returns the app id acquired for a manifest id.
    pub async fn retrieve_app_id(
        &self,
        token: &str,
        manifest_id: &str,
    ) -> Result<Option<String>, CatalogError> {
        self.queries.retrieve_app_id(token, manifest_id).await
    }

    /// Fetches launch info for a title id.
    pub async fn get_launch_info_by_title_id(
        &self,
        token: &str,
        title_id: &str,
    ) -> Result<LaunchInfo, CatalogError> {
        self.queries.get_launch_info_by_title_id(token, title_id).await
    }

    /// Removes an acquired title.
    pub async fn unacquire(&self, token: &str, title_id: &str) -> Result<(), CatalogError> {
        self.queries.unacquire(token, title_id).await
    }

    /// Fetches the experiences active for the user.
    pub async fn get_active_experiences(
        &self,
        token: &str,
        ensure_up_to_date: bool,
    ) -> Result<ActiveExperienceSet, CatalogError> {
        self.queries
            .get_active_experiences(token, ensure_up_to_date)
            .await
    }

    /// Returns whether Copilot is enabled; `None` when unknown.
    pub async fn get_copilot_status(&self, token: &str, ensure_up_to_date: bool) -> Option<bool> {
        self.queries
            .get_copilot_status(token, ensure_up_to_date)
            .await
    }
}

async fn read_package(path: &Path) -> Result<Vec<u8>, CatalogError> {
    tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| "package".to_string(), |n| n.to_string_lossy().into_owned())
}

fn log_title(record: &TitleRecord) {
    info!(title_id = %record.title_id, app_id = %record.app_id, "Sideloading done");
}
