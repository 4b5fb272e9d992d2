//! Package upload.
//!
//! ## Endpoints
//!
//! | Step | Request | Answer |
//! |------|---------|--------|
//! | XML manifest | `POST /dev/v1/users/packages/addins` | 200 `{titleId, appId}` or 202 `{statusId}` |
//! | Zip package | `POST /dev/v1/users/packages` | `{operationId}` |
//! | Acquisition | `POST /dev/v1/users/packages/acquisitions` | `{statusId}` |
//!
//! Uploads are multipart forms with a `package` file part. The manifest
//! upload also names its `culture` and sends as `application/xml`.

use serde_json::json;
use titleport_core::{JobToken, UploadResponse};
use titleport_fetch::{FetchContext, HttpRequest, MultipartForm};
use tracing::{debug, instrument};
use url::Url;

use crate::error::CatalogError;
use crate::request::{execute, service_url};
use crate::trace::CallSite;

const MANIFEST_UPLOAD_PATH: &str = "/dev/v1/users/packages/addins";
const PACKAGE_UPLOAD_PATH: &str = "/dev/v1/users/packages";
const ACQUISITION_PATH: &str = "/dev/v1/users/packages/acquisitions";

/// Form field holding the package bytes.
const PACKAGE_FIELD: &str = "package";

/// Culture sent with every upload.
const UPLOAD_CULTURE: &str = "en-us";

/// Content type of an XML manifest upload.
const XML_CONTENT_TYPE: &str = "application/xml";

/// Submits package bytes to the title service.
#[derive(Debug, Clone)]
pub struct PackageUploader {
    ctx: FetchContext,
}

impl PackageUploader {
    /// Creates an uploader.
    pub fn new(ctx: FetchContext) -> Self {
        Self { ctx }
    }

    /// Uploads an XML add-in manifest.
    ///
    /// Returns [`UploadResponse::Immediate`] on 200 and a status token on
    /// 202; any other success status is [`UploadResponse::Unexpected`].
    #[instrument(skip(self, token, bytes), fields(size = bytes.len()))]
    pub async fn upload_manifest(
        &self,
        service: &Url,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, CatalogError> {
        debug!("Uploading XML manifest");
        let form = package_form(file_name, bytes)
            .text("culture", UPLOAD_CULTURE)
            .with_content_type(XML_CONTENT_TYPE);
        let request = HttpRequest::post(service_url(service, MANIFEST_UPLOAD_PATH)?)
            .bearer(token)
            .multipart(form);

        let response = execute(&self.ctx, request, CallSite::General).await?;
        let upload = UploadResponse::from_manifest_upload(response.status, &response.json_value())?;
        debug!(status = response.status, terminal = upload.is_terminal(), "Manifest uploaded");
        Ok(upload)
    }

    /// Uploads a zip package.
    ///
    /// Returns the operation token to start the acquisition with.
    #[instrument(skip(self, token, bytes), fields(size = bytes.len()))]
    pub async fn upload_package(
        &self,
        service: &Url,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<JobToken, CatalogError> {
        let request = HttpRequest::post(service_url(service, PACKAGE_UPLOAD_PATH)?)
            .bearer(token)
            .multipart(package_form(file_name, bytes));

        let response = execute(&self.ctx, request, CallSite::General).await?;
        let operation = JobToken::operation_from_body(&response.json_value())?;
        debug!(operation_id = operation.as_str(), "Package uploaded");
        Ok(operation)
    }

    /// Starts the acquisition of an uploaded package.
    ///
    /// Returns the status token to poll.
    #[instrument(skip(self, token))]
    pub async fn start_acquisition(
        &self,
        service: &Url,
        token: &str,
        operation_id: &str,
    ) -> Result<JobToken, CatalogError> {
        let request = HttpRequest::post(service_url(service, ACQUISITION_PATH)?)
            .bearer(token)
            .json(json!({ "operationId": operation_id }));

        let response = execute(&self.ctx, request, CallSite::General).await?;
        let status = JobToken::status_from_body(&response.json_value())?;
        debug!(status_id = status.as_str(), "Acquiring package");
        Ok(status)
    }
}

fn package_form(file_name: &str, bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().file(PACKAGE_FIELD, file_name, bytes)
}
