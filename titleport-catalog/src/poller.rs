//! Acquisition status polling.
//!
//! ## Flow
//!
//! 1. `GET /dev/v1/users/packages/status/{statusId}`
//! 2. 200: the body names the acquired title, done
//! 3. Any other success status: still pending, wait and go to 1
//!
//! Error statuses end the loop with a normalized fault. The loop is bounded
//! by `max_polls`; running out yields [`CatalogError::DeadlineExceeded`].

use std::num::NonZeroU32;
use std::time::Duration;

use titleport_core::TitleRecord;
use titleport_fetch::{FetchContext, HttpRequest};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::CatalogError;
use crate::request::{execute, resource_url};
use crate::trace::CallSite;

const STATUS_PATH: &str = "/dev/v1/users/packages/status";

/// Result of a single status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// The acquisition finished.
    Complete(TitleRecord),
    /// Still in progress; carries the status code received.
    Pending(u16),
}

/// Polls an acquisition until the title exists.
#[derive(Debug, Clone)]
pub struct AcquisitionPoller {
    ctx: FetchContext,
    interval: Duration,
    max_polls: NonZeroU32,
}

impl AcquisitionPoller {
    /// Creates a poller using the context's polling settings.
    pub fn new(ctx: FetchContext) -> Self {
        let interval = ctx.settings.poll_interval;
        let max_polls = ctx.settings.max_polls;
        Self {
            ctx,
            interval,
            max_polls,
        }
    }

    /// Performs one status check.
    pub async fn check(
        &self,
        service: &Url,
        token: &str,
        status_id: &str,
    ) -> Result<PollStatus, CatalogError> {
        let url = resource_url(service, STATUS_PATH, &[status_id])?;
        let response = execute(&self.ctx, HttpRequest::get(url).bearer(token), CallSite::General).await?;
        debug!(status = response.status, "Package status");

        if response.status == 200 {
            let record = TitleRecord::from_body(&response.json_value())?;
            Ok(PollStatus::Complete(record))
        } else {
            Ok(PollStatus::Pending(response.status))
        }
    }

    /// Polls until the acquisition completes.
    ///
    /// Sleeps the poll interval between checks, never after the last one.
    #[instrument(skip(self, service, token))]
    pub async fn wait_for_title(
        &self,
        service: &Url,
        token: &str,
        status_id: &str,
    ) -> Result<TitleRecord, CatalogError> {
        let max_polls = self.max_polls.get();

        for poll in 1..=max_polls {
            match self.check(service, token, status_id).await? {
                PollStatus::Complete(record) => {
                    info!(title_id = %record.title_id, app_id = %record.app_id, "Acquisition complete");
                    return Ok(record);
                }
                PollStatus::Pending(status) => {
                    debug!(poll, status, "Acquisition pending");
                }
            }
            if poll < max_polls {
                tokio::time::sleep(self.interval).await;
            }
        }

        warn!(polls = max_polls, "Acquisition did not complete");
        Err(CatalogError::DeadlineExceeded {
            status_id: status_id.to_string(),
            polls: max_polls,
        })
    }
}
