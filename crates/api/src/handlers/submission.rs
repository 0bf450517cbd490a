//! Multipart submission parsing shared by the venue and event handlers.
//!
//! A submission is one `payload` part holding the draft as JSON plus zero or
//! more `media` file parts. Files are staged under the configured policy;
//! refused files are reported back rather than failing the request.
//! [`run_detached`] then runs the pipeline off the request task.

use std::future::Future;

use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;
use touchgrass_core::staging::{LocalFile, MediaStaging, StagingPolicy, StagingRejection};
use touchgrass_workflow::{SubmissionError, SubmissionReport};
use tracing::Instrument;

use crate::error::{AppError, AppResult};

/// Multipart field carrying the JSON draft.
pub const PAYLOAD_FIELD: &str = "payload";
/// Multipart field name for each media file.
pub const MEDIA_FIELD: &str = "media";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A parsed submission with its media already staged.
pub struct Submission<T> {
    pub draft: T,
    pub staging: MediaStaging,
    pub rejected_files: Vec<StagingRejection>,
}

/// Body returned for a submission that created its entity.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse<T: Serialize> {
    #[serde(flatten)]
    pub report: SubmissionReport<T>,
    /// Files the staging policy refused; never uploaded.
    pub rejected_files: Vec<StagingRejection>,
}

/// Read every part of `multipart`, then stage the media under `policy`.
pub async fn read_submission<T: DeserializeOwned>(
    mut multipart: Multipart,
    policy: &StagingPolicy,
) -> AppResult<Submission<T>> {
    let mut draft = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(PAYLOAD_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("Invalid payload JSON: {e}")))?;
                draft = Some(parsed);
            }
            Some(MEDIA_FIELD) => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                files.push(LocalFile::new(file_name, content_type, bytes.to_vec()));
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    let draft = draft.ok_or_else(|| {
        AppError::BadRequest(format!("Missing '{PAYLOAD_FIELD}' field in multipart body"))
    })?;

    let mut staging = MediaStaging::new(policy.clone());
    let rejected_files = staging.add(files);
    for rejection in &rejected_files {
        tracing::info!(file = %rejection.name, reason = %rejection.reason, "Media not staged");
    }

    Ok(Submission {
        draft,
        staging,
        rejected_files,
    })
}

/// Run a submission pipeline on its own task and wait for it.
///
/// The pipeline is not cancelled when the request future is dropped (request
/// timeout, client disconnect): it runs to completion and its outcome is
/// logged even if nobody is left to receive the response.
pub async fn run_detached<T, F>(pipeline: F) -> AppResult<SubmissionReport<T>>
where
    T: Send + 'static,
    F: Future<Output = Result<SubmissionReport<T>, SubmissionError>> + Send + 'static,
{
    let pipeline = async move {
        let outcome = pipeline.await;
        match &outcome {
            Ok(report) => tracing::debug!(
                state = ?report.state,
                uploaded = report.uploaded_urls.len(),
                failed = report.failed_uploads.len(),
                "Detached submission settled"
            ),
            Err(e) => tracing::debug!(error = %e, "Detached submission rejected"),
        }
        outcome
    };
    let handle = tokio::spawn(pipeline.instrument(tracing::Span::current()));

    match handle.await {
        Ok(outcome) => Ok(outcome?),
        Err(e) => {
            tracing::error!(error = %e, "Submission task aborted");
            Err(AppError::InternalError(format!("Submission task aborted: {e}")))
        }
    }
}
