//! Venue and event submission pipeline.
//!
//! A submission validates the draft, creates the entity, uploads staged media
//! concurrently and finally records the uploaded URLs on the entity. Steps
//! that already succeeded are never undone: a failed upload or a failed
//! media update is reported alongside the created entity.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use touchgrass_core::media_path::OwnerKind;
use touchgrass_core::staging::MediaStaging;
use touchgrass_core::submission::{StateTrace, SubmissionState};
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::{
    validate_event, validate_venue, EventDraft, ValidationFailure, VenueDraft,
};
use touchgrass_db::models::event::EventWithRelations;
use touchgrass_db::models::venue::Venue;
use touchgrass_storage::MediaRepository;

use crate::error::PersistenceError;
use crate::repository::EntityRepository;

/// A staged file whose upload failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpload {
    /// Position of the file in the staging area.
    pub index: usize,
    pub name: String,
    pub error: String,
}

/// Outcome of a submission that got as far as creating the entity.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport<T> {
    pub entity: T,
    /// Public URLs of the uploads that succeeded, in staged order.
    pub uploaded_urls: Vec<String>,
    pub failed_uploads: Vec<FailedUpload>,
    /// Set when the uploads succeeded but recording them on the entity failed.
    pub update_error: Option<String>,
    pub state: SubmissionState,
    pub trace: StateTrace,
}

impl<T> SubmissionReport<T> {
    /// Every step succeeded.
    pub fn is_complete(&self) -> bool {
        self.state == SubmissionState::Done
            && self.failed_uploads.is_empty()
            && self.update_error.is_none()
    }
}

/// A submission that stopped before anything was persisted.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{failure}")]
    Validation {
        failure: ValidationFailure,
        trace: StateTrace,
    },

    #[error("{source}")]
    Persistence {
        source: PersistenceError,
        trace: StateTrace,
    },
}

impl SubmissionError {
    pub fn trace(&self) -> &StateTrace {
        match self {
            Self::Validation { trace, .. } | Self::Persistence { trace, .. } => trace,
        }
    }
}

#[derive(Clone)]
pub struct SubmissionOrchestrator {
    entities: Arc<EntityRepository>,
    media: MediaRepository,
}

impl SubmissionOrchestrator {
    pub fn new(entities: Arc<EntityRepository>, media: MediaRepository) -> Self {
        Self { entities, media }
    }

    pub fn entities(&self) -> &Arc<EntityRepository> {
        &self.entities
    }

    pub fn media(&self) -> &MediaRepository {
        &self.media
    }

    /// Create a venue from `draft` and attach the staged media to it.
    pub async fn submit_venue(
        &self,
        draft: VenueDraft,
        staging: &mut MediaStaging,
    ) -> Result<SubmissionReport<Venue>, SubmissionError> {
        let mut trace = StateTrace::new();

        trace.advance(SubmissionState::Validating);
        let input = match validate_venue(draft) {
            Ok(input) => input,
            Err(failure) => return Err(rejected(failure, trace)),
        };

        trace.advance(SubmissionState::CreatingEntity);
        let venue = match self.entities.create_venue(&input).await {
            Ok(venue) => venue,
            Err(source) => return Err(not_created(source, trace)),
        };

        let (uploaded_urls, failed_uploads) = self
            .upload_staged(OwnerKind::Venue, venue.id, staging, &mut trace)
            .await;

        let mut report = SubmissionReport {
            entity: venue,
            uploaded_urls,
            failed_uploads,
            update_error: None,
            state: trace.current(),
            trace: StateTrace::new(),
        };

        if !report.uploaded_urls.is_empty() {
            trace.advance(SubmissionState::UpdatingEntityWithMedia);
            match self
                .entities
                .set_venue_media(report.entity.id, &report.uploaded_urls)
                .await
            {
                Ok(updated) => report.entity = updated,
                Err(e) => report.update_error = Some(e.to_string()),
            }
        }

        Ok(self.finish(OwnerKind::Venue, report.entity.id, report, trace, staging))
    }

    /// Create an event from `draft` and attach the staged media to it.
    pub async fn submit_event(
        &self,
        draft: EventDraft,
        staging: &mut MediaStaging,
    ) -> Result<SubmissionReport<EventWithRelations>, SubmissionError> {
        let mut trace = StateTrace::new();

        trace.advance(SubmissionState::Validating);
        let input = match validate_event(draft) {
            Ok(input) => input,
            Err(failure) => return Err(rejected(failure, trace)),
        };

        trace.advance(SubmissionState::CreatingEntity);
        let event = match self.entities.create_event(&input).await {
            Ok(event) => event,
            Err(source) => return Err(not_created(source, trace)),
        };
        let event_id = event.event.id;

        let (uploaded_urls, failed_uploads) = self
            .upload_staged(OwnerKind::Event, event_id, staging, &mut trace)
            .await;

        let mut report = SubmissionReport {
            entity: event,
            uploaded_urls,
            failed_uploads,
            update_error: None,
            state: trace.current(),
            trace: StateTrace::new(),
        };

        if !report.uploaded_urls.is_empty() {
            trace.advance(SubmissionState::UpdatingEntityWithMedia);
            match self
                .entities
                .set_event_media(event_id, &report.uploaded_urls)
                .await
            {
                Ok(updated) => report.entity.event = updated,
                Err(e) => report.update_error = Some(e.to_string()),
            }
        }

        Ok(self.finish(OwnerKind::Event, event_id, report, trace, staging))
    }

    /// Upload every staged file concurrently.
    ///
    /// Results come back in staged order; one failure never cancels its
    /// siblings.
    async fn upload_staged(
        &self,
        owner: OwnerKind,
        owner_id: EntityId,
        staging: &MediaStaging,
        trace: &mut StateTrace,
    ) -> (Vec<String>, Vec<FailedUpload>) {
        if staging.is_empty() {
            return (Vec::new(), Vec::new());
        }
        trace.advance(SubmissionState::UploadingMedia);
        tracing::info!(%owner, %owner_id, files = staging.len(), "Uploading staged media");

        let results = join_all(
            staging
                .files()
                .iter()
                .map(|staged| self.media.upload(owner, owner_id, staged)),
        )
        .await;

        let mut urls = Vec::new();
        let mut failures = Vec::new();
        for (index, (staged, result)) in staging.files().iter().zip(results).enumerate() {
            match result {
                Ok(url) => urls.push(url),
                Err(e) => {
                    tracing::warn!(
                        %owner,
                        %owner_id,
                        file = %staged.file.name,
                        error = %e,
                        "Media upload failed"
                    );
                    failures.push(FailedUpload {
                        index,
                        name: staged.file.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        (urls, failures)
    }

    /// Settle the final state; a successful run clears the staging area.
    fn finish<T>(
        &self,
        owner: OwnerKind,
        owner_id: EntityId,
        mut report: SubmissionReport<T>,
        mut trace: StateTrace,
        staging: &mut MediaStaging,
    ) -> SubmissionReport<T> {
        if let Some(error) = &report.update_error {
            tracing::error!(
                %owner,
                %owner_id,
                urls = report.uploaded_urls.len(),
                %error,
                "Recording uploaded media failed; entity and objects kept"
            );
            trace.advance(SubmissionState::Failed);
        } else {
            trace.advance(SubmissionState::Done);
            staging.clear();
        }

        tracing::info!(
            %owner,
            %owner_id,
            state = ?trace.current(),
            uploaded = report.uploaded_urls.len(),
            failed = report.failed_uploads.len(),
            "Submission finished"
        );
        report.state = trace.current();
        report.trace = trace;
        report
    }
}

fn rejected(failure: ValidationFailure, mut trace: StateTrace) -> SubmissionError {
    tracing::debug!(
        violations = failure.violations.len(),
        summary = %failure.summary(),
        "Submission rejected"
    );
    trace.advance(SubmissionState::Idle);
    SubmissionError::Validation { failure, trace }
}

fn not_created(source: PersistenceError, mut trace: StateTrace) -> SubmissionError {
    tracing::warn!(error = %source, "Entity creation failed; nothing uploaded");
    trace.advance(SubmissionState::Idle);
    SubmissionError::Persistence { source, trace }
}
