//! In-memory holding area for media selected before a submission.
//!
//! Each staged file gets a preview handle when it is added; the handle stays
//! live until the file is removed or the staging area is cleared. Insertion
//! order is preserved and is the order uploaded URLs are reported in.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

/// Default per-file limit (5 MB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5_000_000;

/// Broad media category derived from a declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `image/*` is an image; everything else is treated as video.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
        {
            Self::Image
        } else {
            Self::Video
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// A file picked by the user, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Opaque handle to a locally created preview of a staged file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    fn issue() -> Self {
        Self(format!("preview:{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct StagedFile {
    pub file: LocalFile,
    pub kind: MediaKind,
    pub preview: PreviewHandle,
}

/// Size and type limits applied when files are staged.
///
/// `None` disables the corresponding check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingPolicy {
    pub max_file_bytes: Option<u64>,
    pub accepted_content_types: Option<Vec<String>>,
}

impl Default for StagingPolicy {
    fn default() -> Self {
        Self {
            max_file_bytes: Some(DEFAULT_MAX_FILE_BYTES),
            accepted_content_types: None,
        }
    }
}

impl StagingPolicy {
    /// A policy that accepts everything.
    pub fn unrestricted() -> Self {
        Self {
            max_file_bytes: None,
            accepted_content_types: None,
        }
    }

    /// Why `file` is not allowed, or `None` if it is.
    pub fn check(&self, file: &LocalFile) -> Option<String> {
        if let Some(max) = self.max_file_bytes {
            if file.size() > max {
                return Some(format!(
                    "File is {} bytes, larger than the {max} byte limit",
                    file.size()
                ));
            }
        }
        if let Some(accepted) = &self.accepted_content_types {
            let content_type = file.content_type.trim().to_ascii_lowercase();
            if !accepted.iter().any(|a| a.eq_ignore_ascii_case(&content_type)) {
                return Some(format!(
                    "Content type '{}' is not accepted",
                    file.content_type
                ));
            }
        }
        None
    }
}

/// A file the policy refused to stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagingRejection {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct MediaStaging {
    policy: StagingPolicy,
    files: Vec<StagedFile>,
    live_previews: HashSet<PreviewHandle>,
}

impl MediaStaging {
    pub fn new(policy: StagingPolicy) -> Self {
        Self {
            policy,
            files: Vec::new(),
            live_previews: HashSet::new(),
        }
    }

    /// Stage every acceptable file, returning the ones the policy refused.
    pub fn add(&mut self, files: impl IntoIterator<Item = LocalFile>) -> Vec<StagingRejection> {
        let mut rejected = Vec::new();
        for file in files {
            if let Some(reason) = self.policy.check(&file) {
                rejected.push(StagingRejection {
                    name: file.name,
                    reason,
                });
                continue;
            }
            let preview = PreviewHandle::issue();
            self.live_previews.insert(preview.clone());
            self.files.push(StagedFile {
                kind: MediaKind::from_content_type(&file.content_type),
                file,
                preview,
            });
        }
        rejected
    }

    /// Evict the file at `index` and release its preview handle.
    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        if index >= self.files.len() {
            return None;
        }
        let staged = self.files.remove(index);
        self.live_previews.remove(&staged.preview);
        Some(staged)
    }

    /// Drop every staged file and release all preview handles.
    pub fn clear(&mut self) {
        self.files.clear();
        self.live_previews.clear();
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn policy(&self) -> &StagingPolicy {
        &self.policy
    }

    pub fn is_preview_live(&self, handle: &PreviewHandle) -> bool {
        self.live_previews.contains(handle)
    }

    pub fn live_preview_count(&self) -> usize {
        self.live_previews.len()
    }
}
