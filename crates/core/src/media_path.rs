//! Storage path convention for entity media.
//!
//! Every uploaded object lives at `{owner_kind}/{owner_id}/{file_name}`.
//! The owner segment is always the immutable entity id so renaming a venue
//! or event never orphans its media. File names are generated from a
//! UUIDv7 (time-ordered, collision free) plus the original extension.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::staging::MediaKind;
use crate::types::EntityId;

/// Longest extension carried over from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 10;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9]").unwrap_or_else(|e| panic!("invalid extension regex: {e}"))
});

/// The kind of entity that owns a media object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    Venue,
    Event,
}

impl OwnerKind {
    /// Top-level storage prefix for this owner kind.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Venue => "venues",
            Self::Event => "events",
        }
    }

    pub fn from_prefix(prefix: &str) -> Result<Self, CoreError> {
        match prefix {
            "venues" => Ok(Self::Venue),
            "events" => Ok(Self::Event),
            other => Err(CoreError::Validation(format!(
                "Unknown media owner '{other}'. Must be one of: venues, events"
            ))),
        }
    }
}

impl std::fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Directory prefix (with trailing slash) holding all media of one owner.
pub fn owner_prefix(owner: OwnerKind, owner_id: EntityId) -> String {
    format!("{}/{owner_id}/", owner.prefix())
}

/// Lowercased, alphanumeric-only extension of `original_name`, if any.
pub fn extension_of(original_name: &str) -> Option<String> {
    let (stem, ext) = original_name.rsplit_once('.')?;
    if stem.is_empty() {
        // Dotfiles such as ".env" have no extension.
        return None;
    }
    let ext = NON_ALNUM
        .replace_all(&ext.to_lowercase(), "")
        .chars()
        .take(MAX_EXTENSION_LEN)
        .collect::<String>();
    (!ext.is_empty()).then_some(ext)
}

/// Generate a unique object name for an uploaded file.
///
/// Format: `{media_kind}-{uuidv7}[.{ext}]`.
pub fn generate_file_name(kind: MediaKind, original_name: &str) -> String {
    let id = Uuid::now_v7();
    match extension_of(original_name) {
        Some(ext) => format!("{}-{id}.{ext}", kind.as_str()),
        None => format!("{}-{id}", kind.as_str()),
    }
}

/// Full object path for a new upload.
pub fn object_path(
    owner: OwnerKind,
    owner_id: EntityId,
    kind: MediaKind,
    original_name: &str,
) -> String {
    format!(
        "{}{}",
        owner_prefix(owner, owner_id),
        generate_file_name(kind, original_name)
    )
}

/// Resolve an object path to a publicly fetchable URL.
pub fn public_url(public_base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        public_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_keyed_by_id() {
        let id = EntityId::new_v4();
        let path = object_path(OwnerKind::Venue, id, MediaKind::Image, "Front Door.JPG");
        assert!(path.starts_with(&format!("venues/{id}/image-")), "{path}");
        assert!(path.ends_with(".jpg"), "{path}");
    }

    #[test]
    fn event_prefix() {
        let id = EntityId::new_v4();
        assert_eq!(owner_prefix(OwnerKind::Event, id), format!("events/{id}/"));
    }

    #[test]
    fn generated_names_do_not_collide() {
        let a = generate_file_name(MediaKind::Video, "clip.mp4");
        let b = generate_file_name(MediaKind::Video, "clip.mp4");
        assert_ne!(a, b);
        assert!(a.starts_with("video-"));
    }

    #[test]
    fn extension_is_sanitized() {
        assert_eq!(extension_of("photo.PNG").as_deref(), Some("png"));
        assert_eq!(extension_of("weird.j p$g").as_deref(), Some("jpg"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of("no_extension"), None);
        assert_eq!(extension_of(".hidden"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn missing_extension_has_no_dot() {
        let name = generate_file_name(MediaKind::Image, "blob");
        assert!(!name.contains('.'), "{name}");
    }

    #[test]
    fn public_url_joins_cleanly() {
        assert_eq!(
            public_url("https://cdn.example/media/", "/venues/a/b.jpg"),
            "https://cdn.example/media/venues/a/b.jpg"
        );
        assert_eq!(
            public_url("https://cdn.example/media", "events/a/b.jpg"),
            "https://cdn.example/media/events/a/b.jpg"
        );
    }

    #[test]
    fn owner_kind_prefix_round_trip() {
        for kind in [OwnerKind::Venue, OwnerKind::Event] {
            assert_eq!(OwnerKind::from_prefix(kind.prefix()).unwrap(), kind);
        }
        assert!(OwnerKind::from_prefix("venue").is_err());
    }
}
