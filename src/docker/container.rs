//! Docker image and container data structures.
//!
//! This module defines the runtime objects the dashboard can display.
//! `DomainObject` is a closed set: every dispatch site matches on it
//! exhaustively.

use chrono::{DateTime, Utc};

/// Number of identifier characters shown in the list view.
pub const SHORT_ID_LEN: usize = 12;

/// Digest prefix Docker puts in front of full image identifiers.
const DIGEST_PREFIX: &str = "sha256:";

/// Returns the display form of a Docker identifier.
///
/// Skips a leading `sha256:` digest prefix and keeps the first
/// [`SHORT_ID_LEN`] characters. The full identifier is never modified.
#[must_use]
pub fn short_id(id: &str) -> &str {
    let id = id.strip_prefix(DIGEST_PREFIX).unwrap_or(id);
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Represents a Docker image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerImage {
    /// Full image ID as reported by Docker.
    pub id: String,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Repository tags (`repository:tag`); empty for dangling images.
    pub names: Vec<String>,
}

impl DockerImage {
    /// Creates a new image.
    ///
    /// # Panics
    /// Panics if `id` is empty.
    #[must_use]
    pub fn new(id: String, created: DateTime<Utc>, names: Vec<String>) -> Self {
        assert!(!id.is_empty(), "image id must not be empty");
        Self { id, created, names }
    }

    /// Returns the identifier truncated for display.
    #[must_use]
    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }

    /// Returns the names joined for a single list cell.
    #[must_use]
    pub fn display_names(&self) -> String {
        self.names.join(", ")
    }
}

/// Represents a Docker container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerContainer {
    /// Full container ID.
    pub id: String,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Container name (without leading slash).
    pub name: String,
    /// Command the container runs.
    pub command: String,
    /// Status text from `docker ps` (e.g. "Up 2 hours").
    pub status: String,
}

impl DockerContainer {
    /// Creates a new container.
    ///
    /// # Panics
    /// Panics if `id` is empty.
    #[must_use]
    pub fn new(
        id: String,
        created: DateTime<Utc>,
        name: String,
        command: String,
        status: String,
    ) -> Self {
        assert!(!id.is_empty(), "container id must not be empty");
        Self {
            id,
            created,
            name: name.trim_start_matches('/').to_string(),
            command,
            status,
        }
    }

    /// Returns the identifier truncated for display.
    #[must_use]
    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }
}

/// A runtime object shown in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainObject {
    /// A Docker image.
    Image(DockerImage),
    /// A Docker container.
    Container(DockerContainer),
}

impl DomainObject {
    /// Returns the full identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Image(image) => &image.id,
            Self::Container(container) => &container.id,
        }
    }

    /// Returns the identifier truncated for display.
    #[must_use]
    pub fn short_id(&self) -> &str {
        short_id(self.id())
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created(&self) -> DateTime<Utc> {
        match self {
            Self::Image(image) => image.created,
            Self::Container(container) => container.created,
        }
    }

    /// Returns a lowercase label for the object kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Container(_) => "container",
        }
    }
}

impl From<DockerImage> for DomainObject {
    fn from(image: DockerImage) -> Self {
        Self::Image(image)
    }
}

impl From<DockerContainer> for DomainObject {
    fn from(container: DockerContainer) -> Self {
        Self::Container(container)
    }
}
