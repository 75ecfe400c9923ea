use crate::frontmatter::parse_draft;
use crate::routing::{CategoryRouter, RoutingRecommendation};
use chrono::{DateTime, Utc};
use ifrit_monetization::Niche;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("pending import not found: {0}")]
    NotFound(Uuid),

    #[error("pending import {id} already {status}")]
    AlreadyResolved { id: Uuid, status: ImportStatus },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ImportStatus::Pending => "pending",
            ImportStatus::Approved => "approved",
            ImportStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// A dropped draft waiting for an editor to confirm its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingImport {
    pub id: Uuid,
    pub file_name: String,
    pub title: Option<String>,
    pub recommendation: RoutingRecommendation,
    pub status: ImportStatus,
    /// Category the draft was approved into.
    pub category: Option<Niche>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Queue of drafts awaiting review, each routed on arrival.
#[derive(Debug, Default)]
pub struct PendingImports {
    router: CategoryRouter,
    items: Vec<PendingImport>,
}

impl PendingImports {
    #[must_use]
    pub fn new(router: CategoryRouter) -> Self {
        Self {
            router,
            items: Vec::new(),
        }
    }

    /// Parses and routes a draft, then queues it.
    pub fn add(&mut self, file_name: impl Into<String>, source: &str) -> &PendingImport {
        let draft = parse_draft(source);
        let recommendation = self.router.recommend(&draft);
        let item = PendingImport {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            title: draft.title,
            recommendation,
            status: ImportStatus::Pending,
            category: None,
            created_at: Utc::now(),
            resolved_at: None,
        };

        tracing::info!(
            id = %item.id,
            file = %item.file_name,
            category = %item.recommendation.category,
            confidence = item.recommendation.confidence,
            "Queued draft import"
        );

        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    fn pending_mut(&mut self, id: Uuid) -> Result<&mut PendingImport> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(ContentError::NotFound(id))?;
        if item.status != ImportStatus::Pending {
            return Err(ContentError::AlreadyResolved {
                id,
                status: item.status,
            });
        }
        Ok(item)
    }

    /// Approves an import into `category`, or the recommended one when `None`.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `AlreadyResolved` if it was already
    /// approved or rejected.
    pub fn approve(&mut self, id: Uuid, category: Option<Niche>) -> Result<&PendingImport> {
        let item = self.pending_mut(id)?;
        let category = category.unwrap_or(item.recommendation.category);
        item.status = ImportStatus::Approved;
        item.category = Some(category);
        item.resolved_at = Some(Utc::now());
        tracing::info!(%id, %category, "Approved draft import");
        Ok(item)
    }

    /// Rejects an import.
    ///
    /// # Errors
    /// Same as [`PendingImports::approve`].
    pub fn reject(&mut self, id: Uuid) -> Result<&PendingImport> {
        let item = self.pending_mut(id)?;
        item.status = ImportStatus::Rejected;
        item.resolved_at = Some(Utc::now());
        tracing::info!(%id, "Rejected draft import");
        Ok(item)
    }

    /// Imports still awaiting review, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &PendingImport> {
        self.items
            .iter()
            .filter(|i| i.status == ImportStatus::Pending)
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&PendingImport> {
        self.items.iter().find(|i| i.id == id)
    }

    #[must_use]
    pub fn all(&self) -> &[PendingImport] {
        &self.items
    }
}

/// Reads every `*.md` file directly inside `dir`, sorted by file name.
///
/// # Errors
/// Returns `Io` if the directory or a file cannot be read.
pub fn scan_drafts_dir(dir: impl AsRef<Path>) -> Result<Vec<(String, String)>> {
    let dir = dir.as_ref();
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ContentError::Io { path, source }
    };

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err(dir))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e.eq_ignore_ascii_case("md")))
        .collect();
    paths.sort();

    let mut drafts = Vec::with_capacity(paths.len());
    for path in paths {
        let source = std::fs::read_to_string(&path).map_err(io_err(&path))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        drafts.push((file_name, source));
    }

    tracing::debug!(dir = %dir.display(), count = drafts.len(), "Scanned drafts directory");
    Ok(drafts)
}
