//! Content change events delivered by the CMS.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{CategoryOverride, ContentEntity};

/// What happened to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single content change, carrying the full entity snapshot and any
/// category chosen alongside the change.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentChangeEvent {
    /// Correlates log lines for one event.
    pub id: Uuid,
    pub kind: ChangeKind,
    pub entity: ContentEntity,
    pub category_override: Option<CategoryOverride>,
}

impl ContentChangeEvent {
    pub fn new(
        kind: ChangeKind,
        entity: ContentEntity,
        category_override: Option<CategoryOverride>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            entity,
            category_override,
        }
    }

    pub fn created(entity: ContentEntity, category_override: Option<CategoryOverride>) -> Self {
        Self::new(ChangeKind::Created, entity, category_override)
    }

    pub fn updated(entity: ContentEntity, category_override: Option<CategoryOverride>) -> Self {
        Self::new(ChangeKind::Updated, entity, category_override)
    }

    pub fn deleted(entity: ContentEntity) -> Self {
        Self::new(ChangeKind::Deleted, entity, None)
    }
}
