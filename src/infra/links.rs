//! Link lookups answered from a CMS-supplied snapshot.
//!
//! The CMS describes a change in one JSON document: the entity, the category
//! picked in the editor (if any), the page permalink, the entity's categories
//! and the public link of every category involved. [`EventDocument`] parses
//! that document and [`SnapshotLinks`] serves the lookups from it.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    application::links::{ContentLinks, LinkError},
    cache::{ChangeKind, ContentChangeEvent},
    domain::{
        entities::{CategoryOverride, CategoryRef, ContentEntity},
        error::DomainError,
    },
};

#[derive(Debug, Error)]
pub enum EventDocumentError {
    #[error("malformed event document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDocument {
    pub entity: ContentEntity,
    #[serde(default)]
    pub category_override: Option<CategoryOverride>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    #[serde(default)]
    pub category_links: HashMap<Uuid, String>,
}

impl EventDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EventDocumentError> {
        let document: Self = serde_json::from_slice(bytes)?;
        document.entity.validate()?;
        Ok(document)
    }

    /// Split the document into the change event and the lookups it answers.
    ///
    /// Deletions ignore any category override in the document.
    pub fn into_event(self, kind: ChangeKind) -> (ContentChangeEvent, SnapshotLinks) {
        let mut links = SnapshotLinks::default().with_categories(self.entity.id, self.categories);
        if let Some(permalink) = self.permalink {
            links = links.with_permalink(self.entity.id, permalink);
        }
        for (category_id, link) in self.category_links {
            links = links.with_category_link(category_id, link);
        }

        let event = match kind {
            ChangeKind::Created => {
                ContentChangeEvent::created(self.entity, self.category_override)
            }
            ChangeKind::Updated => {
                ContentChangeEvent::updated(self.entity, self.category_override)
            }
            ChangeKind::Deleted => ContentChangeEvent::deleted(self.entity),
        };
        (event, links)
    }
}

/// In-memory [`ContentLinks`] implementation.
#[derive(Debug, Clone, Default)]
pub struct SnapshotLinks {
    permalinks: HashMap<Uuid, String>,
    categories: HashMap<Uuid, Vec<CategoryRef>>,
    category_links: HashMap<Uuid, String>,
}

impl SnapshotLinks {
    pub fn with_permalink(mut self, entity_id: Uuid, permalink: impl Into<String>) -> Self {
        self.permalinks.insert(entity_id, permalink.into());
        self
    }

    pub fn with_categories(mut self, entity_id: Uuid, categories: Vec<CategoryRef>) -> Self {
        self.categories.insert(entity_id, categories);
        self
    }

    pub fn with_category_link(mut self, category_id: Uuid, link: impl Into<String>) -> Self {
        self.category_links.insert(category_id, link.into());
        self
    }
}

#[async_trait]
impl ContentLinks for SnapshotLinks {
    async fn permalink_of(&self, entity: &ContentEntity) -> Result<String, LinkError> {
        self.permalinks
            .get(&entity.id)
            .cloned()
            .ok_or(LinkError::MissingPermalink(entity.id))
    }

    async fn category_link(&self, category: CategoryRef) -> Result<String, LinkError> {
        self.category_links
            .get(&category.id)
            .cloned()
            .ok_or(LinkError::UnknownCategory(category.id))
    }

    async fn categories_of(&self, entity: &ContentEntity) -> Result<Vec<CategoryRef>, LinkError> {
        Ok(self.categories.get(&entity.id).cloned().unwrap_or_default())
    }
}
