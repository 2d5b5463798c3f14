//! Content snapshots received from the CMS. The bridge reads them and never
//! writes them back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    error::DomainError,
    types::{ContentType, LifecycleState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
}

impl CategoryRef {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Category chosen explicitly alongside a change event, e.g. from the
/// editor form that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryOverride(CategoryRef);

impl CategoryOverride {
    pub fn new(id: Uuid) -> Self {
        Self(CategoryRef::new(id))
    }

    pub fn category(&self) -> CategoryRef {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntity {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub slug: String,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub primary_category: Option<CategoryRef>,
}

impl ContentEntity {
    pub fn is_page(&self) -> bool {
        self.content_type.is_page()
    }

    pub fn is_transient(&self) -> bool {
        self.lifecycle_state.is_transient()
    }

    /// Reject snapshots whose slug cannot form a URL segment.
    /// Pages and transient snapshots are accepted with any slug.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_page() || self.is_transient() {
            return Ok(());
        }
        let slug = self.slug.trim();
        if slug.is_empty() {
            return Err(DomainError::validation("content slug must not be empty"));
        }
        if slug.contains(char::is_whitespace) {
            return Err(DomainError::validation(format!(
                "content slug `{slug}` must not contain whitespace"
            )));
        }
        Ok(())
    }
}
