//! Canonical URL resolution for content entities.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::application::links::{ContentLinks, LinkError};
use crate::domain::entities::{CategoryOverride, CategoryRef, ContentEntity};

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("no category could be determined for content `{entity_id}`")]
    NoCategory { entity_id: Uuid },
    #[error("link lookup for content `{entity_id}` failed: {source}")]
    Lookup {
        entity_id: Uuid,
        #[source]
        source: LinkError,
    },
}

impl ResolutionError {
    fn lookup(entity_id: Uuid, source: LinkError) -> Self {
        Self::Lookup { entity_id, source }
    }
}

#[derive(Clone)]
pub struct UrlResolver {
    links: Arc<dyn ContentLinks>,
}

impl UrlResolver {
    pub fn new(links: Arc<dyn ContentLinks>) -> Self {
        Self { links }
    }

    /// Resolve the public URL an entity is cached under.
    ///
    /// Pages use their permalink and ignore `category_override`. Other content
    /// lives under a category link: the override wins, then the entity's
    /// primary category, then the first category the CMS reports for it.
    pub async fn resolve(
        &self,
        entity: &ContentEntity,
        category_override: Option<&CategoryOverride>,
    ) -> Result<String, ResolutionError> {
        if entity.is_page() {
            return self
                .links
                .permalink_of(entity)
                .await
                .map_err(|err| ResolutionError::lookup(entity.id, err));
        }

        let category = self
            .effective_category(entity, category_override)
            .await?
            .ok_or(ResolutionError::NoCategory {
                entity_id: entity.id,
            })?;

        let category_link = self
            .links
            .category_link(category)
            .await
            .map_err(|err| ResolutionError::lookup(entity.id, err))?;

        Ok(compose_url(&category_link, &entity.slug))
    }

    async fn effective_category(
        &self,
        entity: &ContentEntity,
        category_override: Option<&CategoryOverride>,
    ) -> Result<Option<CategoryRef>, ResolutionError> {
        if let Some(category_override) = category_override {
            return Ok(Some(category_override.category()));
        }
        if let Some(primary) = entity.primary_category {
            return Ok(Some(primary));
        }

        let categories = self
            .links
            .categories_of(entity)
            .await
            .map_err(|err| ResolutionError::lookup(entity.id, err))?;
        debug!(
            entity_id = %entity.id,
            candidates = categories.len(),
            "Falling back to first associated category"
        );
        Ok(categories.into_iter().next())
    }
}

/// Join a category link and a slug with exactly one `/` between them.
pub fn compose_url(category_link: &str, slug: &str) -> String {
    format!(
        "{}/{}",
        category_link.trim_end_matches('/'),
        slug.trim_start_matches('/')
    )
}
