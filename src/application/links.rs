//! Lookup capabilities the CMS provides for turning content into public links.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{CategoryRef, ContentEntity};

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("category `{0}` has no public link")]
    UnknownCategory(Uuid),
    #[error("content `{0}` has no permalink")]
    MissingPermalink(Uuid),
}

#[async_trait]
pub trait ContentLinks: Send + Sync {
    /// Public permalink of a page.
    async fn permalink_of(&self, entity: &ContentEntity) -> Result<String, LinkError>;

    /// Public link of a category listing, used as the URL prefix of its content.
    async fn category_link(&self, category: CategoryRef) -> Result<String, LinkError>;

    /// Every category the content is filed under, in CMS order.
    async fn categories_of(&self, entity: &ContentEntity) -> Result<Vec<CategoryRef>, LinkError>;
}
