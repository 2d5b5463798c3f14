//! Cache trigger service.
//!
//! Turns content change events into at most one cache manager request each.

use std::sync::Arc;

use cache_bridge_api_types::Operation;
use metrics::counter;
use tracing::{debug, info};

use super::client::InvalidationClient;
use super::events::{ChangeKind, ContentChangeEvent};
use crate::application::resolver::UrlResolver;
use crate::domain::entities::{CategoryOverride, ContentEntity};

/// Every change is sent as `update`, including creations and deletions.
///
/// The cache manager treats `update` as "set the cached state of this URL".
/// Whether creations and deletions should use `add` and `delete` instead has
/// not been confirmed with the service owners.
pub const CHANGE_OPERATION: Operation = Operation::Update;

#[derive(Debug, Clone, Copy)]
enum SkipReason {
    Transient,
    NoOverride,
    Unresolved,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            SkipReason::Transient => "transient",
            SkipReason::NoOverride => "no_override",
            SkipReason::Unresolved => "unresolved",
        }
    }
}

/// Handlers for content creation, update and deletion.
///
/// # Usage
///
/// ```ignore
/// let trigger = CacheTrigger::new(resolver, client);
/// trigger.on_create(&entity, None).await;
/// ```
#[derive(Clone)]
pub struct CacheTrigger {
    resolver: UrlResolver,
    client: Arc<InvalidationClient>,
}

impl CacheTrigger {
    pub fn new(resolver: UrlResolver, client: Arc<InvalidationClient>) -> Self {
        Self { resolver, client }
    }

    /// Route an event to its handler.
    pub async fn dispatch(&self, event: &ContentChangeEvent) -> bool {
        debug!(
            event_id = %event.id,
            event_kind = %event.kind,
            entity_id = %event.entity.id,
            "Content change received"
        );

        match event.kind {
            ChangeKind::Created => {
                self.on_create(&event.entity, event.category_override.as_ref())
                    .await
            }
            ChangeKind::Updated => {
                self.on_update(&event.entity, event.category_override.as_ref())
                    .await
            }
            ChangeKind::Deleted => self.on_delete(&event.entity).await,
        }
    }

    /// Content was created: refresh its URL, honoring a category override.
    pub async fn on_create(
        &self,
        entity: &ContentEntity,
        category_override: Option<&CategoryOverride>,
    ) -> bool {
        if entity.is_transient() {
            return skip(entity, ChangeKind::Created, SkipReason::Transient);
        }
        self.invalidate(entity, category_override, ChangeKind::Created)
            .await
    }

    /// Content was updated: only acts when the editor picked a category,
    /// and resolves the URL with it.
    pub async fn on_update(
        &self,
        entity: &ContentEntity,
        category_override: Option<&CategoryOverride>,
    ) -> bool {
        let Some(category_override) = category_override else {
            return skip(entity, ChangeKind::Updated, SkipReason::NoOverride);
        };
        if entity.is_transient() {
            return skip(entity, ChangeKind::Updated, SkipReason::Transient);
        }
        self.invalidate(entity, Some(category_override), ChangeKind::Updated)
            .await
    }

    /// Content was deleted: refresh the URL resolved from the snapshot alone.
    pub async fn on_delete(&self, entity: &ContentEntity) -> bool {
        if entity.is_transient() {
            return skip(entity, ChangeKind::Deleted, SkipReason::Transient);
        }
        self.invalidate(entity, None, ChangeKind::Deleted).await
    }

    async fn invalidate(
        &self,
        entity: &ContentEntity,
        category_override: Option<&CategoryOverride>,
        kind: ChangeKind,
    ) -> bool {
        let url = match self.resolver.resolve(entity, category_override).await {
            Ok(url) => url,
            Err(err) => {
                info!(
                    entity_id = %entity.id,
                    event_kind = %kind,
                    error = %err,
                    "Cache invalidation skipped: URL could not be resolved"
                );
                counter!(
                    "cache_bridge_event_skipped_total",
                    "reason" => SkipReason::Unresolved.as_str()
                )
                .increment(1);
                return false;
            }
        };

        self.client.post(CHANGE_OPERATION, &url).await
    }

    pub fn client(&self) -> &Arc<InvalidationClient> {
        &self.client
    }
}

fn skip(entity: &ContentEntity, kind: ChangeKind, reason: SkipReason) -> bool {
    debug!(
        entity_id = %entity.id,
        event_kind = %kind,
        lifecycle_state = entity.lifecycle_state.as_str(),
        reason = reason.as_str(),
        "Cache invalidation skipped"
    );
    counter!("cache_bridge_event_skipped_total", "reason" => reason.as_str()).increment(1);
    false
}
