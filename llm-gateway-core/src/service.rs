//! Operation surface over the channel store.
//!
//! Each public method is one exposed operation. The service keeps no state of
//! its own besides handles to its collaborators, so it is cheap to clone into
//! every request.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{Channel, ChannelId, ChannelPatch, PageRequest, SearchFilter, TagEdit};
use crate::engine;
use crate::error::{CoreError, Result};
use crate::expansion::expand_keys;
use crate::traits::{ChannelStore, UpstreamClient};
use crate::validation::validate_provider_config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Page size used when a listing request does not give a usable one
    pub default_page_size: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { default_page_size: 10 }
    }
}

#[derive(Clone)]
pub struct ChannelService {
    store: Arc<dyn ChannelStore>,
    upstream: Arc<dyn UpstreamClient>,
    config: ServiceConfig,
}

impl ChannelService {
    pub fn new(store: Arc<dyn ChannelStore>, upstream: Arc<dyn UpstreamClient>, config: ServiceConfig) -> Self {
        Self { store, upstream, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// List one page, widened so every tag group it touches is complete.
    pub async fn list_channels(&self, page: PageRequest) -> Result<Vec<Channel>> {
        let (offset, limit) = page.offset_limit(self.config.default_page_size);
        engine::list_with_tag_groups(self.store.as_ref(), offset, limit, page.id_sort).await
    }

    pub async fn search_channels(&self, filter: &SearchFilter, id_sort: bool) -> Result<Vec<Channel>> {
        let channels = self.store.search_channels(filter, id_sort).await?;
        debug!(?filter, found = channels.len(), "searched channels");
        Ok(channels)
    }

    pub async fn get_channel(&self, id: ChannelId) -> Result<Channel> {
        self.store
            .get_channel(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("channel {}", id)))
    }

    /// Create one channel per key found in `template.key`.
    ///
    /// All records share the template's configuration and one creation time,
    /// and are written in a single batch. Returns the new ids.
    pub async fn create_channels(&self, template: Channel) -> Result<Vec<ChannelId>> {
        validate_provider_config(&template)?;

        let keys = expand_keys(&template.key, template.channel_type);
        if keys.is_empty() {
            info!(channel_type = %template.channel_type, "no usable key submitted, nothing created");
            return Ok(Vec::new());
        }

        let created_time = Utc::now().timestamp();
        let records: Vec<Channel> = keys
            .into_iter()
            .map(|key| Channel {
                id: ChannelId::UNASSIGNED,
                key,
                created_time,
                ..template.clone()
            })
            .collect();

        let ids = self.store.batch_insert(records).await?;
        info!(
            channel_type = %template.channel_type,
            created = ids.len(),
            tag = ?template.tag(),
            "created channels"
        );
        Ok(ids)
    }

    /// Merge `patch` into the stored channel, validate, and persist it.
    pub async fn update_channel(&self, id: ChannelId, patch: &ChannelPatch) -> Result<Channel> {
        let mut channel = self.get_channel(id).await?;
        patch.apply(&mut channel);
        validate_provider_config(&channel)?;

        let updated = self.store.update(&channel).await?;
        info!(channel_id = %id, "updated channel");
        Ok(updated)
    }

    pub async fn delete_channel(&self, id: ChannelId) -> Result<()> {
        let deleted = self.store.delete(id).await?;
        if deleted == 0 {
            return Err(CoreError::NotFound(format!("channel {}", id)));
        }
        info!(channel_id = %id, "deleted channel");
        Ok(())
    }

    pub async fn delete_channels(&self, ids: &[ChannelId]) -> Result<u64> {
        if ids.is_empty() {
            return Err(CoreError::InvalidArgument("ids must not be empty".to_string()));
        }
        let deleted = self.store.batch_delete(ids).await?;
        info!(requested = ids.len(), deleted, "batch deleted channels");
        Ok(deleted)
    }

    pub async fn delete_disabled_channels(&self) -> Result<u64> {
        let deleted = self.store.delete_disabled().await?;
        info!(deleted, "deleted disabled channels");
        Ok(deleted)
    }

    pub async fn disable_tag(&self, tag: &str) -> Result<u64> {
        engine::disable_tag(self.store.as_ref(), tag).await
    }

    pub async fn enable_tag(&self, tag: &str) -> Result<u64> {
        engine::enable_tag(self.store.as_ref(), tag).await
    }

    pub async fn edit_tag(&self, tag: &str, edit: &TagEdit) -> Result<u64> {
        engine::edit_tag(self.store.as_ref(), tag, edit).await
    }

    pub async fn fetch_upstream_models(&self, id: ChannelId) -> Result<Vec<String>> {
        engine::discover_models(self.store.as_ref(), self.upstream.as_ref(), id).await
    }

    pub async fn repair_abilities(&self) -> Result<u64> {
        let indexed = self.store.repair_abilities().await?;
        info!(indexed, "rebuilt ability index");
        Ok(indexed)
    }
}
