use async_trait::async_trait;

use crate::domain::{Channel, ChannelId, SearchFilter, TagEdit};
use crate::error::{Result, UpstreamError};

/// Durable storage for channel records.
///
/// Tag-scoped writes (`disable_by_tag`, `enable_by_tag`, `edit_by_tag`) must be
/// applied to the whole matching set as one logical operation: a reader either
/// sees every member updated or none of them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// One page of channels, ordered by id desc when `id_sort`, else by
    /// priority desc then id desc.
    async fn list_channels(&self, offset: i64, limit: i64, id_sort: bool) -> Result<Vec<Channel>>;

    /// Every channel carrying `tag`, regardless of paging.
    async fn channels_by_tag(&self, tag: &str) -> Result<Vec<Channel>>;

    async fn get_channel(&self, id: ChannelId) -> Result<Option<Channel>>;

    async fn search_channels(&self, filter: &SearchFilter, id_sort: bool) -> Result<Vec<Channel>>;

    /// Insert all records or none. Returns the assigned ids in input order.
    async fn batch_insert(&self, channels: Vec<Channel>) -> Result<Vec<ChannelId>>;

    async fn batch_delete(&self, ids: &[ChannelId]) -> Result<u64>;

    /// Remove every channel whose status is not `enabled`.
    async fn delete_disabled(&self) -> Result<u64>;

    async fn update(&self, channel: &Channel) -> Result<Channel>;

    async fn delete(&self, id: ChannelId) -> Result<u64>;

    async fn disable_by_tag(&self, tag: &str) -> Result<u64>;

    async fn enable_by_tag(&self, tag: &str) -> Result<u64>;

    async fn edit_by_tag(&self, tag: &str, edit: &TagEdit) -> Result<u64>;

    /// Rebuild the ability index from the channel table; returns channels indexed.
    async fn repair_abilities(&self) -> Result<u64>;
}

/// Read-only access to a provider's model listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn list_models(&self, base_url: &str, key: &str) -> std::result::Result<Vec<String>, UpstreamError>;
}
