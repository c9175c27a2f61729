use async_trait::async_trait;
use llm_gateway_core::{
    Ability, Channel, ChannelId, ChannelStatus, ChannelStore, CoreError, Result, SearchFilter,
    TagEdit,
};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    channels: BTreeMap<i64, Channel>,
    next_id: i64,
}

impl Table {
    fn tagged_mut<'a>(&'a mut self, tag: &'a str) -> impl Iterator<Item = &'a mut Channel> + 'a {
        self.channels.values_mut().filter(move |c| c.tag() == Some(tag))
    }
}

/// Channel store held in process memory.
///
/// Every write takes the table's write lock once, so a tag-scoped update is
/// never observed half applied. The ability index is derived on demand.
#[derive(Debug, Default)]
pub struct InMemoryChannelStore {
    table: RwLock<Table>,
}

impl InMemoryChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current ability rows, derived from every stored channel.
    pub async fn abilities(&self) -> Vec<Ability> {
        let table = self.table.read().await;
        table.channels.values().flat_map(Ability::for_channel).collect()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.channels.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn sort_channels(channels: &mut [Channel], id_sort: bool) {
    if id_sort {
        channels.sort_by_key(|c| Reverse(c.id));
    } else {
        channels.sort_by_key(|c| (Reverse(c.priority), Reverse(c.id)));
    }
}

#[async_trait]
impl ChannelStore for InMemoryChannelStore {
    async fn list_channels(&self, offset: i64, limit: i64, id_sort: bool) -> Result<Vec<Channel>> {
        let table = self.table.read().await;
        let mut channels: Vec<Channel> = table.channels.values().cloned().collect();
        sort_channels(&mut channels, id_sort);

        Ok(channels
            .into_iter()
            .skip(usize::try_from(offset.max(0)).unwrap_or(usize::MAX))
            .take(usize::try_from(limit.max(0)).unwrap_or(usize::MAX))
            .collect())
    }

    async fn channels_by_tag(&self, tag: &str) -> Result<Vec<Channel>> {
        let table = self.table.read().await;
        Ok(table
            .channels
            .values()
            .filter(|c| c.tag() == Some(tag))
            .cloned()
            .collect())
    }

    async fn get_channel(&self, id: ChannelId) -> Result<Option<Channel>> {
        Ok(self.table.read().await.channels.get(&id.0).cloned())
    }

    async fn search_channels(&self, filter: &SearchFilter, id_sort: bool) -> Result<Vec<Channel>> {
        let table = self.table.read().await;
        let mut channels: Vec<Channel> = table
            .channels
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        sort_channels(&mut channels, id_sort);
        Ok(channels)
    }

    async fn batch_insert(&self, channels: Vec<Channel>) -> Result<Vec<ChannelId>> {
        let mut table = self.table.write().await;
        let mut ids = Vec::with_capacity(channels.len());

        for mut channel in channels {
            table.next_id += 1;
            channel.id = ChannelId(table.next_id);
            ids.push(channel.id);
            table.channels.insert(channel.id.0, channel);
        }

        Ok(ids)
    }

    async fn batch_delete(&self, ids: &[ChannelId]) -> Result<u64> {
        let mut table = self.table.write().await;
        Ok(ids
            .iter()
            .filter(|id| table.channels.remove(&id.0).is_some())
            .count() as u64)
    }

    async fn delete_disabled(&self) -> Result<u64> {
        let mut table = self.table.write().await;
        let before = table.channels.len();
        table.channels.retain(|_, c| c.status == ChannelStatus::Enabled);
        Ok((before - table.channels.len()) as u64)
    }

    async fn update(&self, channel: &Channel) -> Result<Channel> {
        let mut table = self.table.write().await;
        let stored = table
            .channels
            .get_mut(&channel.id.0)
            .ok_or_else(|| CoreError::NotFound(format!("channel {}", channel.id)))?;

        // Bookkeeping columns are owned by the store.
        let mut updated = channel.clone();
        updated.created_time = stored.created_time;
        updated.test_time = stored.test_time;
        updated.response_time_ms = stored.response_time_ms;
        updated.balance = stored.balance;
        updated.used_quota = stored.used_quota;
        *stored = updated.clone();

        Ok(updated)
    }

    async fn delete(&self, id: ChannelId) -> Result<u64> {
        let mut table = self.table.write().await;
        Ok(u64::from(table.channels.remove(&id.0).is_some()))
    }

    async fn disable_by_tag(&self, tag: &str) -> Result<u64> {
        let mut table = self.table.write().await;
        let mut affected = 0;
        for channel in table.tagged_mut(tag) {
            channel.status = ChannelStatus::ManuallyDisabled;
            affected += 1;
        }
        Ok(affected)
    }

    async fn enable_by_tag(&self, tag: &str) -> Result<u64> {
        let mut table = self.table.write().await;
        let mut affected = 0;
        for channel in table.tagged_mut(tag) {
            channel.status = ChannelStatus::Enabled;
            affected += 1;
        }
        Ok(affected)
    }

    async fn edit_by_tag(&self, tag: &str, edit: &TagEdit) -> Result<u64> {
        if edit.is_empty() {
            return Ok(0);
        }

        let mut table = self.table.write().await;
        let mut affected = 0;
        for channel in table.tagged_mut(tag) {
            edit.apply_to(channel);
            affected += 1;
        }
        Ok(affected)
    }

    async fn repair_abilities(&self) -> Result<u64> {
        Ok(self.table.read().await.channels.len() as u64)
    }
}
