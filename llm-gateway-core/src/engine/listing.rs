//! Group-aware channel listing.
//!
//! A page that touches any member of a tag group is widened to carry the whole
//! group, so a listing may hold more records than the requested page size.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{Channel, ChannelId};
use crate::error::Result;
use crate::traits::ChannelStore;

/// Fetch one page and complete every tag group it touches.
///
/// The first record seen for a tag is replaced by a fetch of the full group
/// and later records of that tag are dropped, so every listed member of a
/// group comes from the same read. Untagged records are kept individually.
/// Group members already present are not repeated.
pub async fn list_with_tag_groups(
    store: &dyn ChannelStore,
    offset: i64,
    limit: i64,
    id_sort: bool,
) -> Result<Vec<Channel>> {
    let page = store.list_channels(offset, limit, id_sort).await?;
    let page_len = page.len();

    let mut seen_tags: HashSet<String> = HashSet::new();
    let mut individual = Vec::with_capacity(page_len);
    let mut grouped = Vec::new();

    for channel in page {
        match channel.tag() {
            Some(tag) if seen_tags.contains(tag) => {}
            Some(tag) => {
                let members = store.channels_by_tag(tag).await?;
                debug!(tag = %tag, members = members.len(), "expanded tag group");
                grouped.extend(members);
                seen_tags.insert(tag.to_string());
            }
            None => individual.push(channel),
        }
    }

    let merged = merge_tag_groups(individual, grouped);
    debug!(page_len, listed = merged.len(), groups = seen_tags.len(), "listed channels");
    Ok(merged)
}

/// Append group members after the individual records, skipping ids that are
/// already present.
pub fn merge_tag_groups(individual: Vec<Channel>, grouped: Vec<Channel>) -> Vec<Channel> {
    let mut seen: HashSet<ChannelId> = HashSet::with_capacity(individual.len() + grouped.len());
    let mut merged = Vec::with_capacity(individual.len() + grouped.len());

    for channel in individual.into_iter().chain(grouped) {
        if seen.insert(channel.id) {
            merged.push(channel);
        }
    }
    merged
}
