use serde::{Deserialize, Serialize};

use super::channel::Channel;
use super::ids::ChannelId;

/// Routing row derived from a channel: one per (group, model) it serves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ability {
    pub group: String,
    pub model: String,
    pub channel_id: ChannelId,
    pub enabled: bool,
    pub priority: i64,
    pub weight: u32,
    pub tag: Option<String>,
}

impl Ability {
    /// Expand a channel into its ability rows. Duplicate group or model names
    /// collapse to a single row.
    pub fn for_channel(channel: &Channel) -> Vec<Ability> {
        let mut groups: Vec<&str> = channel.groups.iter().map(|g| g.trim()).filter(|g| !g.is_empty()).collect();
        groups.sort_unstable();
        groups.dedup();
        let mut models: Vec<&str> = channel.models.iter().map(|m| m.trim()).filter(|m| !m.is_empty()).collect();
        models.sort_unstable();
        models.dedup();

        let mut abilities = Vec::with_capacity(groups.len() * models.len());
        for group in &groups {
            for model in &models {
                abilities.push(Ability {
                    group: (*group).to_string(),
                    model: (*model).to_string(),
                    channel_id: channel.id,
                    enabled: channel.is_enabled(),
                    priority: channel.priority,
                    weight: channel.weight,
                    tag: channel.tag().map(str::to_string),
                });
            }
        }
        abilities
    }
}
