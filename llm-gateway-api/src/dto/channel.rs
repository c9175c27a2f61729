use llm_gateway_core::{
    Channel, ChannelId, ChannelPatch, ChannelStatus, ChannelType, DEFAULT_GROUP,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::{list_or_csv, mapping_or_json};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateChannelRequest {
    #[serde(rename = "type", default)]
    pub channel_type: ChannelType,
    #[validate(length(max = 255))]
    pub name: String,
    /// One credential per line; regional providers take the value verbatim
    pub key: String,
    pub base_url: Option<String>,
    #[serde(default)]
    pub other: String,
    pub status: Option<ChannelStatus>,
    pub priority: Option<i64>,
    pub weight: Option<u32>,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub groups: Option<Vec<String>>,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub models: Option<Vec<String>>,
    #[serde(default, deserialize_with = "mapping_or_json")]
    pub model_mapping: Option<BTreeMap<String, String>>,
    pub tag: Option<String>,
}

impl CreateChannelRequest {
    /// The record every expanded key is stamped from.
    pub fn into_template(self) -> Channel {
        let mut channel = Channel::new(self.channel_type, self.name, self.key).with_other(self.other);

        if let Some(base_url) = self.base_url.filter(|u| !u.trim().is_empty()) {
            channel = channel.with_base_url(base_url);
        }
        if let Some(tag) = self.tag {
            channel = channel.with_tag(tag);
        }
        if let Some(status) = self.status {
            channel.status = status;
        }
        channel.priority = self.priority.unwrap_or_default();
        channel.weight = self.weight.unwrap_or_default();
        channel.models = self.models.unwrap_or_default();
        channel.model_mapping = self.model_mapping.unwrap_or_default();
        channel.groups = match self.groups {
            Some(groups) if !groups.is_empty() => groups,
            _ => vec![DEFAULT_GROUP.to_string()],
        };

        channel
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateChannelRequest {
    pub id: ChannelId,
    #[serde(rename = "type")]
    pub channel_type: Option<ChannelType>,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub key: Option<String>,
    pub base_url: Option<String>,
    pub other: Option<String>,
    pub status: Option<ChannelStatus>,
    pub priority: Option<i64>,
    pub weight: Option<u32>,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub groups: Option<Vec<String>>,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub models: Option<Vec<String>>,
    #[serde(default, deserialize_with = "mapping_or_json")]
    pub model_mapping: Option<BTreeMap<String, String>>,
    pub tag: Option<String>,
}

impl UpdateChannelRequest {
    pub fn into_patch(self) -> (ChannelId, ChannelPatch) {
        let patch = ChannelPatch {
            channel_type: self.channel_type,
            name: self.name,
            key: self.key,
            base_url: self.base_url,
            other: self.other,
            status: self.status,
            priority: self.priority,
            weight: self.weight,
            groups: self.groups,
            models: self.models,
            model_mapping: self.model_mapping,
            tag: self.tag,
        };
        (self.id, patch)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<ChannelId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedChannels {
    pub count: usize,
    pub ids: Vec<ChannelId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AffectedRows {
    pub count: u64,
}

/// A channel as shown to callers. The credential is never echoed back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelResponse {
    pub id: ChannelId,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub name: String,
    pub base_url: Option<String>,
    pub other: String,
    pub status: ChannelStatus,
    pub priority: i64,
    pub weight: u32,
    pub groups: Vec<String>,
    pub models: Vec<String>,
    pub model_mapping: BTreeMap<String, String>,
    pub tag: Option<String>,
    pub created_time: i64,
    pub test_time: i64,
    pub response_time_ms: i64,
    pub balance: f64,
    pub used_quota: i64,
}

impl From<Channel> for ChannelResponse {
    fn from(channel: Channel) -> Self {
        Self {
            id: channel.id,
            channel_type: channel.channel_type,
            name: channel.name,
            base_url: channel.base_url,
            other: channel.other,
            status: channel.status,
            priority: channel.priority,
            weight: channel.weight,
            groups: channel.groups,
            models: channel.models,
            model_mapping: channel.model_mapping,
            tag: channel.tag,
            created_time: channel.created_time,
            test_time: channel.test_time,
            response_time_ms: channel.response_time_ms,
            balance: channel.balance,
            used_quota: channel.used_quota,
        }
    }
}
