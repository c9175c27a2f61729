use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::channel_type::ChannelType;
use super::ids::ChannelId;

pub const DEFAULT_GROUP: &str = "default";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    #[default]
    Enabled,
    ManuallyDisabled,
    AutoDisabled,
}

impl ChannelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelStatus::Enabled => "enabled",
            ChannelStatus::ManuallyDisabled => "manually_disabled",
            ChannelStatus::AutoDisabled => "auto_disabled",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, ChannelStatus::Enabled)
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(ChannelStatus::Enabled),
            "manually_disabled" => Ok(ChannelStatus::ManuallyDisabled),
            "auto_disabled" => Ok(ChannelStatus::AutoDisabled),
            other => Err(format!("unknown channel status: {}", other)),
        }
    }
}

/// A configured credential + endpoint for one upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Channel {
    pub id: ChannelId,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub name: String,
    pub key: String,
    pub base_url: Option<String>,
    /// Provider-specific settings, for regional channels the deployment regions
    pub other: String,
    pub status: ChannelStatus,
    pub priority: i64,
    pub weight: u32,
    pub groups: Vec<String>,
    pub models: Vec<String>,
    pub model_mapping: BTreeMap<String, String>,
    pub tag: Option<String>,
    /// Unix seconds
    pub created_time: i64,
    pub test_time: i64,
    pub response_time_ms: i64,
    pub balance: f64,
    pub used_quota: i64,
}

impl Channel {
    pub fn new(channel_type: ChannelType, name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: ChannelId::UNASSIGNED,
            channel_type,
            name: name.into(),
            key: key.into(),
            base_url: None,
            other: String::new(),
            status: ChannelStatus::Enabled,
            priority: 0,
            weight: 0,
            groups: vec![DEFAULT_GROUP.to_string()],
            models: Vec::new(),
            model_mapping: BTreeMap::new(),
            tag: None,
            created_time: Utc::now().timestamp(),
            test_time: 0,
            response_time_ms: 0,
            balance: 0.0,
            used_quota: 0,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = normalize_tag(&tag.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other = other.into();
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// The tag, if the channel belongs to a tag group.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_enabled(&self) -> bool {
        self.status.is_enabled()
    }

    /// Own base URL, falling back to the provider default.
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .or_else(|| self.channel_type.default_base_url())
    }
}

/// Empty tags mean "not grouped".
pub fn normalize_tag(tag: &str) -> Option<String> {
    if tag.trim().is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Splits a comma separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Partial update of a single channel. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelPatch {
    pub channel_type: Option<ChannelType>,
    pub name: Option<String>,
    /// Blank keys are ignored so editors can resubmit a form without the secret
    pub key: Option<String>,
    pub base_url: Option<String>,
    pub other: Option<String>,
    pub status: Option<ChannelStatus>,
    pub priority: Option<i64>,
    pub weight: Option<u32>,
    pub groups: Option<Vec<String>>,
    pub models: Option<Vec<String>>,
    pub model_mapping: Option<BTreeMap<String, String>>,
    pub tag: Option<String>,
}

impl ChannelPatch {
    pub fn apply(&self, channel: &mut Channel) {
        if let Some(channel_type) = self.channel_type {
            channel.channel_type = channel_type;
        }
        if let Some(name) = &self.name {
            channel.name = name.clone();
        }
        if let Some(key) = self.key.as_deref().filter(|k| !k.trim().is_empty()) {
            channel.key = key.to_string();
        }
        if let Some(base_url) = &self.base_url {
            channel.base_url = Some(base_url.clone()).filter(|u| !u.trim().is_empty());
        }
        if let Some(other) = &self.other {
            channel.other = other.clone();
        }
        if let Some(status) = self.status {
            channel.status = status;
        }
        if let Some(priority) = self.priority {
            channel.priority = priority;
        }
        if let Some(weight) = self.weight {
            channel.weight = weight;
        }
        if let Some(groups) = &self.groups {
            channel.groups = groups.clone();
        }
        if let Some(models) = &self.models {
            channel.models = models.clone();
        }
        if let Some(model_mapping) = &self.model_mapping {
            channel.model_mapping = model_mapping.clone();
        }
        if let Some(tag) = &self.tag {
            channel.tag = normalize_tag(tag);
        }
    }
}
