use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::channel::{normalize_tag, Channel};

/// Fields a tag-group edit may change on every member at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TagEdit {
    /// Renames the group; an empty value removes the tag from every member
    pub new_tag: Option<String>,
    pub priority: Option<i64>,
    pub weight: Option<u32>,
    pub model_mapping: Option<BTreeMap<String, String>>,
    pub models: Option<Vec<String>>,
    pub groups: Option<Vec<String>>,
}

impl TagEdit {
    pub fn is_empty(&self) -> bool {
        self.new_tag.is_none()
            && self.priority.is_none()
            && self.weight.is_none()
            && self.model_mapping.is_none()
            && self.models.is_none()
            && self.groups.is_none()
    }

    /// Whether the ability rows of the members must be rebuilt rather than
    /// updated in place.
    pub fn reshapes_abilities(&self) -> bool {
        self.models.is_some() || self.groups.is_some()
    }

    pub fn apply_to(&self, channel: &mut Channel) {
        if let Some(new_tag) = &self.new_tag {
            channel.tag = normalize_tag(new_tag);
        }
        if let Some(priority) = self.priority {
            channel.priority = priority;
        }
        if let Some(weight) = self.weight {
            channel.weight = weight;
        }
        if let Some(model_mapping) = &self.model_mapping {
            channel.model_mapping = model_mapping.clone();
        }
        if let Some(models) = &self.models {
            channel.models = models.clone();
        }
        if let Some(groups) = &self.groups {
            channel.groups = groups.clone();
        }
    }
}
