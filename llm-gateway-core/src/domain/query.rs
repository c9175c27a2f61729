use serde::{Deserialize, Serialize};

use super::channel::Channel;

/// Page selection as received from callers, before normalization.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
    pub id_sort: bool,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64, id_sort: bool) -> Self {
        Self { page, page_size, id_sort }
    }

    /// Resolve to `(offset, limit)`. Negative pages start at zero and
    /// non-positive sizes fall back to `default_page_size`.
    pub fn offset_limit(&self, default_page_size: i64) -> (i64, i64) {
        let page = self.page.max(0);
        let limit = if self.page_size > 0 { self.page_size } else { default_page_size.max(1) };
        (page.saturating_mul(limit), limit)
    }
}

/// Channel search criteria. Blank criteria match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchFilter {
    /// Exact id, exact key, or substring of name / base URL
    pub keyword: Option<String>,
    pub group: Option<String>,
    /// Substring of any supported model
    pub model: Option<String>,
}

impl SearchFilter {
    pub fn keyword(&self) -> Option<&str> {
        non_blank(&self.keyword)
    }

    pub fn group(&self) -> Option<&str> {
        non_blank(&self.group)
    }

    pub fn model(&self) -> Option<&str> {
        non_blank(&self.model)
    }

    pub fn matches(&self, channel: &Channel) -> bool {
        if let Some(keyword) = self.keyword() {
            let needle = keyword.to_lowercase();
            let by_id = keyword.parse::<i64>().map(|id| id == channel.id.0).unwrap_or(false);
            let by_name = channel.name.to_lowercase().contains(&needle);
            let by_key = channel.key == keyword;
            let by_url = channel
                .base_url
                .as_deref()
                .map(|u| u.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !(by_id || by_name || by_key || by_url) {
                return false;
            }
        }
        if let Some(group) = self.group() {
            if !channel.groups.iter().any(|g| g == group) {
                return false;
            }
        }
        if let Some(model) = self.model() {
            if !channel.models.iter().any(|m| m.contains(model)) {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
