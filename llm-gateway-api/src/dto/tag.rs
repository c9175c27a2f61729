use llm_gateway_core::TagEdit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::{list_or_csv, mapping_or_json};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(length(min = 1))]
    pub tag: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct EditTagRequest {
    #[validate(length(min = 1))]
    pub tag: String,
    /// Empty string ungroups every member
    pub new_tag: Option<String>,
    pub priority: Option<i64>,
    pub weight: Option<u32>,
    #[serde(default, deserialize_with = "mapping_or_json")]
    pub model_mapping: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub models: Option<Vec<String>>,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub groups: Option<Vec<String>>,
}

impl EditTagRequest {
    pub fn into_edit(self) -> (String, TagEdit) {
        let edit = TagEdit {
            new_tag: self.new_tag,
            priority: self.priority,
            weight: self.weight,
            model_mapping: self.model_mapping,
            models: self.models,
            groups: self.groups,
        };
        (self.tag, edit)
    }
}
