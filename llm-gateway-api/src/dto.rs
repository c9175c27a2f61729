pub mod channel;
pub mod tag;

pub use channel::*;
pub use tag::*;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use llm_gateway_core::split_list;

// Query structures
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListQuery {
    /// Zero-based page index
    pub p: Option<i64>,
    pub page_size: Option<i64>,
    pub id_sort: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub group: Option<String>,
    pub model: Option<String>,
    pub id_sort: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrString {
    List(Vec<String>),
    Text(String),
}

/// Accepts `["a", "b"]` or the comma separated form `"a,b"`.
pub(crate) fn list_or_csv<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ListOrString>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        ListOrString::List(items) => items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        ListOrString::Text(raw) => split_list(&raw),
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MappingOrString {
    Map(BTreeMap<String, String>),
    Text(String),
}

/// Accepts a JSON object or the same object encoded as a string. A blank
/// string is an empty mapping.
pub(crate) fn mapping_or_json<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<MappingOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(MappingOrString::Map(map)) => Ok(Some(map)),
        Some(MappingOrString::Text(raw)) if raw.trim().is_empty() => Ok(Some(BTreeMap::new())),
        Some(MappingOrString::Text(raw)) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("model_mapping: {}", e))),
    }
}
