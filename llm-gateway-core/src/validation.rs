//! Provider-specific checks run before a channel is persisted.
//!
//! The same rules apply on create and on update.

use serde_json::Value;

use crate::domain::Channel;
use crate::error::{CoreError, Result};

/// Key a structured region map must declare.
pub const DEFAULT_REGION_KEY: &str = "default";

pub fn validate_provider_config(channel: &Channel) -> Result<()> {
    if channel.channel_type.is_regional() {
        validate_regions(&channel.other)?;
    }
    Ok(())
}

/// A regional channel needs at least one deployment region. A JSON object maps
/// model names to regions and must name a `default`; anything else is taken
/// as a single opaque region.
fn validate_regions(other: &str) -> Result<()> {
    let other = other.trim();
    if other.is_empty() {
        return Err(CoreError::InvalidConfiguration(
            "deployment region must not be empty".to_string(),
        ));
    }

    if let Ok(Value::Object(regions)) = serde_json::from_str::<Value>(other) {
        let has_default = regions
            .get(DEFAULT_REGION_KEY)
            .map(|v| !v.is_null())
            .unwrap_or(false);
        if !has_default {
            return Err(CoreError::InvalidConfiguration(format!(
                "deployment region map must contain a '{}' entry",
                DEFAULT_REGION_KEY
            )));
        }
    }

    Ok(())
}
