use crate::domain::ChannelType;

/// Split a submitted credential into the keys of the channels to create.
///
/// Every non-blank line becomes one key, kept as submitted apart from a
/// trailing carriage return. Regional channels keep the submitted
/// value whole since their deployments are described by `other`, not by
/// extra keys. Blank input yields no keys.
pub fn expand_keys(raw: &str, channel_type: ChannelType) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    if channel_type.is_regional() {
        return vec![raw.to_string()];
    }

    raw.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
