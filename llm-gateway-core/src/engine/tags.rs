//! Mutations applied to every member of a tag group in one store call.

use tracing::info;

use crate::domain::TagEdit;
use crate::error::{CoreError, Result};
use crate::traits::ChannelStore;

fn require_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(CoreError::InvalidArgument("tag must not be empty".to_string()));
    }
    Ok(())
}

pub async fn disable_tag(store: &dyn ChannelStore, tag: &str) -> Result<u64> {
    require_tag(tag)?;
    let affected = store.disable_by_tag(tag).await?;
    info!(tag = %tag, affected, "disabled tag group");
    Ok(affected)
}

pub async fn enable_tag(store: &dyn ChannelStore, tag: &str) -> Result<u64> {
    require_tag(tag)?;
    let affected = store.enable_by_tag(tag).await?;
    info!(tag = %tag, affected, "enabled tag group");
    Ok(affected)
}

/// Apply `edit` to every member of `tag`. An edit without fields is a no-op.
pub async fn edit_tag(store: &dyn ChannelStore, tag: &str, edit: &TagEdit) -> Result<u64> {
    require_tag(tag)?;
    if edit.is_empty() {
        info!(tag = %tag, "tag edit carried no fields, nothing to do");
        return Ok(0);
    }

    let affected = store.edit_by_tag(tag, edit).await?;
    info!(
        tag = %tag,
        affected,
        renamed_to = ?edit.new_tag,
        "edited tag group"
    );
    Ok(affected)
}
