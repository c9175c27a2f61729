//! Ability index maintenance. Every function runs on the caller's connection so
//! it joins the caller's transaction.

use llm_gateway_core::{Ability, Channel, ChannelId, Result};
use sqlx::PgConnection;

/// Insert the ability rows of `channel`.
pub async fn insert_for_channel(conn: &mut PgConnection, channel: &Channel) -> Result<()> {
    for ability in Ability::for_channel(channel) {
        sqlx::query(
            r#"
            INSERT INTO abilities (group_name, model, channel_id, enabled, priority, weight, tag)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (group_name, model, channel_id) DO NOTHING
            "#,
        )
        .bind(&ability.group)
        .bind(&ability.model)
        .bind(ability.channel_id.0)
        .bind(ability.enabled)
        .bind(ability.priority)
        .bind(i64::from(ability.weight))
        .bind(&ability.tag)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

pub async fn delete_for_channels(conn: &mut PgConnection, ids: &[ChannelId]) -> Result<u64> {
    let ids: Vec<i64> = ids.iter().map(|id| id.0).collect();
    let result = sqlx::query("DELETE FROM abilities WHERE channel_id = ANY($1)")
        .bind(&ids)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Replace the ability rows of the given channels with rows derived from
/// their current state.
pub async fn rebuild_for_channels(conn: &mut PgConnection, channels: &[Channel]) -> Result<()> {
    let ids: Vec<ChannelId> = channels.iter().map(|c| c.id).collect();
    delete_for_channels(&mut *conn, &ids).await?;
    for channel in channels {
        insert_for_channel(&mut *conn, channel).await?;
    }

    Ok(())
}

/// Copy routing attributes onto existing rows without changing which
/// (group, model) pairs exist.
pub async fn refresh_for_channels(conn: &mut PgConnection, channels: &[Channel]) -> Result<()> {
    for channel in channels {
        sqlx::query(
            "UPDATE abilities SET enabled = $2, priority = $3, weight = $4, tag = $5 WHERE channel_id = $1",
        )
        .bind(channel.id.0)
        .bind(channel.is_enabled())
        .bind(channel.priority)
        .bind(i64::from(channel.weight))
        .bind(channel.tag())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

pub async fn set_enabled_by_tag(conn: &mut PgConnection, tag: &str, enabled: bool) -> Result<u64> {
    let result = sqlx::query("UPDATE abilities SET enabled = $2 WHERE tag = $1")
        .bind(tag)
        .bind(enabled)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_all(conn: &mut PgConnection) -> Result<u64> {
    let result = sqlx::query("DELETE FROM abilities")
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
