use async_trait::async_trait;
use llm_gateway_core::{
    normalize_tag, Channel, ChannelId, ChannelStatus, ChannelStore, ChannelType, CoreError, Result,
    SearchFilter, TagEdit,
};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Row};
use std::collections::BTreeMap;
use tracing::debug;

use super::ability;

const CHANNEL_COLUMNS: &str = "id, channel_type, name, key, base_url, other, status, priority, weight, \
     channel_groups, models, model_mapping, tag, created_time, test_time, response_time_ms, \
     balance, used_quota";

/// PostgreSQL-backed channel store.
///
/// Writes that touch several rows run in one transaction under the server's
/// default READ COMMITTED isolation. Tag-scoped updates are single
/// `UPDATE ... WHERE tag = $1` statements, so concurrent readers see a group
/// either entirely before or entirely after the change.
pub struct PgChannelRepository {
    pool: PgPool,
}

impl PgChannelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count total channels
    pub async fn count(&self) -> Result<i64> {
        let count: Option<i64> = sqlx::query_scalar("SELECT COUNT(*) FROM channels")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.unwrap_or(0))
    }

    async fn insert_one(conn: &mut PgConnection, channel: &Channel) -> Result<ChannelId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO channels (
                channel_type, name, key, base_url, other, status, priority, weight,
                channel_groups, models, model_mapping, tag, created_time, test_time,
                response_time_ms, balance, used_quota
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id
            "#,
        )
        .bind(channel.channel_type.as_str())
        .bind(&channel.name)
        .bind(&channel.key)
        .bind(&channel.base_url)
        .bind(&channel.other)
        .bind(channel.status.as_str())
        .bind(channel.priority)
        .bind(i64::from(channel.weight))
        .bind(&channel.groups)
        .bind(&channel.models)
        .bind(Json(&channel.model_mapping))
        .bind(channel.tag())
        .bind(channel.created_time)
        .bind(channel.test_time)
        .bind(channel.response_time_ms)
        .bind(channel.balance)
        .bind(channel.used_quota)
        .fetch_one(&mut *conn)
        .await?;

        Ok(ChannelId(id))
    }

    async fn fetch_by_ids(conn: &mut PgConnection, ids: &[i64]) -> Result<Vec<Channel>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM channels WHERE id = ANY($1) ORDER BY id",
            CHANNEL_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(row_to_channel).collect()
    }

    async fn set_status_by_tag(&self, tag: &str, status: ChannelStatus) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE channels SET status = $2 WHERE tag = $1")
            .bind(tag)
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;
        ability::set_enabled_by_tag(&mut tx, tag, status.is_enabled()).await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ChannelStore for PgChannelRepository {
    async fn list_channels(&self, offset: i64, limit: i64, id_sort: bool) -> Result<Vec<Channel>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM channels ORDER BY {} LIMIT $1 OFFSET $2",
            CHANNEL_COLUMNS,
            order_clause(id_sort)
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_channel).collect()
    }

    async fn channels_by_tag(&self, tag: &str) -> Result<Vec<Channel>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM channels WHERE tag = $1 ORDER BY id",
            CHANNEL_COLUMNS
        ))
        .bind(tag)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_channel).collect()
    }

    async fn get_channel(&self, id: ChannelId) -> Result<Option<Channel>> {
        let row = sqlx::query(&format!("SELECT {} FROM channels WHERE id = $1", CHANNEL_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_channel).transpose()
    }

    async fn search_channels(&self, filter: &SearchFilter, id_sort: bool) -> Result<Vec<Channel>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM channels
            WHERE ($1::TEXT IS NULL
                   OR CAST(id AS TEXT) = $1
                   OR name ILIKE '%' || $1 || '%'
                   OR key = $1
                   OR COALESCE(base_url, '') ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR $2 = ANY(channel_groups))
              AND ($3::TEXT IS NULL OR EXISTS (
                   SELECT 1 FROM unnest(models) AS m WHERE m LIKE '%' || $3 || '%'))
            ORDER BY {}
            "#,
            CHANNEL_COLUMNS,
            order_clause(id_sort)
        ))
        .bind(filter.keyword())
        .bind(filter.group())
        .bind(filter.model())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_channel).collect()
    }

    async fn batch_insert(&self, channels: Vec<Channel>) -> Result<Vec<ChannelId>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(channels.len());

        for mut channel in channels {
            channel.id = Self::insert_one(&mut tx, &channel).await?;
            ability::insert_for_channel(&mut tx, &channel).await?;
            ids.push(channel.id);
        }

        tx.commit().await?;
        debug!(inserted = ids.len(), "inserted channel batch");
        Ok(ids)
    }

    async fn batch_delete(&self, ids: &[ChannelId]) -> Result<u64> {
        let ids: Vec<i64> = ids.iter().map(|id| id.0).collect();
        let result = sqlx::query("DELETE FROM channels WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_disabled(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM channels WHERE status <> $1")
            .bind(ChannelStatus::Enabled.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update(&self, channel: &Channel) -> Result<Channel> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE channels
            SET channel_type = $2, name = $3, key = $4, base_url = $5, other = $6,
                status = $7, priority = $8, weight = $9, channel_groups = $10,
                models = $11, model_mapping = $12, tag = $13
            WHERE id = $1
            RETURNING {}
            "#,
            CHANNEL_COLUMNS
        ))
        .bind(channel.id.0)
        .bind(channel.channel_type.as_str())
        .bind(&channel.name)
        .bind(&channel.key)
        .bind(&channel.base_url)
        .bind(&channel.other)
        .bind(channel.status.as_str())
        .bind(channel.priority)
        .bind(i64::from(channel.weight))
        .bind(&channel.groups)
        .bind(&channel.models)
        .bind(Json(&channel.model_mapping))
        .bind(channel.tag())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("channel {}", channel.id)))?;

        let updated = row_to_channel(row)?;
        ability::rebuild_for_channels(&mut tx, std::slice::from_ref(&updated)).await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: ChannelId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM channels WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn disable_by_tag(&self, tag: &str) -> Result<u64> {
        self.set_status_by_tag(tag, ChannelStatus::ManuallyDisabled).await
    }

    async fn enable_by_tag(&self, tag: &str) -> Result<u64> {
        self.set_status_by_tag(tag, ChannelStatus::Enabled).await
    }

    async fn edit_by_tag(&self, tag: &str, edit: &TagEdit) -> Result<u64> {
        if edit.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE channels SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(new_tag) = &edit.new_tag {
                set.push("tag = ").push_bind_unseparated(normalize_tag(new_tag));
            }
            if let Some(priority) = edit.priority {
                set.push("priority = ").push_bind_unseparated(priority);
            }
            if let Some(weight) = edit.weight {
                set.push("weight = ").push_bind_unseparated(i64::from(weight));
            }
            if let Some(model_mapping) = &edit.model_mapping {
                set.push("model_mapping = ").push_bind_unseparated(Json(model_mapping.clone()));
            }
            if let Some(models) = &edit.models {
                set.push("models = ").push_bind_unseparated(models.clone());
            }
            if let Some(groups) = &edit.groups {
                set.push("channel_groups = ").push_bind_unseparated(groups.clone());
            }
        }
        builder.push(" WHERE tag = ").push_bind(tag).push(" RETURNING id");

        let mut tx = self.pool.begin().await?;
        let ids: Vec<i64> = builder
            .build_query_scalar::<i64>()
            .fetch_all(&mut *tx)
            .await?;

        let members = Self::fetch_by_ids(&mut tx, &ids).await?;
        if edit.reshapes_abilities() {
            ability::rebuild_for_channels(&mut tx, &members).await?;
        } else {
            ability::refresh_for_channels(&mut tx, &members).await?;
        }

        tx.commit().await?;
        Ok(ids.len() as u64)
    }

    async fn repair_abilities(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        ability::delete_all(&mut tx).await?;
        let rows = sqlx::query(&format!("SELECT {} FROM channels ORDER BY id", CHANNEL_COLUMNS))
            .fetch_all(&mut *tx)
            .await?;
        let channels = rows.into_iter().map(row_to_channel).collect::<Result<Vec<_>>>()?;
        for channel in &channels {
            ability::insert_for_channel(&mut tx, channel).await?;
        }

        tx.commit().await?;
        Ok(channels.len() as u64)
    }
}

// Helper functions
fn order_clause(id_sort: bool) -> &'static str {
    if id_sort {
        "id DESC"
    } else {
        "priority DESC, id DESC"
    }
}

fn row_to_channel(row: PgRow) -> Result<Channel> {
    let channel_type: String = row.try_get("channel_type")?;
    let status: String = row.try_get("status")?;
    let weight: i64 = row.try_get("weight")?;
    let model_mapping: Json<BTreeMap<String, String>> = row.try_get("model_mapping")?;

    Ok(Channel {
        id: ChannelId(row.try_get("id")?),
        channel_type: channel_type.parse::<ChannelType>().map_err(CoreError::Persistence)?,
        name: row.try_get("name")?,
        key: row.try_get("key")?,
        base_url: row.try_get("base_url")?,
        other: row.try_get("other")?,
        status: status.parse::<ChannelStatus>().map_err(CoreError::Persistence)?,
        priority: row.try_get("priority")?,
        weight: u32::try_from(weight.max(0)).unwrap_or(u32::MAX),
        groups: row.try_get("channel_groups")?,
        models: row.try_get("models")?,
        model_mapping: model_mapping.0,
        tag: row.try_get("tag")?,
        created_time: row.try_get("created_time")?,
        test_time: row.try_get("test_time")?,
        response_time_ms: row.try_get("response_time_ms")?,
        balance: row.try_get("balance")?,
        used_quota: row.try_get("used_quota")?,
    })
}
