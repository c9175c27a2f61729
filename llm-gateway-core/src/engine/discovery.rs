//! Upstream model discovery for a single channel.

use tracing::{debug, warn};

use crate::domain::ChannelId;
use crate::error::{CoreError, Result};
use crate::traits::{ChannelStore, UpstreamClient};

/// Ask the channel's upstream which model ids it serves.
///
/// Only OpenAI-compatible channels are supported; other providers fail
/// without any network traffic. Failures are returned as-is, never retried.
pub async fn discover_models(
    store: &dyn ChannelStore,
    upstream: &dyn UpstreamClient,
    id: ChannelId,
) -> Result<Vec<String>> {
    let channel = store
        .get_channel(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("channel {}", id)))?;

    if !channel.channel_type.supports_model_discovery() {
        return Err(CoreError::UnsupportedProvider(format!(
            "model discovery is only available for openai channels, channel {} is {}",
            id, channel.channel_type
        )));
    }

    let base_url = channel.effective_base_url().ok_or_else(|| {
        CoreError::InvalidConfiguration(format!("channel {} has no base URL", id))
    })?;

    match upstream.list_models(base_url, &channel.key).await {
        Ok(models) => {
            debug!(channel_id = %id, count = models.len(), "fetched upstream models");
            Ok(models)
        }
        Err(err) => {
            warn!(channel_id = %id, error = %err, "upstream model discovery failed");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Channel, ChannelType};
    use crate::error::UpstreamError;
    use crate::traits::{MockChannelStore, MockUpstreamClient};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn store_with(channel: Channel) -> MockChannelStore {
        let mut store = MockChannelStore::new();
        store
            .expect_get_channel()
            .returning(move |_| Ok(Some(channel.clone())));
        store
    }

    #[tokio::test]
    async fn test_unsupported_provider_makes_no_upstream_call() {
        let store = store_with(Channel::new(ChannelType::Anthropic, "claude", "sk-ant"));
        let mut upstream = MockUpstreamClient::new();
        upstream.expect_list_models().times(0);

        let err = discover_models(&store, &upstream, ChannelId(1)).await.unwrap_err();

        assert!(matches!(err, CoreError::UnsupportedProvider(_)));
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_found() {
        let mut store = MockChannelStore::new();
        store.expect_get_channel().returning(|_| Ok(None));
        let upstream = MockUpstreamClient::new();

        let err = discover_models(&store, &upstream, ChannelId(404)).await.unwrap_err();

        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_uses_channel_base_url_and_key() {
        let channel = Channel::new(ChannelType::OpenAI, "proxy", "sk-live").with_base_url("https://proxy.local");
        let store = store_with(channel);
        let mut upstream = MockUpstreamClient::new();
        upstream
            .expect_list_models()
            .with(eq("https://proxy.local"), eq("sk-live"))
            .times(1)
            .returning(|_, _| Ok(vec!["gpt-4o".to_string(), "gpt-4o-mini".to_string()]));

        let models = discover_models(&store, &upstream, ChannelId(1)).await.unwrap();

        assert_eq!(models, vec!["gpt-4o", "gpt-4o-mini"]);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_surfaced() {
        let store = store_with(Channel::new(ChannelType::OpenAI, "openai", "sk"));
        let mut upstream = MockUpstreamClient::new();
        upstream.expect_list_models().returning(|url, _| {
            Err(UpstreamError::Rejected { url: url.to_string() })
        });

        let err = discover_models(&store, &upstream, ChannelId(1)).await.unwrap_err();

        assert!(matches!(err, CoreError::Upstream(UpstreamError::Rejected { .. })));
    }
}
