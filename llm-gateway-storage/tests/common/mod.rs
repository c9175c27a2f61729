#![allow(dead_code)]

use fake::faker::internet::en::DomainSuffix;
use fake::faker::lorem::en::Word;
use fake::Fake;
use llm_gateway_core::{Channel, ChannelType};

/// An OpenAI channel with a random name and key.
pub fn random_channel() -> Channel {
    let name: String = Word().fake();
    let key = format!("sk-{}", (16usize..24).fake::<String>());
    let suffix: String = DomainSuffix().fake();

    Channel::new(ChannelType::OpenAI, name.clone(), key)
        .with_base_url(format!("https://{}.example.{}", name, suffix))
        .with_models(vec!["gpt-4o".to_string(), "gpt-4o-mini".to_string()])
        .with_priority((0i64..10).fake())
        .with_weight((1u32..100).fake())
}

pub fn tagged_channel(tag: &str) -> Channel {
    random_channel().with_tag(tag)
}

pub fn tagged_channels(tag: &str, count: usize) -> Vec<Channel> {
    (0..count).map(|_| tagged_channel(tag)).collect()
}
