pub mod ability;
pub mod channel;

pub use channel::PgChannelRepository;
