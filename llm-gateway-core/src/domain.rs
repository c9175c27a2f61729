pub mod ids;
pub mod channel_type;
pub mod channel;
pub mod ability;
pub mod tag;
pub mod query;

pub use ids::*;
pub use channel_type::*;
pub use channel::*;
pub use ability::*;
pub use tag::*;
pub use query::*;
