pub mod domain;
pub mod engine;
pub mod error;
pub mod expansion;
pub mod service;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use service::{ChannelService, ServiceConfig};
pub use traits::*;
