pub mod listing;
pub mod tags;
pub mod discovery;

pub use listing::{list_with_tag_groups, merge_tag_groups};
pub use tags::{disable_tag, edit_tag, enable_tag};
pub use discovery::discover_models;
