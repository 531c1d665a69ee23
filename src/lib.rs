pub mod config;
pub mod logger;
pub mod content;
pub mod collection;
pub mod text_utils;
mod test_data;

pub use collection::{build_collection, filter_by_tag, filter_drafts, group_by_year, sort_by_date, tag_frequency, unique_tags};
pub use config::{BuildMode, Config};
pub use content::{AsEntry, Collection, CollectionEntry, Entry, EntryId, EntryKind, ValidationError};
