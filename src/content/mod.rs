use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::text_utils::format_date_time;

pub mod error;
pub mod front_matter;
pub mod schema;

pub use error::ValidationError;
pub use schema::{normalize_tags, validate, MicropostDefaults, RawFrontMatter};

pub const TITLE_MAX_LEN: usize = 60;
pub const DESCRIPTION_MAX_LEN: usize = 160;

/// Which content collection a source file belongs to. Selects the schema it is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Blog,
    Microposts,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Blog => "blog",
            Collection::Microposts => "microposts",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A validated post or micropost. Built once from front-matter and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub publish_date: NaiveDateTime,
    pub updated_date: Option<NaiveDateTime>,
    pub hero_image: Option<HeroImage>,
    pub tags: Vec<String>,
    pub language: Option<String>,
    pub draft: bool,
    pub comment: bool,
    #[serde(flatten)]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryKind {
    Post,
    Micropost(MicropostMeta),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MicropostMeta {
    pub handle: String,
    pub avatar: String,
    pub likes: Count,
    pub retweets: Count,
    pub replies: Count,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImage {
    pub src: String,
    pub alt: Option<String>,
    pub infer_size: Option<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
}

/// Engagement counters are written either as numbers or as preformatted text ("1.2k").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Default for Count {
    fn default() -> Self {
        Count::Integer(0)
    }
}

impl Display for Count {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Count::Integer(n) => write!(f, "{}", n),
            Count::Float(n) => write!(f, "{}", n),
            Count::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Entry {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn is_micropost(&self) -> bool {
        matches!(self.kind, EntryKind::Micropost(_))
    }

    pub fn micropost(&self) -> Option<&MicropostMeta> {
        match self.kind {
            EntryKind::Micropost(ref meta) => Some(meta),
            EntryKind::Post => None,
        }
    }

    /// `updatedDate` when present, otherwise `publishDate`.
    pub fn last_modified(&self) -> NaiveDateTime {
        self.updated_date.unwrap_or(self.publish_date)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| *t == tag)
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (date, time) = format_date_time(&self.publish_date);
        write!(f, "title={}, date={} {}, draft={}, tags=[{}]",
               self.title(),
               date,
               time,
               self.draft,
               self.tags.join(", ")
        )
    }
}

#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize)]
pub struct EntryId(pub String);

impl EntryId {
    /// `posts/hello-world/index.md` becomes `hello-world`, `posts/hello-world.mdx` becomes `hello-world`.
    pub fn from_path(path: &Path) -> Result<EntryId, ValidationError> {
        let file_name = path.file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| invalid_path(path, "missing file name"))?;

        if !is_content_file(path) {
            return Err(invalid_path(path, "not a markdown file"));
        }

        let stem = path.file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| invalid_path(path, "missing file stem"))?;

        if stem == "index" {
            // Directory post, the link is the directory holding the file
            let dir_name = path.parent()
                .and_then(|p| p.file_name())
                .and_then(|d| d.to_str())
                .ok_or_else(|| invalid_path(path, &format!("{} has no parent directory", file_name)))?;
            Ok(EntryId(dir_name.to_string()))
        } else {
            Ok(EntryId(stem.to_string()))
        }
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn is_content_file(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext == "md" || ext == "mdx",
        None => false,
    }
}

fn invalid_path(path: &Path, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: "path",
        reason: format!("{} - file={}", reason, path.display()),
    }
}

/// An entry together with where it came from and its unrendered body.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEntry {
    pub id: EntryId,
    pub collection: Collection,
    pub data: Entry,
    pub body: String,
}

impl CollectionEntry {
    pub fn from_source(path: &Path, source: &str, collection: Collection,
                       defaults: &MicropostDefaults) -> Result<CollectionEntry, ValidationError> {
        let id = EntryId::from_path(path)?;
        let (raw, body) = front_matter::parse(source)?;
        let data = validate(raw, collection, defaults)?;

        Ok(CollectionEntry {
            id,
            collection,
            data,
            body: body.to_string(),
        })
    }
}

/// Anything the listing helpers can read an [`Entry`] from.
pub trait AsEntry {
    fn entry(&self) -> &Entry;
}

impl AsEntry for Entry {
    fn entry(&self) -> &Entry {
        self
    }
}

impl AsEntry for CollectionEntry {
    fn entry(&self) -> &Entry {
        &self.data
    }
}

impl<T: AsEntry> AsEntry for &T {
    fn entry(&self) -> &Entry {
        T::entry(*self)
    }
}
