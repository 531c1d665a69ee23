use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::content::error::ValidationError;
use crate::content::{Collection, Count, Entry, EntryKind, HeroImage, MicropostMeta, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
use crate::text_utils::{coerce_date_str, from_epoch_millis};

pub const DEFAULT_HANDLE: &str = "cworld_dev";
pub const DEFAULT_AVATAR: &str = "/assets/avatar.png";

/// Front-matter exactly as written in the source file, before any default or constraint is applied.
/// Keys are camelCase (`publishDate`, `heroImage`). Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub publish_date: Option<RawDate>,
    pub updated_date: Option<RawDate>,
    pub hero_image: Option<RawHeroImage>,
    pub tags: Option<Vec<String>>,
    pub language: Option<String>,
    pub draft: Option<bool>,
    pub comment: Option<bool>,

    // Micropost only
    pub handle: Option<String>,
    pub avatar: Option<String>,
    pub likes: Option<Count>,
    pub retweets: Option<Count>,
    pub replies: Option<Count>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHeroImage {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub infer_size: Option<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
}

/// A date as written in front-matter, whichever format it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDate {
    Text(String),
    Millis(i64),
    Invalid(String),
}

impl<'de> Deserialize<'de> for RawDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
    {
        // TOML dates only survive through toml::Value, YAML dates are plain strings
        let value = toml::Value::deserialize(deserializer)?;
        let date = match value {
            toml::Value::Datetime(dt) => RawDate::Text(dt.to_string()),
            toml::Value::String(s) => RawDate::Text(s),
            toml::Value::Integer(millis) => RawDate::Millis(millis),
            other => RawDate::Invalid(other.to_string()),
        };
        Ok(date)
    }
}

impl RawFrontMatter {
    pub fn from_toml(front: &str) -> Result<RawFrontMatter, ValidationError> {
        Ok(toml::from_str::<RawFrontMatter>(front)?)
    }

    pub fn from_yaml(front: &str) -> Result<RawFrontMatter, ValidationError> {
        if front.trim().is_empty() {
            return Ok(RawFrontMatter::default());
        }
        Ok(serde_yaml::from_str::<RawFrontMatter>(front)?)
    }
}

/// Values a micropost gets when its front-matter leaves them out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MicropostDefaults {
    pub handle: String,
    pub avatar: String,
}

impl Default for MicropostDefaults {
    fn default() -> Self {
        MicropostDefaults {
            handle: DEFAULT_HANDLE.to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
        }
    }
}

pub fn validate(raw: RawFrontMatter, collection: Collection, defaults: &MicropostDefaults) -> Result<Entry, ValidationError> {
    let (title, description) = match collection {
        Collection::Blog => (
            Some(required("title", raw.title)?),
            Some(required("description", raw.description)?),
        ),
        Collection::Microposts => (raw.title, raw.description),
    };
    let title = max_len("title", title, TITLE_MAX_LEN)?;
    let description = max_len("description", description, DESCRIPTION_MAX_LEN)?;

    let publish_date = required("publishDate", raw.publish_date)?;
    let publish_date = coerce_date("publishDate", &publish_date)?;
    let updated_date = match raw.updated_date {
        Some(ref value) => Some(coerce_date("updatedDate", value)?),
        None => None,
    };

    let hero_image = match raw.hero_image {
        Some(hero) => Some(validate_hero_image(hero)?),
        None => None,
    };

    let kind = match collection {
        Collection::Blog => EntryKind::Post,
        Collection::Microposts => EntryKind::Micropost(MicropostMeta {
            handle: raw.handle.unwrap_or_else(|| defaults.handle.clone()),
            avatar: raw.avatar.unwrap_or_else(|| defaults.avatar.clone()),
            likes: raw.likes.unwrap_or_default(),
            retweets: raw.retweets.unwrap_or_default(),
            replies: raw.replies.unwrap_or_default(),
            image: raw.image,
        }),
    };

    Ok(Entry {
        title,
        description,
        publish_date,
        updated_date,
        hero_image,
        tags: normalize_tags(raw.tags.unwrap_or_default()),
        language: raw.language,
        draft: raw.draft.unwrap_or(false),
        comment: raw.comment.unwrap_or(true),
        kind,
    })
}

/// Length as the site templates measure it, in UTF-16 code units.
pub fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Lower-cases every tag and drops repeated ones, keeping the first occurrence.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    if tags.is_empty() {
        return tags;
    }

    let mut seen = HashSet::with_capacity(tags.len());
    tags.into_iter()
        .map(|tag| tag.to_lowercase())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

fn validate_hero_image(raw: RawHeroImage) -> Result<HeroImage, ValidationError> {
    let src = required("heroImage.src", raw.src)?;
    if src.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "heroImage.src",
            reason: "image reference is empty".to_string(),
        });
    }

    Ok(HeroImage {
        src,
        alt: raw.alt,
        infer_size: raw.infer_size,
        width: raw.width,
        height: raw.height,
        color: raw.color,
    })
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}

fn max_len(field: &'static str, value: Option<String>, max: usize) -> Result<Option<String>, ValidationError> {
    if let Some(ref s) = value {
        let len = text_len(s);
        if len > max {
            return Err(ValidationError::TooLong { field, max, len });
        }
    }
    Ok(value)
}

fn coerce_date(field: &'static str, value: &RawDate) -> Result<NaiveDateTime, ValidationError> {
    let res = match value {
        RawDate::Text(s) => coerce_date_str(s).map_err(|_| s.clone()),
        RawDate::Millis(millis) => from_epoch_millis(*millis).map_err(|_| millis.to_string()),
        RawDate::Invalid(other) => Err(other.clone()),
    };

    res.map_err(|value| ValidationError::InvalidDate { field, value })
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};

    use super::*;

    fn raw(front: &str) -> RawFrontMatter {
        RawFrontMatter::from_toml(front).unwrap()
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(normalize_tags(tags(&["Astro", "astro", "WebDev"])), ["astro", "webdev"]);
        assert_eq!(normalize_tags(tags(&["b", "A", "B", "a"])), ["b", "a"]);
        assert!(normalize_tags(vec![]).is_empty());
    }

    #[test]
    fn test_normalize_tags_idempotent() {
        let samples = [
            tags(&["Rust", "rust", "RUST", "Web"]),
            tags(&["ÄPFEL", "äpfel", "Straße"]),
            tags(&["one", "two", "three"]),
            tags(&[]),
        ];
        for sample in samples {
            let once = normalize_tags(sample);
            let twice = normalize_tags(once.clone());
            assert_eq!(once, twice);

            let distinct: HashSet<String> = once.iter().map(|t| t.to_lowercase()).collect();
            assert_eq!(distinct.len(), once.len());
        }
    }

    #[test]
    fn test_post_defaults() {
        let entry = validate(raw(r#"
title = "Hello"
description = "First post"
publishDate = 2024-01-01
"#), Collection::Blog, &MicropostDefaults::default()).unwrap();

        assert_eq!(entry.title(), "Hello");
        assert_eq!(entry.publish_date.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(entry.tags.is_empty());
        assert!(!entry.draft);
        assert!(entry.comment);
        assert_eq!(entry.kind, EntryKind::Post);
        assert!(entry.updated_date.is_none());
        assert!(entry.hero_image.is_none());
    }

    #[test]
    fn test_present_false_is_kept() {
        let entry = validate(raw(r#"
title = "Hello"
description = "First post"
publishDate = "2024-01-01"
comment = false
draft = true
"#), Collection::Blog, &MicropostDefaults::default()).unwrap();

        assert!(!entry.comment);
        assert!(entry.draft);
    }

    #[test]
    fn test_post_requires_title() {
        let res = validate(raw(r#"
description = "First post"
publishDate = 2024-01-01
"#), Collection::Blog, &MicropostDefaults::default());
        assert_eq!(res, Err(ValidationError::Missing { field: "title" }));

        let res = validate(raw(r#"
title = "Hello"
publishDate = 2024-01-01
"#), Collection::Blog, &MicropostDefaults::default());
        assert_eq!(res, Err(ValidationError::Missing { field: "description" }));
    }

    #[test]
    fn test_publish_date_required() {
        let res = validate(raw("title = \"Hello\"\n"), Collection::Microposts, &MicropostDefaults::default());
        assert_eq!(res, Err(ValidationError::Missing { field: "publishDate" }));
    }

    #[test]
    fn test_title_too_long() {
        let title = "x".repeat(61);
        let front = format!("title = \"{}\"\ndescription = \"d\"\npublishDate = 2024-01-01\n", title);
        let err = validate(raw(&front), Collection::Blog, &MicropostDefaults::default()).unwrap_err();
        assert_eq!(err, ValidationError::TooLong { field: "title", max: 60, len: 61 });
        assert_eq!(err.to_string(), "title exceeds 60 characters (found 61)");

        // Counted in UTF-16 code units, neither bytes nor chars
        let title = "é".repeat(60);
        let front = format!("title = \"{}\"\ndescription = \"d\"\npublishDate = 2024-01-01\n", title);
        assert!(validate(raw(&front), Collection::Blog, &MicropostDefaults::default()).is_ok());

        let title = "🦀".repeat(30);
        let front = format!("title = \"{}\"\npublishDate = 2024-01-01\n", title);
        assert!(validate(raw(&front), Collection::Microposts, &MicropostDefaults::default()).is_ok());

        let title = "🦀".repeat(31);
        let front = format!("title = \"{}\"\npublishDate = 2024-01-01\n", title);
        let err = validate(raw(&front), Collection::Microposts, &MicropostDefaults::default()).unwrap_err();
        assert_eq!(err, ValidationError::TooLong { field: "title", max: 60, len: 62 });
    }

    #[test]
    fn test_description_too_long() {
        let front = format!("description = \"{}\"\npublishDate = 2024-01-01\n", "d".repeat(161));
        let err = validate(raw(&front), Collection::Microposts, &MicropostDefaults::default()).unwrap_err();
        assert_eq!(err, ValidationError::TooLong { field: "description", max: 160, len: 161 });
    }

    #[test]
    fn test_invalid_dates() {
        let err = validate(raw("publishDate = \"not a date\"\n"), Collection::Microposts, &MicropostDefaults::default()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidDate { field: "publishDate", value: "not a date".to_string() });
        assert_eq!(err.to_string(), "publishDate not a valid date: not a date");

        let err = validate(raw("publishDate = true\n"), Collection::Microposts, &MicropostDefaults::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { field: "publishDate", .. }));

        let err = validate(raw("publishDate = 2024-01-01\nupdatedDate = \"2024-02-31\"\n"), Collection::Microposts, &MicropostDefaults::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { field: "updatedDate", .. }));
    }

    #[test]
    fn test_date_forms() {
        let defaults = MicropostDefaults::default();
        let entry = validate(raw("publishDate = 2022-04-02T12:05:00\n"), Collection::Microposts, &defaults).unwrap();
        assert_eq!(entry.publish_date.to_string(), "2022-04-02 12:05:00");

        let entry = validate(raw("publishDate = 2022-04-02T12:05:00Z\n"), Collection::Microposts, &defaults).unwrap();
        assert_eq!(entry.publish_date.to_string(), "2022-04-02 12:05:00");

        let entry = validate(raw("publishDate = \"2022-04-02 12:05:00.000\"\n"), Collection::Microposts, &defaults).unwrap();
        assert_eq!(entry.publish_date.to_string(), "2022-04-02 12:05:00");

        let entry = validate(raw("publishDate = 1717200000000\n"), Collection::Microposts, &defaults).unwrap();
        assert_eq!(entry.publish_date.year(), 2024);
    }

    #[test]
    fn test_yaml_front_matter() {
        let raw = RawFrontMatter::from_yaml(r#"
title: Hello
description: First post
publishDate: 2024-01-01
updatedDate: "2024-02-10 08:00"
tags: [Astro, astro, WebDev]
comment: false
heroImage:
  src: ./cover.png
  width: 800
"#).unwrap();
        let entry = validate(raw, Collection::Blog, &MicropostDefaults::default()).unwrap();

        assert_eq!(entry.title(), "Hello");
        assert_eq!(entry.publish_date.to_string(), "2024-01-01 00:00:00");
        assert_eq!(entry.updated_date.unwrap().to_string(), "2024-02-10 08:00:00");
        assert_eq!(entry.tags, ["astro", "webdev"]);
        assert!(!entry.comment);
        assert_eq!(entry.hero_image.unwrap().width, Some(800.0));
    }

    #[test]
    fn test_yaml_dates() {
        let defaults = MicropostDefaults::default();
        let entry = validate(RawFrontMatter::from_yaml("publishDate: 2022-04-02T12:05:00Z\n").unwrap(), Collection::Microposts, &defaults).unwrap();
        assert_eq!(entry.publish_date.to_string(), "2022-04-02 12:05:00");

        let entry = validate(RawFrontMatter::from_yaml("publishDate: 1717200000000\n").unwrap(), Collection::Microposts, &defaults).unwrap();
        assert_eq!(entry.publish_date.year(), 2024);

        let err = validate(RawFrontMatter::from_yaml("publishDate: true\n").unwrap(), Collection::Microposts, &defaults).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { field: "publishDate", .. }));

        let err = RawFrontMatter::from_yaml("draft: [1, 2]\n").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn test_wrong_type() {
        let err = RawFrontMatter::from_toml("draft = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));

        let err = RawFrontMatter::from_toml("tags = \"rust\"\n").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn test_hero_image() {
        let entry = validate(raw(r##"
title = "Hello"
description = "First post"
publishDate = 2024-01-01

[heroImage]
src = "./cover.png"
alt = "A cover"
width = 1200
color = "#aabbcc"
"##), Collection::Blog, &MicropostDefaults::default()).unwrap();

        let hero = entry.hero_image.unwrap();
        assert_eq!(hero.src, "./cover.png");
        assert_eq!(hero.alt.as_deref(), Some("A cover"));
        assert_eq!(hero.width, Some(1200.0));
        assert_eq!(hero.height, None);
        assert_eq!(hero.infer_size, None);
        assert_eq!(hero.color.as_deref(), Some("#aabbcc"));

        let entry = validate(raw(r#"
publishDate = 2024-01-01

[heroImage]
src = "./cover.png"
width = 1200.5
height = 630
"#), Collection::Microposts, &MicropostDefaults::default()).unwrap();
        let hero = entry.hero_image.unwrap();
        assert_eq!(hero.width, Some(1200.5));
        assert_eq!(hero.height, Some(630.0));

        let res = validate(raw(r#"
publishDate = 2024-01-01

[heroImage]
alt = "No source"
"#), Collection::Microposts, &MicropostDefaults::default());
        assert_eq!(res, Err(ValidationError::Missing { field: "heroImage.src" }));
    }

    #[test]
    fn test_micropost_fields() {
        let defaults = MicropostDefaults {
            handle: "someone".to_string(),
            avatar: "/me.png".to_string(),
        };
        let entry = validate(raw(r#"
publishDate = 2025-06-01
avatar = "/other.png"
likes = "42"
retweets = 3
replies = 1.5
image = "/img/shot.png"
tags = ["Rust", "rust"]
"#), Collection::Microposts, &defaults).unwrap();

        assert!(entry.title.is_none());
        assert!(entry.description.is_none());
        assert_eq!(entry.tags, ["rust"]);

        let meta = entry.micropost().unwrap();
        assert_eq!(meta.handle, "someone");
        assert_eq!(meta.avatar, "/other.png");
        assert_eq!(meta.likes, Count::Text("42".to_string()));
        assert_eq!(meta.retweets, Count::Integer(3));
        assert_eq!(meta.replies, Count::Float(1.5));
        assert_eq!(meta.image.as_deref(), Some("/img/shot.png"));
    }

    #[test]
    fn test_post_ignores_micropost_fields() {
        let entry = validate(raw(r#"
title = "Hello"
description = "First post"
publishDate = 2024-01-01
likes = 10
unknownKey = "whatever"
"#), Collection::Blog, &MicropostDefaults::default()).unwrap();
        assert!(entry.micropost().is_none());
    }
}
