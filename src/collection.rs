//! Listing helpers over an already loaded collection.
//!
//! Nothing here mutates its input. Sequences come back as borrowed views in a new order, ties keep the
//! order in which the entries were given.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use spdlog::{debug, error, info};

use crate::config::BuildMode;
use crate::content::{AsEntry, Collection, CollectionEntry, MicropostDefaults};

/// In production only non-draft entries are kept, otherwise everything is.
pub fn filter_drafts<T: AsEntry>(items: &[T], mode: BuildMode) -> Vec<&T> {
    items.iter()
        .filter(|item| !mode.is_production() || !item.entry().draft)
        .collect()
}

/// Most recent first.
pub fn sort_by_date<T: AsEntry>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| {
        b.entry().publish_date.cmp(&a.entry().publish_date)
    });
    sorted
}

/// `[(2025, [..]), (2024, [..])]`. Inside a year, entries keep the order they were given in.
pub fn group_by_year<T: AsEntry>(items: &[T]) -> Vec<(i32, Vec<&T>)> {
    let mut groups: HashMap<i32, Vec<&T>> = HashMap::new();
    for item in items {
        let year = item.entry().publish_date.year();
        groups.entry(year).or_default().push(item);
    }

    let mut groups: Vec<(i32, Vec<&T>)> = groups.into_iter().collect();
    groups.sort_by(|(ya, _), (yb, _)| yb.cmp(ya));
    groups
}

/// Tag counts, most frequent first. Equal counts keep the order in which the tags were first seen.
pub fn tag_frequency<T: AsEntry>(items: &[T]) -> Vec<(String, usize)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = vec![];

    for tag in items.iter().flat_map(|item| item.entry().tags.iter()) {
        match positions.get(tag.as_str()) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(tag.as_str(), counts.len());
                counts.push((tag.clone(), 1));
            }
        }
    }

    counts.sort_by(|(_, ca), (_, cb)| cb.cmp(ca));
    counts
}

/// Every tag used across the collection, in the order they were first seen.
pub fn unique_tags<T: AsEntry>(items: &[T]) -> Vec<String> {
    let mut seen = HashSet::new();
    items.iter()
        .flat_map(|item| item.entry().tags.iter())
        .filter(|tag| seen.insert(*tag))
        .cloned()
        .collect()
}

/// Entries carrying `tag`, compared case-insensitively.
pub fn filter_by_tag<'a, T: AsEntry>(items: &'a [T], tag: &str) -> Vec<&'a T> {
    items.iter()
        .filter(|item| item.entry().has_tag(tag))
        .collect()
}

/// Validates every `(path, source)` pair of a collection and drops drafts according to `mode`.
///
/// Fails on the first record that does not validate, naming its file.
pub fn build_collection<I>(sources: I, collection: Collection, defaults: &MicropostDefaults,
                           mode: BuildMode) -> Result<Vec<CollectionEntry>>
    where
        I: IntoIterator<Item=(PathBuf, String)>,
{
    let mut entries = vec![];
    for (path, source) in sources {
        let entry = match CollectionEntry::from_source(&path, &source, collection, defaults) {
            Ok(entry) => entry,
            Err(e) => {
                error!("Invalid {} entry {}: {}", collection, path.display(), e);
                return Err(e).with_context(|| format!("Error validating {} entry {}", collection, path.display()));
            }
        };

        if mode.is_production() && entry.data.draft {
            debug!("Skipping draft {} in {} mode", entry.id, mode);
            continue;
        }

        debug!("Loaded {} entry {}: {}", collection, entry.id, entry.data);
        entries.push(entry);
    }

    info!("Collection {} has {} entries ({} mode)", collection, entries.len(), mode);
    Ok(entries)
}
