use crate::error::ConfigError;
use rand::Rng;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Category used when an entry carries no category of its own.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// One selectable mod, level or mutator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, rename = "Parent", skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    /// Own paths only; inherited ones come from [`crate::flatten`].
    #[serde(default, rename = "Path", deserialize_with = "null_as_default")]
    pub paths: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, rename = "IWad", skip_serializing_if = "Option::is_none")]
    pub alt_iwad: Option<String>,
}

impl Entry {
    pub fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn with_paths(mut self, paths: &[&str]) -> Self {
        self.paths = paths.iter().map(|path| path.to_string()).collect();
        self
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent_code = Some(parent.to_string());
        self
    }

    pub fn with_alt_iwad(mut self, iwad: &str) -> Self {
        self.alt_iwad = Some(iwad.to_string());
        self
    }

    /// Placeholder entries (blank code) are never listed or matched.
    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }

    pub fn matches_code(&self, code: &str) -> bool {
        self.has_code() && self.code.trim().eq_ignore_ascii_case(code.trim())
    }

    /// The override base-game file, if set and not blank.
    pub fn alt_iwad(&self) -> Option<&str> {
        self.alt_iwad
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn parent_code(&self) -> Option<&str> {
        self.parent_code
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Position of an entry: category slot, then index inside the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryRef {
    pub category: usize,
    pub index: usize,
}

/// Category name to ordered entries. Category order follows the settings
/// file and drives display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    #[serde(deserialize_with = "categories_or_null")]
    categories: IndexMap<String, Vec<Entry>>,
}

impl Catalog {
    /// Groups `(category, entry)` pairs, keeping first-seen category order.
    pub fn from_grouped<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (Option<String>, Entry)>,
    {
        let mut catalog = Catalog::default();
        for (category, entry) in items {
            let name = category
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
            catalog.push(&name, entry);
        }
        catalog
    }

    pub fn push(&mut self, category: &str, entry: Entry) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .push(entry);
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        !self.entries().any(|(_, entry)| entry.has_code())
    }

    pub fn get(&self, at: EntryRef) -> Option<&Entry> {
        self.categories.get_index(at.category)?.1.get(at.index)
    }

    pub fn category_name(&self, at: EntryRef) -> Option<&str> {
        self.categories
            .get_index(at.category)
            .map(|(name, _)| name.as_str())
    }

    /// Every entry, category by category, with its position.
    pub fn entries(&self) -> impl Iterator<Item = (EntryRef, &Entry)> + '_ {
        self.categories
            .values()
            .enumerate()
            .flat_map(|(category, group)| {
                group
                    .iter()
                    .enumerate()
                    .map(move |(index, entry)| (EntryRef { category, index }, entry))
            })
    }

    pub fn all_entries(&self) -> Vec<&Entry> {
        self.entries().map(|(_, entry)| entry).collect()
    }

    pub fn entries_in_category(&self, name: &str) -> &[Entry] {
        self.categories
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Case-insensitive, first match in category-then-entry order.
    pub fn find(&self, code: &str) -> Option<EntryRef> {
        self.entries()
            .find(|(_, entry)| entry.matches_code(code))
            .map(|(at, _)| at)
    }

    pub fn lookup(&self, code: &str) -> Option<&Entry> {
        self.find(code).and_then(|at| self.get(at))
    }

    /// Uniform over categories that hold at least one coded entry, then
    /// uniform over that category's coded entries.
    pub fn random_entry<R: Rng>(&self, rng: &mut R) -> Option<EntryRef> {
        let candidates: Vec<(usize, Vec<usize>)> = self
            .categories
            .values()
            .enumerate()
            .map(|(category, group)| {
                let indexes = group
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.has_code())
                    .map(|(index, _)| index)
                    .collect::<Vec<_>>();
                (category, indexes)
            })
            .filter(|(_, indexes)| !indexes.is_empty())
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let (category, indexes) = &candidates[rng.gen_range(0..candidates.len())];
        let index = indexes[rng.gen_range(0..indexes.len())];
        Some(EntryRef {
            category: *category,
            index,
        })
    }

    /// Categories with their coded entries sorted by code, then description.
    pub fn listing(&self) -> Vec<(&str, Vec<&Entry>)> {
        let mut groups = Vec::new();
        for (name, group) in &self.categories {
            let mut entries: Vec<&Entry> = group
                .iter()
                .filter(|entry| entry.has_code())
                .collect();
            if entries.is_empty() {
                continue;
            }
            entries.sort_by(|a, b| {
                a.code
                    .to_lowercase()
                    .cmp(&b.code.to_lowercase())
                    .then_with(|| a.description.cmp(&b.description))
            });
            groups.push((name.as_str(), entries));
        }
        groups
    }

    /// Rejects a code that shows up twice anywhere in the catalog.
    pub fn ensure_unique_codes(&self, label: &'static str) -> Result<(), ConfigError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for (name, group) in &self.categories {
            for entry in group.iter().filter(|entry| entry.has_code()) {
                let key = entry.code.trim().to_lowercase();
                if let Some(first) = seen.insert(key, name.as_str()) {
                    return Err(ConfigError::DuplicateCode {
                        catalog: label,
                        code: entry.code.trim().to_string(),
                        first: first.to_string(),
                        second: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A null catalog and null categories both read as empty.
fn categories_or_null<'de, D>(deserializer: D) -> Result<IndexMap<String, Vec<Entry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Option<Vec<Entry>>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, entries)| (name, entries.unwrap_or_default()))
        .collect())
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
