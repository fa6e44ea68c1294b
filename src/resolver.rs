use crate::catalog::{Catalog, EntryRef};

/// Typed to open the mutator screen from the mod or level screen.
pub const MUTATOR_TOKEN: &str = "+";
/// Typed to let the launcher pick an entry.
pub const RANDOM_TOKEN: &str = "*";
/// Minimum similarity (0-100) for a code to be offered as a suggestion.
pub const SUGGESTION_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected(EntryRef),
    SwitchToMutatorMenu,
    /// The caller draws the entry; see [`Catalog::random_entry`].
    Random,
    Empty,
    NotFound(Vec<Suggestion>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub at: EntryRef,
    pub score: u8,
}

/// Directives are checked before the catalog, so an entry whose code equals
/// a directive token cannot be selected by typing it.
pub fn resolve(raw: &str, catalog: &Catalog) -> Outcome {
    let input = raw.trim();
    if input.is_empty() {
        return Outcome::Empty;
    }
    if input.eq_ignore_ascii_case(MUTATOR_TOKEN) {
        return Outcome::SwitchToMutatorMenu;
    }
    if input.eq_ignore_ascii_case(RANDOM_TOKEN) {
        return Outcome::Random;
    }
    if let Some(at) = catalog.find(input) {
        return Outcome::Selected(at);
    }
    Outcome::NotFound(suggest(input, catalog))
}

/// Entries scoring at or above the threshold, best first. Ties keep catalog
/// order.
pub fn suggest(input: &str, catalog: &Catalog) -> Vec<Suggestion> {
    let mut hits: Vec<Suggestion> = catalog
        .entries()
        .filter(|(_, entry)| entry.has_code())
        .map(|(at, entry)| Suggestion {
            at,
            score: similarity(input, &entry.code),
        })
        .filter(|hit| hit.score >= SUGGESTION_THRESHOLD)
        .collect();
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

/// Token-sort ratio: both sides are lowercased, split into alphanumeric
/// tokens, sorted and rejoined before an edit-distance comparison.
pub fn similarity(a: &str, b: &str) -> u8 {
    let left = sorted_tokens(a);
    let right = sorted_tokens(b);
    if left.is_empty() && right.is_empty() {
        return 0;
    }
    let ratio = strsim::normalized_levenshtein(&left, &right);
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

fn sorted_tokens(value: &str) -> String {
    let lowered = value.to_lowercase();
    let mut tokens: Vec<&str> = lowered
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
