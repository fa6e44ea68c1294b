//! Converts an old hand-written launcher batch script into catalog JSON.
//!
//! The script keeps one label block per mod (`:CODE`, an optional `cd`, a
//! `start` line carrying the wad paths, then `EXIT /B`) and a menu section
//! whose lines hold the code at columns 5..9 and the title from column 12.
//! Both sections live at fixed line ranges that the caller supplies.

use crate::catalog::{Catalog, Entry};
use anyhow::{bail, Context, Result};
use std::{fs, path::Path, time::SystemTime};
use time::OffsetDateTime;

pub const DEFAULT_ROOT_PREFIX: &str = r"E:\DOOM";

/// Half-open range of zero-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// `"<start>:<end>"`.
    pub fn parse(value: &str) -> Result<Self> {
        let (start, end) = value
            .split_once(':')
            .with_context(|| format!("range '{value}' must look like <start>:<end>"))?;
        let start: usize = start.trim().parse().with_context(|| format!("bad range start in '{value}'"))?;
        let end: usize = end.trim().parse().with_context(|| format!("bad range end in '{value}'"))?;
        if end < start {
            bail!("range '{value}' ends before it starts");
        }
        Ok(Self { start, end })
    }

    fn slice<'a>(&self, lines: &'a [String]) -> Result<&'a [String]> {
        if self.end > lines.len() {
            bail!(
                "range {}:{} runs past the end of the script ({} lines)",
                self.start,
                self.end,
                lines.len()
            );
        }
        Ok(&lines[self.start..self.end])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRange {
    pub range: LineRange,
    pub category: String,
}

impl TitleRange {
    /// `"<start>:<end>:<category>"`; the category may contain colons.
    pub fn parse(value: &str) -> Result<Self> {
        let mut parts = value.splitn(3, ':');
        let (Some(start), Some(end), Some(category)) = (parts.next(), parts.next(), parts.next())
        else {
            bail!("title range '{value}' must look like <start>:<end>:<category>");
        };
        Ok(Self {
            range: LineRange::parse(&format!("{start}:{end}"))?,
            category: category.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BatchLayout {
    pub mods: LineRange,
    pub titles: Vec<TitleRange>,
    pub root_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Title {
    code: String,
    title: String,
    category: String,
}

pub fn parse_file(path: &Path, layout: &BatchLayout) -> Result<Catalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read batch script {}", path.display()))?;
    let lines: Vec<String> = raw.lines().map(str::to_string).collect();
    parse_lines(&lines, layout)
}

pub fn parse_lines(lines: &[String], layout: &BatchLayout) -> Result<Catalog> {
    let entries = parse_mod_blocks(layout.mods.slice(lines)?, &layout.root_prefix);
    let mut titles = Vec::new();
    for range in &layout.titles {
        titles.extend(parse_titles(range.range.slice(lines)?, &range.category));
    }

    let grouped = entries.into_iter().map(|mut entry| {
        let title = titles
            .iter()
            .find(|title| title.code.eq_ignore_ascii_case(&entry.code));
        let category = match title {
            Some(title) => {
                entry.description = title.title.clone();
                Some(title.category.clone())
            }
            None => {
                log::warn!("no menu title for '{}'", entry.code);
                None
            }
        };
        if let Some(first) = entry.paths.first() {
            entry.year = file_year(Path::new(first));
        }
        (category, entry)
    });
    Ok(Catalog::from_grouped(grouped))
}

fn parse_mod_blocks(lines: &[String], root_prefix: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut current = Entry::default();

    for line in lines {
        let line = line.trim_end();
        if let Some(code) = line.strip_prefix(':') {
            current.code = code.trim().to_string();
        } else if starts_with_ignore_case(line, "cd") {
            continue;
        } else if starts_with_ignore_case(line, "start") {
            for token in tokenize(line) {
                if token.starts_with(root_prefix) {
                    current.paths.push(token);
                } else if token.to_ascii_lowercase().ends_with(".wad") {
                    current.alt_iwad = Some(token);
                }
            }
        } else if line.trim().eq_ignore_ascii_case("EXIT /B") {
            entries.push(std::mem::take(&mut current));
        }
    }

    entries
}

fn parse_titles(lines: &[String], category: &str) -> Vec<Title> {
    lines
        .iter()
        .map(|line| Title {
            code: line.chars().skip(5).take(4).collect::<String>().trim().to_string(),
            title: line.chars().skip(12).collect::<String>().trim_end().to_string(),
            category: category.to_string(),
        })
        .filter(|title| !title.code.is_empty())
        .collect()
}

/// Splits on spaces; a double-quoted run is one token, quotes removed.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                if quoted && !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = !quoted;
            }
            ' ' if !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn file_year(path: &Path) -> Option<i32> {
    let meta = fs::metadata(path).ok()?;
    let stamp: SystemTime = meta.created().or_else(|_| meta.modified()).ok()?;
    Some(OffsetDateTime::from(stamp).year())
}

/// Pretty JSON for the `Mods` section of a settings file.
pub fn to_json(catalog: &Catalog) -> Result<String> {
    serde_json::to_string_pretty(catalog).context("serialize catalog")
}
