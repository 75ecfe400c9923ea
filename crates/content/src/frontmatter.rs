//! Markdown frontmatter parsing.
//!
//! Supports the subset drafts actually use: a leading `---` fenced block of
//! `key: value` lines, where values are plain or quoted strings, inline lists
//! (`[a, b]`) or dash lists on the following lines.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn key_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_-]+)\s*:\s*(.*)$").expect("static regex"))
}

fn dash_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*-\s+(.*)$").expect("static regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter {
    fields: BTreeMap<String, FrontmatterValue>,
}

impl Frontmatter {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.fields.get(key)
    }

    /// Returns a text value; lists are not coerced.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            FrontmatterValue::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Returns a list value. A text value is split on commas.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(FrontmatterValue::List(items)) => items.clone(),
            Some(FrontmatterValue::Text(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FrontmatterValue) {
        self.fields.insert(key.into(), value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// A markdown draft split into frontmatter and body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDraft {
    pub frontmatter: Frontmatter,
    pub body: String,
    /// Frontmatter `title`, else the first level-one heading.
    pub title: Option<String>,
}

impl ParsedDraft {
    /// `tags` and `keywords` frontmatter lists combined.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags = self.frontmatter.get_list("tags");
        tags.extend(self.frontmatter.get_list("keywords"));
        tags
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

fn parse_value(raw: &str) -> FrontmatterValue {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let items = inner
            .split(',')
            .map(unquote)
            .filter(|s| !s.is_empty())
            .collect();
        return FrontmatterValue::List(items);
    }
    FrontmatterValue::Text(unquote(raw))
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Splits the frontmatter block off `source`. Returns `None` when there is no
/// opening fence or it is never closed.
fn split_frontmatter(source: &str) -> Option<(Vec<&str>, String)> {
    let source = source.trim_start_matches('\u{feff}');
    let mut lines = source.lines();
    if !lines.next().is_some_and(is_fence) {
        return None;
    }

    let mut block = Vec::new();
    for line in lines.by_ref() {
        if is_fence(line) {
            let body: Vec<&str> = lines.collect();
            return Some((block, body.join("\n")));
        }
        block.push(line);
    }
    None
}

fn parse_block(lines: &[&str]) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();
    let mut list_key: Option<String> = None;

    for line in lines {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        if let Some(key) = &list_key {
            if let Some(caps) = dash_item().captures(line) {
                let item = unquote(&caps[1]);
                if let Some(FrontmatterValue::List(items)) = frontmatter.fields.get_mut(key) {
                    items.push(item);
                }
                continue;
            }
        }

        if let Some(caps) = key_line().captures(line) {
            let key = caps[1].to_string();
            let value = caps[2].trim();
            if value.is_empty() {
                frontmatter.insert(key.clone(), FrontmatterValue::List(Vec::new()));
                list_key = Some(key);
            } else {
                frontmatter.insert(key, parse_value(value));
                list_key = None;
            }
        }
    }

    // A key with no value and no dash items is an empty string
    for value in frontmatter.fields.values_mut() {
        if matches!(value, FrontmatterValue::List(items) if items.is_empty()) {
            *value = FrontmatterValue::Text(String::new());
        }
    }
    frontmatter
}

/// Text of the first level-one heading, ATX or setext. Headings inside code
/// blocks are not headings.
fn first_heading(body: &str) -> Option<String> {
    let mut title: Option<String> = None;
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => title = Some(String::new()),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let text = title.take().map(|t| t.trim().to_string());
                if text.as_deref().is_some_and(|t| !t.is_empty()) {
                    return text;
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = title.as_mut() {
                    title.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(title) = title.as_mut() {
                    title.push(' ');
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses a markdown draft.
#[must_use]
pub fn parse_draft(source: &str) -> ParsedDraft {
    let (frontmatter, body) = match split_frontmatter(source) {
        Some((block, body)) => (parse_block(&block), body),
        None => (Frontmatter::default(), source.to_string()),
    };

    let title = frontmatter
        .get_str("title")
        .map(str::to_string)
        .or_else(|| first_heading(&body));

    ParsedDraft {
        frontmatter,
        body,
        title,
    }
}
