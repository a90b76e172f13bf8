//! Citation lists returned by retrieval-style services.

use serde_json::Value;
use std::fmt::Write as _;

use super::fields::{as_number, as_text};

/// Quoted excerpts longer than this many characters are cut.
pub const EXCERPT_MAX_CHARS: usize = 150;

const UNKNOWN_SOURCE: &str = "Unknown source";

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Source {
    pub file_name: String,
    pub score: Option<f64>,
    pub excerpt: Option<String>,
}

fn parse_source(item: &Value) -> Option<Source> {
    if let Some(name) = as_text(item) {
        return Some(Source {
            file_name: name,
            score: None,
            excerpt: None,
        });
    }
    let object = item.as_object()?;

    let file_name = ["fileName", "filename", "source"]
        .iter()
        .find_map(|key| object.get(*key).and_then(as_text))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());
    let score = ["individualScore", "score"]
        .iter()
        .find_map(|key| object.get(*key).and_then(as_number));
    let excerpt = ["textSegment", "text"]
        .iter()
        .find_map(|key| object.get(*key).and_then(as_text));

    Some(Source {
        file_name,
        score,
        excerpt,
    })
}

/// Parse a JSON source list, skipping entries that are neither text nor objects.
pub(super) fn collect(list: Option<&Value>) -> Vec<Source> {
    list.and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_source).collect())
        .unwrap_or_default()
}

/// Cut an excerpt to `EXCERPT_MAX_CHARS` characters, marking the cut with `...`.
pub fn truncate_excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() > EXCERPT_MAX_CHARS {
        let cut: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Relevance score as a percentage with one decimal, e.g. `0.876` -> `87.6%`.
pub fn format_score(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Render sources as a numbered list to append after the answer text.
pub(super) fn format_list(sources: &[Source]) -> String {
    let mut out = String::from("Sources:");
    for (index, source) in sources.iter().enumerate() {
        let _ = write!(out, "\n{}. {}", index + 1, source.file_name);
        if let Some(score) = source.score {
            let _ = write!(out, " ({})", format_score(score));
        }
        if let Some(excerpt) = &source.excerpt {
            let _ = write!(out, "\n   \"{}\"", truncate_excerpt(excerpt));
        }
    }
    out
}

/// Append a source list to `content` when there is one.
pub(super) fn append(content: &mut String, sources: &[Source]) {
    if sources.is_empty() {
        return;
    }
    content.push_str("\n\n");
    content.push_str(&format_list(sources));
}
