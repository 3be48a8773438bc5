//! Puzzle Catalog
//!
//! Immutable puzzle definitions, embedded at build time from the
//! repo-root `puzzles.json`. One entry per calendar day; the catalog
//! length defines the schedule's day count.

use serde::Deserialize;

const CATALOG_JSON: &str = include_str!("../puzzles.json");

/// A single daily puzzle. Created at build time, never mutated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub question: String,
    pub answer: AnswerSpec,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub reveal_text: Option<String>,
}

/// One or more accepted answers, mirroring the catalog's
/// `"answer": "..."` / `"answer": ["...", "..."]` forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswerSpec {
    One(String),
    Many(Vec<String>),
}

impl AnswerSpec {
    pub fn as_slice(&self) -> &[String] {
        match self {
            AnswerSpec::One(s) => std::slice::from_ref(s),
            AnswerSpec::Many(v) => v,
        }
    }
}

impl Puzzle {
    /// Accepted answers for this puzzle.
    pub fn answers(&self) -> &[String] {
        self.answer.as_slice()
    }

    /// Display title, falling back to the day number.
    pub fn display_title(&self, day_number: usize) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Day {day_number}"))
    }
}

/// Load the embedded catalog.
pub fn load_catalog() -> Result<Vec<Puzzle>, serde_json::Error> {
    serde_json::from_str(CATALOG_JSON)
}

/// Find a puzzle by id.
pub fn find<'a>(puzzles: &'a [Puzzle], id: &str) -> Option<&'a Puzzle> {
    puzzles.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads_and_ids_are_unique() {
        let puzzles = load_catalog().expect("embedded catalog parses");
        assert!(!puzzles.is_empty());

        let mut ids: Vec<&str> = puzzles.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), puzzles.len(), "duplicate puzzle ids");

        for p in &puzzles {
            assert!(!p.question.is_empty());
            assert!(!p.answers().is_empty());
        }
    }

    #[test]
    fn test_answer_spec_forms() {
        let one: Puzzle =
            serde_json::from_str(r#"{"id":"x","question":"q","answer":"solo"}"#).unwrap();
        assert_eq!(one.answers(), ["solo".to_string()]);

        let many: Puzzle =
            serde_json::from_str(r#"{"id":"y","question":"q","answer":["a","b"]}"#).unwrap();
        assert_eq!(many.answers().len(), 2);
    }

    #[test]
    fn test_find_by_id() {
        let puzzles = load_catalog().unwrap();
        assert!(find(&puzzles, "d1").is_some());
        assert!(find(&puzzles, "nope").is_none());
    }

    #[test]
    fn test_display_title_fallback() {
        let p: Puzzle =
            serde_json::from_str(r#"{"id":"x","question":"q","answer":"a"}"#).unwrap();
        assert_eq!(p.display_title(3), "Day 3");
    }
}
