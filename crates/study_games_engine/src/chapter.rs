//! Course and chapter data as handed over by the content loader.

use derive_getters::Getters;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument};

/// One raw term/definition entry. Either side may be missing.
///
/// A side that is not a string (a number, a list, `null`) reads as
/// missing, so the entry is filtered out instead of failing the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDefinition {
    /// The term (the answer).
    #[serde(default, deserialize_with = "text_or_absent")]
    pub term: Option<String>,
    /// The definition (the prompt).
    #[serde(default, deserialize_with = "text_or_absent")]
    pub definition: Option<String>,
}

fn text_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    })
}

impl TermDefinition {
    /// Creates an entry with both sides present.
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            definition: Some(definition.into()),
        }
    }
}

/// A chapter: an ordered list of term/definition entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter identifier used for selection.
    #[serde(default)]
    chapter_id: String,
    /// Short reference such as "Ch 3".
    #[serde(default)]
    chapter_ref: Option<String>,
    /// Human-readable title.
    #[serde(default)]
    chapter_title: Option<String>,
    /// Raw entries, possibly incomplete.
    #[serde(default)]
    term_definitions: Vec<TermDefinition>,
}

impl Chapter {
    /// Creates a chapter from its id and entries.
    pub fn new(chapter_id: impl Into<String>, term_definitions: Vec<TermDefinition>) -> Self {
        Self {
            chapter_id: chapter_id.into(),
            chapter_ref: None,
            chapter_title: None,
            term_definitions,
        }
    }

    /// Sets the title, returning the updated chapter.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.chapter_title = Some(title.into());
        self
    }

    /// Label shown in chapter menus, e.g. `Ch 2: Cells`.
    pub fn label(&self) -> String {
        let reference = self
            .chapter_ref
            .clone()
            .unwrap_or_else(|| format!("Ch {}", self.chapter_id));
        let title = self.chapter_title.as_deref().unwrap_or("Untitled Chapter");
        format!("{}: {}", reference, title)
    }
}

/// A course file: a list of chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// All chapters in file order.
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Course {
    /// Parses a course from its JSON representation.
    #[instrument(skip(json), fields(len = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let course: Self = serde_json::from_str(json)?;
        debug!(chapters = course.chapters.len(), "Parsed course");
        Ok(course)
    }

    /// Chapters that can be selected (those with an id).
    pub fn selectable(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter().filter(|c| !c.chapter_id.is_empty())
    }

    /// Looks a chapter up by id.
    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.selectable().find(|c| c.chapter_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_course_with_missing_fields() {
        let json = r#"{
            "chapters": [
                {
                    "chapter_id": "1",
                    "chapter_ref": "Ch 1",
                    "chapter_title": "Cells",
                    "term_definitions": [
                        {"term": "Nucleus", "definition": "Control center"},
                        {"term": "Ribosome"},
                        {"definition": "Orphan"}
                    ]
                },
                {"chapter_title": "No id"}
            ]
        }"#;

        let course = Course::from_json(json).expect("valid json");
        assert_eq!(course.chapters.len(), 2);
        assert_eq!(course.selectable().count(), 1);

        let chapter = course.chapter("1").expect("chapter 1");
        assert_eq!(chapter.label(), "Ch 1: Cells");
        assert_eq!(chapter.term_definitions().len(), 3);
        assert_eq!(chapter.term_definitions()[1].definition, None);
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let chapter = Chapter::new("7", Vec::new());
        assert_eq!(chapter.label(), "Ch 7: Untitled Chapter");
        assert_eq!(chapter.with_title("Genetics").label(), "Ch 7: Genetics");
    }

    #[test]
    fn test_non_string_sides_read_as_missing() {
        let json = r#"{
            "chapters": [{
                "chapter_id": "3",
                "term_definitions": [
                    {"term": 42, "definition": "The answer"},
                    {"term": "Gene", "definition": ["not", "text"]},
                    {"term": null, "definition": null},
                    {"term": "Allele", "definition": "Variant of a gene"}
                ]
            }]
        }"#;

        let course = Course::from_json(json).expect("bad entries do not fail the file");
        let entries = course.chapter("3").expect("chapter 3").term_definitions();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].term, None);
        assert_eq!(entries[1].definition, None);
        assert_eq!(entries[2], TermDefinition::default());
        assert_eq!(entries[3], TermDefinition::new("Allele", "Variant of a gene"));
    }
}
