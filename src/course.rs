/// Course structure data as supplied by the embedding application
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A page entry in `topics.json`.
///
/// Only `strand` and `exceptions` drive visibility; the other fields are
/// carried through for display. Absent, null or mistyped fields parse as
/// empty, so one malformed page never rejects the course.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Page {
    #[serde(rename = "chapter-readable", deserialize_with = "text")]
    pub chapter_readable: String,
    #[serde(deserialize_with = "number")]
    pub chapter: f64,
    #[serde(deserialize_with = "text")]
    pub file: String,
    #[serde(rename = "elf-page", deserialize_with = "number")]
    pub elf_page: f64,
    #[serde(deserialize_with = "text")]
    pub label: String,
    #[serde(rename = "menuLabel", deserialize_with = "text")]
    pub menu_label: String,
    #[serde(deserialize_with = "text")]
    pub params: String,
    /// Free-text audience summary shown to authors
    #[serde(deserialize_with = "text")]
    pub strands: String,
    #[serde(rename = "stranding-description", deserialize_with = "text")]
    pub stranding_description: String,
    #[serde(deserialize_with = "labels")]
    pub strand: Vec<String>,
    #[serde(deserialize_with = "labels")]
    pub exceptions: Vec<String>,
}

#[cfg(test)]
impl Page {
    pub fn new(file: &str, strand: &[&str], exceptions: &[&str]) -> Page {
        Page {
            file: file.to_string(),
            label: file.to_string(),
            strand: strand.iter().map(|s| s.to_string()).collect(),
            exceptions: exceptions.iter().map(|s| s.to_string()).collect(),
            ..Page::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Topic {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "flag")]
    pub isadaptive: bool,
    #[serde(deserialize_with = "items")]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CourseStructure {
    #[serde(deserialize_with = "items")]
    pub topics: Vec<Topic>,
}

// Lenient field readers. Each takes whatever JSON is present and falls back
// to the empty value instead of failing the enclosing document.

fn labels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::String(label) => Some(label),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Entries that are not objects are skipped with a warning.
fn items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(values) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("Skipping unreadable course entry: {}", e);
                None
            }
        })
        .collect())
}

/// One step of the sequential preview: pages flattened across topics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewPage {
    pub id: String,
    pub content: String,
    pub label: String,
}

impl CourseStructure {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn page_count(&self) -> usize {
        self.topics.iter().map(|t| t.pages.len()).sum()
    }
}

/// Flatten topics into the order a preview navigator walks them.
pub fn preview_pages(topics: &[Topic]) -> Vec<PreviewPage> {
    topics
        .iter()
        .flat_map(|topic| topic.pages.iter())
        .map(|page| PreviewPage {
            id: page.file.clone(),
            content: page.chapter_readable.clone(),
            label: page.label.clone(),
        })
        .collect()
}
