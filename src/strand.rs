/// Strand records: named cohort/role tags
use serde::{Deserialize, Serialize};

/// The value of a strand: a single label or an ordered list of labels.
///
/// Serialized untagged, so stored JSON reads `"B"` or `["A", "B"]`. Any other
/// JSON written by other scripts is kept as `Other` and written back as is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StrandValue {
    One(String),
    Many(Vec<String>),
    Other(serde_json::Value),
}

impl StrandValue {
    /// Flatten to a label list, preserving order.
    pub fn labels(&self) -> Vec<String> {
        match self {
            StrandValue::One(label) => vec![label.clone()],
            StrandValue::Many(labels) => labels.clone(),
            StrandValue::Other(_) => Vec::new(),
        }
    }
}

impl From<&str> for StrandValue {
    fn from(label: &str) -> Self {
        StrandValue::One(label.to_string())
    }
}

impl From<String> for StrandValue {
    fn from(label: String) -> Self {
        StrandValue::One(label)
    }
}

impl From<Vec<String>> for StrandValue {
    fn from(labels: Vec<String>) -> Self {
        StrandValue::Many(labels)
    }
}

/// A named strand as persisted in the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Strand {
    pub name: String,
    pub value: StrandValue,
}

impl Strand {
    pub fn new(name: impl Into<String>, value: impl Into<StrandValue>) -> Strand {
        Strand {
            name: name.into(),
            value: value.into(),
        }
    }
}
