//! Document trees loaded from YAML/JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::node::{DocumentNode, NodeId};

/// Errors that can occur when loading documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document file")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// A document with ranked matches and sub-element chunks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Document {
    /// Identifier, unique within its parent's children by convention
    pub id: String,

    /// Text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Arbitrary payload compared by evaluation logic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, Value>,

    /// Named scores (e.g. relevance of a match)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scores: BTreeMap<String, f64>,

    /// Ranked results, best first
    #[serde(default)]
    pub matches: Vec<Document>,

    /// Sub-elements, in document order
    #[serde(default)]
    pub chunks: Vec<Document>,
}

impl Document {
    /// Create an empty document with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<Value>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_score(mut self, name: impl Into<String>, value: f64) -> Self {
        self.scores.insert(name.into(), value);
        self
    }

    /// Append a match (lowest rank so far).
    pub fn with_match(mut self, doc: Document) -> Self {
        self.matches.push(doc);
        self
    }

    pub fn with_chunk(mut self, doc: Document) -> Self {
        self.chunks.push(doc);
        self
    }

    /// Parse a document tree from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        let doc: Document = serde_yaml::from_str(yaml)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse a document tree from JSON string.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: Document = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse a document tree from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a document tree from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a document tree from a file, choosing the format by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::from_json_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Err(DocumentError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Total number of documents in this tree, including the root.
    pub fn tree_size(&self) -> usize {
        1 + self
            .matches
            .iter()
            .chain(self.chunks.iter())
            .map(Document::tree_size)
            .sum::<usize>()
    }

    /// Every document in the tree must carry an id.
    fn validate(&self) -> Result<(), DocumentError> {
        self.validate_at("")
    }

    fn validate_at(&self, location: &str) -> Result<(), DocumentError> {
        if self.id.trim().is_empty() {
            let field = if location.is_empty() {
                "id".to_string()
            } else {
                format!("{location}.id")
            };
            return Err(DocumentError::MissingField(field));
        }

        let prefix = |kind: &str, i: usize| {
            if location.is_empty() {
                format!("{kind}[{i}]")
            } else {
                format!("{location}.{kind}[{i}]")
            }
        };

        for (i, m) in self.matches.iter().enumerate() {
            m.validate_at(&prefix("matches", i))?;
        }
        for (i, c) in self.chunks.iter().enumerate() {
            c.validate_at(&prefix("chunks", i))?;
        }

        Ok(())
    }
}

impl DocumentNode for Document {
    fn matches(&self) -> &[Self] {
        &self.matches
    }

    fn chunks(&self) -> &[Self] {
        &self.chunks
    }
}

impl NodeId for Document {
    fn id(&self) -> &str {
        &self.id
    }
}
