//! The capability a document-like tree node must expose to be paired.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two child relations a document node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// Ranked results associated with the node (order encodes rank)
    Matches,

    /// Sub-elements the node is made of
    Chunks,
}

impl Relation {
    /// The single-character step used in traversal paths.
    pub fn step(self) -> char {
        match self {
            Relation::Matches => 'm',
            Relation::Chunks => 'c',
        }
    }

    /// Parse a traversal path step.
    pub fn from_step(step: char) -> Option<Self> {
        match step {
            'm' => Some(Relation::Matches),
            'c' => Some(Relation::Chunks),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Matches => write!(f, "matches"),
            Relation::Chunks => write!(f, "chunks"),
        }
    }
}

/// A node in a document tree.
///
/// Implementors hand out their children as ordered, read-only slices.
/// Nothing else about the node is visible to the pairing logic.
pub trait DocumentNode: Sized {
    /// Ranked results, in rank order.
    fn matches(&self) -> &[Self];

    /// Sub-elements, in document order.
    fn chunks(&self) -> &[Self];

    /// Children under the given relation.
    fn children(&self, relation: Relation) -> &[Self] {
        match relation {
            Relation::Matches => self.matches(),
            Relation::Chunks => self.chunks(),
        }
    }
}

/// Nodes that carry a stable identifier, used when reporting pairs.
pub trait NodeId {
    fn id(&self) -> &str;
}
