//! Alignment reports: which levels of two trees line up, and where not.
//!
//! Unlike [`walk`](crate::traversal::walk), building a report
//! never fails. Every requested path gets its own outcome so a caller can
//! see all shape drift between actual and ground truth in one pass.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::node::{DocumentNode, NodeId, Relation};
use crate::pair::{Pair, PairError};
use crate::traversal::{walk, LevelMismatch, TraversalPath};

/// Ids of one actual/reference pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairedIds {
    pub actual: String,
    pub reference: String,
}

impl<N: DocumentNode + NodeId> From<Pair<'_, N>> for PairedIds {
    fn from(pair: Pair<'_, N>) -> Self {
        Self {
            actual: pair.actual().id().to_string(),
            reference: pair.reference().id().to_string(),
        }
    }
}

/// What happened when one path was walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LevelOutcome {
    Aligned {
        pairs: Vec<PairedIds>,
    },
    Mismatch {
        /// Shortest path prefix at which child counts disagree
        at: String,
        relation: Relation,
        actual: usize,
        reference: usize,
    },
}

impl LevelOutcome {
    pub fn is_aligned(&self) -> bool {
        matches!(self, LevelOutcome::Aligned { .. })
    }
}

/// Outcome for one traversal path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelReport {
    pub path: String,
    #[serde(flatten)]
    pub outcome: LevelOutcome,
}

/// Alignment of two document trees along a set of traversal paths.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    pub actual_id: String,
    pub reference_id: String,
    pub levels: Vec<LevelReport>,
    pub checked_at: DateTime<Utc>,
}

impl AlignmentReport {
    /// Walk every path from `root` and record each outcome.
    pub fn check<N: DocumentNode + NodeId>(root: Pair<'_, N>, paths: &[TraversalPath]) -> Self {
        let levels = paths
            .iter()
            .map(|path| LevelReport {
                path: path.to_string(),
                outcome: Self::check_path(root, path),
            })
            .collect::<Vec<_>>();

        let mismatches = levels.iter().filter(|l| !l.outcome.is_aligned()).count();
        if mismatches > 0 {
            tracing::warn!(
                actual = root.actual().id(),
                reference = root.reference().id(),
                mismatches,
                "Document trees are not aligned"
            );
        } else {
            tracing::info!(
                actual = root.actual().id(),
                reference = root.reference().id(),
                levels = levels.len(),
                "Document trees aligned"
            );
        }

        Self {
            actual_id: root.actual().id().to_string(),
            reference_id: root.reference().id().to_string(),
            levels,
            checked_at: Utc::now(),
        }
    }

    fn check_path<N: DocumentNode + NodeId>(
        root: Pair<'_, N>,
        path: &TraversalPath,
    ) -> LevelOutcome {
        match walk(root, path) {
            Ok(pairs) => LevelOutcome::Aligned {
                pairs: pairs.into_iter().map(PairedIds::from).collect(),
            },
            Err(LevelMismatch {
                at,
                source:
                    PairError::StructuralMismatch {
                        relation,
                        actual,
                        reference,
                    },
            }) => LevelOutcome::Mismatch {
                at: at.to_string(),
                relation,
                actual,
                reference,
            },
        }
    }

    /// True when every path lined up.
    pub fn is_aligned(&self) -> bool {
        self.levels.iter().all(|l| l.outcome.is_aligned())
    }

    /// Number of pairs found across all aligned levels.
    pub fn total_pairs(&self) -> usize {
        self.levels
            .iter()
            .map(|l| match &l.outcome {
                LevelOutcome::Aligned { pairs } => pairs.len(),
                LevelOutcome::Mismatch { .. } => 0,
            })
            .sum()
    }
}

impl fmt::Display for AlignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} vs {}", self.actual_id, self.reference_id)?;
        for level in &self.levels {
            match &level.outcome {
                LevelOutcome::Aligned { pairs } => {
                    writeln!(f, "  [{}] aligned, {} pair(s)", level.path, pairs.len())?;
                    for p in pairs {
                        writeln!(f, "    {} <-> {}", p.actual, p.reference)?;
                    }
                }
                LevelOutcome::Mismatch {
                    at,
                    relation,
                    actual,
                    reference,
                } => {
                    writeln!(
                        f,
                        "  [{}] MISMATCH at {}: {} count {} vs {}",
                        level.path, at, relation, actual, reference
                    )?;
                }
            }
        }
        Ok(())
    }
}
