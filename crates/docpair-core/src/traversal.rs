//! Traversal paths: walking several pairing levels in one call.
//!
//! A path is written as a string of steps. `r` names the root pair
//! itself; otherwise each `m` descends into matches and each `c` into
//! chunks, read left to right, so `mc` is the chunks of every match.
//!
//! This sits on top of [`Pair`]: every step is one call to
//! [`Pair::paired`], applied to each pair produced by the previous step.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::node::{DocumentNode, Relation};
use crate::pair::{Pair, PairError};

lazy_static! {
    /// `r` alone, or one or more relation steps
    static ref PATH_PATTERN: Regex = Regex::new(r"^(?:r|[mc]+)$").unwrap();
}

/// Errors from parsing or walking a traversal path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Invalid traversal path: {0:?} (expected \"r\" or a sequence of 'm'/'c')")]
    Invalid(String),

    #[error(transparent)]
    Pair(#[from] PairError),
}

/// A sequence of relation steps from a root pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TraversalPath {
    steps: Vec<Relation>,
}

impl TraversalPath {
    /// The root itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: impl IntoIterator<Item = Relation>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Parse a path such as `"r"`, `"m"` or `"mcc"`.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if !PATH_PATTERN.is_match(path) {
            return Err(PathError::Invalid(path.to_string()));
        }

        Ok(Self {
            steps: path.chars().filter_map(Relation::from_step).collect(),
        })
    }

    pub fn steps(&self) -> &[Relation] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// The path made of the first `len` steps.
    pub fn prefix(&self, len: usize) -> Self {
        Self::from_steps(self.steps.iter().copied().take(len))
    }
}

impl FromStr for TraversalPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TraversalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "r");
        }
        for step in &self.steps {
            write!(f, "{}", step.step())?;
        }
        Ok(())
    }
}

/// A level at which a walk stopped because child counts disagree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("at {at}: {source}")]
pub struct LevelMismatch {
    /// Shortest prefix of the walked path that fails to pair
    pub at: TraversalPath,
    pub source: PairError,
}

/// Follow `path` from `root`, reporting where the walk stopped on failure.
///
/// Pairs come out depth-first: all descendants of the first pair at a
/// level precede those of the second. The first level whose child counts
/// disagree aborts the walk.
///
/// # Errors
///
/// Returns a [`LevelMismatch`] naming the failing prefix.
pub fn walk<'a, N: DocumentNode>(
    root: Pair<'a, N>,
    path: &TraversalPath,
) -> Result<Vec<Pair<'a, N>>, LevelMismatch> {
    let mut level = vec![root];

    for (depth, &relation) in path.steps().iter().enumerate() {
        let mut next = Vec::new();
        for pair in &level {
            let children = pair.paired(relation).map_err(|source| LevelMismatch {
                at: path.prefix(depth + 1),
                source,
            })?;
            next.extend(children);
        }
        level = next;
    }

    tracing::debug!(%path, pairs = level.len(), "Traversal path walked");
    Ok(level)
}

/// Collect every pair reached by following `path` from `root`.
///
/// # Errors
///
/// Returns the [`PairError`] of the first mismatching level.
pub fn pairs_at<'a, N: DocumentNode>(
    root: Pair<'a, N>,
    path: &TraversalPath,
) -> Result<Vec<Pair<'a, N>>, PairError> {
    walk(root, path).map_err(|m| m.source)
}

/// Parse `path` and walk it from `root`.
///
/// # Errors
///
/// Returns [`PathError::Invalid`] for a malformed path and
/// [`PathError::Pair`] for a structural mismatch.
pub fn pairs_at_str<'a, N: DocumentNode>(
    root: Pair<'a, N>,
    path: &str,
) -> Result<Vec<Pair<'a, N>>, PathError> {
    let path = TraversalPath::parse(path)?;
    Ok(pairs_at(root, &path)?)
}

/// Find the shortest prefix of `path` whose walk fails.
///
/// Returns `None` when the whole path can be walked.
pub fn locate_mismatch<N: DocumentNode>(
    root: Pair<'_, N>,
    path: &TraversalPath,
) -> Option<LevelMismatch> {
    walk(root, path).err()
}
