//! Pairing of an actual node with its ground-truth counterpart.
//!
//! A [`Pair`] holds one node from the actual tree and the node in the
//! reference tree it is expected to correspond to. Asking a pair for its
//! paired matches or paired chunks yields one more level of pairs, so a
//! caller can walk both trees in lockstep as deep as it needs.
//!
//! Child counts are checked when a level is requested, never at
//! construction. A count mismatch is an error: pairs are never truncated
//! or padded to make two lists line up.

use std::iter::{FusedIterator, Zip};
use std::slice;

use thiserror::Error;

use crate::node::{DocumentNode, Relation};

/// Errors raised while pairing two trees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairError {
    #[error("Structural mismatch in {relation}: actual has {actual}, reference has {reference}")]
    StructuralMismatch {
        relation: Relation,
        actual: usize,
        reference: usize,
    },
}

/// An actual node together with its reference node.
#[derive(Debug, PartialEq)]
pub struct Pair<'a, N> {
    actual: &'a N,
    reference: &'a N,
}

impl<N> Clone for Pair<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Pair<'_, N> {}

impl<'a, N: DocumentNode> Pair<'a, N> {
    /// Associate an actual node with its reference node.
    pub fn new(actual: &'a N, reference: &'a N) -> Self {
        Self { actual, reference }
    }

    /// The node from the actual tree.
    pub fn actual(&self) -> &'a N {
        self.actual
    }

    /// The node from the reference (ground truth) tree.
    pub fn reference(&self) -> &'a N {
        self.reference
    }

    /// Pair up the matches of both nodes, position by position.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::StructuralMismatch`] if the two nodes have a
    /// different number of matches.
    pub fn paired_matches(&self) -> Result<PairIter<'a, N>, PairError> {
        self.paired(Relation::Matches)
    }

    /// Pair up the chunks of both nodes, position by position.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::StructuralMismatch`] if the two nodes have a
    /// different number of chunks.
    pub fn paired_chunks(&self) -> Result<PairIter<'a, N>, PairError> {
        self.paired(Relation::Chunks)
    }

    /// Pair up the children of both nodes under `relation`.
    ///
    /// Each call returns a fresh iterator over the children as they are
    /// now; the pair itself is never changed.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::StructuralMismatch`] if the child counts differ.
    pub fn paired(&self, relation: Relation) -> Result<PairIter<'a, N>, PairError> {
        let actual = self.actual.children(relation);
        let reference = self.reference.children(relation);

        if actual.len() != reference.len() {
            tracing::debug!(
                %relation,
                actual = actual.len(),
                reference = reference.len(),
                "Child counts differ, refusing to pair"
            );
            return Err(PairError::StructuralMismatch {
                relation,
                actual: actual.len(),
                reference: reference.len(),
            });
        }

        tracing::trace!(%relation, count = actual.len(), "Pairing children");
        Ok(PairIter {
            inner: actual.iter().zip(reference.iter()),
        })
    }
}

/// Iterator over the pairs of one level, in child order.
#[derive(Debug)]
pub struct PairIter<'a, N> {
    inner: Zip<slice::Iter<'a, N>, slice::Iter<'a, N>>,
}

impl<N> Clone for PairIter<'_, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, N> Iterator for PairIter<'a, N> {
    type Item = Pair<'a, N>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(actual, reference)| Pair { actual, reference })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<N> DoubleEndedIterator for PairIter<'_, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|(actual, reference)| Pair { actual, reference })
    }
}

impl<N> ExactSizeIterator for PairIter<'_, N> {}

impl<N> FusedIterator for PairIter<'_, N> {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestNode {
        label: String,
        matches: Vec<TestNode>,
        chunks: Vec<TestNode>,
    }

    impl TestNode {
        fn leaf(label: &str) -> Self {
            Self {
                label: label.to_string(),
                matches: vec![],
                chunks: vec![],
            }
        }

        fn with_matches(label: &str, matches: Vec<TestNode>) -> Self {
            Self {
                matches,
                ..Self::leaf(label)
            }
        }

        fn with_chunks(label: &str, chunks: Vec<TestNode>) -> Self {
            Self {
                chunks,
                ..Self::leaf(label)
            }
        }
    }

    impl DocumentNode for TestNode {
        fn matches(&self) -> &[Self] {
            &self.matches
        }

        fn chunks(&self) -> &[Self] {
            &self.chunks
        }
    }

    fn labels<'a>(pairs: impl Iterator<Item = Pair<'a, TestNode>>) -> Vec<(String, String)> {
        pairs
            .map(|p| (p.actual().label.clone(), p.reference().label.clone()))
            .collect()
    }

    #[test]
    fn test_matches_paired_in_order() {
        let actual = TestNode::with_matches("a", vec![TestNode::leaf("A0"), TestNode::leaf("A1")]);
        let reference =
            TestNode::with_matches("r", vec![TestNode::leaf("R0"), TestNode::leaf("R1")]);

        let pair = Pair::new(&actual, &reference);
        let pairs: Vec<_> = pair.paired_matches().unwrap().collect();

        assert_eq!(pairs.len(), 2);
        assert!(std::ptr::eq(pairs[0].actual(), &actual.matches[0]));
        assert!(std::ptr::eq(pairs[0].reference(), &reference.matches[0]));
        assert!(std::ptr::eq(pairs[1].actual(), &actual.matches[1]));
        assert!(std::ptr::eq(pairs[1].reference(), &reference.matches[1]));
    }

    #[test]
    fn test_match_count_mismatch() {
        let actual = TestNode::with_matches("a", vec![TestNode::leaf("A0"), TestNode::leaf("A1")]);
        let reference = TestNode::with_matches("r", vec![TestNode::leaf("R0")]);

        let result = Pair::new(&actual, &reference).paired_matches();

        assert_eq!(
            result.unwrap_err(),
            PairError::StructuralMismatch {
                relation: Relation::Matches,
                actual: 2,
                reference: 1,
            }
        );
    }

    #[test]
    fn test_chunk_mismatch_ignores_matches() {
        let actual = TestNode::with_chunks("a", vec![TestNode::leaf("c0")]);
        let reference = TestNode::leaf("r");

        let pair = Pair::new(&actual, &reference);

        // Matches line up (both empty) even though chunks do not
        assert_eq!(pair.paired_matches().unwrap().count(), 0);
        assert!(matches!(
            pair.paired_chunks(),
            Err(PairError::StructuralMismatch {
                relation: Relation::Chunks,
                actual: 1,
                reference: 0,
            })
        ));
    }

    #[test]
    fn test_empty_levels_are_not_errors() {
        let actual = TestNode::leaf("a");
        let reference = TestNode::leaf("r");
        let pair = Pair::new(&actual, &reference);

        assert_eq!(pair.paired_matches().unwrap().len(), 0);
        assert_eq!(pair.paired_chunks().unwrap().next(), None);
    }

    #[test]
    fn test_two_level_composition() {
        let tree = |prefix: &str| {
            let matches = (0..2)
                .map(|i| {
                    let chunks = (0..3)
                        .map(|j| TestNode::leaf(&format!("{prefix}{i}.{j}")))
                        .collect();
                    TestNode::with_chunks(&format!("{prefix}{i}"), chunks)
                })
                .collect();
            TestNode::with_matches(prefix, matches)
        };
        let actual = tree("A");
        let reference = tree("R");

        let mut leaves = Vec::new();
        for m in Pair::new(&actual, &reference).paired_matches().unwrap() {
            leaves.extend(labels(m.paired_chunks().unwrap()));
        }

        assert_eq!(leaves.len(), 6);
        for (n, (a, r)) in leaves.iter().enumerate() {
            let (i, j) = (n / 3, n % 3);
            assert_eq!(a, &format!("A{i}.{j}"));
            assert_eq!(r, &format!("R{i}.{j}"));
        }
    }

    #[test]
    fn test_iterator_is_exact_and_reversible() {
        let actual = TestNode::with_chunks(
            "a",
            vec![TestNode::leaf("a0"), TestNode::leaf("a1"), TestNode::leaf("a2")],
        );
        let reference = TestNode::with_chunks(
            "r",
            vec![TestNode::leaf("r0"), TestNode::leaf("r1"), TestNode::leaf("r2")],
        );

        let mut iter = Pair::new(&actual, &reference).paired_chunks().unwrap();
        assert_eq!(iter.len(), 3);

        let last = iter.next_back().unwrap();
        assert_eq!(last.actual().label, "a2");
        assert_eq!(iter.len(), 2);
        assert_eq!(
            labels(iter),
            vec![
                ("a0".to_string(), "r0".to_string()),
                ("a1".to_string(), "r1".to_string()),
            ]
        );
    }

    #[test]
    fn test_pair_is_copy() {
        let actual = TestNode::leaf("a");
        let reference = TestNode::leaf("r");
        let pair = Pair::new(&actual, &reference);
        let copied = pair;

        assert_eq!(pair, copied);
        assert_eq!(copied.reference().label, "r");
    }

    fn node_strategy() -> impl Strategy<Value = TestNode> {
        let leaf = "[a-z]{1,4}".prop_map(|l| TestNode::leaf(&l));
        (
            "[a-z]{1,4}",
            proptest::collection::vec(leaf.clone(), 0..6),
            proptest::collection::vec(leaf, 0..6),
        )
            .prop_map(|(label, matches, chunks)| TestNode {
                label,
                matches,
                chunks,
            })
    }

    proptest! {
        #[test]
        fn paired_children_line_up_by_position(
            actual in node_strategy(),
            reference in node_strategy(),
        ) {
            let pair = Pair::new(&actual, &reference);

            for relation in [Relation::Matches, Relation::Chunks] {
                let a = actual.children(relation);
                let r = reference.children(relation);

                match pair.paired(relation) {
                    Ok(iter) => {
                        prop_assert_eq!(a.len(), r.len());
                        let pairs: Vec<_> = iter.collect();
                        prop_assert_eq!(pairs.len(), a.len());
                        for (i, p) in pairs.iter().enumerate() {
                            prop_assert!(std::ptr::eq(p.actual(), &a[i]));
                            prop_assert!(std::ptr::eq(p.reference(), &r[i]));
                        }
                    }
                    Err(PairError::StructuralMismatch { actual: na, reference: nr, .. }) => {
                        prop_assert_ne!(a.len(), r.len());
                        prop_assert_eq!(na, a.len());
                        prop_assert_eq!(nr, r.len());
                    }
                }
            }
        }

        #[test]
        fn repeated_pairing_is_identical(
            actual in node_strategy(),
            reference in node_strategy(),
        ) {
            let pair = Pair::new(&actual, &reference);
            let first = pair.paired_matches().map(|it| it.collect::<Vec<_>>());
            let second = pair.paired_matches().map(|it| it.collect::<Vec<_>>());
            prop_assert_eq!(first, second);
        }
    }
}
