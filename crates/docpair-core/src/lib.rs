//! # docpair-core
//!
//! Lockstep pairing of actual and ground-truth document trees.
//!
//! Evaluation code compares what a system produced against what it should
//! have produced. Both sides are trees: a document with ranked matches,
//! each made of chunks, and so on. This crate keeps the two trees in step
//! so comparison logic only ever sees one actual node and its expected
//! counterpart at a time.
//!
//! ## Key Guarantees
//!
//! 1. **Order-preserving**: the i-th child pairs with the i-th child
//! 2. **Fail-fast**: differing child counts are an error, never truncated
//! 3. **Read-only**: neither tree is mutated or copied
//! 4. **One level at a time**: callers decide how deep to go
//!
//! ## Example
//!
//! ```rust
//! use docpair_core::{Document, Pair};
//!
//! let actual = Document::new("q")
//!     .with_match(Document::new("a0"))
//!     .with_match(Document::new("a1"));
//! let groundtruth = Document::new("q")
//!     .with_match(Document::new("r0"))
//!     .with_match(Document::new("r1"));
//!
//! let pair = Pair::new(&actual, &groundtruth);
//! for m in pair.paired_matches()? {
//!     println!("{} should be {}", m.actual().id, m.reference().id);
//! }
//! # Ok::<(), docpair_core::PairError>(())
//! ```

pub mod document;
pub mod node;
pub mod pair;
pub mod report;
pub mod traversal;

// Re-export main types at crate root
pub use document::{Document, DocumentError};
pub use node::{DocumentNode, NodeId, Relation};
pub use pair::{Pair, PairError, PairIter};
pub use report::{AlignmentReport, LevelOutcome, LevelReport, PairedIds};
pub use traversal::{
    locate_mismatch, pairs_at, pairs_at_str, walk, LevelMismatch, PathError, TraversalPath,
};
