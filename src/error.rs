//! Error types for the ordered tree.
//!
//! Lookups that may legitimately miss (`get`, `contains`, `remove`) report
//! absence through `Option`. Only [`OrderedTree::get_value`] turns a missing
//! key into an error, and [`OrderedTree::check_invariants`] reports broken
//! structure.
//!
//! [`OrderedTree::get_value`]: crate::tree::OrderedTree::get_value
//! [`OrderedTree::check_invariants`]: crate::tree::OrderedTree::check_invariants

use thiserror::Error;

/// Represents errors reported by [`OrderedTree`](crate::tree::OrderedTree).
///
/// # Examples
///
/// ```rust
/// use ordtree::TreeError;
///
/// let error = TreeError::KeyNotFound { key: "44".to_string() };
/// assert_eq!(format!("{error}"), "key not found: 44");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The requested key is not present in the tree.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// `Debug` rendering of the missing key.
        key: String,
    },

    /// A structural invariant does not hold.
    ///
    /// Never produced by a correct build; surfaced by
    /// [`OrderedTree::check_invariants`](crate::tree::OrderedTree::check_invariants).
    #[error("tree invariant violated: {detail}")]
    InvariantViolation {
        /// Which invariant broke and where.
        detail: String,
    },
}

impl TreeError {
    pub(crate) fn key_not_found<Q: std::fmt::Debug + ?Sized>(key: &Q) -> Self {
        Self::KeyNotFound {
            key: format!("{key:?}"),
        }
    }

    pub(crate) fn violation(detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            detail: detail.into(),
        }
    }
}
