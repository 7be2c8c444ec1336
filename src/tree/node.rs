// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Owned node structure of the integrity tree.

use sha2::{Digest, Sha256};

/// A node in the integrity tree.
///
/// Internal nodes exclusively own both children. When a level has an odd
/// count, the last node is cloned into the right slot and the parent is
/// marked `mirrored`, so every internal node has two logical children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Wraps one resource id
    Leaf {
        id: String,
    },
    /// Combined hash of both children's values
    Internal {
        hash: String,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        /// True if `right` is a duplicate of `left`
        mirrored: bool,
    },
}

impl TreeNode {
    pub fn leaf(id: impl Into<String>) -> Self {
        Self::Leaf { id: id.into() }
    }

    /// Create an interior node, computing its hash from the children.
    pub fn internal(left: TreeNode, right: TreeNode) -> Self {
        let hash = Self::combine(left.value(), right.value());
        Self::Internal {
            hash,
            left: Box::new(left),
            right: Box::new(right),
            mirrored: false,
        }
    }

    /// Pair an unpaired node with a copy of itself.
    pub fn mirrored(only: TreeNode) -> Self {
        let hash = Self::combine(only.value(), only.value());
        Self::Internal {
            hash,
            right: Box::new(only.clone()),
            left: Box::new(only),
            mirrored: true,
        }
    }

    /// `hex(SHA-256(left || right))`, lowercase.
    pub fn combine(left: &str, right: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// The id for a leaf, the combined hash for an internal node.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Leaf { id } => id,
            Self::Internal { hash, .. } => hash,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Edges from this node down to its deepest leaf.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Physical node count, mirrored copies included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Append leaf ids in order, skipping mirrored copies.
    pub(crate) fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Leaf { id } => out.push(id),
            Self::Internal { left, right, mirrored, .. } => {
                left.collect_leaves(out);
                if !mirrored {
                    right.collect_leaves(out);
                }
            }
        }
    }
}
