// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Integrity tree construction and verification.

use sha2::{Digest, Sha256};

use super::node::TreeNode;
use crate::error::{AllocError, Result};
use crate::resource::Resource;

/// Binary hash tree over an ordered resource sequence.
///
/// An `IntegrityTree` is a snapshot: it is never patched, only replaced by a
/// fresh one built from the current live set. An empty tree has no root.
///
/// Alongside the root it stores a content digest over `(id, priority)`
/// pairs, since the root alone only covers ids.
#[derive(Debug, Clone, Default)]
pub struct IntegrityTree {
    root: Option<TreeNode>,
    content_digest: Option<String>,
    leaf_count: usize,
}

impl IntegrityTree {
    /// Tree with no root.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the full node structure over `resources`, in order.
    ///
    /// Fails with [`AllocError::EmptyInput`] for an empty sequence.
    pub fn from_resources<'a, I>(resources: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Resource>,
    {
        let mut digest = Sha256::new();
        let mut level: Vec<TreeNode> = resources
            .into_iter()
            .map(|r| {
                Self::digest_update(&mut digest, r);
                TreeNode::leaf(r.id())
            })
            .collect();
        if level.is_empty() {
            return Err(AllocError::EmptyInput);
        }
        let leaf_count = level.len();

        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            let mut nodes = level.into_iter();
            while let Some(left) = nodes.next() {
                next.push(match nodes.next() {
                    Some(right) => TreeNode::internal(left, right),
                    None => TreeNode::mirrored(left),
                });
            }
            level = next;
        }

        Ok(Self {
            root: level.pop(),
            content_digest: Some(hex::encode(digest.finalize())),
            leaf_count,
        })
    }

    /// Build a tree, or an empty one for an empty live set.
    pub fn rebuild<'a, I>(resources: I) -> Self
    where
        I: IntoIterator<Item = &'a Resource>,
    {
        Self::from_resources(resources).unwrap_or_default()
    }

    /// Compute the root fingerprint of `resources` without keeping nodes.
    ///
    /// Deterministic in the ordered ids. A single resource yields its id.
    pub fn build<'a, I>(resources: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a Resource>,
    {
        let mut level: Vec<String> = resources
            .into_iter()
            .map(|r| r.id().to_owned())
            .collect();

        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    TreeNode::combine(left, right)
                })
                .collect();
        }

        level.pop().ok_or(AllocError::EmptyInput)
    }

    /// Recompute the root over `resources` and compare with `claimed_root`.
    ///
    /// An empty sequence never verifies.
    pub fn verify<'a, I>(resources: I, claimed_root: &str) -> bool
    where
        I: IntoIterator<Item = &'a Resource>,
    {
        Self::build(resources).is_ok_and(|root| root == claimed_root)
    }

    /// SHA-256 over the `(id, priority)` pairs in order, hex encoded.
    pub fn content_digest<'a, I>(resources: I) -> String
    where
        I: IntoIterator<Item = &'a Resource>,
    {
        let mut hasher = Sha256::new();
        for resource in resources {
            Self::digest_update(&mut hasher, resource);
        }
        hex::encode(hasher.finalize())
    }

    /// Length-prefixed id, then priority, so adjacent ids cannot run together.
    fn digest_update(hasher: &mut Sha256, resource: &Resource) {
        hasher.update((resource.id().len() as u64).to_le_bytes());
        hasher.update(resource.id().as_bytes());
        hasher.update(resource.priority().to_le_bytes());
    }

    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_ref().map(TreeNode::value)
    }

    #[must_use]
    pub fn root_node(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Digest stored when the tree was built.
    #[must_use]
    pub fn stored_digest(&self) -> Option<&str> {
        self.content_digest.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::depth)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::node_count)
    }

    /// Leaf ids in tree order, recovered by walking the stored nodes.
    #[must_use]
    pub fn leaf_ids(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.leaf_count);
        if let Some(ref root) = self.root {
            root.collect_leaves(&mut out);
        }
        out
    }
}
