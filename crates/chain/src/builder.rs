//! The canonical-chain builder.

use alloy_consensus::{Header, Sealed};
use alloy_primitives::{B256, U256};
use std::{cmp::Ordering, collections::HashMap};
use thiserror::Error;

/// Errors produced by [`CanonicalChainBuilder`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainBuilderError {
    /// The first new header of a batch has a parent that is not part of
    /// the tree.
    #[error("header {hash} has parent {parent} which is not part of the tree")]
    DisconnectedParent {
        /// Hash of the rejected header.
        hash: B256,
        /// Its unknown parent hash.
        parent: B256,
    },
    /// Two consecutive headers in a batch are not parent-linked.
    #[error("header {hash} (number {number}) does not extend {expected_parent}")]
    BadLinkage {
        /// Hash of the offending header.
        hash: B256,
        /// Number of the offending header.
        number: u64,
        /// Hash the header was expected to extend.
        expected_parent: B256,
    },
    /// A header's number does not lie above the root.
    #[error("header number {number} is at or below the root number {root_number}")]
    BelowRoot {
        /// Number of the rejected header.
        number: u64,
        /// Number of the current root.
        root_number: u64,
    },
    /// A requested range is not fully covered by the root→tip path.
    #[error("range [{start}, {end}] is not on the main path [{root_number}, {tip_number}]")]
    RangeNotOnMainPath {
        /// First requested block number.
        start: u64,
        /// Last requested block number.
        end: u64,
        /// Number of the current root.
        root_number: u64,
        /// Number of the current tip.
        tip_number: u64,
    },
    /// A prune target outside `[root.number, tip.number]`.
    #[error("prune target {upto} is outside the main path [{root_number}, {tip_number}]")]
    PruneTargetNotOnMainPath {
        /// Requested new root number.
        upto: u64,
        /// Number of the current root.
        root_number: u64,
        /// Number of the current tip.
        tip_number: u64,
    },
}

/// A node of the header tree.
#[derive(Debug, Clone)]
struct Node {
    header: Sealed<Header>,
    /// Arena index of the parent; `None` for the root.
    parent: Option<usize>,
    children: Vec<usize>,
    /// Cumulative difficulty from the root to this header.
    total_difficulty: U256,
}

/// In-memory tree of headers above the last finalized header.
///
/// The tree is rooted at the last finalized header and tracks every
/// known branch above it. Nodes live in an arena indexed by a
/// hash→index map; parent and child links are arena indices. The tip is
/// the leaf with the greatest cumulative difficulty, ties broken by the
/// lexicographically smallest hash, which makes tip selection a pure
/// function of the node set.
///
/// A builder instance is owned by a single task; none of its operations
/// are concurrent.
#[derive(Debug)]
pub struct CanonicalChainBuilder {
    nodes: Vec<Node>,
    by_hash: HashMap<B256, usize>,
    root: usize,
    tip: usize,
}

impl CanonicalChainBuilder {
    /// Creates a builder rooted at `root`, with `root == tip`.
    pub fn new(root: Sealed<Header>) -> Self {
        let total_difficulty = root.difficulty;
        let mut by_hash = HashMap::new();
        by_hash.insert(root.hash(), 0);
        Self {
            nodes: vec![Node { header: root, parent: None, children: Vec::new(), total_difficulty }],
            by_hash,
            root: 0,
            tip: 0,
        }
    }

    /// Returns the last finalized header the tree is rooted at.
    pub fn root(&self) -> &Sealed<Header> {
        &self.nodes[self.root].header
    }

    /// Returns the current best tip.
    pub fn tip(&self) -> &Sealed<Header> {
        &self.nodes[self.tip].header
    }

    /// Returns whether `hash` belongs to the tree, root included.
    pub fn contains_hash(&self, hash: B256) -> bool {
        self.by_hash.contains_key(&hash)
    }

    /// Returns the headers on the root→tip path whose numbers fall in
    /// `[start, start + length)`.
    ///
    /// Fails with [`ChainBuilderError::RangeNotOnMainPath`] if any
    /// requested number lies outside `[root.number, tip.number]`.
    pub fn headers_in_range(
        &self,
        start: u64,
        length: u64,
    ) -> Result<Vec<Sealed<Header>>, ChainBuilderError> {
        if length == 0 {
            return Ok(Vec::new());
        }

        let root_number = self.root().number;
        let tip_number = self.tip().number;
        let end = start + length - 1;
        if start < root_number || end > tip_number {
            return Err(ChainBuilderError::RangeNotOnMainPath {
                start,
                end,
                root_number,
                tip_number,
            });
        }

        // Walk rootward from the tip; numbers on the main path are
        // consecutive, so the bounds check above fully covers the range.
        let mut headers = Vec::with_capacity(length as usize);
        let mut cursor = Some(self.tip);
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            let number = node.header.number;
            if number < start {
                break;
            }
            if number <= end {
                headers.push(node.header.clone());
            }
            cursor = node.parent;
        }
        headers.reverse();
        debug_assert_eq!(headers.len() as u64, length);

        Ok(headers)
    }

    /// Connects a parent-linked batch of headers to the tree and
    /// recomputes the tip.
    ///
    /// Headers already present are skipped, so re-sending a known
    /// prefix (e.g. a backfill that starts at the root block) is a
    /// no-op for that prefix. The batch is validated in full before any
    /// insertion; a failed connect leaves the tree untouched.
    pub fn connect(&mut self, headers: Vec<Sealed<Header>>) -> Result<(), ChainBuilderError> {
        for pair in headers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.parent_hash != prev.hash() || next.number != prev.number + 1 {
                return Err(ChainBuilderError::BadLinkage {
                    hash: next.hash(),
                    number: next.number,
                    expected_parent: prev.hash(),
                });
            }
        }

        // Skip the prefix of headers the tree already knows. Linkage of
        // the remainder follows from the pairwise check, so only the
        // first new header needs an attachment point.
        let Some(first_new) = headers.iter().position(|h| !self.contains_hash(h.hash())) else {
            return Ok(());
        };

        let root_number = self.root().number;
        let first = &headers[first_new];
        if first.number <= root_number {
            return Err(ChainBuilderError::BelowRoot { number: first.number, root_number });
        }
        if !self.contains_hash(first.parent_hash) {
            return Err(ChainBuilderError::DisconnectedParent {
                hash: first.hash(),
                parent: first.parent_hash,
            });
        }

        for header in headers.into_iter().skip(first_new) {
            let parent_idx = self.by_hash[&header.parent_hash];
            let idx = self.nodes.len();
            let total_difficulty = self.nodes[parent_idx].total_difficulty + header.difficulty;
            self.by_hash.insert(header.hash(), idx);
            self.nodes[parent_idx].children.push(idx);
            self.nodes.push(Node {
                header,
                parent: Some(parent_idx),
                children: Vec::new(),
                total_difficulty,
            });
        }

        self.recompute_tip();
        Ok(())
    }

    /// Advances the root to the header at `upto` on the root→tip path,
    /// discarding every node that does not descend from the new root.
    ///
    /// `Prune(root.number)` is a no-op. The tip is recomputed.
    pub fn prune(&mut self, upto: u64) -> Result<(), ChainBuilderError> {
        let root_number = self.root().number;
        let tip_number = self.tip().number;
        if upto < root_number || upto > tip_number {
            return Err(ChainBuilderError::PruneTargetNotOnMainPath {
                upto,
                root_number,
                tip_number,
            });
        }
        if upto == root_number {
            return Ok(());
        }

        // Find the new root by walking rootward from the tip.
        let mut new_root = self.tip;
        while self.nodes[new_root].header.number > upto {
            match self.nodes[new_root].parent {
                Some(parent) => new_root = parent,
                None => break,
            }
        }

        // Collect the surviving subtree in breadth-first order and
        // rebuild the arena around it.
        let mut keep = vec![new_root];
        let mut cursor = 0;
        while cursor < keep.len() {
            let children = self.nodes[keep[cursor]].children.clone();
            keep.extend(children);
            cursor += 1;
        }

        let remap: HashMap<usize, usize> =
            keep.iter().enumerate().map(|(new_idx, &old_idx)| (old_idx, new_idx)).collect();

        let mut nodes = Vec::with_capacity(keep.len());
        let mut by_hash = HashMap::with_capacity(keep.len());
        for &old_idx in &keep {
            let old = &self.nodes[old_idx];
            let parent = if old_idx == new_root {
                None
            } else {
                old.parent.and_then(|p| remap.get(&p).copied())
            };
            let children = old.children.iter().filter_map(|c| remap.get(c).copied()).collect();
            by_hash.insert(old.header.hash(), nodes.len());
            nodes.push(Node {
                header: old.header.clone(),
                parent,
                children,
                total_difficulty: old.total_difficulty,
            });
        }

        self.nodes = nodes;
        self.by_hash = by_hash;
        self.root = 0;
        self.recompute_tip();
        Ok(())
    }

    /// Discards every node and re-roots the tree at `new_root`.
    pub fn reset(&mut self, new_root: Sealed<Header>) {
        *self = Self::new(new_root);
    }

    /// Selects the leaf with the greatest cumulative difficulty, ties
    /// broken by the smallest hash.
    fn recompute_tip(&mut self) {
        let mut best: Option<usize> = None;
        for (idx, node) in self.nodes.iter().enumerate() {
            if !node.children.is_empty() {
                continue;
            }
            let replace = match best {
                None => true,
                Some(current) => {
                    let current = &self.nodes[current];
                    match node.total_difficulty.cmp(&current.total_difficulty) {
                        Ordering::Greater => true,
                        Ordering::Equal => node.header.hash() < current.header.hash(),
                        Ordering::Less => false,
                    }
                }
            };
            if replace {
                best = Some(idx);
            }
        }
        // A tree always has at least one leaf.
        self.tip = best.unwrap_or(self.root);
    }
}
