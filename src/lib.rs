/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! An AVL tree that keeps subtree sizes, so that rank, k-th smallest and
//! range count queries run in O(log n) next to insert and delete.

use std::cmp::Ordering;
use std::fmt;

use num_traits::PrimInt;

pub mod driver;
mod error;

pub use error::{Error, Result};

#[derive(Clone, PartialEq, Eq)]
struct Node<K> {
    c: [Option<Box<Node<K>>>; 2],
    // Height of the subtree, a leaf has height 1
    height: u32,
    // Number of keys in the subtree
    scnt: usize,
    key: K,
}

fn height<K>(node: &Option<Box<Node<K>>>) -> u32 {
    node.as_ref().map_or(0, |n| n.height)
}

fn scnt<K>(node: &Option<Box<Node<K>>>) -> usize {
    node.as_ref().map_or(0, |n| n.scnt)
}

impl<K> Node<K> {
    fn new(key: K) -> Node<K> {
        Node {
            c: [None, None],
            height: 1,
            scnt: 1,
            key,
        }
    }

    fn push_up(&mut self) {
        self.height = 1 + height(&self.c[0]).max(height(&self.c[1]));
        self.scnt = 1 + scnt(&self.c[0]) + scnt(&self.c[1]);
    }

    fn balance_factor(&self) -> i64 {
        height(&self.c[0]) as i64 - height(&self.c[1]) as i64
    }

    // Lifts c[side] into the place of self and returns it.
    // Only self and the lifted child are updated, the subtrees moved between
    // them keep their stats.
    fn rotate(mut self: Box<Self>, side: bool) -> Box<Self> {
        debug_assert!(self.c[side as usize].is_some(), "nothing to rotate up");
        let mut x = match self.c[side as usize].take() {
            Some(x) => x,
            None => return self,
        };
        log::trace!("rotate {}", if side { "left" } else { "right" });
        self.c[side as usize] = x.c[!side as usize].take();
        self.push_up();
        x.c[!side as usize] = Some(self);
        x.push_up();
        x
    }
    fn rotate_right(self: Box<Self>) -> Box<Self> {
        self.rotate(false)
    }
    fn rotate_left(self: Box<Self>) -> Box<Self> {
        self.rotate(true)
    }

    // Children must already be balanced and up to date.
    fn rebalance(mut self: Box<Self>) -> Box<Self> {
        self.push_up();
        let bf = self.balance_factor();
        if bf > 1 {
            if let Some(l) = self.c[0].take() {
                self.c[0] = Some(if l.balance_factor() < 0 {
                    l.rotate_left()
                } else {
                    l
                });
            }
            self.rotate_right()
        } else if bf < -1 {
            if let Some(r) = self.c[1].take() {
                self.c[1] = Some(if r.balance_factor() > 0 {
                    r.rotate_right()
                } else {
                    r
                });
            }
            self.rotate_left()
        } else {
            self
        }
    }

    // Detaches the smallest key of the subtree and returns the rebalanced
    // rest together with that key.
    fn pop_min(mut self: Box<Self>) -> (Option<Box<Node<K>>>, K) {
        match self.c[0].take() {
            None => {
                let Node {
                    c: [_, right], key, ..
                } = *self;
                (right, key)
            }
            Some(left) => {
                let (rest, key) = left.pop_min();
                self.c[0] = rest;
                (Some(self.rebalance()), key)
            }
        }
    }
}

impl<K: Ord> Node<K> {
    // Returns the new subtree root and whether the key was added.
    fn insert(node: Option<Box<Node<K>>>, key: K) -> (Box<Node<K>>, bool) {
        let mut node = match node {
            Some(node) => node,
            None => return (Box::new(Node::new(key)), true),
        };
        let side = match key.cmp(&node.key) {
            Ordering::Equal => return (node, false),
            Ordering::Less => false,
            Ordering::Greater => true,
        };
        let (child, inserted) = Node::insert(node.c[side as usize].take(), key);
        node.c[side as usize] = Some(child);
        if inserted {
            (node.rebalance(), true)
        } else {
            (node, false)
        }
    }

    // Returns the new subtree root and whether the key was removed.
    fn delete(
        node: Option<Box<Node<K>>>,
        key: &K,
    ) -> (Option<Box<Node<K>>>, bool) {
        let mut node = match node {
            Some(node) => node,
            None => return (None, false),
        };
        let side = match key.cmp(&node.key) {
            Ordering::Less => false,
            Ordering::Greater => true,
            Ordering::Equal => {
                let rest = match (node.c[0].take(), node.c[1].take()) {
                    (None, None) => None,
                    (Some(child), None) | (None, Some(child)) => Some(child),
                    (Some(left), Some(right)) => {
                        // The in-order successor takes over this node.
                        let (right, successor) = right.pop_min();
                        node.key = successor;
                        node.c = [Some(left), right];
                        Some(node.rebalance())
                    }
                };
                return (rest, true);
            }
        };
        let (child, deleted) = Node::delete(node.c[side as usize].take(), key);
        node.c[side as usize] = child;
        if deleted {
            (Some(node.rebalance()), true)
        } else {
            (Some(node), false)
        }
    }
}

/// A set of keys kept in an AVL tree whose nodes also count their subtree.
///
/// Duplicate keys are ignored. Ranks are 1-based.
#[derive(Clone, PartialEq, Eq)]
pub struct AvlTree<K> {
    root: Option<Box<Node<K>>>,
}

impl<K> AvlTree<K> {
    pub fn new() -> AvlTree<K> {
        AvlTree { root: None }
    }

    pub fn len(&self) -> usize {
        scnt(&self.root)
    }
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
    /// Height of the tree, 0 when empty.
    pub fn height(&self) -> u32 {
        height(&self.root)
    }
    pub fn root_key(&self) -> Option<&K> {
        self.root.as_ref().map(|root| &root.key)
    }
    pub fn clear(&mut self) {
        self.root = None;
    }

    fn extreme(&self, side: bool) -> Option<&K> {
        let mut cur = self.root.as_ref()?;
        while let Some(next) = cur.c[side as usize].as_ref() {
            cur = next;
        }
        Some(&cur.key)
    }
    pub fn min(&self) -> Option<&K> {
        self.extreme(false)
    }
    pub fn max(&self) -> Option<&K> {
        self.extreme(true)
    }

    /// Visits the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.height() as usize),
            remaining: self.len(),
        };
        iter.push_left(&self.root);
        iter
    }
}

impl<K: Ord> AvlTree<K> {
    /// Adds `key` to the tree. Returns `false` and leaves the tree untouched
    /// if the key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        let (root, inserted) = Node::insert(self.root.take(), key);
        self.root = Some(root);
        inserted
    }

    /// Removes `key` from the tree. Returns `false` and leaves the tree
    /// untouched if the key is absent.
    pub fn delete(&mut self, key: &K) -> bool {
        let (root, deleted) = Node::delete(self.root.take(), key);
        self.root = root;
        deleted
    }

    pub fn contains(&self, key: &K) -> bool {
        let mut cur = &self.root;
        while let Some(node) = cur {
            cur = match key.cmp(&node.key) {
                Ordering::Equal => return true,
                Ordering::Less => &node.c[0],
                Ordering::Greater => &node.c[1],
            };
        }
        false
    }

    /// Returns `1 + ` the number of keys smaller than `key`, i.e. the position
    /// `key` has, or would have once inserted, in sorted order.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn rank(&self, key: &K) -> usize {
        let mut rank = 1;
        let mut cur = &self.root;
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Equal => return rank + scnt(&node.c[0]),
                Ordering::Less => cur = &node.c[0],
                Ordering::Greater => {
                    rank += scnt(&node.c[0]) + 1;
                    cur = &node.c[1];
                }
            }
        }
        rank
    }

    /// Returns the `k`-th smallest key, counting from 1.
    ///
    /// # Errors
    ///
    /// [`Error::RankOutOfRange`] unless `1 <= k <= len()`.
    pub fn kth(&self, k: usize) -> Result<&K> {
        let len = self.len();
        if k == 0 || k > len {
            return Err(Error::RankOutOfRange { k, len });
        }
        let mut rest = k;
        let mut cur = &self.root;
        while let Some(node) = cur {
            let lscnt = scnt(&node.c[0]);
            match rest.cmp(&(lscnt + 1)) {
                Ordering::Equal => return Ok(&node.key),
                Ordering::Less => cur = &node.c[0],
                Ordering::Greater => {
                    rest -= lscnt + 1;
                    cur = &node.c[1];
                }
            }
        }
        Err(Error::RankOutOfRange { k, len })
    }

    fn check_sanity_subtree(rt: &Node<K>, lo: Option<&K>, hi: Option<&K>) {
        if let Some(lo) = lo {
            assert!(*lo < rt.key);
        }
        if let Some(hi) = hi {
            assert!(rt.key < *hi);
        }
        if let Some(ref c) = rt.c[0] {
            Self::check_sanity_subtree(c, lo, Some(&rt.key));
        }
        if let Some(ref c) = rt.c[1] {
            Self::check_sanity_subtree(c, Some(&rt.key), hi);
        }
        assert_eq!(rt.scnt, 1 + scnt(&rt.c[0]) + scnt(&rt.c[1]));
        assert_eq!(rt.height, 1 + height(&rt.c[0]).max(height(&rt.c[1])));
        assert!(rt.balance_factor().abs() <= 1);
    }
    // Only for DEBUG
    pub fn check_sanity(&self) {
        if let Some(ref root) = self.root {
            Self::check_sanity_subtree(root, None, None);
        }
    }
}

impl<K: PrimInt> AvlTree<K> {
    /// Number of keys in `[lo, hi]`, computed as `rank(hi + 1) - rank(lo)`.
    ///
    /// An inverted range is empty.
    pub fn count_range(&self, lo: K, hi: K) -> usize {
        if lo > hi {
            return 0;
        }
        let upper = match hi.checked_add(&K::one()) {
            Some(next) => self.rank(&next),
            // Nothing is above the largest value of K.
            None => self.len() + 1,
        };
        upper - self.rank(&lo)
    }
}

impl<K: fmt::Display> AvlTree<K> {
    /// Draws the shape of the tree, one key per line. A missing child next
    /// to a present one is drawn as `/\`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self.root {
            Some(ref root) => render_node(root, &mut String::new(), &mut out),
            None => out.push_str("/\\\n"),
        }
        out
    }
}

fn render_node<K: fmt::Display>(
    rt: &Node<K>,
    prefix: &mut String,
    out: &mut String,
) {
    out.push_str(&rt.key.to_string());
    out.push('\n');
    if rt.c[0].is_none() && rt.c[1].is_none() {
        return;
    }
    for (i, child) in rt.c.iter().enumerate() {
        let last = i == 1;
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        match child {
            Some(child) => {
                let ori_len = prefix.len();
                prefix.push_str(if last { "    " } else { "│   " });
                render_node(child, prefix, out);
                prefix.truncate(ori_len);
            }
            None => out.push_str("/\\\n"),
        }
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

/// In-order iterator over the keys of an [`AvlTree`].
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn push_left(&mut self, mut cur: &'a Option<Box<Node<K>>>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = &node.c[0];
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let node = self.stack.pop()?;
        self.push_left(&node.c[1]);
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}
