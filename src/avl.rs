//! An Adelson-Velskii and Landis tree: a binary search tree which restores
//! its height balance after every mutation, so every search, insertion and
//! removal is `O(log n)` in the worst case.
//!
//! Duplicates are allowed and always go to the right of an equal value.

use std::{
    cmp::Ordering::{
        Equal,
        Greater,
        Less,
    },
    fmt,
};

use tracing::{
    instrument,
    trace,
};

use crate::{
    config::ALLOWED_IMBALANCE,
    errs::{
        OrdError,
        Result,
    },
};

type Link<T> = Option<Box<AvlNode<T>>>;

#[derive(Debug)]
struct AvlNode<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
    // a leaf is 0, an absent child counts as -1
    height: i32,
}

impl<T> AvlNode<T> {
    fn leaf(value: T) -> Box<Self> {
        Box::new(AvlNode {
            value,
            left: None,
            right: None,
            height: 0,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

fn height<T>(link: &Link<T>) -> i32 {
    link.as_ref().map_or(-1, |node| node.height)
}

/// A self-balancing ordered multiset.
#[derive(Debug)]
pub struct AvlTree<T> {
    root: Link<T>,
    size: usize,
    height: usize,
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        AvlTree {
            root: None,
            size: 0,
            height: 0,
        }
    }
}

impl<T> AvlTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    /// Number of levels in the tree, 0 when empty.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Drops every node.
    #[instrument(level = "trace", skip_all)]
    pub fn clear(&mut self) {
        self.root = None;
        self.size = 0;
        self.height = 0;
    }

    pub fn min(&self) -> Result<&T> {
        let mut node = self.root.as_deref().ok_or(OrdError::EmptyContainer)?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Ok(&node.value)
    }

    pub fn max(&self) -> Result<&T> {
        let mut node = self.root.as_deref().ok_or(OrdError::EmptyContainer)?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Ok(&node.value)
    }

    /// In-order iterator, smallest value first.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.height),
            remaining: self.size,
        };
        iter.push_left(self.root.as_deref());
        iter
    }

    fn refresh_height(&mut self) {
        self.height = (height(&self.root) + 1) as usize;
    }
}

impl<T> AvlTree<T>
where
    T: Ord,
{
    pub fn contains(&self, value: &T) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match value.cmp(&node.value) {
                | Equal => return true,
                | Less => node.left.as_deref(),
                | Greater => node.right.as_deref(),
            };
        }
        false
    }

    #[instrument(level = "trace", skip_all)]
    pub fn insert(&mut self, value: T) {
        self.root = Some(insert_node(self.root.take(), value));
        self.size += 1;
        self.refresh_height();
    }

    /// Removes one occurrence of `value`. Returns false, and leaves the tree
    /// alone, if there is none.
    #[instrument(level = "trace", skip_all)]
    pub fn remove(&mut self, value: &T) -> bool {
        if !self.contains(value) {
            return false;
        }
        self.root = remove_node(self.root.take(), value);
        self.size -= 1;
        self.refresh_height();
        true
    }

    /// Removes every occurrence of `value`, one at a time. Returns how many
    /// were removed.
    #[instrument(level = "trace", skip_all)]
    pub fn remove_all(&mut self, value: &T) -> usize {
        let mut removed = 0;
        while self.remove(value) {
            removed += 1;
        }
        removed
    }
}

fn insert_node<T: Ord>(link: Link<T>, value: T) -> Box<AvlNode<T>> {
    match link {
        | None => AvlNode::leaf(value),
        | Some(mut node) => {
            if value < node.value {
                node.left = Some(insert_node(node.left.take(), value));
            } else {
                node.right = Some(insert_node(node.right.take(), value));
            }
            balance(node)
        },
    }
}

fn remove_node<T: Ord>(link: Link<T>, value: &T) -> Link<T> {
    let mut node = link?;
    match value.cmp(&node.value) {
        | Less => node.left = remove_node(node.left.take(), value),
        | Greater => node.right = remove_node(node.right.take(), value),
        | Equal => match (node.left.take(), node.right.take()) {
            | (Some(left), Some(right)) => {
                // the right subtree's minimum takes this node's place
                let (right, successor) = take_min(right);
                node.value = successor;
                node.left = Some(left);
                node.right = right;
            },
            | (Some(child), None) | (None, Some(child)) => return Some(child),
            | (None, None) => return None,
        },
    }
    Some(balance(node))
}

/// Detaches the leftmost node of the subtree, returning the rebalanced
/// remainder and the detached value.
fn take_min<T>(mut node: Box<AvlNode<T>>) -> (Link<T>, T) {
    match node.left.take() {
        | Some(left) => {
            let (left, min) = take_min(left);
            node.left = left;
            (Some(balance(node)), min)
        },
        | None => {
            let AvlNode { value, right, .. } = *node;
            (right, value)
        },
    }
}

/// Restores the balance of a subtree whose children are balanced and differ
/// in height by at most 2, and returns its new root.
fn balance<T>(mut node: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
    let left_height = height(&node.left);
    let right_height = height(&node.right);

    if left_height - right_height > ALLOWED_IMBALANCE {
        if let Some(left) = node.left.take() {
            // left-right case
            node.left = Some(if height(&left.left) < height(&left.right) {
                rotate_left(left)
            } else {
                left
            });
        }
        node = rotate_right(node);
    } else if right_height - left_height > ALLOWED_IMBALANCE {
        if let Some(right) = node.right.take() {
            // right-left case
            node.right = Some(if height(&right.right) < height(&right.left) {
                rotate_right(right)
            } else {
                right
            });
        }
        node = rotate_left(node);
    }

    node.update_height();
    node
}

fn rotate_left<T>(mut node: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
    let mut new_root = node
        .right
        .take()
        .expect("rotate_left needs a right child");
    trace!("rotating left");

    node.right = new_root.left.take();
    node.update_height();
    new_root.left = Some(node);
    new_root.update_height();
    new_root
}

fn rotate_right<T>(mut node: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
    let mut new_root = node
        .left
        .take()
        .expect("rotate_right needs a left child");
    trace!("rotating right");

    node.left = new_root.right.take();
    node.update_height();
    new_root.right = Some(node);
    new_root.update_height();
    new_root
}

/// Clones parent first, then the left and right subtrees.
fn clone_node<T: Clone>(link: &Link<T>) -> Link<T> {
    link.as_ref().map(|node| {
        Box::new(AvlNode {
            value: node.value.clone(),
            left: clone_node(&node.left),
            right: clone_node(&node.right),
            height: node.height,
        })
    })
}

/// A deep copy which shares nothing with the original.
impl<T> Clone for AvlTree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        AvlTree {
            root: clone_node(&self.root),
            size: self.size,
            height: self.height,
        }
    }
}

impl<T> fmt::Display for AvlTree<T>
where
    T: fmt::Display,
{
    /// The tree drawn sideways, root on the left and the right subtree above
    /// it:
    ///
    /// ```text
    /// Size = 3, Height = 2
    ///  /----- 8
    /// 5
    ///  \----- 3
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size = {}, Height = {}", self.size, self.height)?;
        match self.root.as_deref() {
            | None => writeln!(f, "AVL tree is empty"),
            | Some(root) => {
                if let Some(right) = root.right.as_deref() {
                    write_branch(f, right, true, "")?;
                }
                writeln!(f, "{}", root.value)?;
                if let Some(left) = root.left.as_deref() {
                    write_branch(f, left, false, "")?;
                }
                Ok(())
            },
        }
    }
}

fn write_branch<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    node: &AvlNode<T>,
    is_right: bool,
    indent: &str,
) -> fmt::Result {
    if let Some(right) = node.right.as_deref() {
        let pad = if is_right { "        " } else { " |      " };
        write_branch(f, right, true, &format!("{}{}", indent, pad))?;
    }

    let branch = if is_right { " /" } else { " \\" };
    writeln!(f, "{}{}----- {}", indent, branch, node.value)?;

    if let Some(left) = node.left.as_deref() {
        let pad = if is_right { " |      " } else { "        " };
        write_branch(f, left, false, &format!("{}{}", indent, pad))?;
    }
    Ok(())
}

impl<T> FromIterator<T> for AvlTree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for AvlTree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over an [`AvlTree`].
pub struct Iter<'a, T> {
    stack: Vec<&'a AvlNode<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn push_left(&mut self, mut node: Option<&'a AvlNode<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
