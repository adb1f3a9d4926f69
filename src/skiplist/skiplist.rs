use std::fmt;

use tracing::{
    debug,
    instrument,
    trace,
};

use crate::{
    config::{
        SkipListConfig,
        DEFAULT_MAX_HEIGHT,
    },
    errs::{
        OrdError,
        Result,
    },
    skiplist::{
        coin::{
            Coin,
            CoinFlip,
        },
        skipnode::{
            NodeArena,
            NodeId,
            SkipNode,
        },
    },
};

/// The sentinel head of the bottom row. It is the first slot allocated and
/// is only ever released by [`SkipList::clear`], which recreates it.
const BASE_HEAD: NodeId = NodeId(0);

/// A sorted multiset built from a stack of singly linked rows.
///
/// Row 0 holds every inserted value. Each row above holds a random subset of
/// the row beneath it, chosen by flipping `coin` once per row at insertion
/// time. Every row starts at a sentinel head, and the heads are chained
/// through `down` from `top_head` to the bottom row.
///
/// ```text
/// Head ---------------> 5
/// Head -> 1 ----------> 5 ------> 9
/// Head -> 1 -> 3 -> 5 -> 5 -> 7 -> 9
/// ```
#[derive(Debug)]
pub struct SkipList<T, C = Coin> {
    arena: NodeArena<T>,
    top_head: NodeId,
    size: usize,
    height: usize,
    max_height: usize,
    coin: C,
}

impl<T, C> SkipList<T, C> {
    /// Number of values on the bottom row.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Number of rows, including the bottom row. Never less than 1.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// Deletes every value, leaving a single empty bottom row.
    #[instrument(level = "trace", skip_all)]
    pub fn clear(&mut self) {
        self.arena.clear();
        let head = self.arena.alloc(SkipNode::head(None));
        debug_assert_eq!(head, BASE_HEAD);
        self.top_head = head;
        self.size = 0;
        self.height = 1;
        debug!("skip list cleared");
    }

    /// Iterates the bottom row from smallest to largest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: &self.arena,
            next: self.arena.get(BASE_HEAD).next,
            remaining: self.size,
        }
    }

    /// Every row from the top down, as the values it holds.
    pub fn rows(&self) -> Vec<Vec<&T>> {
        let mut rows = Vec::with_capacity(self.height);
        let mut head = Some(self.top_head);
        while let Some(id) = head {
            let mut row = Vec::new();
            let mut current = self.arena.get(id).next;
            while let Some(node) = current {
                if let Some(v) = self.arena.get(node).value.as_ref() {
                    row.push(v);
                }
                current = self.arena.get(node).next;
            }
            rows.push(row);
            head = self.arena.get(id).down;
        }
        rows
    }

    /// The smallest value.
    pub fn first(&self) -> Result<&T> {
        self.arena
            .get(BASE_HEAD)
            .next
            .and_then(|id| self.arena.get(id).value.as_ref())
            .ok_or(OrdError::EmptyContainer)
    }

    /// The largest value. Runs to the end of each row before dropping down,
    /// so it costs about as much as a search.
    pub fn last(&self) -> Result<&T> {
        let mut current = self.top_head;
        loop {
            while let Some(next) = self.arena.get(current).next {
                current = next;
            }
            match self.arena.get(current).down {
                | Some(below) => current = below,
                | None => break,
            }
        }
        self.arena
            .get(current)
            .value
            .as_ref()
            .ok_or(OrdError::EmptyContainer)
    }

    fn empty(coin: C, max_height: usize) -> Self {
        let mut arena = NodeArena::new();
        let head = arena.alloc(SkipNode::head(None));
        debug_assert_eq!(head, BASE_HEAD);
        SkipList {
            arena,
            top_head: head,
            size: 0,
            height: 1,
            max_height,
            coin,
        }
    }

    fn bottom_of(&self, mut id: NodeId) -> NodeId {
        while let Some(below) = self.arena.get(id).down {
            id = below;
        }
        id
    }

    fn heads(&self) -> Vec<NodeId> {
        let mut heads = Vec::with_capacity(self.height);
        let mut head = Some(self.top_head);
        while let Some(id) = head {
            heads.push(id);
            head = self.arena.get(id).down;
        }
        heads
    }

    /// Drops rows left without any value, top down. The bottom row always
    /// stays.
    fn prune_empty_rows(&mut self) {
        while self.top_head != BASE_HEAD && self.arena.get(self.top_head).next.is_none() {
            let empty = self.top_head;
            match self.arena.get(empty).down {
                | Some(below) => self.top_head = below,
                | None => break,
            }
            self.arena.free(empty);
            self.height -= 1;
            debug!(height = self.height, "skip list dropped an empty row");
        }
    }

    fn unlink(&mut self, pred: NodeId, node: NodeId) {
        let next = self.arena.get(node).next;
        self.arena.get_mut(pred).next = next;
        self.arena.free(node);
    }
}

impl<T> SkipList<T, Coin>
where
    T: Ord,
{
    /// An empty list with a fair, entropy-seeded coin.
    pub fn new() -> Self {
        Self::with_coin(Coin::fair())
    }

    pub fn with_config(config: SkipListConfig) -> Result<Self> {
        config.validate()?;
        let coin = match config.get_seed() {
            | Some(seed) => Coin::seeded(config.get_probability(), seed)?,
            | None => Coin::try_new(config.get_probability())?,
        };
        Self::with_coin_and_cap(coin, config.get_max_height())
    }
}

impl<T> Default for SkipList<T, Coin>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> SkipList<T, C>
where
    T: Ord,
    C: CoinFlip,
{
    /// An empty list which promotes nodes according to `coin`.
    pub fn with_coin(coin: C) -> Self {
        Self::empty(coin, DEFAULT_MAX_HEIGHT)
    }

    /// Like [`with_coin`](Self::with_coin) but the list stops adding rows
    /// once it has `max_height` of them.
    pub fn with_coin_and_cap(coin: C, max_height: usize) -> Result<Self> {
        if max_height == 0 {
            return Err(OrdError::InvalidMaxHeight);
        }
        Ok(Self::empty(coin, max_height))
    }

    pub fn contains(&self, value: &T) -> bool {
        let mut current = Some(self.top_head);
        while let Some(id) = current {
            let pred = self.slide_right(id, value);
            if self.next_matching(pred, value).is_some() {
                return true;
            }
            current = self.arena.get(pred).down;
        }
        false
    }

    /// Removes one occurrence of `value`: the first one on the bottom row
    /// together with every node stacked above it. Other towers holding an
    /// equal value are left intact, and rows left empty are dropped. Returns
    /// whether anything was removed.
    #[instrument(level = "trace", skip_all)]
    pub fn remove(&mut self, value: &T) -> bool {
        let preds = self.predecessors(value);
        let mut rows = preds.into_iter().rev();
        let bottom_pred = match rows.next() {
            | Some(pred) => pred,
            | None => return false,
        };
        let mut below = match self.next_matching(bottom_pred, value) {
            | Some(node) => node,
            | None => return false,
        };
        self.unlink(bottom_pred, below);

        // a tower is contiguous from the bottom, so the first row without a
        // node sitting on `below` ends it
        for pred in rows {
            match self.find_above(pred, value, below) {
                | Some((prev, node)) => {
                    self.unlink(prev, node);
                    below = node;
                },
                | None => break,
            }
        }

        self.size -= 1;
        self.prune_empty_rows();
        true
    }

    /// Removes every occurrence of `value` from every row, dropping rows left
    /// empty. Returns how many values left the bottom row.
    #[instrument(level = "trace", skip_all)]
    pub fn remove_all(&mut self, value: &T) -> usize {
        let mut removed = 0;
        let mut current = Some(self.top_head);
        while let Some(id) = current {
            let pred = self.slide_right(id, value);
            let at_bottom = self.arena.get(pred).down.is_none();
            while let Some(node) = self.next_matching(pred, value) {
                self.unlink(pred, node);
                if at_bottom {
                    removed += 1;
                }
            }
            current = self.arena.get(pred).down;
        }
        self.size -= removed;
        self.prune_empty_rows();
        removed
    }

    /// Walks right from `current` and stops at the last node whose value is
    /// smaller than `value`, or at the end of the row.
    fn slide_right(&self, mut current: NodeId, value: &T) -> NodeId {
        while let Some(next) = self.arena.get(current).next {
            match self.arena.get(next).value.as_ref() {
                | Some(v) if v < value => current = next,
                | _ => break,
            }
        }
        current
    }

    fn next_matching(&self, current: NodeId, value: &T) -> Option<NodeId> {
        let next = self.arena.get(current).next?;
        match self.arena.get(next).value.as_ref() {
            | Some(v) if v == value => Some(next),
            | _ => None,
        }
    }

    /// The splice point for `value` on every row, top row first.
    fn predecessors(&self, value: &T) -> Vec<NodeId> {
        let mut preds = Vec::with_capacity(self.height);
        let mut current = Some(self.top_head);
        while let Some(id) = current {
            let pred = self.slide_right(id, value);
            preds.push(pred);
            current = self.arena.get(pred).down;
        }
        preds
    }

    /// Among the run of nodes equal to `value` right after `pred`, finds the
    /// one whose `down` is `below`, along with its predecessor.
    fn find_above(&self, pred: NodeId, value: &T, below: NodeId) -> Option<(NodeId, NodeId)> {
        let mut prev = pred;
        while let Some(node) = self.next_matching(prev, value) {
            if self.arena.get(node).down == Some(below) {
                return Some((prev, node));
            }
            prev = node;
        }
        None
    }
}

impl<T, C> SkipList<T, C>
where
    T: Ord + Clone,
    C: CoinFlip,
{
    /// Inserts `value` on the bottom row, then keeps promoting it one row up
    /// for as long as the coin comes up heads. Equal values are kept as
    /// separate towers, newest first.
    #[instrument(level = "trace", skip_all)]
    pub fn insert(&mut self, value: T) {
        let start = self.slide_right(self.top_head, &value);
        let promoted = self.insert_after(start, &value);

        if let Some(down) = promoted {
            if self.height < self.max_height && self.coin.flip() {
                let node = self.arena.alloc(SkipNode::new(value, None, Some(down)));
                let head = SkipNode {
                    value: None,
                    next: Some(node),
                    down: Some(self.top_head),
                };
                self.top_head = self.arena.alloc(head);
                self.height += 1;
                debug!(height = self.height, "skip list grew a row");
            }
        }

        self.size += 1;
    }

    /// Inserts after `current` on its row and every row beneath it. Returns
    /// the node created on `current`'s row, or `None` once a coin flip ends
    /// the promotion.
    fn insert_after(&mut self, current: NodeId, value: &T) -> Option<NodeId> {
        let down = match self.arena.get(current).down {
            | None => None,
            | Some(below) => {
                let start = self.slide_right(below, value);
                let down = self.insert_after(start, value)?;
                if !self.coin.flip() {
                    return None;
                }
                trace!("promoted node");
                Some(down)
            },
        };

        let next = self.arena.get(current).next;
        let node = self.arena.alloc(SkipNode::new(value.clone(), next, down));
        self.arena.get_mut(current).next = Some(node);
        Some(node)
    }

    /// Inserts every value of this list into `destination` one at a time.
    /// Both lists end up with the same values, but `destination` builds its
    /// own towers with its own coin. Use [`Clone`] for an exact copy.
    pub fn soft_copy_into<D>(&self, destination: &mut SkipList<T, D>)
    where
        D: CoinFlip,
    {
        for value in self.iter() {
            destination.insert(value.clone());
        }
    }
}

/// A hard copy: every row and tower is rebuilt node for node, so the copy has
/// the same shape as the original. The coin is cloned along with it.
impl<T, C> Clone for SkipList<T, C>
where
    T: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        let mut arena = NodeArena::new();
        let mut remap: Vec<Option<NodeId>> = vec![None; self.arena.slots()];

        // bottom row first, so every `down` already has its counterpart
        for head in self.heads().into_iter().rev() {
            let down = self.arena.get(head).down.and_then(|id| remap[id.0]);
            let mut tail = arena.alloc(SkipNode::head(down));
            remap[head.0] = Some(tail);

            let mut current = self.arena.get(head).next;
            while let Some(id) = current {
                let source = self.arena.get(id);
                let copy = SkipNode {
                    value: source.value.clone(),
                    next: None,
                    down: source.down.and_then(|d| remap[d.0]),
                };
                let node = arena.alloc(copy);
                arena.get_mut(tail).next = Some(node);
                remap[id.0] = Some(node);
                tail = node;
                current = source.next;
            }
        }

        let top_head = remap[self.top_head.0].unwrap_or(BASE_HEAD);
        SkipList {
            arena,
            top_head,
            size: self.size,
            height: self.height,
            max_height: self.max_height,
            coin: self.coin.clone(),
        }
    }
}

impl<T, C> fmt::Display for SkipList<T, C>
where
    T: fmt::Display,
{
    /// One line per row, top row first. Values a row skips over are drawn as
    /// hyphens so each value sits above its copy on the bottom row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Skip list is empty");
        }

        writeln!(f, "Size = {}, Height = {}", self.size, self.height)?;
        for head in self.heads() {
            f.write_str("Head")?;
            let mut current = head;
            while let Some(next) = self.arena.get(current).next {
                f.write_str(&self.segment(current, next))?;
                current = next;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T, C> SkipList<T, C>
where
    T: fmt::Display,
{
    /// Renders the stretch between `prev` and `next` on one row, e.g.
    /// `" ------> 5"` when the row skips over two bottom-row values.
    fn segment(&self, prev: NodeId, next: NodeId) -> String {
        let target = self.bottom_of(next);
        let mut prefix = String::new();
        let mut trav = self.arena.get(self.bottom_of(prev)).next;
        while let Some(id) = trav {
            if id == target {
                break;
            }
            if let Some(v) = self.arena.get(id).value.as_ref() {
                prefix.push_str(&format!(" -> {}", v));
            }
            trav = self.arena.get(id).next;
        }
        // the arrow in front of `next` is the last one drawn, values may
        // contain '>' themselves
        let arrow = prefix.len() + 2;
        if let Some(v) = self.arena.get(next).value.as_ref() {
            prefix.push_str(&format!(" -> {}", v));
        }

        prefix
            .char_indices()
            .map(|(i, c)| if i >= 1 && i < arrow { '-' } else { c })
            .collect()
    }
}

impl<T> FromIterator<T> for SkipList<T, Coin>
where
    T: Ord + Clone,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<T, C> Extend<T> for SkipList<T, C>
where
    T: Ord + Clone,
    C: CoinFlip,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a SkipList<T, C> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bottom row of a [`SkipList`].
pub struct Iter<'a, T> {
    arena: &'a NodeArena<T>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.arena.get(id);
        self.next = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::{
        collection::vec,
        prelude::*,
    };

    use super::*;

    /// A coin which replays `flips` and then always comes up tails.
    fn scripted(flips: Vec<bool>) -> impl FnMut() -> bool {
        let mut flips = flips.into_iter();
        move || flips.next().unwrap_or(false)
    }

    fn seeded<T: Ord>(seed: u64) -> SkipList<T> {
        SkipList::with_config(SkipListConfig::new().seed(seed)).unwrap()
    }

    impl<T, C> SkipList<T, C>
    where
        T: Ord + fmt::Debug,
    {
        /// Panics if any structural invariant is broken.
        fn check_invariants(&self) {
            let heads = self.heads();
            assert_eq!(heads.len(), self.height, "row count");
            assert_eq!(heads.last(), Some(&BASE_HEAD), "bottom head");
            assert!(self.height <= self.max_height, "height cap");

            let mut below: Option<Vec<NodeId>> = None;
            let mut live = 0;
            for head in heads.iter().rev() {
                assert!(self.arena.get(*head).value.is_none(), "head carries a value");
                live += 1;

                let mut row = Vec::new();
                let mut current = self.arena.get(*head).next;
                while let Some(id) = current {
                    assert!(self.arena.get(id).value.is_some(), "node without value");
                    row.push(id);
                    current = self.arena.get(id).next;
                }
                live += row.len();
                if *head != BASE_HEAD {
                    assert!(!row.is_empty(), "empty row above the bottom");
                }

                for pair in row.windows(2) {
                    assert!(
                        self.arena.get(pair[0]).value <= self.arena.get(pair[1]).value,
                        "row out of order"
                    );
                }

                match &below {
                    | None => {
                        assert_eq!(row.len(), self.size, "bottom row length");
                        assert!(row.iter().all(|id| self.arena.get(*id).down.is_none()));
                    },
                    | Some(lower) => {
                        // every node sits on an equal node of the row below,
                        // and in the same left to right order
                        let mut last_pos = None;
                        for id in &row {
                            let down = self.arena.get(*id).down.expect("upper node without down");
                            let pos = lower
                                .iter()
                                .position(|l| *l == down)
                                .expect("down link leaves the row below");
                            assert_eq!(self.arena.get(down).value, self.arena.get(*id).value);
                            if let Some(prev) = last_pos {
                                assert!(pos > prev, "towers crossed");
                            }
                            last_pos = Some(pos);
                        }
                        let unique: HashSet<_> = row.iter().map(|id| self.arena.get(*id).down).collect();
                        assert_eq!(unique.len(), row.len(), "two nodes share a down link");
                    },
                }
                below = Some(row);
            }
            assert_eq!(live, self.arena.live(), "leaked arena slots");
        }
    }

    #[test]
    fn test_new_list_is_empty() {
        let list: SkipList<i32> = SkipList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.height(), 1);
        assert!(!list.contains(&7));
        assert_eq!(list.first(), Err(OrdError::EmptyContainer));
        assert_eq!(list.last(), Err(OrdError::EmptyContainer));
        list.check_invariants();
    }

    #[test]
    fn test_insert_and_contains() {
        let mut list = seeded(1);
        for v in [1, 3, 5, 7, 9] {
            list.insert(v);
            list.check_invariants();
        }

        assert!(list.contains(&5));
        assert!(!list.contains(&6));
        assert!(!list.contains(&0));
        assert!(!list.contains(&10));
        assert_eq!(list.len(), 5);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
        assert_eq!(list.rows().last().unwrap(), &vec![&1, &3, &5, &7, &9]);
        assert_eq!(list.first(), Ok(&1));
        assert_eq!(list.last(), Ok(&9));
    }

    #[test]
    fn test_insert_out_of_order() {
        let mut list = seeded(2);
        list.extend([9, 1, 7, 3, 5, 3]);
        list.check_invariants();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3, 3, 5, 7, 9]);
    }

    #[test]
    fn test_promotion_follows_the_coin() {
        // 1 grows a row, 3 stays down, 5 is promoted but does not grow a row
        let mut list = SkipList::with_coin(scripted(vec![true, false, true, false]));
        list.insert(1);
        list.insert(3);
        list.insert(5);
        list.check_invariants();

        assert_eq!(list.height(), 2);
        assert_eq!(list.rows(), vec![vec![&1, &5], vec![&1, &3, &5]]);
    }

    #[test]
    fn test_tails_never_promotes() {
        let mut list = SkipList::with_coin(|| false);
        list.extend(0..100);
        list.check_invariants();
        assert_eq!(list.height(), 1);
        assert_eq!(list.len(), 100);
    }

    #[test]
    fn test_height_is_capped() {
        let mut list = SkipList::with_coin_and_cap(|| true, 3).unwrap();
        list.extend(0..50);
        list.check_invariants();
        assert_eq!(list.height(), 3);
        // 0 was inserted before the third row existed, everything after it
        // reaches every row
        let rows = list.rows();
        assert_eq!(rows[0].len(), 49);
        assert_eq!(rows[1].len(), 50);
        assert_eq!(rows[2].len(), 50);
    }

    #[test]
    fn test_zero_cap_is_rejected() {
        let result: Result<SkipList<u8, _>> = SkipList::with_coin_and_cap(|| true, 0);
        assert!(matches!(result, Err(OrdError::InvalidMaxHeight)));
    }

    #[test]
    fn test_remove_whole_tower() {
        let mut list = SkipList::with_coin(scripted(vec![true, false, true, false]));
        list.extend([1, 3, 5]);

        assert!(list.remove(&5));
        list.check_invariants();
        assert_eq!(list.rows(), vec![vec![&1], vec![&1, &3]]);
        assert!(!list.contains(&5));
        assert_eq!(list.len(), 2);

        assert!(!list.remove(&5));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_duplicate_keeps_other_towers() {
        // the first 5 gets its own row, the second one stays on the bottom
        let mut list = SkipList::with_coin(scripted(vec![true]));
        list.insert(5);
        list.insert(5);
        assert_eq!(list.rows(), vec![vec![&5], vec![&5, &5]]);

        // the newest 5 sits first on the bottom row, so its short tower goes
        assert!(list.remove(&5));
        list.check_invariants();
        assert_eq!(list.rows(), vec![vec![&5], vec![&5]]);
        assert!(list.contains(&5));

        assert!(list.remove(&5));
        list.check_invariants();
        assert_eq!(list.rows(), vec![Vec::<&i32>::new()]);
        assert!(list.is_empty());
        assert_eq!(list.height(), 1);
    }

    #[test]
    fn test_remove_drops_empty_rows() {
        // 1 gets a second row, 2 stays on the bottom
        let mut list = SkipList::with_coin(scripted(vec![true, false]));
        list.insert(1);
        list.insert(2);
        assert_eq!(list.height(), 2);
        assert_eq!(list.rows(), vec![vec![&1], vec![&1, &2]]);

        assert!(list.remove(&1));
        list.check_invariants();
        assert_eq!(list.height(), 1);
        assert_eq!(list.rows(), vec![vec![&2]]);
        assert_eq!(list.to_string(), "Size = 1, Height = 1\nHead -> 2\n");

        // only the 4s reach the second row, so remove_all empties it
        let mut list = SkipList::with_coin(scripted(vec![true, false, false]));
        list.extend([4, 4, 6]);
        assert_eq!(list.rows(), vec![vec![&4], vec![&4, &4, &6]]);
        assert_eq!(list.remove_all(&4), 2);
        list.check_invariants();
        assert_eq!(list.rows(), vec![vec![&6]]);
        assert_eq!(list.height(), 1);
    }

    #[test]
    fn test_remove_all() {
        let mut list = seeded(3);
        list.extend([1, 5, 3, 5, 9]);
        let before = list.len();

        assert_eq!(list.remove_all(&5), 2);
        list.check_invariants();
        assert_eq!(list.len(), before - 2);
        assert!(!list.contains(&5));
        for row in list.rows() {
            assert!(!row.contains(&&5));
        }

        assert_eq!(list.remove_all(&5), 0);
    }

    #[test]
    fn test_clear() {
        let mut list = seeded(4);
        list.extend(0..64);
        list.clear();
        list.check_invariants();
        assert!(list.is_empty());
        assert_eq!(list.height(), 1);
        assert_eq!(list.iter().count(), 0);

        list.extend([3, 1, 2]);
        list.check_invariants();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_hard_copy_keeps_shape() {
        let mut list = seeded(5);
        list.extend((0..200).map(|i| (i * 37) % 101));
        for v in [3, 50, 77] {
            list.remove(&v);
        }

        let copy = list.clone();
        copy.check_invariants();
        assert_eq!(copy.rows(), list.rows());
        assert_eq!(copy.len(), list.len());
        assert_eq!(copy.height(), list.height());
    }

    #[test]
    fn test_hard_copy_is_independent() {
        let mut original = seeded(6);
        original.extend([4, 8, 15, 16, 23, 42]);
        let mut copy = original.clone();

        copy.clear();
        copy.extend([1, 2, 3]);

        assert_eq!(original.len(), 6);
        assert_eq!(
            original.iter().copied().collect::<Vec<_>>(),
            vec![4, 8, 15, 16, 23, 42]
        );
        assert_eq!(copy.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_soft_copy() {
        let mut source = SkipList::with_coin(|| true);
        source.extend([2, 4, 6, 6]);

        let mut destination = SkipList::with_coin(|| false);
        source.soft_copy_into(&mut destination);
        destination.check_invariants();

        assert_eq!(
            destination.iter().collect::<Vec<_>>(),
            source.iter().collect::<Vec<_>>()
        );
        assert_eq!(destination.height(), 1);
        assert_ne!(destination.height(), source.height());
    }

    #[test]
    fn test_move_leaves_source_empty() {
        let mut source = seeded(7);
        source.extend([1, 2, 3]);
        let moved = std::mem::take(&mut source);
        assert_eq!(moved.len(), 3);
        assert!(source.is_empty());
        assert_eq!(source.height(), 1);
    }

    #[test]
    fn test_display() {
        let empty: SkipList<i32> = SkipList::new();
        assert_eq!(empty.to_string(), "Skip list is empty\n");

        let mut list = SkipList::with_coin(scripted(vec![true, false, true, false]));
        list.extend([1, 3, 5]);
        assert_eq!(
            list.to_string(),
            "Size = 3, Height = 2\nHead -> 1 ------> 5\nHead -> 1 -> 3 -> 5\n"
        );
    }

    #[test]
    fn test_display_values_with_arrows() {
        let mut flat = SkipList::with_coin(|| false);
        flat.insert(String::from("a>b"));
        flat.insert(String::from("c"));
        assert_eq!(flat.to_string(), "Size = 2, Height = 1\nHead -> a>b -> c\n");

        // "b>x" is skipped by the upper row
        let mut list = SkipList::with_coin(scripted(vec![true, true, false, false]));
        list.insert(String::from("a"));
        list.insert(String::from("c"));
        list.insert(String::from("b>x"));
        assert_eq!(
            list.to_string(),
            "Size = 3, Height = 2\nHead -> a --------> c\nHead -> a -> b>x -> c\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let values = vec![8, 6, 7, 5, 3, 0, 9, 3];
        let mut list = seeded(8);
        list.extend(values.iter().copied());
        let before: Vec<i32> = list.iter().copied().collect();

        list.clear();
        list.extend(values.iter().copied());
        assert_eq!(list.len(), values.len());
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), before);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(i16),
        Remove(i16),
        RemoveAll(i16),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (-50i16..50).prop_map(Op::Insert),
            1 => (-50i16..50).prop_map(Op::Remove),
            1 => (-50i16..50).prop_map(Op::RemoveAll),
        ]
    }

    proptest! {
        #[test]
        fn test_matches_sorted_vec(ops in vec(op(), 1..400), seed in any::<u64>()) {
            let mut list = seeded(seed);
            let mut model: Vec<i16> = Vec::new();

            for op in ops {
                match op {
                    | Op::Insert(v) => {
                        list.insert(v);
                        let at = model.partition_point(|x| *x < v);
                        model.insert(at, v);
                    },
                    | Op::Remove(v) => {
                        let removed = list.remove(&v);
                        let found = model.iter().position(|x| *x == v);
                        prop_assert_eq!(removed, found.is_some());
                        if let Some(at) = found {
                            model.remove(at);
                        }
                    },
                    | Op::RemoveAll(v) => {
                        let before = model.len();
                        model.retain(|x| *x != v);
                        prop_assert_eq!(list.remove_all(&v), before - model.len());
                    },
                }
                list.check_invariants();
                prop_assert_eq!(list.len(), model.len());
            }

            prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), model.clone());
            for v in -50i16..50 {
                prop_assert_eq!(list.contains(&v), model.contains(&v));
            }
        }
    }
}
