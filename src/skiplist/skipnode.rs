/// Index of a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

/// A single cell of the skip list. A node lives on exactly one row; the
/// copies of the same value on the rows beneath it are reached through
/// `down`.
#[derive(Debug, Clone)]
pub(crate) struct SkipNode<T> {
    /// `None` for the sentinel heads and for slots on the free list.
    pub(crate) value: Option<T>,
    pub(crate) next: Option<NodeId>,
    pub(crate) down: Option<NodeId>,
}

impl<T> SkipNode<T> {
    pub(crate) fn head(down: Option<NodeId>) -> Self {
        SkipNode {
            value: None,
            next: None,
            down,
        }
    }

    pub(crate) fn new(value: T, next: Option<NodeId>, down: Option<NodeId>) -> Self {
        SkipNode {
            value: Some(value),
            next,
            down,
        }
    }
}

/// Backing storage for every node of one skip list. Rows and towers are
/// threaded through it by [`NodeId`], so a node can be both the `next` of
/// its neighbour and the `down` of the node above it.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<T> {
    nodes: Vec<SkipNode<T>>,
    // recycled slots
    free_list: Vec<NodeId>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        NodeArena {
            nodes: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, node: SkipNode<T>) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.nodes[id.0] = node;
            id
        } else {
            let id = NodeId(self.nodes.len());
            self.nodes.push(node);
            id
        }
    }

    /// Releases a node and hands back its value. The slot is reused by a
    /// later [`alloc`](Self::alloc).
    pub(crate) fn free(&mut self, id: NodeId) -> Option<T> {
        let node = &mut self.nodes[id.0];
        node.next = None;
        node.down = None;
        self.free_list.push(id);
        node.value.take()
    }

    pub(crate) fn get(&self, id: NodeId) -> &SkipNode<T> {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut SkipNode<T> {
        &mut self.nodes[id.0]
    }

    /// Number of slots ever handed out, freed ones included. Every
    /// [`NodeId`] of this arena is below it.
    pub(crate) fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live slots, sentinels included.
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
    }
}
