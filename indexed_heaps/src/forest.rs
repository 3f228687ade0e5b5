use crate::polarity::{Polarity, Priority};

/// Handle to a live node inside the forest arena.
///
/// Handles replace the parent/child/sibling pointers of the classic
/// Fibonacci-heap formulation: all nodes live in one owning vector and link
/// to each other by index, so cutting and splicing stay O(1) while removed
/// nodes are simply retired to a free list instead of dangling.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub(crate) struct NodeRef(pub(crate) usize);

impl NodeRef {
    #[inline(always)]
    pub(crate) fn as_usize(self) -> usize {
        self.0
    }
}

/// Slot of the element index that owns a node: a mediator position for the
/// hash-keyed heap, the element value itself for the integer-domain heap.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub(crate) struct OwnerIndex(pub(crate) usize);

#[derive(Clone, Debug)]
struct FibNode<P: Priority> {
    owner: OwnerIndex,
    priority: P,
    parent: Option<NodeRef>,
    child: Option<NodeRef>,
    left: NodeRef,
    right: NodeRef,
    degree: u32,
    marked: bool,
}

#[derive(Clone, Debug)]
enum ArenaSlot<P: Priority> {
    Occupied(FibNode<P>),
    Vacant(Option<NodeRef>),
}

/// Heap-ordered multi-way forest with a circular root list, the structure
/// beneath both Fibonacci engines.
///
/// Knows nothing about elements: each node carries an `OwnerIndex` back into
/// the caller's element index. Node handles are stable across every
/// operation except `absorb`, which reports the relocation of every
/// transferred node.
#[derive(Clone, Debug)]
pub(crate) struct FibForest<P: Priority> {
    arena: Vec<ArenaSlot<P>>,
    free_head: Option<NodeRef>,
    top: Option<NodeRef>,
    len: usize,
    polarity: Polarity,
}

impl<P: Priority> FibForest<P> {
    #[inline(always)]
    pub(crate) fn with_capacity(polarity: Polarity, capacity: usize) -> Self {
        Self {
            arena: Vec::with_capacity(capacity),
            free_head: None,
            top: None,
            len: 0,
            polarity,
        }
    }

    #[inline(always)]
    pub(crate) fn polarity(&self) -> Polarity {
        self.polarity
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub(crate) fn top(&self) -> Option<NodeRef> {
        self.top
    }

    #[inline(always)]
    pub(crate) fn owner(&self, node: NodeRef) -> OwnerIndex {
        self.node(node).owner
    }

    #[inline(always)]
    pub(crate) fn set_owner(&mut self, node: NodeRef, owner: OwnerIndex) {
        self.node_mut(node).owner = owner;
    }

    #[inline(always)]
    pub(crate) fn priority(&self, node: NodeRef) -> &P {
        &self.node(node).priority
    }

    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.free_head = None;
        self.top = None;
        self.len = 0;
    }

    /// Wraps the entry in a new singleton root spliced into the root list.
    /// O(1); the extreme pointer moves only on strict improvement.
    pub(crate) fn insert(&mut self, owner: OwnerIndex, priority: P) -> NodeRef {
        let node = self.alloc(FibNode {
            owner,
            priority,
            parent: None,
            child: None,
            left: NodeRef(0),
            right: NodeRef(0),
            degree: 0,
            marked: false,
        });
        self.splice_into_root_list(node);
        if let Some(top) = self.top {
            if top != node
                && self
                    .polarity
                    .prefers(&self.node(node).priority, &self.node(top).priority)
            {
                self.top = Some(node);
            }
        }
        self.len += 1;
        node
    }

    /// Detaches the extreme root, re-parents its children into the root
    /// list, consolidates, and retires the node. Amortized O(log n).
    pub(crate) fn extract_top(&mut self) -> Option<(OwnerIndex, P)> {
        let top = self.top?;

        if let Some(first_child) = self.node(top).child {
            let mut children = Vec::with_capacity(self.node(top).degree as usize);
            let mut current = first_child;
            loop {
                children.push(current);
                current = self.node(current).right;
                if current == first_child {
                    break;
                }
            }
            for child in children {
                let child_node = self.node_mut(child);
                child_node.parent = None;
                child_node.marked = false;
                self.splice_into_root_list(child);
            }
            self.node_mut(top).child = None;
            self.node_mut(top).degree = 0;
        }

        let successor = self.node(top).right;
        self.unlink_from_ring(top);
        let removed = self.retire(top);
        self.len -= 1;

        if successor == top {
            debug_assert_eq!(self.len, 0, "Sole root removed from non-empty forest");
            self.top = None;
        } else {
            self.top = Some(successor);
            self.consolidate();
        }
        Some((removed.owner, removed.priority))
    }

    /// Rewrites the priority with a strictly better one and restores heap
    /// order by cut + cascading cut. Amortized O(1).
    pub(crate) fn promote(&mut self, node: NodeRef, priority: P) {
        debug_assert!(
            !self.polarity.prefers(self.priority(node), &priority),
            "promote must not worsen a priority"
        );
        self.node_mut(node).priority = priority;
        match self.node(node).parent {
            Some(parent)
                if self
                    .polarity
                    .prefers(&priority, &self.node(parent).priority) =>
            {
                self.cut(node);
                self.cascading_cut(parent);
            }
            _ => {
                let top = self.top.expect("Promote target must be in the forest");
                if self
                    .polarity
                    .prefers(&priority, &self.node(top).priority)
                {
                    self.top = Some(node);
                }
            }
        }
    }

    /// Rewrites the priority with a strictly worse one. Children the write
    /// leaves violating heap order are cut to the root list, with the usual
    /// lost-a-child accounting on this node; if the node was the extreme,
    /// the root list is rescanned. A childless non-extreme demotion is a
    /// plain O(1) write.
    pub(crate) fn demote(&mut self, node: NodeRef, priority: P) {
        debug_assert!(
            !self.polarity.prefers(&priority, self.priority(node)),
            "demote must not improve a priority"
        );
        let was_top = self.top == Some(node);
        self.node_mut(node).priority = priority;

        if let Some(first_child) = self.node(node).child {
            let mut children = Vec::with_capacity(self.node(node).degree as usize);
            let mut current = first_child;
            loop {
                children.push(current);
                current = self.node(current).right;
                if current == first_child {
                    break;
                }
            }
            for child in children {
                if self
                    .polarity
                    .prefers(&self.node(child).priority, &priority)
                {
                    self.cut(child);
                    self.cascading_cut(node);
                }
            }
        }

        // A cut child may already have claimed the extreme pointer, but the
        // rescan must still run: an untouched root can beat that child.
        if was_top {
            self.refresh_top();
        }
    }

    /// Removes an arbitrary node: force-cut it to the root list (with the
    /// cascading cut its parent chain requires), declare it the extreme, and
    /// extract. The promote-to-dominating-extreme formulation without
    /// writing a sentinel priority into the node.
    pub(crate) fn delete(&mut self, node: NodeRef) -> (OwnerIndex, P) {
        if let Some(parent) = self.node(node).parent {
            self.cut(node);
            self.cascading_cut(parent);
        }
        self.top = Some(node);
        self.extract_top()
            .expect("Delete target must be in the forest")
    }

    /// Transfers every node of `other` into this arena and splices the two
    /// root lists. Returns the relocation table: old arena index → new
    /// handle. The caller re-points its element index from the table.
    pub(crate) fn absorb(&mut self, other: FibForest<P>) -> Vec<Option<NodeRef>> {
        debug_assert_eq!(
            self.polarity, other.polarity,
            "Polarity checked by the caller"
        );
        let mut remap: Vec<Option<NodeRef>> = vec![None; other.arena.len()];
        let other_top = match other.top {
            Some(top) => top,
            None => return remap,
        };

        for (old_index, slot) in other.arena.into_iter().enumerate() {
            if let ArenaSlot::Occupied(node) = slot {
                remap[old_index] = Some(self.alloc(node));
            }
        }
        let relocated = |link: NodeRef, remap: &[Option<NodeRef>]| {
            remap[link.0].expect("Links of live nodes reference live nodes")
        };
        for &new_ref in remap.iter().flatten() {
            let node = self.node_mut(new_ref);
            node.left = relocated(node.left, &remap);
            node.right = relocated(node.right, &remap);
            if let Some(parent) = node.parent {
                node.parent = Some(relocated(parent, &remap));
            }
            if let Some(child) = node.child {
                node.child = Some(relocated(child, &remap));
            }
        }

        let other_top = relocated(other_top, &remap);
        match self.top {
            None => self.top = Some(other_top),
            Some(top) => {
                let top_left = self.node(top).left;
                let other_left = self.node(other_top).left;
                self.node_mut(top_left).right = other_top;
                self.node_mut(other_top).left = top_left;
                self.node_mut(other_left).right = top;
                self.node_mut(top).left = other_left;
                if self
                    .polarity
                    .prefers(&self.node(other_top).priority, &self.node(top).priority)
                {
                    self.top = Some(other_top);
                }
            }
        }
        self.len += other.len;
        remap
    }

    /// Iterates `(owner, priority)` pairs in the forest's canonical order:
    /// root list from the extreme rightwards, each tree pre-order.
    pub(crate) fn iter(&self) -> ForestIter<P> {
        let mut pending = Vec::new();
        if let Some(top) = self.top {
            let mut current = self.node(top).right;
            while current != top {
                pending.push(current);
                current = self.node(current).right;
            }
            pending.reverse();
            pending.push(top);
        }
        ForestIter {
            forest: self,
            pending,
        }
    }

    // Internal plumbing

    #[inline(always)]
    fn node(&self, NodeRef(index): NodeRef) -> &FibNode<P> {
        match &self.arena[index] {
            ArenaSlot::Occupied(node) => node,
            ArenaSlot::Vacant(_) => panic!("Node handle must reference a live node"),
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, NodeRef(index): NodeRef) -> &mut FibNode<P> {
        match &mut self.arena[index] {
            ArenaSlot::Occupied(node) => node,
            ArenaSlot::Vacant(_) => panic!("Node handle must reference a live node"),
        }
    }

    fn alloc(&mut self, node: FibNode<P>) -> NodeRef {
        match self.free_head {
            Some(free) => {
                self.free_head = match self.arena[free.0] {
                    ArenaSlot::Vacant(next) => next,
                    ArenaSlot::Occupied(_) => panic!("Free list must reference vacant slots"),
                };
                self.arena[free.0] = ArenaSlot::Occupied(node);
                free
            }
            None => {
                self.arena.push(ArenaSlot::Occupied(node));
                NodeRef(self.arena.len() - 1)
            }
        }
    }

    fn retire(&mut self, node: NodeRef) -> FibNode<P> {
        let slot = std::mem::replace(&mut self.arena[node.0], ArenaSlot::Vacant(self.free_head));
        self.free_head = Some(node);
        match slot {
            ArenaSlot::Occupied(node) => node,
            ArenaSlot::Vacant(_) => panic!("Retired handle must reference a live node"),
        }
    }

    /// Splices `node` into the root list next to the extreme root (or makes
    /// it the sole root). Does not move the extreme pointer.
    fn splice_into_root_list(&mut self, node: NodeRef) {
        match self.top {
            None => {
                self.node_mut(node).left = node;
                self.node_mut(node).right = node;
                self.top = Some(node);
            }
            Some(top) => {
                let top_left = self.node(top).left;
                self.node_mut(node).right = top;
                self.node_mut(node).left = top_left;
                self.node_mut(top_left).right = node;
                self.node_mut(top).left = node;
            }
        }
    }

    #[inline(always)]
    fn unlink_from_ring(&mut self, node: NodeRef) {
        let left = self.node(node).left;
        let right = self.node(node).right;
        self.node_mut(left).right = right;
        self.node_mut(right).left = left;
    }

    /// Detaches a parented node and splices it into the root list unmarked,
    /// moving the extreme pointer on strict improvement.
    fn cut(&mut self, node: NodeRef) {
        let parent = self
            .node(node)
            .parent
            .expect("Cut requires a parented node");
        let right = self.node(node).right;
        if self.node(parent).child == Some(node) {
            self.node_mut(parent).child = if right == node { None } else { Some(right) };
        }
        self.unlink_from_ring(node);
        self.node_mut(parent).degree -= 1;
        self.node_mut(node).parent = None;
        self.node_mut(node).marked = false;
        self.splice_into_root_list(node);

        let top = self.top.expect("Cut target must be in the forest");
        if self
            .polarity
            .prefers(&self.node(node).priority, &self.node(top).priority)
        {
            self.top = Some(node);
        }
    }

    /// Walks up from a node that just lost a child: an unmarked non-root
    /// parent is marked; a marked one is cut too and the walk continues.
    fn cascading_cut(&mut self, mut node: NodeRef) {
        loop {
            let parent = match self.node(node).parent {
                Some(parent) => parent,
                None => return,
            };
            if !self.node(node).marked {
                self.node_mut(node).marked = true;
                return;
            }
            self.cut(node);
            node = parent;
        }
    }

    /// Merges root trees of equal degree until all root degrees are
    /// distinct, then rescans the surviving roots for the new extreme.
    fn consolidate(&mut self) {
        let start = self.top.expect("Consolidate requires a non-empty forest");
        let mut roots = Vec::new();
        let mut current = start;
        loop {
            roots.push(current);
            current = self.node(current).right;
            if current == start {
                break;
            }
        }

        // A root of degree k owns at least Fib(k+2) descendants, so degrees
        // stay below log_phi(len); resizing covers the transient +1 growth
        // while linking.
        let mut buckets: Vec<Option<NodeRef>> =
            vec![None; usize::BITS as usize - self.len.leading_zeros() as usize + 2];
        for root in roots {
            let mut winner = root;
            let mut degree = self.node(winner).degree as usize;
            loop {
                if degree >= buckets.len() {
                    buckets.resize(degree + 1, None);
                }
                let rival = match buckets[degree] {
                    Some(rival) => rival,
                    None => break,
                };
                let mut loser = rival;
                if self
                    .polarity
                    .prefers(&self.node(loser).priority, &self.node(winner).priority)
                {
                    std::mem::swap(&mut winner, &mut loser);
                }
                self.link(loser, winner);
                buckets[degree] = None;
                degree += 1;
            }
            buckets[degree] = Some(winner);
        }

        self.top = None;
        for root in buckets.into_iter().flatten() {
            self.splice_into_root_list(root);
            let top = self.top.expect("Splice just set the extreme root");
            if top != root
                && self
                    .polarity
                    .prefers(&self.node(root).priority, &self.node(top).priority)
            {
                self.top = Some(root);
            }
        }
    }

    /// Makes the tree rooted at `loser` a child of `winner`.
    fn link(&mut self, loser: NodeRef, winner: NodeRef) {
        self.unlink_from_ring(loser);
        self.node_mut(loser).parent = Some(winner);
        self.node_mut(loser).marked = false;
        match self.node(winner).child {
            Some(child) => {
                let child_left = self.node(child).left;
                self.node_mut(loser).right = child;
                self.node_mut(loser).left = child_left;
                self.node_mut(child_left).right = loser;
                self.node_mut(child).left = loser;
            }
            None => {
                self.node_mut(winner).child = Some(loser);
                self.node_mut(loser).left = loser;
                self.node_mut(loser).right = loser;
            }
        }
        self.node_mut(winner).degree += 1;
    }

    /// Rescans the root list for the extreme after the current extreme
    /// worsened in place.
    fn refresh_top(&mut self) {
        let start = self.top.expect("Refresh requires a non-empty forest");
        let mut best = start;
        let mut current = self.node(start).right;
        while current != start {
            if self
                .polarity
                .prefers(&self.node(current).priority, &self.node(best).priority)
            {
                best = current;
            }
            current = self.node(current).right;
        }
        self.top = Some(best);
    }
}

pub(crate) struct ForestIter<'a, P: Priority> {
    forest: &'a FibForest<P>,
    /// Nodes not yet visited; the next node to visit is on top. Children of
    /// a visited node are pushed in reverse ring order so the first child
    /// is visited first.
    pending: Vec<NodeRef>,
}

impl<'a, P: Priority> Iterator for ForestIter<'a, P> {
    type Item = (OwnerIndex, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pending.pop()?;
        if let Some(first_child) = self.forest.node(node).child {
            let marker = self.pending.len();
            let mut current = first_child;
            loop {
                self.pending.push(current);
                current = self.forest.node(current).right;
                if current == first_child {
                    break;
                }
            }
            self.pending[marker..].reverse();
        }
        let entry = self.forest.node(node);
        Some((entry.owner, &entry.priority))
    }
}
