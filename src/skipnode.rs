use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::trace;

/// Abort on a broken structural invariant.
///
/// Reaching this means the map itself is buggy; there is nothing a caller
/// could do to recover.
#[cold]
#[track_caller]
pub(crate) fn invariant_violated(what: &str) -> ! {
    panic!("skipmap structure invariant violated: {what}")
}

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// Index of a node within the arena of a [`Layers`].
///
/// An id stays valid until the node it refers to is unlinked; afterwards the
/// slot may be reused by a newer node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// A single cell of a tower.
///
/// Every layer starts with a sentinel, which holds neither key nor value.
/// Every other node holds a key, but only the bottom-most node of a tower
/// (the one on layer 0) holds the value.
#[derive(Clone, Debug)]
pub(crate) struct SkipNode<K, V> {
    pub key: Option<K>,
    pub value: Option<V>,
    // The next node on the same layer.
    pub right: Option<NodeId>,
    // The node for the same key (or the sentinel) on the layer below.
    pub down: Option<NodeId>,
}

impl<K, V> SkipNode<K, V> {
    /// Create the sentinel heading a layer, sitting above the sentinel `down`.
    pub fn sentinel(down: Option<NodeId>) -> Self {
        SkipNode {
            key: None,
            value: None,
            right: None,
            down,
        }
    }

    /// Create the layer-0 node of a tower, which owns the value.
    pub fn bottom(key: K, value: V) -> Self {
        SkipNode {
            key: Some(key),
            value: Some(value),
            right: None,
            down: None,
        }
    }

    /// Create an upper node of a tower, sitting above `down`.
    pub fn tower(key: K, down: NodeId) -> Self {
        SkipNode {
            key: Some(key),
            value: None,
            right: None,
            down: Some(down),
        }
    }

    /// Returns `true` if the node is a sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.key.is_none()
    }

    /// The key and value of a layer-0 node.
    pub fn item_ref(&self) -> (&K, &V) {
        match (&self.key, &self.value) {
            (Some(key), Some(value)) => (key, value),
            _ => invariant_violated("layer 0 node without key or value"),
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Layers
// ////////////////////////////////////////////////////////////////////////////

/// The stack of layers making up a skipmap, together with the arena owning
/// every node in them.
///
/// Layer 0 is at the bottom and contains every key. Dropping the `Layers`
/// releases every node at once.
#[derive(Clone, Debug)]
pub(crate) struct Layers<K, V> {
    // Slots of the arena. `None` marks a vacant slot.
    nodes: Vec<Option<SkipNode<K, V>>>,
    // Vacant slots, reused before the arena grows.
    vacant: Vec<NodeId>,
    // The sentinel of each layer, bottom first.
    heads: Vec<NodeId>,
}

impl<K, V> Layers<K, V> {
    /// Create two empty layers.
    pub fn new() -> Self {
        let mut layers = Layers {
            nodes: Vec::new(),
            vacant: Vec::new(),
            heads: Vec::new(),
        };
        layers.reset();
        layers
    }

    /// Release every node and go back to two empty layers.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.vacant.clear();
        self.heads.clear();
        self.reset();
    }

    fn reset(&mut self) {
        let bottom = self.alloc(SkipNode::sentinel(None));
        self.heads.push(bottom);
        self.push_empty_top();
    }

    /// The number of layers.
    pub fn count(&self) -> usize {
        self.heads.len()
    }

    /// The sentinel of the topmost layer.
    pub fn top(&self) -> NodeId {
        match self.heads.last() {
            Some(&head) => head,
            None => invariant_violated("no layers"),
        }
    }

    /// The sentinel of layer 0.
    pub fn bottom(&self) -> NodeId {
        self.head(0)
    }

    /// The sentinel of layer `layer`, counting from the bottom.
    pub fn head(&self, layer: usize) -> NodeId {
        match self.heads.get(layer) {
            Some(&head) => head,
            None => invariant_violated("layer out of range"),
        }
    }

    /// Number of live nodes, sentinels included.
    #[cfg(test)]
    pub fn live(&self) -> usize {
        self.nodes.len() - self.vacant.len()
    }

    pub fn node(&self, id: NodeId) -> &SkipNode<K, V> {
        match self.nodes.get(id.0) {
            Some(Some(node)) => node,
            _ => invariant_violated("dangling node id"),
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SkipNode<K, V> {
        match self.nodes.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => invariant_violated("dangling node id"),
        }
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    pub fn down(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).down
    }

    /// Add an empty layer above all others, returning its sentinel.
    pub fn push_empty_top(&mut self) -> NodeId {
        let below = self.heads.last().copied();
        let head = self.alloc(SkipNode::sentinel(below));
        self.heads.push(head);
        trace!(layers = self.heads.len(), "added empty top layer");
        head
    }

    /// Link `node` into the layer of `pred`, immediately after it.
    pub fn link_after(&mut self, pred: NodeId, mut node: SkipNode<K, V>) -> NodeId {
        node.right = self.right(pred);
        let id = self.alloc(node);
        self.node_mut(pred).right = Some(id);
        id
    }

    /// Splice out and release the node immediately after `pred`.
    pub fn unlink_after(&mut self, pred: NodeId) -> SkipNode<K, V> {
        let Some(doomed) = self.right(pred) else {
            invariant_violated("unlinking past the end of a layer")
        };
        let node = self.release(doomed);
        self.node_mut(pred).right = node.right;
        node
    }

    /// Follow the down references of a tower to its node on layer 0.
    pub fn tower_bottom(&self, mut id: NodeId) -> NodeId {
        while let Some(below) = self.down(id) {
            id = below;
        }
        id
    }

    /// The last node on layer 0, or its sentinel if the layer is empty.
    ///
    /// Runs right as far as possible on each layer before descending.
    pub fn last_bottom(&self) -> NodeId {
        let mut cur = self.top();
        loop {
            while let Some(next) = self.right(cur) {
                cur = next;
            }
            match self.down(cur) {
                Some(below) => cur = below,
                None => return cur,
            }
        }
    }

    /// Iterate over the real nodes of `layer`, left to right.
    pub fn layer_iter(&self, layer: usize) -> LayerIter<'_, K, V> {
        LayerIter {
            layers: self,
            next: self.right(self.head(layer)),
        }
    }

    fn alloc(&mut self, node: SkipNode<K, V>) -> NodeId {
        if let Some(id) = self.vacant.pop() {
            self.nodes[id.0] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            NodeId(self.nodes.len() - 1)
        }
    }

    fn release(&mut self, id: NodeId) -> SkipNode<K, V> {
        match self.nodes.get_mut(id.0).and_then(Option::take) {
            Some(node) => {
                self.vacant.push(id);
                node
            }
            None => invariant_violated("releasing a vacant node"),
        }
    }
}

impl<K, V> Layers<K, V> {
    /// Compare the key of the node after `id` with `key`, or `None` if `id`
    /// is the last node of its layer.
    fn cmp_right<Q>(&self, id: NodeId, key: &Q) -> Option<(NodeId, Ordering)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let next = self.right(id)?;
        match &self.node(next).key {
            Some(next_key) => Some((next, next_key.borrow().cmp(key))),
            None => invariant_violated("sentinel in the middle of a layer"),
        }
    }

    /// Walk right from `from` while the next key is strictly less than `key`.
    ///
    /// Returns the last node reached and the number of steps taken.
    pub fn advance_while_less<Q>(&self, from: NodeId, key: &Q) -> (NodeId, usize)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = from;
        let mut steps = 0;
        while let Some((next, Ordering::Less)) = self.cmp_right(cur, key) {
            cur = next;
            steps += 1;
        }
        (cur, steps)
    }

    /// The node immediately after `pred`, if it holds `key`.
    pub fn right_matching<Q>(&self, pred: NodeId, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.cmp_right(pred, key) {
            Some((next, Ordering::Equal)) => Some(next),
            _ => None,
        }
    }
}

/// Iterator over the real nodes of one layer.
pub(crate) struct LayerIter<'a, K, V> {
    layers: &'a Layers<K, V>,
    next: Option<NodeId>,
}

impl<'a, K, V> Iterator for LayerIter<'a, K, V> {
    type Item = (NodeId, &'a SkipNode<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.layers.node(id);
        self.next = node.right;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Layers, SkipNode};

    /// Build layer 0 holding `keys` (already sorted), each with value `key * 10`.
    fn bottom_layer(keys: &[u32]) -> Layers<u32, u32> {
        let mut layers = Layers::new();
        let mut pred = layers.bottom();
        for &key in keys {
            pred = layers.link_after(pred, SkipNode::bottom(key, key * 10));
        }
        layers
    }

    fn keys_on(layers: &Layers<u32, u32>, layer: usize) -> Vec<u32> {
        layers
            .layer_iter(layer)
            .filter_map(|(_, node)| node.key)
            .collect()
    }

    #[test]
    fn new_has_two_empty_layers() {
        let layers: Layers<u32, u32> = Layers::new();
        assert_eq!(layers.count(), 2);
        assert_eq!(layers.live(), 2);
        assert_eq!(layers.down(layers.top()), Some(layers.bottom()));
        assert_eq!(layers.down(layers.bottom()), None);
        assert!(layers.node(layers.top()).is_sentinel());
        assert_eq!(layers.last_bottom(), layers.bottom());
    }

    #[test]
    fn push_empty_top() {
        let mut layers: Layers<u32, u32> = Layers::new();
        let old_top = layers.top();
        let new_top = layers.push_empty_top();
        assert_eq!(layers.count(), 3);
        assert_eq!(layers.top(), new_top);
        assert_eq!(layers.down(new_top), Some(old_top));
        assert_eq!(layers.head(2), new_top);
    }

    #[test]
    fn link_and_unlink() {
        let mut layers = bottom_layer(&[1, 3, 5]);
        assert_eq!(keys_on(&layers, 0), vec![1, 3, 5]);
        assert_eq!(layers.live(), 5);

        let (pred, steps) = layers.advance_while_less(layers.bottom(), &3);
        assert_eq!(steps, 1);
        let node = layers.unlink_after(pred);
        assert_eq!(node.key, Some(3));
        assert_eq!(node.value, Some(30));
        assert_eq!(keys_on(&layers, 0), vec![1, 5]);
        assert_eq!(layers.live(), 4);

        // The vacant slot is reused.
        let nodes = layers.nodes.len();
        layers.link_after(pred, SkipNode::bottom(2, 20));
        assert_eq!(layers.nodes.len(), nodes);
        assert_eq!(keys_on(&layers, 0), vec![1, 2, 5]);
    }

    #[test]
    fn advance_and_match() {
        let layers = bottom_layer(&[10, 20, 30]);
        let bottom = layers.bottom();

        let (pred, steps) = layers.advance_while_less(bottom, &5);
        assert_eq!((pred, steps), (bottom, 0));
        assert!(layers.right_matching(pred, &5).is_none());

        let (pred, steps) = layers.advance_while_less(bottom, &20);
        assert_eq!(steps, 1);
        let hit = layers.right_matching(pred, &20);
        assert_eq!(hit.map(|id| layers.node(id).item_ref()), Some((&20, &200)));

        let (pred, steps) = layers.advance_while_less(bottom, &99);
        assert_eq!(steps, 3);
        assert_eq!(pred, layers.last_bottom());
        assert!(layers.right_matching(pred, &99).is_none());
    }

    #[test]
    fn towers() {
        let mut layers = bottom_layer(&[7]);
        let bottom_id = layers.last_bottom();
        assert_eq!(layers.node(bottom_id).item_ref(), (&7, &70));

        let one = layers.link_after(layers.head(1), SkipNode::tower(7, bottom_id));
        layers.push_empty_top();
        let two = layers.link_after(layers.head(2), SkipNode::tower(7, one));

        assert_eq!(layers.tower_bottom(two), bottom_id);
        assert_eq!(layers.tower_bottom(bottom_id), bottom_id);
        assert_eq!(keys_on(&layers, 2), vec![7]);
        assert_eq!(layers.node(two).value, None);
        assert_eq!(layers.last_bottom(), bottom_id);
    }

    #[test]
    fn clear_releases_everything() {
        let mut layers = bottom_layer(&[1, 2, 3, 4]);
        layers.push_empty_top();
        layers.clear();
        assert_eq!(layers.count(), 2);
        assert_eq!(layers.live(), 2);
        assert!(keys_on(&layers, 0).is_empty());
    }

    #[test]
    #[should_panic(expected = "skipmap structure invariant violated")]
    fn unlink_past_end() {
        let mut layers = bottom_layer(&[1]);
        let last = layers.last_bottom();
        layers.unlink_after(last);
    }
}
