//! SkipMap stores key-value pairs, with the keys being unique and always
//! sorted, and the height of every key's tower decided by a deterministic
//! [`LevelGenerator`].

use std::borrow::Borrow;
use std::iter::FusedIterator;
use std::{fmt, iter};

use thiserror::Error;
use tracing::trace;

use crate::level_generator::{CoinFlip, LevelGenerator};
use crate::skipnode::{LayerIter, Layers, NodeId, SkipNode, invariant_violated};

/// Errors reported by the operations of a [`SkipMap`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkipMapError {
    /// The key is not in the map.
    #[error("key not found.")]
    NotFound,
    /// The key is already in the map, so nothing was inserted.
    #[error("key already exists.")]
    AlreadyExists,
    /// The key is the largest in the map.
    #[error("key has no successor.")]
    NoSuccessor,
    /// The key is the smallest in the map.
    #[error("key has no predecessor.")]
    NoPredecessor,
}

// ////////////////////////////////////////////////////////////////////////////
// SkipMap
// ////////////////////////////////////////////////////////////////////////////

/// The skipmap provides a way of storing key-value pairs such that the keys
/// are always sorted whilst at the same time providing an efficient way to
/// access, insert and remove them.
///
/// Unlike most skiplists, no randomness is involved: the height of a key's
/// tower is decided by the level generator `G`, which by default derives it
/// from a hash of the key (see [`CoinFlip`]). Two maps receiving the same
/// sequence of insertions therefore end up with identical structures.
///
/// The map starts with two empty layers and grows a new empty layer on top
/// whenever a new tower would otherwise reach the topmost layer, so the
/// topmost layer is always empty. Layers are never removed, even once erasing
/// keys leaves them empty.
///
/// Note that mutable references to keys are not available at all as this could
/// result in a node being left out of the proper ordering.
#[derive(Clone)]
pub struct SkipMap<K, V, G = CoinFlip> {
    layers: Layers<K, V>,
    len: usize,
    level_generator: G,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V> SkipMap<K, V> {
    /// Create a new, empty skipmap using the default [`CoinFlip`] level
    /// generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use deterministic_skipmap::SkipMap;
    ///
    /// let skipmap: SkipMap<u32, String> = SkipMap::new();
    /// assert!(skipmap.is_empty());
    /// assert_eq!(skipmap.layer_count(), 2);
    /// ```
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::with_level_generator(CoinFlip::default())
    }
}

impl<K, V, G> SkipMap<K, V, G> {
    /// Create a new, empty skipmap whose tower heights are decided by
    /// `level_generator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use deterministic_skipmap::SkipMap;
    /// use deterministic_skipmap::level_generator::{CoinFlip, HeightPolicy};
    ///
    /// let policy = HeightPolicy::new(4, 3, 2).unwrap();
    /// let mut skipmap = SkipMap::with_level_generator(CoinFlip::new(policy));
    /// skipmap.insert(0xFF_u32, "tall");
    /// assert_eq!(skipmap.height(&0xFF), Ok(3));
    /// ```
    #[must_use]
    #[inline]
    pub fn with_level_generator(level_generator: G) -> Self {
        SkipMap {
            layers: Layers::new(),
            len: 0,
            level_generator,
        }
    }

    /// The level generator deciding tower heights.
    #[must_use]
    #[inline]
    pub fn level_generator(&self) -> &G {
        &self.level_generator
    }

    /// Clears the skipmap, releasing every node and returning to two empty
    /// layers.
    ///
    /// # Examples
    ///
    /// ```
    /// use deterministic_skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10_u32).map(|x| (x, x)));
    /// skipmap.clear();
    /// assert!(skipmap.is_empty());
    /// assert_eq!(skipmap.layer_count(), 2);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.layers.clear();
    }

    /// Returns the number of keys in the skipmap.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skipmap contains no keys.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of layers, including the empty topmost layer.
    ///
    /// This is always at least 2.
    #[must_use]
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.count()
    }

    /// Provides a reference to the smallest key and its value, or `None` if
    /// the skipmap is empty.
    #[must_use]
    #[inline]
    pub fn front(&self) -> Option<(&K, &V)> {
        let first = self.layers.right(self.layers.bottom())?;
        Some(self.layers.node(first).item_ref())
    }

    /// Provides a reference to the largest key and its value, or `None` if
    /// the skipmap is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use deterministic_skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert!(skipmap.back().is_none());
    ///
    /// skipmap.insert(1_u32, "a");
    /// skipmap.insert(3, "c");
    /// skipmap.insert(2, "b");
    /// assert_eq!(skipmap.front(), Some((&1, &"a")));
    /// assert_eq!(skipmap.back(), Some((&3, &"c")));
    /// ```
    #[must_use]
    #[inline]
    pub fn back(&self) -> Option<(&K, &V)> {
        let last = self.layers.last_bottom();
        let node = self.layers.node(last);
        if node.is_sentinel() {
            None
        } else {
            Some(node.item_ref())
        }
    }

    /// Creates an iterator over the entries of the skipmap, in ascending key
    /// order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: self.layers.layer_iter(0),
            remaining: self.len,
        }
    }

    /// Returns a snapshot of every key, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use deterministic_skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// for key in [10_u32, 20, 5, 15] {
    ///     skipmap.insert(key, ());
    /// }
    /// assert_eq!(skipmap.keys_in_order(), vec![5, 10, 15, 20]);
    /// ```
    #[must_use]
    #[inline]
    pub fn keys_in_order(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(key, _)| key.clone()).collect()
    }
}

impl<K, V, G> SkipMap<K, V, G>
where
    K: Ord,
{
    /// Find the value for `key`, along with the number of nodes visited
    /// while searching for it.
    ///
    /// The search starts at the sentinel of the topmost layer and, on every
    /// layer, counts the node it starts from plus every node it moves right
    /// onto. It stops on the first layer where the key is found.
    ///
    /// # Errors
    ///
    /// Returns [`SkipMapError::NotFound`] if the key is not in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use deterministic_skipmap::{SkipMap, SkipMapError};
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert(1_u32, "one");
    ///
    /// let (value, visited) = skipmap.find(&1).unwrap();
    /// assert_eq!(*value, "one");
    /// assert!(visited >= 1);
    /// assert_eq!(skipmap.find(&2), Err(SkipMapError::NotFound));
    /// ```
    #[inline]
    pub fn find<Q>(&self, key: &Q) -> Result<(&V, usize), SkipMapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (found, visited) = self.search(key);
        let id = found.ok_or(SkipMapError::NotFound)?;
        Ok((self.layers.node(id).item_ref().1, visited))
    }

    /// Find the value for `key` mutably, along with the number of nodes
    /// visited while searching for it.
    ///
    /// # Errors
    ///
    /// Returns [`SkipMapError::NotFound`] if the key is not in the map.
    #[inline]
    pub fn find_mut<Q>(&mut self, key: &Q) -> Result<(&mut V, usize), SkipMapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (found, visited) = self.search(key);
        let id = found.ok_or(SkipMapError::NotFound)?;
        match self.layers.node_mut(id).value.as_mut() {
            Some(value) => Ok((value, visited)),
            None => invariant_violated("layer 0 node without a value"),
        }
    }

    /// Returns a reference to the value for `key`, if present.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).ok().map(|(value, _)| value)
    }

    /// Returns a mutable reference to the value for `key`, if present.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_mut(key).ok().map(|(value, _)| value)
    }

    /// Returns `true` if the skipmap contains `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).0.is_some()
    }

    /// Returns the number of layers containing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SkipMapError::NotFound`] if the key is not in the map.
    #[inline]
    pub fn height<Q>(&self, key: &Q) -> Result<usize, SkipMapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut height = 0;
        let mut cur = Some(self.layers.top());
        while let Some(node) = cur {
            let (pred, _) = self.layers.advance_while_less(node, key);
            if self.layers.right_matching(pred, key).is_some() {
                height += 1;
            }
            cur = self.layers.down(pred);
        }
        if height == 0 {
            Err(SkipMapError::NotFound)
        } else {
            Ok(height)
        }
    }

    /// Returns the smallest key greater than `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SkipMapError::NotFound`] if `key` is not in the map, and
    /// [`SkipMapError::NoSuccessor`] if it is the largest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use deterministic_skipmap::{SkipMap, SkipMapError};
    ///
    /// let skipmap: SkipMap<u32, ()> = [1, 3, 5].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(skipmap.next_key(&1), Ok(&3));
    /// assert_eq!(skipmap.next_key(&5), Err(SkipMapError::NoSuccessor));
    /// assert_eq!(skipmap.next_key(&2), Err(SkipMapError::NotFound));
    /// ```
    #[inline]
    pub fn next_key<Q>(&self, key: &Q) -> Result<&K, SkipMapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.search(key).0.ok_or(SkipMapError::NotFound)?;
        match self.layers.right(id) {
            Some(next) => Ok(self.layers.node(next).item_ref().0),
            None => Err(SkipMapError::NoSuccessor),
        }
    }

    /// Returns the largest key smaller than `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SkipMapError::NotFound`] if `key` is not in the map, and
    /// [`SkipMapError::NoPredecessor`] if it is the smallest key.
    #[inline]
    pub fn previous_key<Q>(&self, key: &Q) -> Result<&K, SkipMapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let pred = self.bottom_predecessor(key);
        if self.layers.right_matching(pred, key).is_none() {
            return Err(SkipMapError::NotFound);
        }
        let node = self.layers.node(pred);
        if node.is_sentinel() {
            Err(SkipMapError::NoPredecessor)
        } else {
            Ok(node.item_ref().0)
        }
    }

    /// Returns `true` if `key` is the smallest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`SkipMapError::NotFound`] if `key` is not in the map.
    #[inline]
    pub fn is_smallest_key<Q>(&self, key: &Q) -> Result<bool, SkipMapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains_key(key) {
            return Err(SkipMapError::NotFound);
        }
        match self.front() {
            Some((first, _)) => Ok(first.borrow() == key),
            None => invariant_violated("key found in an empty layer 0"),
        }
    }

    /// Returns `true` if `key` is the largest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`SkipMapError::NotFound`] if `key` is not in the map.
    #[inline]
    pub fn is_largest_key<Q>(&self, key: &Q) -> Result<bool, SkipMapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains_key(key) {
            return Err(SkipMapError::NotFound);
        }
        match self.back() {
            Some((last, _)) => Ok(last.borrow() == key),
            None => invariant_violated("key found in an empty layer 0"),
        }
    }

    /// Removes `key` from every layer of its tower, returning its value.
    ///
    /// Each layer is searched on its own, so the whole tower goes even if it
    /// does not reach down from the first layer it is found on. Layers left
    /// empty are kept.
    ///
    /// # Errors
    ///
    /// Returns [`SkipMapError::NotFound`], leaving the map untouched, if the
    /// key is not in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use deterministic_skipmap::{SkipMap, SkipMapError};
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert(15_u32, "fifteen");
    /// let layers = skipmap.layer_count();
    ///
    /// assert_eq!(skipmap.erase(&15), Ok("fifteen"));
    /// assert_eq!(skipmap.erase(&15), Err(SkipMapError::NotFound));
    /// assert!(skipmap.is_empty());
    /// assert_eq!(skipmap.layer_count(), layers);
    /// ```
    #[inline]
    pub fn erase<Q>(&mut self, key: &Q) -> Result<V, SkipMapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut removed = 0_usize;
        let mut value = None;
        let mut cur = Some(self.layers.top());
        while let Some(node) = cur {
            let (pred, _) = self.layers.advance_while_less(node, key);
            if self.layers.right_matching(pred, key).is_some() {
                let doomed = self.layers.unlink_after(pred);
                if doomed.down.is_none() {
                    value = doomed.value;
                }
                removed += 1;
            }
            cur = self.layers.down(pred);
        }

        match value {
            Some(value) => {
                self.len -= 1;
                trace!(removed, len = self.len, "erased key");
                Ok(value)
            }
            None if removed == 0 => Err(SkipMapError::NotFound),
            None => invariant_violated("tower without a layer 0 node"),
        }
    }
}

impl<K, V, G> SkipMap<K, V, G>
where
    K: Ord + Clone,
    G: LevelGenerator<K>,
{
    /// Insert `key` with `value`, returning the number of nodes visited while
    /// looking for its place, or `None` if the key is already present.
    ///
    /// This never replaces the value of an existing key.
    ///
    /// # Examples
    ///
    /// ```
    /// use deterministic_skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    ///
    /// assert!(skipmap.insert(1_u32, "Hello").is_some());
    /// assert!(skipmap.insert(2, "World").is_some());
    /// assert!(skipmap.insert(1, "Bye").is_none());
    /// assert_eq!(skipmap.get(&1), Some(&"Hello"));
    /// assert_eq!(skipmap.len(), 2);
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<usize> {
        self.try_insert(key, value).ok()
    }

    /// Insert `key` with `value`, returning the number of nodes visited while
    /// looking for its place.
    ///
    /// The nodes visited are counted as in [`find`](Self::find), except that
    /// the search always runs down to layer 0.
    ///
    /// # Errors
    ///
    /// Returns [`SkipMapError::AlreadyExists`], leaving the map untouched, if
    /// the key is already present.
    #[inline]
    pub fn try_insert(&mut self, key: K, value: V) -> Result<usize, SkipMapError> {
        let (mut preds, visited) = self.predecessors(&key);
        let Some(&bottom_pred) = preds.last() else {
            invariant_violated("no layers")
        };
        if self.layers.right_matching(bottom_pred, &key).is_some() {
            trace!(visited, "key already exists");
            return Err(SkipMapError::AlreadyExists);
        }

        let limit = self.level_generator.limit(self.len + 1).max(1);
        let height = self.level_generator.height(&key, limit).clamp(1, limit);
        while height >= self.layers.count() {
            preds.insert(0, self.layers.push_empty_top());
        }

        let mut below = self
            .layers
            .link_after(bottom_pred, SkipNode::bottom(key.clone(), value));
        for &pred in preds.iter().rev().skip(1).take(height - 1) {
            below = self
                .layers
                .link_after(pred, SkipNode::tower(key.clone(), below));
        }

        self.len += 1;
        trace!(visited, height, len = self.len, "inserted key");
        Ok(visited)
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<K, V, G> SkipMap<K, V, G>
where
    K: Ord,
{
    /// Search for `key`, returning its layer 0 node (if any) and the number
    /// of nodes visited.
    fn search<Q>(&self, key: &Q) -> (Option<NodeId>, usize)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut visited = 0;
        let mut cur = Some(self.layers.top());
        while let Some(node) = cur {
            let (pred, steps) = self.layers.advance_while_less(node, key);
            visited += 1 + steps;
            if let Some(hit) = self.layers.right_matching(pred, key) {
                return (Some(self.layers.tower_bottom(hit)), visited);
            }
            cur = self.layers.down(pred);
        }
        (None, visited)
    }

    /// The last node not reaching `key` on every layer, top first, along
    /// with the number of nodes visited.
    fn predecessors<Q>(&self, key: &Q) -> (Vec<NodeId>, usize)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut preds = Vec::with_capacity(self.layers.count());
        let mut visited = 0;
        let mut cur = Some(self.layers.top());
        while let Some(node) = cur {
            let (pred, steps) = self.layers.advance_while_less(node, key);
            visited += 1 + steps;
            preds.push(pred);
            cur = self.layers.down(pred);
        }
        (preds, visited)
    }

    /// The last node on layer 0 whose key is less than `key`, or the layer 0
    /// sentinel if there is none.
    fn bottom_predecessor<Q>(&self, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.layers.top();
        loop {
            let (pred, _) = self.layers.advance_while_less(cur, key);
            match self.layers.down(pred) {
                Some(below) => cur = below,
                None => return pred,
            }
        }
    }

    /// Checks the integrity of the skipmap.
    #[cfg(test)]
    pub(crate) fn check(&self) {
        use std::collections::HashSet;

        let count = self.layers.count();
        assert!(count >= 2, "fewer than two layers");
        assert_eq!(
            self.layers.layer_iter(count - 1).count(),
            0,
            "topmost layer is not empty"
        );

        let mut live = 0;
        let mut below: HashSet<NodeId> = HashSet::new();
        for layer in 0..count {
            let head = self.layers.head(layer);
            assert!(self.layers.node(head).is_sentinel());
            let expected_down = layer.checked_sub(1).map(|l| self.layers.head(l));
            assert_eq!(self.layers.down(head), expected_down);
            live += 1;

            let mut this_layer = HashSet::new();
            let mut prev: Option<&K> = None;
            for (id, node) in self.layers.layer_iter(layer) {
                let Some(key) = node.key.as_ref() else {
                    panic!("sentinel in the middle of layer {layer}");
                };
                if let Some(prev) = prev {
                    assert!(prev < key, "keys out of order on layer {layer}");
                }
                prev = Some(key);
                live += 1;
                this_layer.insert(id);

                if layer == 0 {
                    assert!(node.value.is_some(), "layer 0 node without value");
                    assert!(node.down.is_none(), "layer 0 node pointing down");
                } else {
                    assert!(node.value.is_none(), "tower node holding a value");
                    let Some(down) = node.down else {
                        panic!("tower node on layer {layer} not pointing down");
                    };
                    assert!(below.contains(&down), "tower skips a layer");
                    assert!(
                        self.layers.node(down).key.as_ref() == Some(key),
                        "tower changes key on layer {layer}"
                    );
                }
            }
            below = this_layer;
        }

        assert_eq!(self.layers.layer_iter(0).count(), self.len);
        assert_eq!(self.layers.live(), live, "leaked nodes");
    }

    /// Counts the layers holding `key` by scanning each one in full.
    #[cfg(test)]
    pub(crate) fn layers_holding(&self, key: &K) -> usize {
        (0..self.layers.count())
            .filter(|&layer| {
                self.layers
                    .layer_iter(layer)
                    .any(|(_, node)| node.key.as_ref() == Some(key))
            })
            .count()
    }
}

impl<K, V, G> SkipMap<K, V, G>
where
    K: fmt::Debug,
{
    /// Renders every layer, topmost first, as a row of keys.
    ///
    /// Keys are aligned in columns, with dashes wherever a key's tower does
    /// not reach a layer:
    ///
    /// ```text
    /// <head>-------- --> [3]--------
    /// <head> --> [1] --> [3] --> [5]
    /// ```
    #[must_use]
    #[inline]
    pub fn debug_structure(&self) -> String {
        let cells: Vec<(NodeId, String)> = self
            .layers
            .layer_iter(0)
            .map(|(id, node)| (id, format!(" --> [{:?}]", node.item_ref().0)))
            .collect();

        let mut rows = Vec::with_capacity(self.layers.count());
        for layer in (0..self.layers.count()).rev() {
            let mut row = String::from("<head>");
            let mut nodes = self.layers.layer_iter(layer).peekable();
            for (bottom, cell) in &cells {
                match nodes.peek() {
                    Some(&(id, _)) if self.layers.tower_bottom(id) == *bottom => {
                        row.push_str(cell);
                        nodes.next();
                    }
                    _ => row.push_str(&"-".repeat(cell.len())),
                }
            }
            rows.push(row);
        }
        rows.join("\n")
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K, V, G> Default for SkipMap<K, V, G>
where
    G: Default,
{
    #[inline]
    fn default() -> SkipMap<K, V, G> {
        SkipMap::with_level_generator(G::default())
    }
}

/// This implementation of `PartialEq` only checks that the *entries* are
/// equal; the structure of the layers is not compared.
impl<AK, AV, AG, BK, BV, BG> PartialEq<SkipMap<BK, BV, BG>> for SkipMap<AK, AV, AG>
where
    AK: PartialEq<BK>,
    AV: PartialEq<BV>,
{
    #[inline]
    fn eq(&self, other: &SkipMap<BK, BV, BG>) -> bool {
        self.len == other.len
            && self
                .iter()
                .zip(other.iter())
                .all(|((ak, av), (bk, bv))| ak == bk && av == bv)
    }
}

impl<K, V, G> Eq for SkipMap<K, V, G>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V, G> Extend<(K, V)> for SkipMap<K, V, G>
where
    K: Ord + Clone,
    G: LevelGenerator<K>,
{
    /// Inserts every pair; keys already present keep their value.
    #[inline]
    fn extend<I: iter::IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            let _visited = self.insert(key, value);
        }
    }
}

impl<K, V, G> iter::FromIterator<(K, V)> for SkipMap<K, V, G>
where
    K: Ord + Clone,
    G: LevelGenerator<K> + Default,
{
    #[inline]
    fn from_iter<I>(iter: I) -> SkipMap<K, V, G>
    where
        I: iter::IntoIterator<Item = (K, V)>,
    {
        let mut skipmap = SkipMap::default();
        skipmap.extend(iter);
        skipmap
    }
}

impl<K, V, G> fmt::Debug for SkipMap<K, V, G>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, G> iter::IntoIterator for &'a SkipMap<K, V, G> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ///////////////////////////////////////////////
// Extra structs
// ///////////////////////////////////////////////

/// Iterator over the entries of a [`SkipMap`], in ascending key order.
pub struct Iter<'a, K, V> {
    nodes: LayerIter<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (_, node) = self.nodes.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.item_ref())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
