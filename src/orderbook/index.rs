//! Ordered index over the distinct active prices of one side of the book.
//!
//! The index is a red-black tree whose nodes live in a [`Slab`] arena and
//! link to each other (parent, left, right) by slot. Nodes are relinked on
//! rotation and deletion, never moved, so a [`NodeHandle`] stays valid until
//! its own price is removed.
//!
//! The tree is ordered by a side-dependent comparator: ascending for asks,
//! descending for bids. In both cases the best price is the leftmost node,
//! which is cached so that [`PriceIndex::best`] is O(1).

use super::error::OrderBookError;
use super::order::{Price, Side};
use slab::Slab;
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
struct Node {
    price: Price,
    color: Color,
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
}

/// Stable reference to a price stored in a [`PriceIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

/// Self-balancing ordered set of prices for one side of the book.
#[derive(Debug, Clone)]
pub struct PriceIndex {
    side: Side,
    nodes: Slab<Node>,
    root: Option<usize>,
    best: Option<usize>,
}

impl PriceIndex {
    /// Creates an empty index ordered for `side`.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self::with_capacity(side, 0)
    }

    /// Creates an empty index with room for `capacity` prices.
    #[must_use]
    pub fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            nodes: Slab::with_capacity(capacity),
            root: None,
            best: None,
        }
    }

    /// The side this index orders for.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of distinct prices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the index holds no price.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The best price under this side's comparator, if any.
    ///
    /// # Performance
    /// O(1), read from the cached handle.
    #[must_use]
    pub fn best(&self) -> Option<Price> {
        self.best.map(|node| self.nodes[node].price)
    }

    /// Handle to the node holding the best price.
    #[must_use]
    pub fn best_handle(&self) -> Option<NodeHandle> {
        self.best.map(NodeHandle)
    }

    /// Price stored under `handle`, or `None` if that price has been removed.
    #[must_use]
    pub fn price_of(&self, handle: NodeHandle) -> Option<Price> {
        self.nodes.get(handle.0).map(|node| node.price)
    }

    /// True if `price` is in the index.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.find(price).is_some()
    }

    /// Inserts `price`, returning the handle of the node that holds it.
    ///
    /// Inserting a price that is already present is a no-op and returns the
    /// existing handle.
    ///
    /// # Performance
    /// O(log L) for L distinct prices.
    pub fn insert(&mut self, price: Price) -> NodeHandle {
        let mut parent = None;
        let mut cursor = self.root;
        let mut goes_left = false;

        while let Some(current) = cursor {
            match self.compare(price, self.nodes[current].price) {
                Ordering::Equal => return NodeHandle(current),
                Ordering::Less => {
                    parent = Some(current);
                    goes_left = true;
                    cursor = self.nodes[current].left;
                }
                Ordering::Greater => {
                    parent = Some(current);
                    goes_left = false;
                    cursor = self.nodes[current].right;
                }
            }
        }

        let node = self.nodes.insert(Node {
            price,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        });

        match parent {
            None => self.root = Some(node),
            Some(parent) if goes_left => self.nodes[parent].left = Some(node),
            Some(parent) => self.nodes[parent].right = Some(node),
        }

        let is_new_best = match self.best {
            None => true,
            Some(best) => self.compare(price, self.nodes[best].price) == Ordering::Less,
        };
        if is_new_best {
            self.best = Some(node);
        }

        self.insert_fixup(node);
        NodeHandle(node)
    }

    /// Removes `price`. Returns `false` if it was not present.
    ///
    /// When the removed price was the cached best, the cache is rebuilt by
    /// walking the leftmost path from the root.
    ///
    /// # Performance
    /// O(log L) for L distinct prices.
    pub fn remove(&mut self, price: Price) -> bool {
        let Some(node) = self.find(price) else {
            return false;
        };

        let was_best = self.best == Some(node);
        self.delete_node(node);

        if was_best {
            self.best = self.root.map(|root| self.leftmost(root));
            debug!(
                "{} price index: best recomputed to {:?} after removing {}",
                self.side,
                self.best(),
                price
            );
        }
        true
    }

    /// Removes every price.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.best = None;
    }

    /// Prices from best to worst.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            index: self,
            next: self.best,
        }
    }

    /// Checks the red-black, ordering, parent-link and best-cache invariants.
    pub fn validate(&self) -> Result<(), OrderBookError> {
        let fail = |message: String| Err(OrderBookError::InvalidOperation { message });

        let Some(root) = self.root else {
            if self.best.is_some() || !self.nodes.is_empty() {
                return fail("empty tree with cached best or live nodes".to_string());
            }
            return Ok(());
        };

        if self.nodes[root].parent.is_some() {
            return fail("root has a parent".to_string());
        }
        if self.nodes[root].color != Color::Black {
            return fail("root is red".to_string());
        }

        let mut visited = 0;
        self.validate_subtree(root, None, None, &mut visited)?;
        if visited != self.nodes.len() {
            return fail(format!(
                "{} nodes reachable from root, {} allocated",
                visited,
                self.nodes.len()
            ));
        }

        let leftmost = self.leftmost(root);
        if self.best != Some(leftmost) {
            return fail(format!(
                "cached best {:?} differs from tree minimum {}",
                self.best(),
                self.nodes[leftmost].price
            ));
        }
        Ok(())
    }

    // Returns the black height of the subtree rooted at `node`.
    fn validate_subtree(
        &self,
        node: usize,
        lower: Option<Price>,
        upper: Option<Price>,
        visited: &mut usize,
    ) -> Result<usize, OrderBookError> {
        let fail = |message: String| Err(OrderBookError::InvalidOperation { message });
        let current = &self.nodes[node];
        *visited += 1;

        if let Some(lower) = lower
            && self.compare(current.price, lower) != Ordering::Greater
        {
            return fail(format!("{} is not after {}", current.price, lower));
        }
        if let Some(upper) = upper
            && self.compare(current.price, upper) != Ordering::Less
        {
            return fail(format!("{} is not before {}", current.price, upper));
        }

        let mut heights = [1usize; 2];
        for (slot, child) in [current.left, current.right].into_iter().enumerate() {
            let Some(child) = child else {
                continue;
            };
            if self.nodes[child].parent != Some(node) {
                return fail(format!("broken parent link below {}", current.price));
            }
            if current.color == Color::Red && self.nodes[child].color == Color::Red {
                return fail(format!("red node {} has a red child", current.price));
            }
            let (child_lower, child_upper) = if slot == 0 {
                (lower, Some(current.price))
            } else {
                (Some(current.price), upper)
            };
            heights[slot] = self.validate_subtree(child, child_lower, child_upper, visited)?;
        }

        if heights[0] != heights[1] {
            return fail(format!("unequal black height below {}", current.price));
        }
        Ok(heights[0] + usize::from(current.color == Color::Black))
    }

    fn compare(&self, a: Price, b: Price) -> Ordering {
        match self.side {
            Side::Ask => a.cmp(&b),
            Side::Bid => b.cmp(&a),
        }
    }

    fn find(&self, price: Price) -> Option<usize> {
        let mut cursor = self.root;
        while let Some(current) = cursor {
            cursor = match self.compare(price, self.nodes[current].price) {
                Ordering::Equal => return Some(current),
                Ordering::Less => self.nodes[current].left,
                Ordering::Greater => self.nodes[current].right,
            };
        }
        None
    }

    fn leftmost(&self, mut node: usize) -> usize {
        while let Some(left) = self.nodes[node].left {
            node = left;
        }
        node
    }

    fn successor(&self, node: usize) -> Option<usize> {
        if let Some(right) = self.nodes[node].right {
            return Some(self.leftmost(right));
        }
        let mut child = node;
        let mut parent = self.nodes[node].parent;
        while let Some(p) = parent {
            if self.nodes[p].right != Some(child) {
                break;
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        parent
    }

    fn is_red(&self, node: Option<usize>) -> bool {
        node.is_some_and(|n| self.nodes[n].color == Color::Red)
    }

    fn rotate_left(&mut self, x: usize) {
        let Some(y) = self.nodes[x].right else {
            return;
        };
        let y_left = self.nodes[y].left;
        self.nodes[x].right = y_left;
        if let Some(y_left) = y_left {
            self.nodes[y_left].parent = Some(x);
        }
        self.replace_child(x, Some(y));
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: usize) {
        let Some(y) = self.nodes[x].left else {
            return;
        };
        let y_right = self.nodes[y].right;
        self.nodes[x].left = y_right;
        if let Some(y_right) = y_right {
            self.nodes[y_right].parent = Some(x);
        }
        self.replace_child(x, Some(y));
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
    }

    // Puts `with` where `node` hangs from its parent (or at the root).
    fn replace_child(&mut self, node: usize, with: Option<usize>) {
        let parent = self.nodes[node].parent;
        match parent {
            None => self.root = with,
            Some(p) if self.nodes[p].left == Some(node) => self.nodes[p].left = with,
            Some(p) => self.nodes[p].right = with,
        }
        if let Some(with) = with {
            self.nodes[with].parent = parent;
        }
    }

    fn insert_fixup(&mut self, mut z: usize) {
        while let Some(mut p) = self.nodes[z].parent {
            if self.nodes[p].color == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(g) = self.nodes[p].parent else {
                break;
            };

            if self.nodes[g].left == Some(p) {
                let uncle = self.nodes[g].right;
                if let Some(u) = uncle.filter(|_| self.is_red(uncle)) {
                    self.nodes[p].color = Color::Black;
                    self.nodes[u].color = Color::Black;
                    self.nodes[g].color = Color::Red;
                    z = g;
                    continue;
                }
                if self.nodes[p].right == Some(z) {
                    self.rotate_left(p);
                    std::mem::swap(&mut z, &mut p);
                }
                self.nodes[p].color = Color::Black;
                self.nodes[g].color = Color::Red;
                self.rotate_right(g);
            } else {
                let uncle = self.nodes[g].left;
                if let Some(u) = uncle.filter(|_| self.is_red(uncle)) {
                    self.nodes[p].color = Color::Black;
                    self.nodes[u].color = Color::Black;
                    self.nodes[g].color = Color::Red;
                    z = g;
                    continue;
                }
                if self.nodes[p].left == Some(z) {
                    self.rotate_right(p);
                    std::mem::swap(&mut z, &mut p);
                }
                self.nodes[p].color = Color::Black;
                self.nodes[g].color = Color::Red;
                self.rotate_left(g);
            }
        }

        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
    }

    fn delete_node(&mut self, z: usize) {
        let mut removed_color = self.nodes[z].color;
        let x;
        let x_parent;

        match (self.nodes[z].left, self.nodes[z].right) {
            (None, right) => {
                x = right;
                x_parent = self.nodes[z].parent;
                self.replace_child(z, right);
            }
            (left, None) => {
                x = left;
                x_parent = self.nodes[z].parent;
                self.replace_child(z, left);
            }
            (Some(z_left), Some(z_right)) => {
                // Splice in the in-order successor by relinking, so that no
                // other node changes slot.
                let y = self.leftmost(z_right);
                removed_color = self.nodes[y].color;
                x = self.nodes[y].right;

                if self.nodes[y].parent == Some(z) {
                    x_parent = Some(y);
                } else {
                    x_parent = self.nodes[y].parent;
                    self.replace_child(y, x);
                    self.nodes[y].right = Some(z_right);
                    self.nodes[z_right].parent = Some(y);
                }

                self.replace_child(z, Some(y));
                self.nodes[y].left = Some(z_left);
                self.nodes[z_left].parent = Some(y);
                self.nodes[y].color = self.nodes[z].color;
            }
        }

        self.nodes.remove(z);

        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }
    }

    fn delete_fixup(&mut self, mut x: Option<usize>, mut parent: Option<usize>) {
        while x != self.root && !self.is_red(x) {
            let Some(p) = parent else {
                break;
            };

            if self.nodes[p].left == x {
                // A doubly-black x always has a sibling.
                let Some(mut w) = self.nodes[p].right else {
                    break;
                };
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_left(p);
                    let Some(sibling) = self.nodes[p].right else {
                        break;
                    };
                    w = sibling;
                }
                if !self.is_red(self.nodes[w].left) && !self.is_red(self.nodes[w].right) {
                    self.nodes[w].color = Color::Red;
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !self.is_red(self.nodes[w].right) {
                        if let Some(w_left) = self.nodes[w].left {
                            self.nodes[w_left].color = Color::Black;
                        }
                        self.nodes[w].color = Color::Red;
                        self.rotate_right(w);
                        let Some(sibling) = self.nodes[p].right else {
                            break;
                        };
                        w = sibling;
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    if let Some(w_right) = self.nodes[w].right {
                        self.nodes[w_right].color = Color::Black;
                    }
                    self.rotate_left(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let Some(mut w) = self.nodes[p].left else {
                    break;
                };
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_right(p);
                    let Some(sibling) = self.nodes[p].left else {
                        break;
                    };
                    w = sibling;
                }
                if !self.is_red(self.nodes[w].left) && !self.is_red(self.nodes[w].right) {
                    self.nodes[w].color = Color::Red;
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !self.is_red(self.nodes[w].left) {
                        if let Some(w_right) = self.nodes[w].right {
                            self.nodes[w_right].color = Color::Black;
                        }
                        self.nodes[w].color = Color::Red;
                        self.rotate_left(w);
                        let Some(sibling) = self.nodes[p].left else {
                            break;
                        };
                        w = sibling;
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    if let Some(w_left) = self.nodes[w].left {
                        self.nodes[w_left].color = Color::Black;
                    }
                    self.rotate_right(p);
                    x = self.root;
                    parent = None;
                }
            }
        }

        if let Some(x) = x {
            self.nodes[x].color = Color::Black;
        }
    }
}

/// Iterator over the prices of a [`PriceIndex`], best first.
pub struct Iter<'a> {
    index: &'a PriceIndex,
    next: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = Price;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = self.index.successor(node);
        Some(self.index.nodes[node].price)
    }
}
