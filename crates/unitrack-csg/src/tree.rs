//! Deduplicating CSG expression tree.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use crate::{Node, NodeId, NodeSimplifier};

/// DAG of CSG nodes with structural deduplication.
///
/// Nodes are only ever appended, and every node's children have lower ids
/// than the node itself. Node 0 is `True` and node 1 is its negation, which
/// stands in for `False`. Inserted nodes are simplified one level first, so
/// inserting an expression that reduces to an existing node returns that
/// node's id.
#[derive(Debug, Clone)]
pub struct CsgTree {
    nodes: Vec<Node>,
    ids: HashMap<Node, NodeId>,
    volumes: Vec<NodeId>,
}

impl CsgTree {
    /// Node that is always true.
    pub const TRUE: NodeId = NodeId::new(0);
    /// Node that is always false.
    pub const FALSE: NodeId = NodeId::new(1);

    /// Create a tree containing only the two constants.
    pub fn new() -> Self {
        let nodes = vec![Node::True, Node::Negated(Self::TRUE)];
        let ids = HashMap::from([
            (Node::True, Self::TRUE),
            (Node::False, Self::FALSE),
            (Node::Negated(Self::TRUE), Self::FALSE),
            (Node::Negated(Self::FALSE), Self::TRUE),
        ]);
        Self {
            nodes,
            ids,
            volumes: Vec::new(),
        }
    }

    /// Number of nodes, including the two constants.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the constants are present from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Iterate over `(id, node)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Root nodes of the regions, in insertion order.
    pub fn volumes(&self) -> &[NodeId] {
        &self.volumes
    }

    /// Record a region root.
    pub fn insert_volume(&mut self, id: NodeId) {
        assert!(id.index() < self.nodes.len(), "volume node {id} is not in the tree");
        self.volumes.push(id);
    }

    /// Follow aliases to the node they stand for.
    pub fn dealias(&self, mut id: NodeId) -> NodeId {
        while let Node::Aliased(target) = self.nodes[id.index()] {
            id = target;
        }
        id
    }

    /// Add a node, returning its id and whether it was newly created.
    ///
    /// # Panics
    ///
    /// Panics if a child id is not already in the tree.
    pub fn insert(&mut self, node: Node) -> (NodeId, bool) {
        self.check_children(&node);
        let node = NodeSimplifier::new(self).simplify(&node).unwrap_or(node);
        if let Node::Aliased(target) = node {
            return (target, false);
        }

        if let Some(&existing) = self.ids.get(&node) {
            return (existing, false);
        }
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node.clone());
        self.ids.insert(node, id);
        (id, true)
    }

    /// Id of an existing node equivalent to `node` after one level of
    /// simplification.
    pub fn find(&self, node: &Node) -> Option<NodeId> {
        match NodeSimplifier::new(self).simplify(node) {
            Some(Node::Aliased(target)) => Some(target),
            Some(simplified) => self.ids.get(&simplified).copied(),
            None => self.ids.get(node).copied(),
        }
    }

    /// Replace a node in place, returning the previous definition.
    ///
    /// The replacement is simplified first. If it duplicates another node,
    /// the higher of the two ids becomes an alias of the lower one so that
    /// children keep preceding their parents.
    ///
    /// # Panics
    ///
    /// Panics if `id` is a constant or not in the tree.
    pub fn exchange(&mut self, id: NodeId, node: Node) -> Node {
        assert!(id > Self::FALSE, "constant nodes cannot be replaced");
        assert!(id.index() < self.nodes.len(), "node {id} is not in the tree");
        self.check_children(&node);

        let node = NodeSimplifier::new(self).simplify(&node).unwrap_or(node);
        if let Node::Aliased(target) = node {
            assert!(target < id, "alias {target} must precede node {id}");
            return std::mem::replace(&mut self.nodes[id.index()], node);
        }

        match self.ids.get(&node).copied() {
            None => {
                self.ids.insert(node.clone(), id);
                std::mem::replace(&mut self.nodes[id.index()], node)
            }
            Some(existing) if existing == id => {
                std::mem::replace(&mut self.nodes[id.index()], node)
            }
            Some(existing) if existing > id => {
                // Move the definition down and alias the later copy to it
                self.ids.insert(node.clone(), id);
                self.nodes[existing.index()] = Node::Aliased(id);
                std::mem::replace(&mut self.nodes[id.index()], node)
            }
            Some(existing) => {
                std::mem::replace(&mut self.nodes[id.index()], Node::Aliased(existing))
            }
        }
    }

    /// Simplify one node in place, returning the old definition if it changed.
    pub fn simplify(&mut self, id: NodeId) -> Option<Node> {
        if id <= Self::FALSE {
            return None;
        }
        let node = self.nodes[id.index()].clone();
        let old = self.exchange(id, node);
        (old != self.nodes[id.index()]).then_some(old)
    }

    fn check_children(&self, node: &Node) {
        let len = self.nodes.len();
        let valid = |n: &NodeId| n.index() < len;
        let ok = match node {
            Node::True | Node::False | Node::Surface(_) => true,
            Node::Aliased(n) | Node::Negated(n) => valid(n),
            Node::Joined(_, children) => children.iter().all(valid),
        };
        assert!(ok, "node {node} references a child outside the tree");
    }
}

impl Default for CsgTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for CsgTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl fmt::Display for CsgTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (id, node) in self.iter() {
            if id.index() > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}: {node}")?;
        }
        f.write_str("}")
    }
}
