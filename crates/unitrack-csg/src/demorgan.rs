//! De Morgan rewrite of negated joins.
//!
//! `~(a & b)` becomes `~a | ~b` and `~(a | b)` becomes `~a & ~b`, pushing
//! every negation down onto a surface. Double negations cancel along the
//! way, so the rewritten tree only contains `Negated` nodes whose child is a
//! surface or a constant.

use std::collections::HashMap;

use crate::{CsgTree, Node, NodeId};

/// Result of [`transform_negated_joins`].
#[derive(Debug, Clone)]
pub struct TransformedTree {
    /// Rewritten tree with the same region roots.
    pub tree: CsgTree,
    /// For each node of the input tree, the equivalent node in the output
    /// tree if one exists.
    ///
    /// Nodes that were only reachable under a negation, such as the join
    /// inside `~(a & b)`, have no equivalent.
    pub new_nodes: Vec<Option<NodeId>>,
}

/// Rebuild a tree with every negated join replaced by its De Morgan dual.
///
/// Every node that is not the child of another node, plus every region
/// root, is rebuilt in order of increasing id. Nodes no longer referenced
/// after the rewrite are not carried over.
pub fn transform_negated_joins(tree: &CsgTree) -> TransformedTree {
    let mut has_parent = vec![false; tree.len()];
    for (_, node) in tree.iter() {
        match node {
            Node::Aliased(child) | Node::Negated(child) => has_parent[child.index()] = true,
            Node::Joined(_, children) => {
                for child in children {
                    has_parent[child.index()] = true;
                }
            }
            Node::True | Node::False | Node::Surface(_) => {}
        }
    }
    for vol in tree.volumes() {
        has_parent[vol.index()] = false;
    }

    let mut rebuilder = Rebuilder::new(tree);
    for (id, _) in tree.iter().skip(2) {
        if !has_parent[id.index()] {
            rebuilder.rebuild(id, false);
        }
    }
    for &vol in tree.volumes() {
        let new_vol = rebuilder.rebuild(vol, false);
        rebuilder.result.insert_volume(new_vol);
    }

    log::trace!(
        "rewrote negated joins: {} nodes -> {}",
        tree.len(),
        rebuilder.result.len()
    );
    TransformedTree {
        tree: rebuilder.result,
        new_nodes: rebuilder.new_nodes,
    }
}

/// Memoized recursive rebuild keyed by `(node, negated)`.
struct Rebuilder<'a> {
    source: &'a CsgTree,
    result: CsgTree,
    memo: HashMap<(NodeId, bool), NodeId>,
    new_nodes: Vec<Option<NodeId>>,
}

impl<'a> Rebuilder<'a> {
    fn new(source: &'a CsgTree) -> Self {
        let mut new_nodes = vec![None; source.len()];
        new_nodes[CsgTree::TRUE.index()] = Some(CsgTree::TRUE);
        new_nodes[CsgTree::FALSE.index()] = Some(CsgTree::FALSE);
        Self {
            source,
            result: CsgTree::new(),
            memo: HashMap::new(),
            new_nodes,
        }
    }

    /// Id in the new tree of `id`, or of its complement if `negate`.
    fn rebuild(&mut self, id: NodeId, negate: bool) -> NodeId {
        if let Some(&done) = self.memo.get(&(id, negate)) {
            return done;
        }

        let source = self.source;
        let new_id = match &source[id] {
            Node::True => self.constant(!negate),
            Node::False => self.constant(negate),
            Node::Aliased(target) => self.rebuild(*target, negate),
            Node::Negated(child) => self.rebuild(*child, !negate),
            Node::Surface(surface) => {
                let (surf_id, _) = self.result.insert(Node::Surface(*surface));
                self.new_nodes[id.index()] = Some(surf_id);
                if negate {
                    self.result.insert(Node::Negated(surf_id)).0
                } else {
                    surf_id
                }
            }
            Node::Joined(op, children) => {
                let op = if negate { op.opposite() } else { *op };
                let children: Vec<NodeId> = children
                    .iter()
                    .map(|&child| self.rebuild(child, negate))
                    .collect();
                self.result.insert(Node::Joined(op, children)).0
            }
        };

        if !negate {
            self.new_nodes[id.index()] = Some(new_id);
        }
        self.memo.insert((id, negate), new_id);
        new_id
    }

    fn constant(&self, value: bool) -> NodeId {
        if value {
            CsgTree::TRUE
        } else {
            CsgTree::FALSE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JoinOp;
    use unitrack_math::LocalSurfaceId;

    fn insert(tree: &mut CsgTree, node: Node) -> NodeId {
        tree.insert(node).0
    }

    fn surface(tree: &mut CsgTree, id: u32) -> NodeId {
        insert(tree, Node::Surface(LocalSurfaceId::new(id)))
    }

    fn ids(values: &[Option<u32>]) -> Vec<Option<NodeId>> {
        values.iter().map(|v| v.map(NodeId::new)).collect()
    }

    #[test]
    fn test_noop() {
        let mut tree = CsgTree::new();
        let s0 = surface(&mut tree, 0);
        let s1 = surface(&mut tree, 1);
        let n0 = insert(&mut tree, Node::Negated(s1));
        insert(&mut tree, Node::Joined(JoinOp::And, vec![s0, n0]));
        let expected = "{0: true, 1: not{0}, 2: surface 0, 3: surface 1, 4: not{3}, 5: all{2,4}}";
        assert_eq!(tree.to_string(), expected);

        let result = transform_negated_joins(&tree);
        assert_eq!(result.tree.to_string(), expected);
        assert_eq!(
            result.new_nodes,
            ids(&[Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)])
        );
    }

    #[test]
    fn test_negated_join() {
        let mut tree = CsgTree::new();
        let s0 = surface(&mut tree, 0);
        let s1 = surface(&mut tree, 1);
        let n0 = insert(&mut tree, Node::Negated(s1));
        let j0 = insert(&mut tree, Node::Joined(JoinOp::And, vec![s0, n0]));
        insert(&mut tree, Node::Negated(j0));

        let result = transform_negated_joins(&tree);
        assert_eq!(
            result.tree.to_string(),
            "{0: true, 1: not{0}, 2: surface 0, 3: not{2}, 4: surface 1, 5: any{3,4}}"
        );
        assert_eq!(
            result.new_nodes,
            ids(&[Some(0), Some(1), Some(2), Some(4), None, None, Some(5)])
        );

        // Negations of both join types, sharing operands
        let j1 = insert(&mut tree, Node::Joined(JoinOp::Or, vec![s0, n0]));
        insert(&mut tree, Node::Negated(j1));
        let result = transform_negated_joins(&tree);
        assert_eq!(
            result.tree.to_string(),
            "{0: true, 1: not{0}, 2: surface 0, 3: not{2}, 4: surface 1, 5: any{3,4}, 6: all{3,4}}"
        );
        assert_eq!(
            result.new_nodes,
            ids(&[Some(0), Some(1), Some(2), Some(4), None, None, Some(5), None, Some(6)])
        );

        // Disjoint subtree
        let s2 = surface(&mut tree, 2);
        insert(&mut tree, Node::Negated(s2));
        let result = transform_negated_joins(&tree);
        assert_eq!(
            result.tree.to_string(),
            "{0: true, 1: not{0}, 2: surface 0, 3: not{2}, 4: surface 1, 5: any{3,4}, \
             6: all{3,4}, 7: surface 2, 8: not{7}}"
        );
        assert_eq!(result.new_nodes[9], Some(NodeId::new(7)));
        assert_eq!(result.new_nodes[10], Some(NodeId::new(8)));
    }

    #[test]
    fn test_nested_negations() {
        // ~(~(a | ~b) & c) == (a | ~b) | ~c
        let mut tree = CsgTree::new();
        let a = surface(&mut tree, 0);
        let b = surface(&mut tree, 1);
        let c = surface(&mut tree, 2);
        let nb = insert(&mut tree, Node::Negated(b));
        let or = insert(&mut tree, Node::Joined(JoinOp::Or, vec![a, nb]));
        let nor = insert(&mut tree, Node::Negated(or));
        let and = insert(&mut tree, Node::Joined(JoinOp::And, vec![nor, c]));
        let root = insert(&mut tree, Node::Negated(and));
        tree.insert_volume(root);

        let result = transform_negated_joins(&tree);
        let new_tree = &result.tree;
        let vol = new_tree.volumes()[0];
        let Node::Joined(JoinOp::Or, children) = &new_tree[vol] else {
            panic!("expected a union, got {}", new_tree[vol]);
        };
        assert_eq!(children.len(), 3);
        for (_, node) in new_tree.iter() {
            if let Node::Negated(child) = node {
                assert!(
                    matches!(new_tree[*child], Node::Surface(_) | Node::True),
                    "negated join survived: {new_tree}"
                );
            }
        }
        assert_eq!(result.new_nodes[root.index()], Some(vol));
    }

    #[test]
    fn test_constants() {
        let mut tree = CsgTree::new();
        tree.insert_volume(CsgTree::FALSE);
        tree.insert_volume(CsgTree::TRUE);
        let result = transform_negated_joins(&tree);
        assert_eq!(result.tree.len(), 2);
        assert_eq!(result.tree.volumes(), &[CsgTree::FALSE, CsgTree::TRUE]);
    }
}
