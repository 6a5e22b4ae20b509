//! One-level node simplification.

use std::collections::BTreeSet;

use crate::{CsgTree, JoinOp, Node, NodeId};

/// Rewrites a node in terms of the nodes already in a tree.
///
/// Only the node itself is rewritten; its children are assumed to be
/// simplified already.
#[derive(Debug, Clone, Copy)]
pub struct NodeSimplifier<'a> {
    tree: &'a CsgTree,
}

impl<'a> NodeSimplifier<'a> {
    /// Simplify against the given tree.
    pub fn new(tree: &'a CsgTree) -> Self {
        Self { tree }
    }

    /// Simplified version of `node`, or `None` if it cannot be reduced.
    pub fn simplify(&self, node: &Node) -> Option<Node> {
        match node {
            Node::True | Node::False | Node::Surface(_) => None,
            Node::Aliased(target) => match self.tree[*target] {
                Node::Aliased(inner) => Some(Node::Aliased(inner)),
                _ => None,
            },
            Node::Negated(child) => self.simplify_negated(*child),
            Node::Joined(op, children) => self.simplify_joined(*op, children),
        }
    }

    fn simplify_negated(&self, child: NodeId) -> Option<Node> {
        match &self.tree[child] {
            Node::True => Some(Node::False),
            Node::False => Some(Node::True),
            Node::Aliased(target) => Some(Node::Negated(*target)),
            Node::Negated(inner) => Some(Node::Aliased(*inner)),
            Node::Surface(_) | Node::Joined(..) => None,
        }
    }

    fn simplify_joined(&self, op: JoinOp, children: &[NodeId]) -> Option<Node> {
        // `constant` absorbs the whole join; `ignore` is its identity
        let (constant, ignore) = match op {
            JoinOp::And => (CsgTree::FALSE, CsgTree::TRUE),
            JoinOp::Or => (CsgTree::TRUE, CsgTree::FALSE),
        };

        let mut result = Vec::with_capacity(children.len());
        for &child in children {
            let child = match self.tree[child] {
                Node::Aliased(target) => target,
                _ => child,
            };
            if child == constant {
                return Some(Node::Aliased(constant));
            }
            if child == ignore {
                continue;
            }
            match &self.tree[child] {
                Node::Joined(child_op, grandchildren) if *child_op == op => {
                    result.extend_from_slice(grandchildren);
                }
                _ => result.push(child),
            }
        }
        result.sort_unstable();
        result.dedup();

        match result.as_slice() {
            [] => return Some(Node::Aliased(ignore)),
            [single] => return Some(Node::Aliased(*single)),
            _ => {}
        }

        // A child joined with its own complement
        let negations: BTreeSet<NodeId> = result
            .iter()
            .filter_map(|&c| self.tree.find(&Node::Negated(c)))
            .collect();
        if result.iter().any(|c| negations.contains(c)) {
            return Some(Node::Aliased(constant));
        }

        (result != children).then_some(Node::Joined(op, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unitrack_math::LocalSurfaceId;

    struct Fixture {
        tree: CsgTree,
        a: NodeId,
        b: NodeId,
        not_a: NodeId,
    }

    fn fixture() -> Fixture {
        let mut tree = CsgTree::new();
        let a = tree.insert(Node::Surface(LocalSurfaceId::new(0))).0;
        let b = tree.insert(Node::Surface(LocalSurfaceId::new(1))).0;
        let not_a = tree.insert(Node::Negated(a)).0;
        Fixture { tree, a, b, not_a }
    }

    #[test]
    fn test_negated() {
        let f = fixture();
        let s = NodeSimplifier::new(&f.tree);
        assert_eq!(s.simplify(&Node::Negated(CsgTree::TRUE)), Some(Node::False));
        // Stored false is itself a negation, so it collapses to an alias
        assert_eq!(
            s.simplify(&Node::Negated(CsgTree::FALSE)),
            Some(Node::Aliased(CsgTree::TRUE))
        );
        assert_eq!(s.simplify(&Node::Negated(f.not_a)), Some(Node::Aliased(f.a)));
        assert_eq!(s.simplify(&Node::Negated(f.a)), None);
        assert_eq!(s.simplify(&Node::Surface(LocalSurfaceId::new(3))), None);
    }

    #[test]
    fn test_constants() {
        let f = fixture();
        let s = NodeSimplifier::new(&f.tree);
        let and = |c: Vec<NodeId>| s.simplify(&Node::Joined(JoinOp::And, c));
        let or = |c: Vec<NodeId>| s.simplify(&Node::Joined(JoinOp::Or, c));

        assert_eq!(and(vec![f.a, CsgTree::FALSE]), Some(Node::Aliased(CsgTree::FALSE)));
        assert_eq!(or(vec![f.a, CsgTree::TRUE]), Some(Node::Aliased(CsgTree::TRUE)));
        assert_eq!(and(vec![f.a, CsgTree::TRUE]), Some(Node::Aliased(f.a)));
        assert_eq!(or(vec![CsgTree::FALSE, f.b]), Some(Node::Aliased(f.b)));
        assert_eq!(and(vec![CsgTree::TRUE]), Some(Node::Aliased(CsgTree::TRUE)));
        assert_eq!(or(vec![]), Some(Node::Aliased(CsgTree::FALSE)));
    }

    #[test]
    fn test_sort_and_dedup() {
        let f = fixture();
        let s = NodeSimplifier::new(&f.tree);
        assert_eq!(
            s.simplify(&Node::Joined(JoinOp::Or, vec![f.b, f.a, f.b])),
            Some(Node::Joined(JoinOp::Or, vec![f.a, f.b]))
        );
        assert_eq!(s.simplify(&Node::Joined(JoinOp::Or, vec![f.a, f.b])), None);
        assert_eq!(
            s.simplify(&Node::Joined(JoinOp::And, vec![f.a, f.a])),
            Some(Node::Aliased(f.a))
        );
    }

    #[test]
    fn test_complement() {
        let f = fixture();
        let s = NodeSimplifier::new(&f.tree);
        assert_eq!(
            s.simplify(&Node::Joined(JoinOp::And, vec![f.a, f.b, f.not_a])),
            Some(Node::Aliased(CsgTree::FALSE))
        );
        assert_eq!(
            s.simplify(&Node::Joined(JoinOp::Or, vec![f.not_a, f.a])),
            Some(Node::Aliased(CsgTree::TRUE))
        );
    }

    #[test]
    fn test_flatten() {
        let mut f = fixture();
        let c = f.tree.insert(Node::Surface(LocalSurfaceId::new(2))).0;
        let inner = f.tree.insert(Node::Joined(JoinOp::And, vec![f.a, f.b])).0;

        let s = NodeSimplifier::new(&f.tree);
        assert_eq!(
            s.simplify(&Node::Joined(JoinOp::And, vec![c, inner])),
            Some(Node::Joined(JoinOp::And, vec![f.a, f.b, c]))
        );
        // Different operators are left nested
        assert!(c < inner);
        assert_eq!(s.simplify(&Node::Joined(JoinOp::Or, vec![c, inner])), None);
    }

    #[test]
    fn test_aliases() {
        let mut f = fixture();
        let (j, _) = f.tree.insert(Node::Joined(JoinOp::Or, vec![f.a, f.b]));
        f.tree.exchange(f.b, Node::Aliased(f.a));
        let s = NodeSimplifier::new(&f.tree);
        assert_eq!(s.simplify(&Node::Aliased(f.b)), Some(Node::Aliased(f.a)));
        assert_eq!(s.simplify(&Node::Aliased(f.a)), None);
        assert_eq!(s.simplify(&f.tree[j].clone()), Some(Node::Aliased(f.a)));
    }
}
