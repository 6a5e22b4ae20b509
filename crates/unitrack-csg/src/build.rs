//! Flatten a CSG subtree into region logic.

use unitrack_math::LocalSurfaceId;

use crate::logic::{is_operator_token, LogicInt, LogicNotation, LCLOSE, LNOT, LOPEN, LTRUE};
use crate::{CsgTree, Node, NodeId};

/// Faces and logic of one region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildLogicResult {
    /// Distinct surfaces referenced by the logic, sorted by id.
    pub faces: Vec<LocalSurfaceId>,
    /// Logic whose operands index into `faces`.
    pub logic: Vec<LogicInt>,
}

/// Flatten the expression rooted at `node` into the given notation.
///
/// Surfaces are collected into a sorted face list and the logic refers to
/// them by position in that list.
pub fn build_logic(notation: LogicNotation, tree: &CsgTree, node: NodeId) -> BuildLogicResult {
    let mut logic = build_surface_logic(notation, tree, node);

    let mut faces: Vec<LogicInt> = logic
        .iter()
        .copied()
        .filter(|&t| !is_operator_token(t))
        .collect();
    faces.sort_unstable();
    faces.dedup();

    for token in logic.iter_mut().filter(|t| !is_operator_token(**t)) {
        // Every operand was collected above
        if let Ok(index) = faces.binary_search(token) {
            *token = index as LogicInt;
        }
    }

    BuildLogicResult {
        faces: faces.into_iter().map(LocalSurfaceId::new).collect(),
        logic,
    }
}

/// Flatten without remapping: operands are surface ids.
pub(crate) fn build_surface_logic(
    notation: LogicNotation,
    tree: &CsgTree,
    node: NodeId,
) -> Vec<LogicInt> {
    let mut logic = Vec::new();
    match notation {
        LogicNotation::Postfix => visit_postfix(tree, node, &mut logic),
        LogicNotation::Infix => visit_infix(tree, node, 0, &mut logic),
    }
    logic
}

fn visit_postfix(tree: &CsgTree, id: NodeId, out: &mut Vec<LogicInt>) {
    match &tree[id] {
        Node::True => out.push(LTRUE),
        Node::False => out.extend([LTRUE, LNOT]),
        Node::Aliased(target) => visit_postfix(tree, *target, out),
        Node::Negated(child) => {
            visit_postfix(tree, *child, out);
            out.push(LNOT);
        }
        Node::Surface(s) => out.push(s.get()),
        Node::Joined(op, children) => {
            let Some((first, rest)) = children.split_first() else {
                return;
            };
            visit_postfix(tree, *first, out);
            for child in rest {
                visit_postfix(tree, *child, out);
                out.push(op.token());
            }
        }
    }
}

fn visit_infix(tree: &CsgTree, id: NodeId, depth: usize, out: &mut Vec<LogicInt>) {
    match &tree[id] {
        Node::True => out.push(LTRUE),
        Node::False => out.extend([LNOT, LTRUE]),
        Node::Aliased(target) => visit_infix(tree, *target, depth, out),
        Node::Negated(child) => {
            out.push(LNOT);
            visit_infix(tree, *child, depth + 1, out);
        }
        Node::Surface(s) => out.push(s.get()),
        Node::Joined(op, children) => {
            if depth > 0 {
                out.push(LOPEN);
            }
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push(op.token());
                }
                visit_infix(tree, *child, depth + 1, out);
            }
            if depth > 0 {
                out.push(LCLOSE);
            }
        }
    }
}
