//! Conversion between postfix and infix logic.

use unitrack_math::LocalSurfaceId;

use crate::build::build_surface_logic;
use crate::logic::{
    is_operand_token, is_operator_token, LogicInt, LogicNotation, LAND, LCLOSE, LNOT, LOPEN,
    LOR, LTRUE,
};
use crate::{transform_negated_joins, CsgTree, JoinOp, LogicError, Node, Result};

/// Build a single-region tree from postfix logic.
///
/// Operands become surfaces whose id is the face index. The region root is
/// the only entry in [`CsgTree::volumes`].
pub fn build_tree_from_postfix(postfix: &[LogicInt]) -> Result<CsgTree> {
    let mut tree = CsgTree::new();
    let mut stack = Vec::with_capacity(postfix.len());

    for (pos, &token) in postfix.iter().enumerate() {
        let node = match token {
            t if !is_operator_token(t) => Node::Surface(LocalSurfaceId::new(t)),
            LTRUE => Node::True,
            LNOT => {
                let child = stack.pop().ok_or(LogicError::MissingOperand { pos })?;
                Node::Negated(child)
            }
            LAND | LOR => {
                let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                    return Err(LogicError::MissingOperand { pos });
                };
                let op = if token == LAND { JoinOp::And } else { JoinOp::Or };
                Node::Joined(op, vec![left, right])
            }
            other => return Err(LogicError::UnexpectedToken { token: other, pos }),
        };
        stack.push(tree.insert(node).0);
    }

    match stack.as_slice() {
        [root] => {
            tree.insert_volume(*root);
            Ok(tree)
        }
        _ => Err(LogicError::Unbalanced { depth: stack.len() }),
    }
}

/// Subexpression on the infix stack and its outermost operator.
struct Operand {
    expr_type: LogicInt,
    expr: Vec<LogicInt>,
}

/// Convert postfix logic to infix with minimal parentheses.
///
/// Operands of a binary operator are wrapped only if their outermost
/// operator is the opposite join; operands of a negation are wrapped if they
/// are any join.
pub fn convert_to_infix(postfix: &[LogicInt]) -> Result<Vec<LogicInt>> {
    fn append(dst: &mut Vec<LogicInt>, src: Vec<LogicInt>, wrap: bool) {
        if wrap {
            dst.push(LOPEN);
            dst.extend(src);
            dst.push(LCLOSE);
        } else {
            dst.extend(src);
        }
    }

    let mut stack: Vec<Operand> = Vec::with_capacity(postfix.len());
    for (pos, &token) in postfix.iter().enumerate() {
        match token {
            t if is_operand_token(t) => stack.push(Operand {
                expr_type: LTRUE,
                expr: vec![t],
            }),
            LNOT => {
                let operand = stack.pop().ok_or(LogicError::MissingOperand { pos })?;
                let mut expr = Vec::with_capacity(operand.expr.len() + 3);
                expr.push(LNOT);
                append(&mut expr, operand.expr, operand.expr_type < LNOT);
                stack.push(Operand {
                    expr_type: LNOT,
                    expr,
                });
            }
            LAND | LOR => {
                let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                    return Err(LogicError::MissingOperand { pos });
                };
                let opposite = if token == LAND { LOR } else { LAND };
                let mut expr = Vec::with_capacity(left.expr.len() + right.expr.len() + 5);
                append(&mut expr, left.expr, left.expr_type == opposite);
                expr.push(token);
                append(&mut expr, right.expr, right.expr_type == opposite);
                stack.push(Operand {
                    expr_type: token,
                    expr,
                });
            }
            other => return Err(LogicError::UnexpectedToken { token: other, pos }),
        }
    }

    let depth = stack.len();
    match stack.pop() {
        Some(result) if depth == 1 => Ok(result.expr),
        _ => Err(LogicError::Unbalanced { depth }),
    }
}

fn precedence(token: LogicInt) -> u8 {
    match token {
        LOR => 1,
        LAND => 2,
        LNOT => 3,
        _ => 0,
    }
}

/// Convert infix logic to postfix with the shunting-yard algorithm.
///
/// NOT binds tightest and is right-associative; AND binds tighter than OR.
pub fn convert_to_postfix(infix: &[LogicInt]) -> Result<Vec<LogicInt>> {
    if infix.is_empty() {
        return Err(LogicError::Unbalanced { depth: 0 });
    }

    let mut output = Vec::with_capacity(infix.len());
    let mut ops: Vec<(LogicInt, usize)> = Vec::new();
    let mut expect_operand = true;

    for (pos, &token) in infix.iter().enumerate() {
        let unexpected = LogicError::UnexpectedToken { token, pos };
        match token {
            t if is_operand_token(t) => {
                if !expect_operand {
                    return Err(unexpected);
                }
                output.push(t);
                expect_operand = false;
            }
            LNOT | LOPEN => {
                if !expect_operand {
                    return Err(unexpected);
                }
                ops.push((token, pos));
            }
            LAND | LOR => {
                if expect_operand {
                    return Err(LogicError::MissingOperand { pos });
                }
                let prec = precedence(token);
                while let Some(&(top, _)) = ops.last() {
                    let top_prec = precedence(top);
                    if top == LOPEN || top_prec < prec || (top_prec == prec && top == LNOT) {
                        break;
                    }
                    output.push(top);
                    ops.pop();
                }
                ops.push((token, pos));
                expect_operand = true;
            }
            LCLOSE => {
                if expect_operand {
                    return Err(LogicError::MissingOperand { pos });
                }
                loop {
                    match ops.pop() {
                        Some((LOPEN, _)) => break,
                        Some((op, _)) => output.push(op),
                        None => return Err(LogicError::MismatchedParen { pos }),
                    }
                }
            }
            _ => return Err(unexpected),
        }
    }

    if expect_operand {
        return Err(LogicError::MissingOperand { pos: infix.len() });
    }
    while let Some((op, pos)) = ops.pop() {
        if op == LOPEN {
            return Err(LogicError::MismatchedParen { pos });
        }
        output.push(op);
    }
    Ok(output)
}

/// Convert logic between notations.
///
/// Postfix input is first rewritten so that no join is negated, which keeps
/// the infix result free of `~(...)` groups. The result is logically
/// equivalent but not necessarily token-identical.
pub fn convert_logic(
    logic: &[LogicInt],
    from: LogicNotation,
    to: LogicNotation,
) -> Result<Vec<LogicInt>> {
    match (from, to) {
        (LogicNotation::Postfix, LogicNotation::Infix) => {
            let tree = build_tree_from_postfix(logic)?;
            let transformed = transform_negated_joins(&tree);
            let root = transformed
                .tree
                .volumes()
                .first()
                .copied()
                .unwrap_or(CsgTree::FALSE);
            let postfix = build_surface_logic(LogicNotation::Postfix, &transformed.tree, root);
            convert_to_infix(&postfix)
        }
        (LogicNotation::Infix, LogicNotation::Postfix) => convert_to_postfix(logic),
        _ => Ok(logic.to_vec()),
    }
}
